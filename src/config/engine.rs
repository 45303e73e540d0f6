use serde::{Deserialize, Serialize};

fn default_continue_on_error() -> bool {
    true
}

fn default_parallel() -> bool {
    true
}

/// Controls how the analysis engine walks a batch of files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineOptions {
    /// Keep going after a file fails to parse (default: true)
    #[serde(default = "default_continue_on_error")]
    pub continue_on_error: bool,

    /// Abort once this many files have failed. None means unlimited.
    #[serde(default)]
    pub max_errors: Option<usize>,

    /// Analyze files on the rayon pool (default: true)
    ///
    /// Sequential mode is handy when debugging a single detector.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            continue_on_error: default_continue_on_error(),
            max_errors: None,
            parallel: default_parallel(),
        }
    }
}

impl EngineOptions {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self.max_errors {
            Some(0) => Err("max_errors must be at least 1 when set".to_string()),
            _ => Ok(()),
        }
    }
}
