use serde::{Deserialize, Serialize};

use super::classification::PatternDetectionConfig;
use super::engine::EngineOptions;

/// Root configuration structure, read from `.cleanmap.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CleanmapConfig {
    /// Pattern detection thresholds
    #[serde(default)]
    pub classifier: PatternDetectionConfig,

    /// Batch analysis behaviour
    #[serde(default)]
    pub engine: EngineOptions,
}

impl CleanmapConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.classifier
            .validate()
            .map_err(|e| format!("[classifier] {}", e))?;
        self.engine
            .validate()
            .map_err(|e| format!("[engine] {}", e))
    }
}
