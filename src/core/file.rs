//! File metadata supplied by the caller's scanner

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Coarse role of a file, used to route it to detectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileCategory {
    Component,
    ApiRoute,
    Service,
    Type,
    Util,
    Middleware,
    Config,
    Test,
    Other,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Component => "component",
            FileCategory::ApiRoute => "api-route",
            FileCategory::Service => "service",
            FileCategory::Type => "type",
            FileCategory::Util => "util",
            FileCategory::Middleware => "middleware",
            FileCategory::Config => "config",
            FileCategory::Test => "test",
            FileCategory::Other => "other",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Absolute path
    pub path: PathBuf,
    /// Path relative to the project root; issues report this one
    pub relative_path: String,
    /// Extension including the leading dot, e.g. `.tsx`
    pub extension: String,
    pub size: u64,
    pub category: FileCategory,
}

impl FileInfo {
    pub fn new(path: impl Into<PathBuf>, relative_path: impl Into<String>, category: FileCategory) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            path,
            relative_path: relative_path.into(),
            extension,
            size: 0,
            category,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_extension() {
        let info = FileInfo::new(
            "/repo/src/components/Button.tsx",
            "src/components/Button.tsx",
            FileCategory::Component,
        )
        .with_size(512);
        assert_eq!(info.extension, ".tsx");
        assert_eq!(info.size, 512);
        assert_eq!(info.category.as_str(), "component");
    }
}
