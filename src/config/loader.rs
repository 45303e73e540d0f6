use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::CleanmapConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".cleanmap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Read the raw contents of a config file
pub(crate) fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a TOML document and reject out-of-range settings
pub fn parse_and_validate_config(contents: &str) -> Result<CleanmapConfig> {
    let config = toml::from_str::<CleanmapConfig>(contents)?;
    config.validate().map_err(Error::Configuration)?;
    Ok(config)
}

/// Try a single candidate path; failures are logged and yield `None`
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<CleanmapConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Ignoring invalid config {}: {}",
                config_path.display(),
                e
            );
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Missing files are the normal case while walking up the tree
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` followed by its parents, at most `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.cleanmap.toml`
pub fn load_config_from(start: &Path) -> CleanmapConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            CleanmapConfig::default()
        })
}

pub fn load_config() -> CleanmapConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            CleanmapConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config = parse_and_validate_config(indoc! {r#"
            [classifier]
            min_occurrences = 5
        "#})
        .unwrap();
        assert_eq!(config.classifier.min_occurrences, 5);
        assert!((config.classifier.similarity_threshold - 0.7).abs() < f64::EPSILON);
        assert!(config.engine.continue_on_error);
        assert_eq!(config.engine.max_errors, None);
    }

    #[test]
    fn test_parse_rejects_invalid_threshold() {
        let result = parse_and_validate_config(indoc! {r#"
            [classifier]
            similarity_threshold = 1.5
        "#});
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        let result = parse_and_validate_config("[classifier\nmin_occurrences = ");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }

    #[test]
    fn test_load_config_from_finds_parent_file() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("packages").join("web");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[engine]\nparallel = false\nmax_errors = 4\n",
        )
        .unwrap();

        let config = load_config_from(&nested);
        assert!(!config.engine.parallel);
        assert_eq!(config.engine.max_errors, Some(4));
    }

    #[test]
    fn test_load_config_from_falls_back_on_invalid_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[classifier]\nmin_priority = 0\n",
        )
        .unwrap();

        let config = load_config_from(temp.path());
        assert_eq!(config.classifier.min_priority, 1);
    }
}
