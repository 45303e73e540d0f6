use serde::{Deserialize, Serialize};

fn default_min_occurrences() -> usize {
    3
}

fn default_min_priority() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

fn default_similarity_threshold() -> f64 {
    0.7
}

/// Thresholds and switches for pattern detection in the issue classifier.
///
/// ```toml
/// [classifier]
/// min_occurrences = 3
/// similarity_threshold = 0.7
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternDetectionConfig {
    /// Minimum group size for any pattern (default: 3)
    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: usize,

    /// Patterns scoring below this priority are dropped (default: 1)
    #[serde(default = "default_min_priority")]
    pub min_priority: u8,

    /// Run detector-level, similarity and systemic passes (default: true)
    #[serde(default = "default_true")]
    pub detect_cross_file_patterns: bool,

    /// Cluster issues by description similarity (default: true)
    #[serde(default = "default_true")]
    pub detect_similar_issues: bool,

    /// Jaccard cutoff for description clustering, 0..=1 (default: 0.7)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

impl Default for PatternDetectionConfig {
    fn default() -> Self {
        Self {
            min_occurrences: default_min_occurrences(),
            min_priority: default_min_priority(),
            detect_cross_file_patterns: true,
            detect_similar_issues: true,
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl PatternDetectionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_occurrences == 0 {
            return Err("min_occurrences must be at least 1".to_string());
        }
        if !(1..=10).contains(&self.min_priority) {
            return Err(format!(
                "min_priority must be between 1 and 10, got {}",
                self.min_priority
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(format!(
                "similarity_threshold must be between 0.0 and 1.0, got {}",
                self.similarity_threshold
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PatternDetectionConfig::default();
        assert_eq!(config.min_occurrences, 3);
        assert_eq!(config.min_priority, 1);
        assert!(config.detect_cross_file_patterns);
        assert!(config.detect_similar_issues);
        assert!((config.similarity_threshold - 0.7).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = PatternDetectionConfig {
            similarity_threshold: 1.2,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PatternDetectionConfig {
            min_priority: 11,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PatternDetectionConfig {
            min_occurrences: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
