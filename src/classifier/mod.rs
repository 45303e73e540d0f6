//! Issue classification
//!
//! Runs once every detector has finished for every file. Buckets issues by
//! severity, orders them for remediation and derives [`IssuePattern`]s from
//! groups of related issues.

pub mod patterns;
pub mod priority;
pub mod similarity;
pub mod statistics;
pub mod templates;

pub use priority::{category_priority, pattern_priority, type_priority};
pub use statistics::{FileOccurrences, PatternStatistics, SeverityDistribution};

use crate::config::PatternDetectionConfig;
use crate::core::{ClassifiedIssues, Issue, IssuePattern, Severity};

#[derive(Debug, Clone, Default)]
pub struct IssueClassifier {
    config: PatternDetectionConfig,
}

impl IssueClassifier {
    pub fn new(config: PatternDetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PatternDetectionConfig {
        &self.config
    }

    /// Severity buckets plus every detected pattern
    pub fn classify(&self, issues: &[Issue]) -> ClassifiedIssues {
        let bucket = |severity: Severity| -> Vec<Issue> {
            issues
                .iter()
                .filter(|i| i.severity == severity)
                .cloned()
                .collect()
        };
        ClassifiedIssues {
            critical: bucket(Severity::Critical),
            high: bucket(Severity::High),
            medium: bucket(Severity::Medium),
            low: bucket(Severity::Low),
            patterns: self.detect_patterns(issues),
        }
    }

    /// Copy of `issues` in remediation order; the input is left untouched
    pub fn prioritize(&self, issues: &[Issue]) -> Vec<Issue> {
        priority::prioritize(issues)
    }

    /// All enabled pattern passes, highest priority first
    pub fn detect_patterns(&self, issues: &[Issue]) -> Vec<IssuePattern> {
        patterns::detect_patterns(issues, &self.config)
    }

    pub fn pattern_statistics(&self, issues: &[Issue]) -> PatternStatistics {
        statistics::pattern_statistics(issues)
    }

    pub fn description_similarity(&self, a: &str, b: &str) -> f64 {
        similarity::description_similarity(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CodeLocation, EffortLevel, IssueCategory, IssueType, NewIssue};

    fn issue(severity: Severity, file: &str) -> Issue {
        Issue::new(
            "AdapterPatternAnalyzer",
            NewIssue {
                issue_type: IssueType::UnnecessaryAdapter,
                severity,
                category: IssueCategory::Services,
                file: file.to_string(),
                location: CodeLocation::default(),
                code_snippet: String::new(),
                description: format!("wrapper in {file}"),
                recommendation: String::new(),
                estimated_effort: EffortLevel::Small,
                tags: Vec::new(),
            },
        )
    }

    #[test]
    fn test_classify_partitions_by_severity() {
        let issues = vec![
            issue(Severity::Low, "a.ts"),
            issue(Severity::Critical, "b.ts"),
            issue(Severity::Low, "c.ts"),
        ];
        let classified = IssueClassifier::default().classify(&issues);
        assert_eq!(classified.critical.len(), 1);
        assert!(classified.high.is_empty());
        assert_eq!(classified.low.len(), 2);
        assert_eq!(classified.total(), issues.len());
    }

    #[test]
    fn test_empty_input() {
        let classified = IssueClassifier::default().classify(&[]);
        assert_eq!(classified, ClassifiedIssues::default());
    }
}
