//! Occurrence statistics and effort estimates for an issue group

use super::templates::plural;
use crate::core::{EffortLevel, Issue, IssueCategory, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const HOURS_PER_DAY: f64 = 8.0;
const DAYS_PER_WEEK: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityDistribution {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityDistribution {
    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    /// `2 critical, 4 high`, most severe first, zero counts omitted
    pub fn breakdown(&self) -> String {
        Severity::ALL
            .iter()
            .filter(|s| self.count(**s) > 0)
            .map(|s| format!("{} {}", self.count(*s), s))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOccurrences {
    pub file: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternStatistics {
    pub total_occurrences: usize,
    pub unique_files: usize,
    pub severity_distribution: SeverityDistribution,
    /// Every category, zero when absent
    pub category_distribution: BTreeMap<IssueCategory, usize>,
    /// Files in first-seen order
    pub file_distribution: Vec<FileOccurrences>,
    /// First file with the highest count
    pub most_affected_file: Option<FileOccurrences>,
    pub average_effort: EffortLevel,
    pub estimated_total_effort: String,
}

pub fn pattern_statistics(issues: &[Issue]) -> PatternStatistics {
    let mut severity_distribution = SeverityDistribution::default();
    let mut category_distribution: BTreeMap<IssueCategory, usize> =
        IssueCategory::ALL.iter().map(|c| (*c, 0)).collect();
    let mut file_distribution: Vec<FileOccurrences> = Vec::new();
    let mut effort_total = 0u32;

    for issue in issues {
        severity_distribution.record(issue.severity);
        *category_distribution.entry(issue.category).or_insert(0) += 1;
        match file_distribution.iter_mut().find(|f| f.file == issue.file) {
            Some(entry) => entry.count += 1,
            None => file_distribution.push(FileOccurrences {
                file: issue.file.clone(),
                count: 1,
            }),
        }
        effort_total += issue.estimated_effort.score();
    }

    let average_effort = if issues.is_empty() {
        EffortLevel::Trivial
    } else {
        EffortLevel::from_average_score(f64::from(effort_total) / issues.len() as f64)
    };

    let mut most_affected_file: Option<&FileOccurrences> = None;
    for entry in &file_distribution {
        if most_affected_file.map_or(true, |best| entry.count > best.count) {
            most_affected_file = Some(entry);
        }
    }
    let most_affected_file = most_affected_file.cloned();

    PatternStatistics {
        total_occurrences: issues.len(),
        unique_files: file_distribution.len(),
        severity_distribution,
        category_distribution,
        most_affected_file,
        file_distribution,
        average_effort,
        estimated_total_effort: estimate_total_effort(issues.len(), average_effort),
    }
}

/// Human-readable total for `count` fixes of `average` effort
pub fn estimate_total_effort(count: usize, average: EffortLevel) -> String {
    let hours = count as f64 * average.hours();
    if hours < 1.0 {
        return "Less than 1 hour".to_string();
    }
    if hours < HOURS_PER_DAY {
        return format!("{} hours", hours.round());
    }

    let days = (hours / HOURS_PER_DAY).round();
    if days < DAYS_PER_WEEK {
        return format!("{days} day{}", plural(days as usize));
    }

    let weeks = (days / DAYS_PER_WEEK).round();
    format!("{weeks} week{}", plural(weeks as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CodeLocation, IssueType, NewIssue};

    fn issue(file: &str, severity: Severity, effort: EffortLevel) -> Issue {
        Issue::new(
            "test",
            NewIssue {
                issue_type: IssueType::LegacyCode,
                severity,
                category: IssueCategory::Services,
                file: file.to_string(),
                location: CodeLocation::default(),
                code_snippet: String::new(),
                description: String::new(),
                recommendation: String::new(),
                estimated_effort: effort,
                tags: Vec::new(),
            },
        )
    }

    #[test]
    fn test_effort_estimates() {
        assert_eq!(estimate_total_effort(1, EffortLevel::Trivial), "Less than 1 hour");
        assert_eq!(estimate_total_effort(3, EffortLevel::Small), "6 hours");
        assert_eq!(estimate_total_effort(2, EffortLevel::Medium), "1 day");
        assert_eq!(estimate_total_effort(4, EffortLevel::Large), "4 days");
        assert_eq!(estimate_total_effort(6, EffortLevel::Large), "1 week");
        assert_eq!(estimate_total_effort(30, EffortLevel::Large), "6 weeks");
    }

    #[test]
    fn test_statistics() {
        let issues = vec![
            issue("a.ts", Severity::High, EffortLevel::Small),
            issue("b.ts", Severity::High, EffortLevel::Medium),
            issue("b.ts", Severity::Low, EffortLevel::Medium),
            issue("a.ts", Severity::Critical, EffortLevel::Large),
        ];
        let stats = pattern_statistics(&issues);
        assert_eq!(stats.total_occurrences, 4);
        assert_eq!(stats.unique_files, 2);
        assert_eq!(stats.severity_distribution.breakdown(), "1 critical, 2 high, 1 low");
        assert_eq!(stats.category_distribution[&IssueCategory::Services], 4);
        assert_eq!(stats.category_distribution[&IssueCategory::Database], 0);
        // tie goes to the file seen first
        assert_eq!(stats.most_affected_file.unwrap().file, "a.ts");
        // (2 + 3 + 3 + 4) / 4 = 3.0
        assert_eq!(stats.average_effort, EffortLevel::Medium);
        assert_eq!(stats.estimated_total_effort, "2 days");
    }

    #[test]
    fn test_empty_statistics() {
        let stats = pattern_statistics(&[]);
        assert_eq!(stats.unique_files, 0);
        assert!(stats.most_affected_file.is_none());
        assert_eq!(stats.estimated_total_effort, "Less than 1 hour");
    }
}
