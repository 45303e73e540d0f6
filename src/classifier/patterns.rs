//! Pattern passes over the complete issue set
//!
//! Each pass groups issues its own way and turns every qualifying group
//! into an [`IssuePattern`]. Groups are visited in first-seen order so the
//! output is deterministic for a given input order.

use super::priority::{distinct_files, pattern_priority, MAX_PATTERN_PRIORITY};
use super::similarity::cluster_by_description;
use super::statistics::{pattern_statistics, PatternStatistics};
use super::templates::{
    pattern_description, pattern_name, plural, recommended_action, systemic_recommendation,
    type_display_name, CROSS_FILE_ACTION, SIMILAR_ISSUES_ACTION,
};
use crate::config::PatternDetectionConfig;
use crate::core::{Issue, IssueCategory, IssuePattern, IssueType};
use once_cell::sync::Lazy;
use regex::Regex;
use xxhash_rust::xxh64::xxh64;

/// A detector's issues must span this many files to be cross-file
const MIN_CROSS_FILE_SPREAD: usize = 2;

/// A type must span this many files to be systemic
const MIN_SYSTEMIC_SPREAD: usize = 5;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Groups keyed by `key`, in order of first appearance
fn group_by<'a, K, F>(issues: &'a [Issue], key: F) -> Vec<(K, Vec<&'a Issue>)>
where
    K: PartialEq,
    F: Fn(&Issue) -> K,
{
    let mut groups: Vec<(K, Vec<&Issue>)> = Vec::new();
    for issue in issues {
        let k = key(issue);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(issue),
            None => groups.push((k, vec![issue])),
        }
    }
    groups
}

/// Most frequent value; ties go to the value seen first
fn most_common<T: PartialEq + Copy>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    let mut best: Option<(T, usize)> = None;
    for (value, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value)
}

fn affected_files(issues: &[&Issue]) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    for issue in issues {
        if !files.contains(&issue.file) {
            files.push(issue.file.clone());
        }
    }
    files
}

fn owned(issues: &[&Issue]) -> Vec<Issue> {
    issues.iter().map(|i| (*i).clone()).collect()
}

fn dominant_category(issues: &[&Issue]) -> IssueCategory {
    most_common(issues.iter().map(|i| i.category)).unwrap_or(IssueCategory::General)
}

/// Priority of a group if it clears `min_priority`
fn qualifying_priority(issues: &[Issue], config: &PatternDetectionConfig) -> Option<u8> {
    let priority = pattern_priority(issues);
    (priority >= config.min_priority).then_some(priority)
}

/// One pattern per (type, category) pair with enough occurrences
pub fn type_category_patterns(
    issues: &[Issue],
    config: &PatternDetectionConfig,
) -> Vec<IssuePattern> {
    group_by(issues, |i| (i.issue_type, i.category))
        .into_iter()
        .filter(|(_, members)| members.len() >= config.min_occurrences)
        .filter_map(|((issue_type, category), members)| {
            let related = owned(&members);
            let priority = qualifying_priority(&related, config)?;
            let files = affected_files(&members);
            let occurrences = related.len();
            Some(IssuePattern {
                pattern_id: format!("pattern-{issue_type}-{category}"),
                pattern_name: pattern_name(issue_type, category),
                description: format!(
                    "{} Found {occurrences} occurrence{} in total.",
                    pattern_description(issue_type, files.len()),
                    plural(occurrences)
                ),
                occurrences,
                affected_files: files,
                related_issues: related,
                recommended_action: recommended_action(issue_type).to_string(),
                priority,
                category,
            })
        })
        .collect()
}

/// Issues from one detector recurring across files
pub fn detector_patterns(issues: &[Issue], config: &PatternDetectionConfig) -> Vec<IssuePattern> {
    group_by(issues, |i| i.detected_by.clone())
        .into_iter()
        .filter(|(_, members)| members.len() >= config.min_occurrences)
        .filter_map(|(detector, members)| {
            let files = affected_files(&members);
            if files.len() < MIN_CROSS_FILE_SPREAD {
                return None;
            }
            let related = owned(&members);
            let priority = qualifying_priority(&related, config)?;
            let statistics = pattern_statistics(&related);
            Some(IssuePattern {
                pattern_id: format!(
                    "cross-file-{}",
                    WHITESPACE.replace_all(&detector.to_lowercase(), "-")
                ),
                pattern_name: format!("Systemic {detector} Issues"),
                description: detector_description(&detector, &statistics),
                occurrences: related.len(),
                affected_files: files,
                category: dominant_category(&members),
                related_issues: related,
                recommended_action: CROSS_FILE_ACTION.to_string(),
                priority,
            })
        })
        .collect()
}

fn detector_description(detector: &str, statistics: &PatternStatistics) -> String {
    let severities = &statistics.severity_distribution;
    let severity_note = if severities.critical > 0 {
        format!(
            " including {} critical issue{}",
            severities.critical,
            plural(severities.critical)
        )
    } else if severities.high > 0 {
        format!(
            " including {} high-severity issue{}",
            severities.high,
            plural(severities.high)
        )
    } else {
        String::new()
    };
    let file_note = statistics
        .most_affected_file
        .as_ref()
        .map(|top| {
            format!(
                " The most affected file is {} with {} issue{}.",
                top.file,
                top.count,
                plural(top.count)
            )
        })
        .unwrap_or_default();

    format!(
        "{} issues detected by {detector} across {} files{severity_note}, indicating a \
         systemic problem.{file_note}",
        statistics.total_occurrences, statistics.unique_files
    )
}

/// Clusters of issues whose descriptions read alike
pub fn similar_issue_patterns(
    issues: &[Issue],
    config: &PatternDetectionConfig,
) -> Vec<IssuePattern> {
    cluster_by_description(issues, config.similarity_threshold)
        .into_iter()
        .filter(|cluster| cluster.len() >= config.min_occurrences)
        .filter_map(|cluster| {
            let files = affected_files(&cluster);
            if files.len() < MIN_CROSS_FILE_SPREAD {
                return None;
            }
            let related = owned(&cluster);
            let priority = qualifying_priority(&related, config)?;
            let issue_type = most_common(cluster.iter().map(|i| i.issue_type))?;
            let ids: Vec<&str> = cluster.iter().map(|i| i.id.as_str()).collect();
            let discriminator = xxh64(ids.join("|").as_bytes(), 0);
            Some(IssuePattern {
                pattern_id: format!("similar-{issue_type}-{discriminator:016x}"),
                pattern_name: format!("Similar {} Issues", type_display_name(issue_type)),
                description: format!(
                    "{} similar issues detected across {} files with related descriptions, \
                     suggesting a common root cause.",
                    related.len(),
                    files.len()
                ),
                occurrences: related.len(),
                affected_files: files,
                category: dominant_category(&cluster),
                related_issues: related,
                recommended_action: SIMILAR_ISSUES_ACTION.to_string(),
                priority,
            })
        })
        .collect()
}

/// One type spread over many files with at least one material issue
pub fn systemic_patterns(issues: &[Issue], config: &PatternDetectionConfig) -> Vec<IssuePattern> {
    group_by(issues, |i| i.issue_type)
        .into_iter()
        .filter(|(_, members)| {
            members.len() >= config.min_occurrences
                && members.iter().any(|i| i.severity.is_material())
        })
        .filter_map(|(issue_type, members)| {
            let files = affected_files(&members);
            if files.len() < MIN_SYSTEMIC_SPREAD {
                return None;
            }
            let related = owned(&members);
            let priority = qualifying_priority(&related, config)?;
            let statistics = pattern_statistics(&related);
            Some(IssuePattern {
                pattern_id: format!("systemic-{issue_type}"),
                pattern_name: format!("Systemic {} Problem", type_display_name(issue_type)),
                description: systemic_description(issue_type, &statistics),
                occurrences: related.len(),
                recommended_action: systemic_recommendation(issue_type, files.len()),
                affected_files: files,
                category: dominant_category(&members),
                related_issues: related,
                priority: (priority + 1).min(MAX_PATTERN_PRIORITY),
            })
        })
        .collect()
}

fn systemic_description(issue_type: IssueType, statistics: &PatternStatistics) -> String {
    format!(
        "Widespread {} problem affecting {} files with {} occurrences ({}). This systemic issue \
         requires coordinated remediation. Estimated effort: {}.",
        type_display_name(issue_type).to_lowercase(),
        statistics.unique_files,
        statistics.total_occurrences,
        statistics.severity_distribution.breakdown(),
        statistics.estimated_total_effort
    )
}

/// Every enabled pass, highest priority first
pub fn detect_patterns(issues: &[Issue], config: &PatternDetectionConfig) -> Vec<IssuePattern> {
    let mut patterns = type_category_patterns(issues, config);
    if config.detect_cross_file_patterns {
        patterns.extend(detector_patterns(issues, config));
        if config.detect_similar_issues {
            patterns.extend(similar_issue_patterns(issues, config));
        }
        patterns.extend(systemic_patterns(issues, config));
    }
    patterns.sort_by(|a, b| b.priority.cmp(&a.priority));
    log::debug!(
        "{} pattern(s) from {} issue(s) across {} file(s)",
        patterns.len(),
        issues.len(),
        distinct_files(issues)
    );
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CodeLocation, EffortLevel, NewIssue, Severity};

    fn issue(
        detector: &str,
        issue_type: IssueType,
        severity: Severity,
        file: &str,
        description: &str,
    ) -> Issue {
        Issue::new(
            detector,
            NewIssue {
                issue_type,
                severity,
                category: IssueCategory::Services,
                file: file.to_string(),
                location: CodeLocation::default(),
                code_snippet: String::new(),
                description: description.to_string(),
                recommendation: String::new(),
                estimated_effort: EffortLevel::Small,
                tags: Vec::new(),
            },
        )
    }

    #[test]
    fn test_most_common_prefers_first_on_tie() {
        assert_eq!(most_common(["b", "a", "a", "b"]), Some("b"));
        assert_eq!(most_common(["b", "a", "a"]), Some("a"));
        assert_eq!(most_common(Vec::<u8>::new()), None);
    }

    #[test]
    fn test_type_category_pattern_shape() {
        let issues: Vec<_> = ["a.ts", "b.ts", "a.ts"]
            .iter()
            .enumerate()
            .map(|(n, f)| {
                issue(
                    "AdapterPatternAnalyzer",
                    IssueType::UnnecessaryAdapter,
                    Severity::Medium,
                    f,
                    &format!("wrapper {n}"),
                )
            })
            .collect();
        let patterns = type_category_patterns(&issues, &PatternDetectionConfig::default());
        assert_eq!(patterns.len(), 1);
        let pattern = &patterns[0];
        assert_eq!(pattern.pattern_id, "pattern-unnecessary-adapter-services");
        assert_eq!(pattern.pattern_name, "Unnecessary Adapters in Services");
        assert_eq!(pattern.occurrences, 3);
        assert_eq!(pattern.affected_files, vec!["a.ts", "b.ts"]);
        assert!(pattern.description.contains("found in 2 files"));
        assert!(pattern.description.ends_with("Found 3 occurrences in total."));
    }

    #[test]
    fn test_detector_pattern_needs_two_files() {
        let config = PatternDetectionConfig::default();
        let single: Vec<_> = (0..3)
            .map(|n| {
                issue(
                    "Component Pattern Analyzer",
                    IssueType::ConfusingLogic,
                    Severity::Critical,
                    "only.tsx",
                    &format!("deep {n}"),
                )
            })
            .collect();
        assert!(detector_patterns(&single, &config).is_empty());

        let mut spread = single.clone();
        spread[2].file = "other.tsx".to_string();
        let patterns = detector_patterns(&spread, &config);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].pattern_id, "cross-file-component-pattern-analyzer");
        assert_eq!(
            patterns[0].description,
            "3 issues detected by Component Pattern Analyzer across 2 files including 3 \
             critical issues, indicating a systemic problem. The most affected file is only.tsx \
             with 2 issues."
        );
    }

    #[test]
    fn test_similar_pattern_id_is_stable() {
        let issues: Vec<_> = ["a.ts", "b.ts", "c.ts"]
            .iter()
            .map(|f| {
                issue(
                    "TypePatternAnalyzer",
                    IssueType::TypeSafety,
                    Severity::Low,
                    f,
                    "Excessive usage detected inside handler",
                )
            })
            .collect();
        let config = PatternDetectionConfig::default();
        let first = similar_issue_patterns(&issues, &config);
        let second = similar_issue_patterns(&issues, &config);
        assert_eq!(first.len(), 1);
        assert!(first[0].pattern_id.starts_with("similar-type-safety-"));
        assert_eq!(first[0].pattern_id, second[0].pattern_id);
        assert_eq!(first[0].affected_files.len(), 3);
    }

    #[test]
    fn test_systemic_requires_material_severity() {
        let config = PatternDetectionConfig::default();
        let low: Vec<_> = (0..6)
            .map(|n| {
                issue(
                    "X",
                    IssueType::PoorNaming,
                    Severity::Low,
                    &format!("f{n}.ts"),
                    "name",
                )
            })
            .collect();
        assert!(systemic_patterns(&low, &config).is_empty());

        let mut mixed = low;
        mixed[0].severity = Severity::High;
        let patterns = systemic_patterns(&mixed, &config);
        assert_eq!(patterns.len(), 1);
        assert!(patterns[0].description.contains("(1 high, 5 low)"));
    }

    #[test]
    fn test_cross_file_passes_can_be_disabled() {
        let issues: Vec<_> = (0..6)
            .map(|n| {
                issue(
                    "TypePatternAnalyzer",
                    IssueType::TypeSafety,
                    Severity::High,
                    &format!("f{n}.ts"),
                    "Excessive usage detected inside handler",
                )
            })
            .collect();
        let config = PatternDetectionConfig {
            detect_cross_file_patterns: false,
            ..Default::default()
        };
        let patterns = detect_patterns(&issues, &config);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].pattern_id, "pattern-type-safety-services");
    }
}
