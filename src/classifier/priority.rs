//! Ordering of individual issues and scoring of issue groups

use crate::core::{Issue, IssueCategory, IssueType};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Patterns never score above this
pub const MAX_PATTERN_PRIORITY: u8 = 10;

/// Occurrence boost is `count / OCCURRENCE_DIVISOR`, capped
const OCCURRENCE_DIVISOR: f64 = 10.0;
const MAX_OCCURRENCE_BOOST: f64 = 3.0;

/// File boost is `files / FILE_DIVISOR`, capped
const FILE_DIVISOR: f64 = 5.0;
const MAX_FILE_BOOST: f64 = 2.0;

pub fn category_priority(category: IssueCategory) -> u32 {
    match category {
        IssueCategory::Authentication => 10,
        IssueCategory::ErrorHandling => 9,
        IssueCategory::Database => 8,
        IssueCategory::ApiRoutes => 7,
        IssueCategory::Services => 6,
        IssueCategory::Middleware => 5,
        IssueCategory::Types => 4,
        IssueCategory::Components => 3,
        IssueCategory::General => 2,
    }
}

pub fn type_priority(issue_type: IssueType) -> u32 {
    match issue_type {
        IssueType::Architectural => 10,
        IssueType::TypeSafety => 9,
        IssueType::MissingErrorHandling => 8,
        IssueType::InconsistentPattern => 7,
        IssueType::ConfusingLogic => 6,
        IssueType::CodeDuplication => 5,
        IssueType::UnnecessaryAdapter => 4,
        IssueType::BackwardCompatibility => 3,
        IssueType::LegacyCode => 2,
        IssueType::PoorNaming => 1,
    }
}

/// Most urgent first: severity, category, type, cheaper fix, more relations
pub fn compare_issues(a: &Issue, b: &Issue) -> Ordering {
    b.severity
        .rank()
        .cmp(&a.severity.rank())
        .then_with(|| category_priority(b.category).cmp(&category_priority(a.category)))
        .then_with(|| type_priority(b.issue_type).cmp(&type_priority(a.issue_type)))
        .then_with(|| {
            b.estimated_effort
                .rank()
                .cmp(&a.estimated_effort.rank())
        })
        .then_with(|| b.related_issues.len().cmp(&a.related_issues.len()))
}

/// Sorted copy; equal keys keep their input order
pub fn prioritize(issues: &[Issue]) -> Vec<Issue> {
    let mut sorted = issues.to_vec();
    sorted.sort_by(compare_issues);
    sorted
}

pub fn distinct_files(issues: &[Issue]) -> usize {
    issues
        .iter()
        .map(|i| i.file.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Priority 0..=10 of a group of issues
///
/// Mean severity weight plus boosts for occurrence count and file spread.
/// An empty group scores 0.
pub fn pattern_priority(issues: &[Issue]) -> u8 {
    if issues.is_empty() {
        return 0;
    }
    let count = issues.len() as f64;
    let weight: u32 = issues.iter().map(|i| i.severity.rank()).sum();
    let average = f64::from(weight) / count;
    let occurrence_boost = (count / OCCURRENCE_DIVISOR).min(MAX_OCCURRENCE_BOOST);
    let file_boost = (distinct_files(issues) as f64 / FILE_DIVISOR).min(MAX_FILE_BOOST);
    let score = (average + occurrence_boost + file_boost).min(f64::from(MAX_PATTERN_PRIORITY));
    score.round() as u8
}
