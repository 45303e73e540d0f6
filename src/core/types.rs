//! Issue model shared by every detector and the classifier

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Kind of problem an issue describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    BackwardCompatibility,
    LegacyCode,
    UnnecessaryAdapter,
    ConfusingLogic,
    CodeDuplication,
    InconsistentPattern,
    PoorNaming,
    MissingErrorHandling,
    TypeSafety,
    Architectural,
}

impl IssueType {
    pub const ALL: [IssueType; 10] = [
        IssueType::BackwardCompatibility,
        IssueType::LegacyCode,
        IssueType::UnnecessaryAdapter,
        IssueType::ConfusingLogic,
        IssueType::CodeDuplication,
        IssueType::InconsistentPattern,
        IssueType::PoorNaming,
        IssueType::MissingErrorHandling,
        IssueType::TypeSafety,
        IssueType::Architectural,
    ];

    /// Wire name used in ids and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::BackwardCompatibility => "backward-compatibility",
            IssueType::LegacyCode => "legacy-code",
            IssueType::UnnecessaryAdapter => "unnecessary-adapter",
            IssueType::ConfusingLogic => "confusing-logic",
            IssueType::CodeDuplication => "code-duplication",
            IssueType::InconsistentPattern => "inconsistent-pattern",
            IssueType::PoorNaming => "poor-naming",
            IssueType::MissingErrorHandling => "missing-error-handling",
            IssueType::TypeSafety => "type-safety",
            IssueType::Architectural => "architectural",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area of the codebase an issue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    Authentication,
    Database,
    ApiRoutes,
    Components,
    Services,
    Types,
    Middleware,
    ErrorHandling,
    General,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 9] = [
        IssueCategory::Authentication,
        IssueCategory::Database,
        IssueCategory::ApiRoutes,
        IssueCategory::Components,
        IssueCategory::Services,
        IssueCategory::Types,
        IssueCategory::Middleware,
        IssueCategory::ErrorHandling,
        IssueCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Authentication => "authentication",
            IssueCategory::Database => "database",
            IssueCategory::ApiRoutes => "api-routes",
            IssueCategory::Components => "components",
            IssueCategory::Services => "services",
            IssueCategory::Types => "types",
            IssueCategory::Middleware => "middleware",
            IssueCategory::ErrorHandling => "error-handling",
            IssueCategory::General => "general",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity levels for issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Most severe first
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Sort rank and pattern weight: critical=4 down to low=1
    pub fn rank(&self) -> u32 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }

    pub fn is_material(&self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated effort to fix an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffortLevel {
    Trivial,
    Small,
    Medium,
    Large,
}

impl EffortLevel {
    /// Cost score used for averaging: trivial=1 up to large=4
    pub fn score(&self) -> u32 {
        match self {
            EffortLevel::Trivial => 1,
            EffortLevel::Small => 2,
            EffortLevel::Medium => 3,
            EffortLevel::Large => 4,
        }
    }

    /// Ordering rank where cheaper fixes rank higher: trivial=4 down to large=1
    pub fn rank(&self) -> u32 {
        5 - self.score()
    }

    pub fn hours(&self) -> f64 {
        match self {
            EffortLevel::Trivial => 0.5,
            EffortLevel::Small => 2.0,
            EffortLevel::Medium => 4.0,
            EffortLevel::Large => 8.0,
        }
    }

    /// Bucket a mean effort score back into a level
    pub fn from_average_score(average: f64) -> Self {
        if average <= 1.5 {
            EffortLevel::Trivial
        } else if average <= 2.5 {
            EffortLevel::Small
        } else if average <= 3.5 {
            EffortLevel::Medium
        } else {
            EffortLevel::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffortLevel::Trivial => "trivial",
            EffortLevel::Small => "small",
            EffortLevel::Medium => "medium",
            EffortLevel::Large => "large",
        }
    }
}

impl fmt::Display for EffortLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Span of an issue in its file, 1-indexed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeLocation {
    pub start_line: usize,
    pub end_line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

/// Detector-supplied fields of an issue
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub issue_type: IssueType,
    pub severity: Severity,
    pub category: IssueCategory,
    pub file: String,
    pub location: CodeLocation,
    pub code_snippet: String,
    pub description: String,
    pub recommendation: String,
    pub estimated_effort: EffortLevel,
    pub tags: Vec<String>,
}

/// One detected problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub category: IssueCategory,
    pub file: String,
    pub location: CodeLocation,
    pub description: String,
    pub code_snippet: String,
    pub recommendation: String,
    pub estimated_effort: EffortLevel,
    pub tags: Vec<String>,
    pub detected_by: String,
    pub detected_at: DateTime<Utc>,
    #[serde(default)]
    pub related_issues: Vec<String>,
}

impl Issue {
    /// Stamp a detector finding with its id, origin and detection time
    pub fn new(detected_by: impl Into<String>, draft: NewIssue) -> Self {
        let detected_by = detected_by.into();
        let id = issue_id(&detected_by, &draft);
        Self {
            id,
            issue_type: draft.issue_type,
            severity: draft.severity,
            category: draft.category,
            file: draft.file,
            location: draft.location,
            description: draft.description,
            code_snippet: draft.code_snippet,
            recommendation: draft.recommendation,
            estimated_effort: draft.estimated_effort,
            tags: draft.tags,
            detected_by,
            detected_at: Utc::now(),
            related_issues: Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn issue_id(detected_by: &str, draft: &NewIssue) -> String {
    let loc = &draft.location;
    let key = format!(
        "{}|{}|{}|{}:{}-{}:{}|{}",
        detected_by,
        draft.file,
        draft.issue_type,
        loc.start_line,
        loc.start_column,
        loc.end_line,
        loc.end_column,
        draft.description
    );
    format!("{}-{:016x}", draft.issue_type, xxh64(key.as_bytes(), 0))
}

/// A cluster of related issues sharing a probable root cause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePattern {
    pub pattern_id: String,
    pub pattern_name: String,
    pub description: String,
    pub occurrences: usize,
    pub affected_files: Vec<String>,
    pub related_issues: Vec<Issue>,
    pub recommended_action: String,
    pub priority: u8,
    pub category: IssueCategory,
}

/// Issues partitioned by severity plus the detected patterns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedIssues {
    pub critical: Vec<Issue>,
    pub high: Vec<Issue>,
    pub medium: Vec<Issue>,
    pub low: Vec<Issue>,
    pub patterns: Vec<IssuePattern>,
}

impl ClassifiedIssues {
    pub fn total(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len() + self.low.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewIssue {
        NewIssue {
            issue_type: IssueType::TypeSafety,
            severity: Severity::Medium,
            category: IssueCategory::Types,
            file: "src/types/user.ts".to_string(),
            location: CodeLocation {
                start_line: 3,
                end_line: 3,
                start_column: 10,
                end_column: 13,
            },
            code_snippet: "any".to_string(),
            description: "any usage".to_string(),
            recommendation: "use a real type".to_string(),
            estimated_effort: EffortLevel::Small,
            tags: vec!["any-type".to_string()],
        }
    }

    #[test]
    fn test_issue_id_is_deterministic() {
        let a = Issue::new("TypePatternAnalyzer", draft());
        let b = Issue::new("TypePatternAnalyzer", draft());
        assert_eq!(a.id, b.id);
        assert!(a.id.starts_with("type-safety-"));
        assert_eq!(a.id.len(), "type-safety-".len() + 16);
    }

    #[test]
    fn test_issue_id_depends_on_location() {
        let mut other = draft();
        other.location.start_line = 4;
        let a = Issue::new("TypePatternAnalyzer", draft());
        let b = Issue::new("TypePatternAnalyzer", other);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serializes_kebab_case_names() {
        let issue = Issue::new("AdapterPatternAnalyzer", draft());
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "type-safety");
        assert_eq!(json["category"], "types");
        assert_eq!(json["estimatedEffort"], "small");
        assert_eq!(
            serde_json::to_value(IssueCategory::ApiRoutes).unwrap(),
            "api-routes"
        );
    }

    #[test]
    fn test_effort_buckets() {
        assert_eq!(EffortLevel::from_average_score(1.5), EffortLevel::Trivial);
        assert_eq!(EffortLevel::from_average_score(2.0), EffortLevel::Small);
        assert_eq!(EffortLevel::from_average_score(3.5), EffortLevel::Medium);
        assert_eq!(EffortLevel::from_average_score(3.6), EffortLevel::Large);
        assert_eq!(EffortLevel::Trivial.rank(), 4);
        assert_eq!(EffortLevel::Large.rank(), 1);
    }
}
