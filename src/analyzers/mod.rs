//! Pattern detectors over parsed JS/TS files
//!
//! Each detector implements [`PatternAnalyzer`] and turns structural findings
//! into [`Issue`] values. Detectors never fail: constructs they do not
//! understand are skipped.

use crate::core::{
    CodeLocation, EffortLevel, FileCategory, FileInfo, Issue, IssueCategory, IssueType, NewIssue,
    Severity, TypeScriptAst,
};
use tree_sitter::Node;

pub mod adapter;
pub mod component;
pub mod type_patterns;
pub mod typescript;

pub use adapter::AdapterPatternAnalyzer;
pub use component::ComponentPatternAnalyzer;
pub use type_patterns::{TypePatternAnalyzer, TypeRegistry};

use typescript::parser::{node_location, node_text};

/// Snippets longer than this are cut and suffixed with `...`
pub const SNIPPET_MAX_CHARS: usize = 200;

/// State threaded through one file's analysis.
///
/// The type registry collects declarations and references for the
/// cross-file pass; the caller owns it and merges per-file contexts.
#[derive(Debug, Default)]
pub struct AnalysisContext {
    pub types: TypeRegistry,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }
}

pub trait PatternAnalyzer: Send + Sync {
    /// Detector name recorded on every issue it creates
    fn name(&self) -> &'static str;

    /// File categories this detector runs on
    fn supported_file_types(&self) -> &'static [FileCategory];

    fn analyze(&self, file: &FileInfo, ast: &TypeScriptAst, ctx: &mut AnalysisContext)
        -> Vec<Issue>;

    fn supports(&self, category: FileCategory) -> bool {
        self.supported_file_types().contains(&category)
    }
}

/// The three built-in detectors
pub fn default_analyzers() -> Vec<Box<dyn PatternAnalyzer>> {
    vec![
        Box::new(AdapterPatternAnalyzer::new()),
        Box::new(ComponentPatternAnalyzer::new()),
        Box::new(TypePatternAnalyzer::new()),
    ]
}

/// Issue fields decided by a detector before it knows the location
#[derive(Debug, Clone)]
pub(crate) struct Finding {
    issue_type: IssueType,
    severity: Severity,
    category: IssueCategory,
    effort: EffortLevel,
    description: String,
    recommendation: String,
    tags: Vec<String>,
}

impl Finding {
    pub(crate) fn new(
        issue_type: IssueType,
        severity: Severity,
        category: IssueCategory,
        effort: EffortLevel,
    ) -> Self {
        Self {
            issue_type,
            severity,
            category,
            effort,
            description: String::new(),
            recommendation: String::new(),
            tags: Vec::new(),
        }
    }

    pub(crate) fn describe(
        mut self,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        self.description = description.into();
        self.recommendation = recommendation.into();
        self
    }

    pub(crate) fn tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().map(|t| t.to_string()));
        self
    }

    pub(crate) fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Anchor the finding on a syntax node
    pub(crate) fn at(self, detector: &str, file: &str, node: &Node, source: &str) -> Issue {
        let location = node_location(node);
        let snippet = code_snippet(node_text(node, source));
        self.at_location(detector, file, location, snippet)
    }

    pub(crate) fn at_location(
        self,
        detector: &str,
        file: &str,
        location: CodeLocation,
        code_snippet: String,
    ) -> Issue {
        Issue::new(
            detector,
            NewIssue {
                issue_type: self.issue_type,
                severity: self.severity,
                category: self.category,
                file: file.to_string(),
                location,
                code_snippet,
                description: self.description,
                recommendation: self.recommendation,
                estimated_effort: self.effort,
                tags: self.tags,
            },
        )
    }
}

/// First [`SNIPPET_MAX_CHARS`] characters of `text`
pub fn code_snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_snippet_truncates() {
        let long = "x".repeat(250);
        let snippet = code_snippet(&long);
        assert_eq!(snippet.len(), SNIPPET_MAX_CHARS + 3);
        assert!(snippet.ends_with("..."));
        assert_eq!(code_snippet("short"), "short");
        assert_eq!(code_snippet(&"y".repeat(200)), "y".repeat(200));
    }

    #[test]
    fn test_supports_routes_by_category() {
        let analyzers = default_analyzers();
        let names: Vec<_> = analyzers
            .iter()
            .filter(|a| a.supports(FileCategory::Component))
            .map(|a| a.name())
            .collect();
        assert_eq!(names, vec!["ComponentPatternAnalyzer", "TypePatternAnalyzer"]);

        let middleware: Vec<_> = analyzers
            .iter()
            .filter(|a| a.supports(FileCategory::Middleware))
            .map(|a| a.name())
            .collect();
        assert_eq!(middleware, vec!["AdapterPatternAnalyzer"]);
    }
}
