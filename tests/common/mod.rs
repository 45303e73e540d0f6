// Test utility module for cleanmap integration tests
#![allow(dead_code)]

use cleanmap::{
    AnalysisContext, CodeLocation, EffortLevel, FileCategory, FileInfo, Issue, IssueCategory,
    IssueType, NewIssue, PatternAnalyzer, Severity, SourceFile,
};
use std::path::Path;

/// Parse `content` as `path` and run one analyzer over it
pub fn analyze_with(
    analyzer: &dyn PatternAnalyzer,
    path: &str,
    category: FileCategory,
    content: &str,
) -> Vec<Issue> {
    let ast = cleanmap::parse_file(content, Path::new(path)).expect("fixture should parse");
    let file = FileInfo::new(path, path, category);
    let mut ctx = AnalysisContext::new();
    analyzer.analyze(&file, &ast, &mut ctx)
}

pub fn source_file(path: &str, category: FileCategory, content: &str) -> SourceFile {
    SourceFile::new(FileInfo::new(path, path, category), content)
}

/// Builder for classifier inputs
#[derive(Debug, Clone)]
pub struct IssueBuilder {
    detector: String,
    draft: NewIssue,
}

impl IssueBuilder {
    pub fn new(issue_type: IssueType, category: IssueCategory) -> Self {
        Self {
            detector: "TestAnalyzer".to_string(),
            draft: NewIssue {
                issue_type,
                severity: Severity::Medium,
                category,
                file: "src/index.ts".to_string(),
                location: CodeLocation::default(),
                code_snippet: String::new(),
                description: format!("{issue_type} in {category}"),
                recommendation: String::new(),
                estimated_effort: EffortLevel::Small,
                tags: Vec::new(),
            },
        }
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.draft.severity = severity;
        self
    }

    pub fn file(mut self, file: &str) -> Self {
        self.draft.file = file.to_string();
        self
    }

    pub fn line(mut self, line: usize) -> Self {
        self.draft.location.start_line = line;
        self.draft.location.end_line = line;
        self
    }

    pub fn effort(mut self, effort: EffortLevel) -> Self {
        self.draft.estimated_effort = effort;
        self
    }

    pub fn detector(mut self, detector: &str) -> Self {
        self.detector = detector.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.draft.description = description.to_string();
        self
    }

    pub fn build(self) -> Issue {
        Issue::new(self.detector, self.draft)
    }
}

/// `count` issues of one type, category and severity, one per file
pub fn spread_issues(
    issue_type: IssueType,
    category: IssueCategory,
    severity: Severity,
    count: usize,
) -> Vec<Issue> {
    (0..count)
        .map(|n| {
            IssueBuilder::new(issue_type, category)
                .severity(severity)
                .file(&format!("src/module_{n}.ts"))
                .build()
        })
        .collect()
}
