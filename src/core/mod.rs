pub mod ast;
pub mod file;
pub mod types;

pub use ast::{JsLanguageVariant, TypeScriptAst};
pub use file::{FileCategory, FileInfo};
pub use types::{
    ClassifiedIssues, CodeLocation, EffortLevel, Issue, IssueCategory, IssuePattern, IssueType,
    NewIssue, Severity,
};
