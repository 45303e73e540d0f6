//! Structural pattern analysis for JavaScript and TypeScript codebases.
//!
//! Detectors walk tree-sitter syntax trees and report [`Issue`]s: wrapper
//! functions that add nothing, React component smells and type definition
//! problems. The [`IssueClassifier`] buckets, orders and clusters those
//! issues into [`IssuePattern`]s. [`AnalysisEngine`] ties both together over
//! a batch of files.

// Export modules for library usage
pub mod analyzers;
pub mod classifier;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;

// Re-export commonly used types
pub use crate::core::{
    ClassifiedIssues, CodeLocation, EffortLevel, FileCategory, FileInfo, Issue, IssueCategory,
    IssuePattern, IssueType, JsLanguageVariant, NewIssue, Severity, TypeScriptAst,
};

pub use crate::analyzers::{
    default_analyzers, AdapterPatternAnalyzer, AnalysisContext, ComponentPatternAnalyzer,
    PatternAnalyzer, TypePatternAnalyzer, TypeRegistry,
};

pub use crate::analyzers::typescript::{parse_file, parse_source};

pub use crate::classifier::{IssueClassifier, PatternStatistics};

pub use crate::config::{
    load_config, load_config_from, parse_and_validate_config, CleanmapConfig, EngineOptions,
    PatternDetectionConfig,
};

pub use crate::engine::{
    AnalysisEngine, AnalysisResult, FileFailure, FileMetrics, IssueCollection, SourceFile,
};

pub use crate::errors::{Error, Result};
