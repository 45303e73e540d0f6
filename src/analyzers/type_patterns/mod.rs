//! Type pattern detector
//!
//! Per file: records declarations and references into the caller's
//! [`TypeRegistry`] and reports `any` usage and needless assertions.
//! After every file: [`TypePatternAnalyzer::detect_type_inconsistencies`]
//! resolves duplicates and schema conflicts across the merged registry.

pub mod inconsistency;
pub mod registry;
pub mod resolution;
pub mod safety;

pub use registry::{TypeDefinition, TypeDefinitionKind, TypeRegistry, TypeUsage, UsageContext};
pub use resolution::extract_type_name;

use super::{AnalysisContext, PatternAnalyzer};
use crate::core::{FileCategory, FileInfo, Issue, TypeScriptAst};

const SUPPORTED: &[FileCategory] = &[
    FileCategory::Type,
    FileCategory::Component,
    FileCategory::ApiRoute,
    FileCategory::Service,
    FileCategory::Util,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct TypePatternAnalyzer;

impl TypePatternAnalyzer {
    pub const NAME: &'static str = "TypePatternAnalyzer";

    pub fn new() -> Self {
        Self
    }

    /// Record the file's declarations and references into `registry`
    pub fn record_types(
        &self,
        file: &FileInfo,
        ast: &TypeScriptAst,
        registry: &mut TypeRegistry,
    ) {
        resolution::collect_definitions(ast, &file.relative_path, registry);
        resolution::collect_usages(ast, &file.relative_path, registry);
    }

    /// Issues local to one file
    pub fn detect(&self, file: &FileInfo, ast: &TypeScriptAst) -> Vec<Issue> {
        let mut issues = safety::detect_any_usage(Self::NAME, &file.relative_path, ast);
        issues.extend(safety::detect_unnecessary_assertions(
            Self::NAME,
            &file.relative_path,
            ast,
        ));
        issues
    }

    /// Cross-file duplicates and schema conflicts over everything recorded
    pub fn detect_type_inconsistencies(&self, registry: &TypeRegistry) -> Vec<Issue> {
        let issues = inconsistency::detect_type_inconsistencies(Self::NAME, registry);
        log::debug!(
            "{} type definition(s) checked, {} cross-file issue(s)",
            registry.definitions().len(),
            issues.len()
        );
        issues
    }
}

impl PatternAnalyzer for TypePatternAnalyzer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supported_file_types(&self) -> &'static [FileCategory] {
        SUPPORTED
    }

    fn analyze(
        &self,
        file: &FileInfo,
        ast: &TypeScriptAst,
        ctx: &mut AnalysisContext,
    ) -> Vec<Issue> {
        self.record_types(file, ast, &mut ctx.types);
        self.detect(file, ast)
    }
}
