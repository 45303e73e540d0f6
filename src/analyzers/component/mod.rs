//! Component pattern detector
//!
//! Discovers the React-style components of a file and reports class
//! components, prop drilling, style inconsistencies and duplicated logic.

pub mod consistency;
pub mod discovery;
pub mod duplication;
pub mod prop_drilling;

pub use discovery::{discover_components, ComponentInfo, ComponentInventory, ComponentKind};
pub use prop_drilling::{PropChain, PropTracer, MAX_PROP_TRACE_DEPTH};

use super::{AnalysisContext, PatternAnalyzer};
use crate::core::{FileCategory, FileInfo, Issue, TypeScriptAst};

/// One detection pass over a file's components
type ComponentCheck = fn(&str, &str, &ComponentInventory, &str) -> Vec<Issue>;

#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentPatternAnalyzer;

impl ComponentPatternAnalyzer {
    pub const NAME: &'static str = "ComponentPatternAnalyzer";

    pub fn new() -> Self {
        Self
    }

    /// Components of `ast`, recorded against `file`
    pub fn discover<'t>(&self, file: &FileInfo, ast: &'t TypeScriptAst) -> ComponentInventory<'t> {
        discover_components(ast, &file.relative_path)
    }

    pub fn detect(&self, file: &FileInfo, ast: &TypeScriptAst) -> Vec<Issue> {
        let inventory = self.discover(file, ast);
        if inventory.is_empty() {
            return Vec::new();
        }
        log::debug!(
            "{}: {} component(s) discovered",
            file.relative_path,
            inventory.len()
        );

        let source = ast.source.as_str();
        let path = file.relative_path.as_str();
        let checks: [ComponentCheck; 10] = [
            duplication::detect_class_components,
            prop_drilling::detect_prop_drilling,
            consistency::check_prop_styles,
            consistency::check_export_styles,
            consistency::check_definition_styles,
            consistency::check_event_handlers,
            duplication::detect_duplicate_validation,
            duplication::detect_duplicate_effects,
            duplication::detect_duplicate_transformations,
            duplication::detect_similar_components,
        ];
        checks
            .iter()
            .flat_map(|check| check(Self::NAME, path, &inventory, source))
            .collect()
    }
}

impl PatternAnalyzer for ComponentPatternAnalyzer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supported_file_types(&self) -> &'static [FileCategory] {
        &[FileCategory::Component]
    }

    fn analyze(
        &self,
        file: &FileInfo,
        ast: &TypeScriptAst,
        _ctx: &mut AnalysisContext,
    ) -> Vec<Issue> {
        self.detect(file, ast)
    }
}
