use std::path::PathBuf;

/// Source dialect, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsLanguageVariant {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl JsLanguageVariant {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.') {
            "js" | "mjs" | "cjs" => Some(JsLanguageVariant::JavaScript),
            "jsx" => Some(JsLanguageVariant::Jsx),
            "ts" | "mts" | "cts" => Some(JsLanguageVariant::TypeScript),
            "tsx" => Some(JsLanguageVariant::Tsx),
            _ => None,
        }
    }

    pub fn has_types(&self) -> bool {
        matches!(self, JsLanguageVariant::TypeScript | JsLanguageVariant::Tsx)
    }
}

#[derive(Clone, Debug)]
pub struct TypeScriptAst {
    pub tree: tree_sitter::Tree,
    pub source: String,
    pub path: PathBuf,
    pub language_variant: JsLanguageVariant,
}

impl TypeScriptAst {
    pub fn root(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }
}
