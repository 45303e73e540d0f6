//! Tree-sitter front end for `.js/.jsx/.ts/.tsx` sources
//!
//! Files with syntax errors still produce a tree; detectors work on
//! whatever the grammar recovered.

use crate::core::ast::{JsLanguageVariant, TypeScriptAst};
use crate::core::CodeLocation;
use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::{Language as TsLanguage, Parser, Tree};

fn grammar_for(variant: JsLanguageVariant) -> TsLanguage {
    match variant {
        JsLanguageVariant::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        JsLanguageVariant::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        // the javascript grammar covers JSX
        _ => tree_sitter_javascript::LANGUAGE.into(),
    }
}

/// Parse `content` with the grammar for `variant`
pub fn parse_source(
    content: &str,
    path: &Path,
    variant: JsLanguageVariant,
) -> Result<TypeScriptAst> {
    let mut parser = Parser::new();
    parser
        .set_language(&grammar_for(variant))
        .with_context(|| format!("No {variant:?} grammar available"))?;

    let tree = parser
        .parse(content, None)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if has_parse_errors(&tree) {
        log::warn!(
            "{} contains syntax errors; analyzing the recoverable parts",
            path.display()
        );
    }

    Ok(TypeScriptAst {
        tree,
        path: path.to_path_buf(),
        source: content.to_string(),
        language_variant: variant,
    })
}

/// Parse a file, choosing the grammar from its extension
pub fn parse_file(content: &str, path: &Path) -> Result<TypeScriptAst> {
    parse_source(content, path, detect_variant(path))
}

/// Grammar choice by extension; unknown extensions fall back to JavaScript
pub fn detect_variant(path: &Path) -> JsLanguageVariant {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(JsLanguageVariant::from_extension)
        .unwrap_or(JsLanguageVariant::JavaScript)
}

pub fn has_parse_errors(tree: &Tree) -> bool {
    tree.root_node().has_error()
}

/// Source slice covered by `node`
pub fn node_text<'a>(node: &tree_sitter::Node, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

pub fn node_line(node: &tree_sitter::Node) -> usize {
    node.start_position().row + 1
}

pub fn node_column(node: &tree_sitter::Node) -> usize {
    node.start_position().column + 1
}

/// Full span of a node, 1-indexed on both ends
pub fn node_location(node: &tree_sitter::Node) -> CodeLocation {
    let end = node.end_position();
    CodeLocation {
        start_line: node_line(node),
        end_line: end.row + 1,
        start_column: node_column(node),
        end_column: end.column + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_by_extension() {
        let cases = [
            ("src/api/users.js", JsLanguageVariant::JavaScript),
            ("src/components/Card.jsx", JsLanguageVariant::Jsx),
            ("src/services/billing.ts", JsLanguageVariant::TypeScript),
            ("src/components/Card.tsx", JsLanguageVariant::Tsx),
            ("Makefile", JsLanguageVariant::JavaScript),
        ];
        for (path, expected) in cases {
            assert_eq!(detect_variant(Path::new(path)), expected, "{path}");
        }
    }

    #[test]
    fn test_typed_service_parses_cleanly() {
        let source = "export async function getUser(id: string): Promise<User> { return db.find(id); }";
        let ast = parse_file(source, Path::new("src/services/users.ts")).unwrap();
        assert!(!has_parse_errors(&ast.tree));
        assert!(ast.language_variant.has_types());
    }

    #[test]
    fn test_component_markup_needs_tsx_grammar() {
        let source = "export const Badge = ({ label }: Props) => <span>{label}</span>;";
        let ast = parse_file(source, Path::new("src/components/Badge.tsx")).unwrap();
        assert!(!has_parse_errors(&ast.tree));
        assert_eq!(ast.language_variant, JsLanguageVariant::Tsx);
    }

    #[test]
    fn test_broken_source_still_yields_tree() {
        let source = "export function handler(req { return respond(req); ";
        let ast = parse_file(source, Path::new("src/api/route.ts")).unwrap();
        assert!(has_parse_errors(&ast.tree));
    }

    #[test]
    fn test_node_location_is_one_indexed() {
        let source = "import { db } from './db';\nexport const limit = 25;";
        let ast = parse_file(source, Path::new("src/config.ts")).unwrap();
        let second = ast.root().named_child(1).unwrap();

        assert_eq!(node_text(&second, &ast.source), "export const limit = 25;");
        let loc = node_location(&second);
        assert_eq!((loc.start_line, loc.start_column), (2, 1));
        assert_eq!((loc.end_line, loc.end_column), (2, 25));
    }
}
