//! Structural queries over tree-sitter JS/TS nodes
//!
//! Everything the detectors need from the syntax tree goes through these
//! helpers. Unknown or malformed nodes simply produce empty results.

use super::parser::node_text;
use tree_sitter::Node;

/// Node kinds that define a callable body
pub const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
    "method_definition",
];

/// JSX element kinds that invoke a component or tag
pub const JSX_ELEMENT_KINDS: &[&str] = &["jsx_element", "jsx_self_closing_element"];

pub fn is_function_like(node: &Node) -> bool {
    FUNCTION_KINDS.contains(&node.kind())
}

/// Named children without comment nodes
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Preorder search including `node` itself
pub fn find_descendants<'t, F>(node: Node<'t>, predicate: F) -> Vec<Node<'t>>
where
    F: Fn(&Node<'t>) -> bool,
{
    let mut found = Vec::new();
    collect_matching(node, &predicate, &mut found);
    found
}

fn collect_matching<'t, F>(node: Node<'t>, predicate: &F, found: &mut Vec<Node<'t>>)
where
    F: Fn(&Node<'t>) -> bool,
{
    if predicate(&node) {
        found.push(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_matching(child, predicate, found);
    }
}

pub fn descendants_of_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    find_descendants(node, |n| kinds.contains(&n.kind()))
}

pub fn contains_kind(node: &Node, kinds: &[&str]) -> bool {
    if kinds.contains(&node.kind()) {
        return true;
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| contains_kind(&child, kinds));
    found
}

/// Call expressions in preorder, `node` included when it is a call
pub fn call_expressions(node: Node<'_>) -> Vec<Node<'_>> {
    descendants_of_kind(node, &["call_expression"])
}

pub fn call_callee<'t>(call: &Node<'t>) -> Option<Node<'t>> {
    call.child_by_field_name("function")
}

pub fn call_arguments<'t>(call: &Node<'t>) -> Vec<Node<'t>> {
    call.child_by_field_name("arguments")
        .filter(|args| args.kind() == "arguments")
        .map(|args| named_children(&args))
        .unwrap_or_default()
}

/// Text of the callee, member chains kept whole (`db.users.find`)
pub fn callee_text<'a>(call: &Node, source: &'a str) -> Option<&'a str> {
    call_callee(call).map(|callee| node_text(&callee, source))
}

/// Name a function-like node is known by
///
/// Declarations carry their own name; expressions and arrows take the name
/// of the variable, object key or class field they are assigned to.
pub fn function_name(node: &Node, source: &str) -> Option<String> {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" | "method_definition" => node
            .child_by_field_name("name")
            .map(|name| node_text(&name, source).to_string()),
        "function_expression" | "function" | "generator_function" | "arrow_function" => {
            assigned_name(node, source).or_else(|| {
                node.child_by_field_name("name")
                    .map(|name| node_text(&name, source).to_string())
            })
        }
        _ => None,
    }
}

fn assigned_name(node: &Node, source: &str) -> Option<String> {
    let parent = node.parent()?;
    let name_node = match parent.kind() {
        "variable_declarator" => parent.child_by_field_name("name"),
        "pair" => parent.child_by_field_name("key"),
        "public_field_definition" | "field_definition" => parent
            .child_by_field_name("name")
            .or_else(|| parent.child_by_field_name("property")),
        _ => None,
    }?;
    matches!(
        name_node.kind(),
        "identifier" | "property_identifier" | "private_property_identifier" | "string"
    )
    .then(|| node_text(&name_node, source).trim_matches(['"', '\'']).to_string())
}

pub fn function_body<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    node.child_by_field_name("body")
}

/// Top-level statements of a body; an expression body counts as one
pub fn body_statements<'t>(body: &Node<'t>) -> Vec<Node<'t>> {
    match body.kind() {
        "statement_block" | "class_body" => named_children(body),
        _ => vec![*body],
    }
}

/// Declared parameters, including the bare `x => ...` form
pub fn function_parameters<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    if let Some(params) = node.child_by_field_name("parameters") {
        return named_children(&params);
    }
    node.child_by_field_name("parameter")
        .map(|param| vec![param])
        .unwrap_or_default()
}

/// The binding part of a parameter: identifier or destructuring pattern
pub fn parameter_binding<'t>(param: &Node<'t>) -> Option<Node<'t>> {
    match param.kind() {
        "required_parameter" | "optional_parameter" => param
            .child_by_field_name("pattern")
            .and_then(|pattern| parameter_binding(&pattern)),
        "assignment_pattern" => param
            .child_by_field_name("left")
            .and_then(|left| parameter_binding(&left)),
        "rest_pattern" => named_children(param)
            .into_iter()
            .next()
            .and_then(|inner| parameter_binding(&inner)),
        "identifier" | "object_pattern" | "array_pattern" => Some(*param),
        _ => None,
    }
}

/// Parameter name as written; destructuring patterns yield their text
pub fn parameter_name(param: &Node, source: &str) -> Option<String> {
    parameter_binding(param).map(|binding| node_text(&binding, source).to_string())
}

/// Parameter type annotation node (the type itself, not the `:`)
pub fn parameter_type<'t>(param: &Node<'t>) -> Option<Node<'t>> {
    param.child_by_field_name("type").and_then(annotation_type)
}

/// Unwrap a `type_annotation` wrapper down to the type node
pub fn annotation_type(annotation: Node<'_>) -> Option<Node<'_>> {
    if annotation.kind() == "type_annotation" {
        named_children(&annotation).into_iter().next()
    } else {
        Some(annotation)
    }
}

/// Names bound by an object destructuring pattern
pub fn object_pattern_names(pattern: &Node, source: &str) -> Vec<String> {
    named_children(pattern)
        .iter()
        .filter_map(|element| match element.kind() {
            "shorthand_property_identifier_pattern" => Some(node_text(element, source).to_string()),
            "object_assignment_pattern" => element
                .child_by_field_name("left")
                .map(|left| node_text(&left, source).to_string()),
            "pair_pattern" => element
                .child_by_field_name("key")
                .map(|key| node_text(&key, source).to_string()),
            "rest_pattern" => named_children(element)
                .first()
                .map(|inner| node_text(inner, source).to_string()),
            _ => None,
        })
        .collect()
}

/// Strip parentheses, `await` and a wrapping expression statement
pub fn unwrap_expression<'t>(node: Node<'t>) -> Node<'t> {
    match node.kind() {
        "parenthesized_expression" | "await_expression" | "expression_statement" => {
            match named_children(&node).into_iter().next() {
                Some(inner) => unwrap_expression(inner),
                None => node,
            }
        }
        _ => node,
    }
}

/// Expression returned by a `return` statement
pub fn returned_expression<'t>(stmt: &Node<'t>) -> Option<Node<'t>> {
    if stmt.kind() != "return_statement" {
        return None;
    }
    named_children(stmt).into_iter().next()
}

/// How a declaration is exported from its module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    NotExported,
    Named,
    Default,
}

impl ExportStatus {
    pub fn is_exported(&self) -> bool {
        !matches!(self, ExportStatus::NotExported)
    }
}

/// Decide whether `decl` (or the name it binds) is exported
///
/// Checks the `export` modifier on the declaration, then module-level
/// `export default Name;` and `export { Name }` statements.
pub fn export_status(decl: &Node, name: &str, root: &Node, source: &str) -> ExportStatus {
    if let Some(statement) = enclosing_export(decl) {
        return if has_default_keyword(&statement) {
            ExportStatus::Default
        } else {
            ExportStatus::Named
        };
    }

    let mut status = ExportStatus::NotExported;
    for statement in named_children(root) {
        if statement.kind() != "export_statement" {
            continue;
        }
        if let Some(value) = statement.child_by_field_name("value") {
            if has_default_keyword(&statement) && node_text(&value, source) == name {
                return ExportStatus::Default;
            }
        }
        for clause in named_children(&statement) {
            if clause.kind() != "export_clause" {
                continue;
            }
            for spec in named_children(&clause) {
                let exported = spec
                    .child_by_field_name("name")
                    .is_some_and(|n| node_text(&n, source) == name);
                if !exported {
                    continue;
                }
                let alias = spec
                    .child_by_field_name("alias")
                    .map(|a| node_text(&a, source));
                if alias == Some("default") {
                    return ExportStatus::Default;
                }
                status = ExportStatus::Named;
            }
        }
    }
    status
}

fn enclosing_export<'t>(decl: &Node<'t>) -> Option<Node<'t>> {
    let mut current = decl.parent();
    while let Some(parent) = current {
        match parent.kind() {
            "export_statement" => return Some(parent),
            "variable_declarator" | "lexical_declaration" | "variable_declaration" => {
                current = parent.parent()
            }
            _ => return None,
        }
    }
    None
}

fn has_default_keyword(statement: &Node) -> bool {
    let mut cursor = statement.walk();
    let found = statement
        .children(&mut cursor)
        .any(|child| child.kind() == "default");
    found
}

/// Find a function or variable declaration named `name` under `scope`
pub fn find_declaration<'t>(scope: Node<'t>, name: &str, source: &str) -> Option<Node<'t>> {
    find_descendants(scope, |n| match n.kind() {
        "function_declaration" | "variable_declarator" => n
            .child_by_field_name("name")
            .is_some_and(|id| node_text(&id, source) == name),
        _ => false,
    })
    .into_iter()
    .next()
}
