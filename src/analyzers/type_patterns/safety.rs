//! Per-file type safety checks: `any` annotations and assertions that
//! cannot change the type of their operand

use crate::analyzers::typescript::parser::{node_location, node_text};
use crate::analyzers::typescript::syntax::{
    descendants_of_kind, function_name, is_function_like, named_children, parameter_name,
};
use crate::analyzers::{code_snippet, Finding};
use crate::core::{EffortLevel, Issue, IssueCategory, IssueType, Severity, TypeScriptAst};
use tree_sitter::Node;

const ASSERTION_KINDS: &[&str] = &["as_expression", "type_assertion", "non_null_expression"];

/// Syntactic position of an `any` annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyContext {
    Parameter(String),
    Variable(String),
    Property(String),
    ReturnType(String),
    Function(String),
    TypeAlias(String),
    Interface(String),
    Unknown,
}

impl AnyContext {
    pub fn describe(&self) -> String {
        match self {
            AnyContext::Parameter(name) => format!("function parameter '{name}'"),
            AnyContext::Variable(name) => format!("variable declaration '{name}'"),
            AnyContext::Property(name) => format!("property '{name}'"),
            AnyContext::ReturnType(name) => format!("return type of '{name}'"),
            AnyContext::Function(name) => format!("function '{name}'"),
            AnyContext::TypeAlias(name) => format!("type alias '{name}'"),
            AnyContext::Interface(name) => format!("interface '{name}'"),
            AnyContext::Unknown => "unknown context".to_string(),
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            AnyContext::Parameter(_) => "parameter",
            AnyContext::Variable(_) => "variable",
            AnyContext::Property(_) => "property",
            AnyContext::ReturnType(_) => "return-type",
            AnyContext::Function(_) => "function",
            AnyContext::TypeAlias(_) => "type-alias",
            AnyContext::Interface(_) => "interface",
            AnyContext::Unknown => "unknown",
        }
    }
}

fn field_text(node: &Node, field: &str, source: &str) -> String {
    node.child_by_field_name(field)
        .map(|n| node_text(&n, source).to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Walk up from an `any` node to the nearest named construct
pub fn any_context<'t>(any: &Node<'t>, source: &str) -> (AnyContext, Option<Node<'t>>) {
    let mut child = *any;
    let mut current = any.parent();
    while let Some(parent) = current {
        let context = match parent.kind() {
            "required_parameter" | "optional_parameter" => Some(AnyContext::Parameter(
                parameter_name(&parent, source).unwrap_or_else(|| "anonymous".to_string()),
            )),
            "variable_declarator" => Some(AnyContext::Variable(field_text(&parent, "name", source))),
            "property_signature" | "public_field_definition" => {
                Some(AnyContext::Property(field_text(&parent, "name", source)))
            }
            "type_alias_declaration" => {
                Some(AnyContext::TypeAlias(field_text(&parent, "name", source)))
            }
            "interface_declaration" => {
                Some(AnyContext::Interface(field_text(&parent, "name", source)))
            }
            _ if is_function_like(&parent) => {
                let name =
                    function_name(&parent, source).unwrap_or_else(|| "anonymous".to_string());
                let in_return_type = parent
                    .child_by_field_name("return_type")
                    .is_some_and(|rt| rt.id() == child.id());
                Some(if in_return_type {
                    AnyContext::ReturnType(name)
                } else {
                    AnyContext::Function(name)
                })
            }
            _ => None,
        };
        if let Some(context) = context {
            return (context, Some(parent));
        }
        child = parent;
        current = parent.parent();
    }
    (AnyContext::Unknown, None)
}

/// One `type-safety`/medium issue per `any` annotation
pub fn detect_any_usage(detector: &str, file: &str, ast: &TypeScriptAst) -> Vec<Issue> {
    let source = ast.source.as_str();
    descendants_of_kind(ast.root(), &["predefined_type"])
        .into_iter()
        .filter(|node| node_text(node, source) == "any")
        .map(|any| {
            let (context, owner) = any_context(&any, source);
            let described = context.describe();
            let snippet = code_snippet(node_text(&owner.unwrap_or(any), source));
            Finding::new(
                IssueType::TypeSafety,
                Severity::Medium,
                IssueCategory::Types,
                EffortLevel::Small,
            )
            .describe(
                format!(
                    "Excessive use of 'any' type detected in {described}. This bypasses \
                     TypeScript's type checking and reduces type safety."
                ),
                "Replace 'any' with a specific type. Consider using: 1) A proper interface or \
                 type definition, 2) Generic types for flexible but type-safe code, 3) 'unknown' \
                 if the type is truly unknown (requires type guards), 4) Union types for \
                 multiple possible types.",
            )
            .tags(&["any-type", "type-safety", context.tag()])
            .at_location(detector, file, node_location(&any), snippet)
        })
        .collect()
}

/// Target type of an assertion that provably changes nothing
///
/// Literals asserted to their own primitive type, non-empty array
/// literals asserted to an array type, and `!` applied to an optional
/// chain. Assertions through `any` are left alone.
pub fn unnecessary_assertion_target(assertion: &Node, source: &str) -> Option<String> {
    match assertion.kind() {
        "non_null_expression" => {
            let inner = named_children(assertion).into_iter().next()?;
            node_text(&inner, source)
                .contains("?.")
                .then(|| "non-null".to_string())
        }
        "as_expression" | "type_assertion" => {
            let (expr, target) = assertion_parts(assertion)?;
            let target_text = node_text(&target, source).trim();
            if target_text == "any" || passes_through_any(&expr, source) {
                return None;
            }
            literal_matches(&expr, target_text).then(|| target_text.to_string())
        }
        _ => None,
    }
}

/// `(operand, asserted type)` of `x as T` or `<T>x`
fn assertion_parts<'t>(assertion: &Node<'t>) -> Option<(Node<'t>, Node<'t>)> {
    let children = named_children(assertion);
    match assertion.kind() {
        "as_expression" => {
            let expr = *children.first()?;
            let target = *children.get(1)?;
            Some((expr, target))
        }
        _ => {
            let arguments = children.iter().find(|c| c.kind() == "type_arguments")?;
            let target = named_children(arguments).into_iter().next()?;
            let expr = *children.iter().find(|c| c.kind() != "type_arguments")?;
            Some((expr, target))
        }
    }
}

fn passes_through_any(expr: &Node, source: &str) -> bool {
    matches!(expr.kind(), "as_expression" | "type_assertion")
        && assertion_parts(expr).is_some_and(|(_, target)| node_text(&target, source) == "any")
}

fn literal_matches(expr: &Node, target: &str) -> bool {
    match expr.kind() {
        "string" | "template_string" => target == "string",
        "number" => target == "number",
        "true" | "false" => target == "boolean",
        "array" => target.ends_with("[]") && !named_children(expr).is_empty(),
        _ => false,
    }
}

pub fn detect_unnecessary_assertions(
    detector: &str,
    file: &str,
    ast: &TypeScriptAst,
) -> Vec<Issue> {
    let source = ast.source.as_str();
    descendants_of_kind(ast.root(), ASSERTION_KINDS)
        .into_iter()
        .filter_map(|assertion| {
            let target = unnecessary_assertion_target(&assertion, source)?;
            Some(
                Finding::new(
                    IssueType::TypeSafety,
                    Severity::Low,
                    IssueCategory::Types,
                    EffortLevel::Trivial,
                )
                .describe(
                    format!(
                        "Unnecessary type assertion to '{target}' detected. The expression \
                         already has the correct type or TypeScript can infer it."
                    ),
                    "Remove the type assertion and let TypeScript infer the type naturally. If \
                     the assertion is needed for a specific reason, add a comment explaining \
                     why. Type assertions should only be used when you have more information \
                     about the type than TypeScript can infer.",
                )
                .tags(&["type-assertion", "type-safety", "unnecessary-assertion"])
                .at(detector, file, &assertion, source),
            )
        })
        .collect()
}
