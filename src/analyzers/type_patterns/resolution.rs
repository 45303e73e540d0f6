//! Recording type declarations and resolving type references to names

use super::registry::{TypeDefinition, TypeDefinitionKind, TypeRegistry, TypeUsage, UsageContext};
use crate::analyzers::typescript::parser::{node_location, node_text};
use crate::analyzers::typescript::syntax::{annotation_type, find_descendants, is_function_like};
use crate::core::TypeScriptAst;
use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

static SIMPLE_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9_]*$").unwrap());
static ARRAY_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][a-zA-Z0-9_]*)\[\]$").unwrap());
static GENERIC_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^([A-Z]\w*)<(.+)>$").unwrap());
static SCHEMA_TABLE_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\['Tables'\]\['([^']+)'\]").unwrap());

/// Best-effort name of the type a reference points at
///
/// Unwraps one generic container, takes the first resolvable member of a
/// union or intersection, strips array brackets and maps generated schema
/// row paths (`Database['public']['Tables']['users']['Row']`) to `DbUsers`.
pub fn extract_type_name(type_text: &str) -> Option<String> {
    let text = type_text.trim();
    if SIMPLE_TYPE.is_match(text) {
        return Some(text.to_string());
    }
    if let Some(caps) = ARRAY_TYPE.captures(text) {
        return Some(caps[1].to_string());
    }
    if text.starts_with("Database[") {
        return SCHEMA_TABLE_ROW
            .captures(text)
            .map(|caps| format!("Db{}", capitalize(&caps[1])));
    }
    if let Some(caps) = GENERIC_TYPE.captures(text) {
        return extract_type_name(&caps[2]);
    }
    if text.contains('|') || text.contains('&') {
        return text
            .split(['|', '&'])
            .find_map(extract_type_name);
    }
    None
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Record every interface, type alias and enum declared in the file
pub fn collect_definitions(ast: &TypeScriptAst, file: &str, registry: &mut TypeRegistry) {
    let source = ast.source.as_str();
    let declarations = find_descendants(ast.root(), |node| {
        TypeDefinitionKind::from_node_kind(node.kind()).is_some()
    });
    for declaration in declarations {
        let (Some(kind), Some(name)) = (
            TypeDefinitionKind::from_node_kind(declaration.kind()),
            declaration.child_by_field_name("name"),
        ) else {
            continue;
        };
        registry.record_definition(TypeDefinition {
            name: node_text(&name, source).to_string(),
            kind,
            file: file.to_string(),
            location: node_location(&declaration),
            definition: node_text(&declaration, source).to_string(),
        });
    }
}

/// Record resolvable type references on variables, parameters, return
/// positions and declared properties
pub fn collect_usages(ast: &TypeScriptAst, file: &str, registry: &mut TypeRegistry) {
    let source = ast.source.as_str();
    let mut record = |type_node: Node, context: UsageContext| {
        if let Some(type_name) = extract_type_name(node_text(&type_node, source)) {
            registry.record_usage(TypeUsage {
                type_name,
                file: file.to_string(),
                location: node_location(&type_node),
                context,
            });
        }
    };

    let annotated = find_descendants(ast.root(), |node| {
        matches!(
            node.kind(),
            "variable_declarator"
                | "required_parameter"
                | "optional_parameter"
                | "property_signature"
                | "public_field_definition"
                | "type_alias_declaration"
        ) || is_function_like(node)
    });

    for node in annotated {
        let annotation = match node.kind() {
            "variable_declarator" => node
                .child_by_field_name("type")
                .map(|t| (t, UsageContext::Variable)),
            "required_parameter" | "optional_parameter" => node
                .child_by_field_name("type")
                .map(|t| (t, UsageContext::Parameter)),
            "property_signature" | "public_field_definition" => node
                .child_by_field_name("type")
                .map(|t| (t, UsageContext::Property)),
            "type_alias_declaration" => node
                .child_by_field_name("value")
                .map(|t| (t, UsageContext::Property)),
            _ => node
                .child_by_field_name("return_type")
                .map(|t| (t, UsageContext::Return)),
        };
        if let Some((type_node, context)) = annotation {
            if let Some(resolved) = annotation_type(type_node) {
                record(resolved, context);
            }
        }
    }
}
