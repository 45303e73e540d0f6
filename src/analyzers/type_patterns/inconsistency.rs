//! Cross-file resolution over the merged type registry

use super::registry::{TypeDefinition, TypeRegistry};
use crate::analyzers::{code_snippet, Finding};
use crate::core::{EffortLevel, Issue, IssueCategory, IssueType, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

/// Marker of the generated schema row path inside a declaration
const SCHEMA_TABLES_PATH: &str = "Database['public']['Tables']";

const SCHEMA_FILE_MARKERS: &[&str] = &["database.types", "supabase"];

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static BLOCK_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[,;]?\s*\}").unwrap());
static BLOCK_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\s*").unwrap());

/// Whitespace and trailing separators do not make two bodies different
pub fn normalize_definition(definition: &str) -> String {
    let collapsed = WHITESPACE.replace_all(definition, " ");
    let closed = BLOCK_CLOSE.replace_all(&collapsed, "}");
    BLOCK_OPEN.replace_all(&closed, "{").trim().to_string()
}

fn anchored(finding: Finding, detector: &str, definition: &TypeDefinition) -> Issue {
    finding.at_location(
        detector,
        &definition.file,
        definition.location,
        code_snippet(&definition.definition),
    )
}

/// Same-named declarations in different files: identical bodies are
/// duplicates, differing bodies are conflicting shapes
pub fn detect_duplicate_definitions(detector: &str, registry: &TypeRegistry) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (name, members) in registry.definitions_by_name() {
        let mut files: Vec<&str> = Vec::new();
        for member in &members {
            if !files.contains(&member.file.as_str()) {
                files.push(&member.file);
            }
        }
        if files.len() < 2 {
            continue;
        }

        let first = normalize_definition(&members[0].definition);
        let identical = members
            .iter()
            .all(|m| normalize_definition(&m.definition) == first);
        let file_list = files.join(", ");
        let count = files.len();

        for member in &members {
            let finding = if identical {
                Finding::new(
                    IssueType::CodeDuplication,
                    Severity::Medium,
                    IssueCategory::Types,
                    EffortLevel::Small,
                )
                .describe(
                    format!(
                        "Duplicate type definition '{name}' found in {count} files: {file_list}"
                    ),
                    format!(
                        "Consolidate the type definition '{name}' into a single shared type file \
                         and import it where needed. This reduces maintenance burden and ensures \
                         consistency."
                    ),
                )
                .tags(&["duplicate-type", "type-consolidation", name])
            } else {
                Finding::new(
                    IssueType::InconsistentPattern,
                    Severity::High,
                    IssueCategory::Types,
                    EffortLevel::Medium,
                )
                .describe(
                    format!(
                        "Inconsistent type definition for '{name}' found across {count} files: \
                         {file_list}. The definitions differ in structure or properties."
                    ),
                    format!(
                        "Review all definitions of '{name}' and establish a single canonical \
                         definition. Ensure all usages align with the canonical type. Consider \
                         if these should be different types with different names."
                    ),
                )
                .tags(&["inconsistent-type", "type-mismatch", name])
            };
            issues.push(anchored(finding, detector, member));
        }
    }
    issues
}

fn is_schema_file(file: &str) -> bool {
    SCHEMA_FILE_MARKERS.iter().any(|marker| file.contains(marker))
}

fn is_schema_definition(definition: &TypeDefinition) -> bool {
    is_schema_file(&definition.file) || definition.definition.contains(SCHEMA_TABLES_PATH)
}

/// `UserProfile` -> `user_profile`
fn snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.push(c.to_ascii_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

/// Name-similarity heuristic between a hand-written type and a generated one
pub fn matches_schema_type(manual: &str, schema: &TypeDefinition) -> bool {
    let manual_lower = manual.to_lowercase();
    let schema_lower = schema.name.to_lowercase();

    let same = manual_lower == schema_lower;
    let plural =
        format!("{manual_lower}s") == schema_lower || format!("{schema_lower}s") == manual_lower;
    let prefixed =
        format!("db{manual_lower}") == schema_lower || format!("db{schema_lower}") == manual_lower;
    let underscored = manual_lower.replace('_', "") == schema_lower.replace('_', "");
    let table_named = [
        format!("['{manual_lower}']"),
        format!("['{manual_lower}s']"),
        format!("['{}']", snake_case(manual)),
    ]
    .iter()
    .any(|key| schema.definition.contains(key.as_str()));

    same || plural || prefixed || underscored || table_named
}

/// Hand-written types shadowing a generated schema type
pub fn detect_schema_mismatches(detector: &str, registry: &TypeRegistry) -> Vec<Issue> {
    let definitions = registry.definitions();
    let schema: Vec<&TypeDefinition> = definitions
        .iter()
        .filter(|d| is_schema_definition(d))
        .collect();
    if schema.is_empty() {
        return Vec::new();
    }

    definitions
        .iter()
        .filter(|d| !is_schema_file(&d.file))
        .filter_map(|manual| {
            let generated = schema
                .iter()
                .filter(|s| !std::ptr::eq(**s, manual))
                .find(|s| matches_schema_type(&manual.name, s))?;
            let name = manual.name.as_str();
            let finding = Finding::new(
                IssueType::InconsistentPattern,
                Severity::High,
                IssueCategory::Types,
                EffortLevel::Small,
            )
            .describe(
                format!(
                    "Manual type definition '{name}' may conflict with Supabase generated type. \
                     Found potential Supabase type in {}.",
                    generated.file
                ),
                format!(
                    "Use Supabase generated types instead of manual definitions to ensure type \
                     safety with the database schema. Import the type from the generated types \
                     file: import type {{ {name} }} from '@/types/database.types'"
                ),
            )
            .tags(&["supabase-type-mismatch", "database-type", name]);
            Some(anchored(finding, detector, manual))
        })
        .collect()
}

/// Run both cross-file passes; an empty registry yields nothing
pub fn detect_type_inconsistencies(detector: &str, registry: &TypeRegistry) -> Vec<Issue> {
    if registry.is_empty() {
        return Vec::new();
    }
    let mut issues = detect_duplicate_definitions(detector, registry);
    issues.extend(detect_schema_mismatches(detector, registry));
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::type_patterns::registry::TypeDefinitionKind;
    use crate::core::CodeLocation;

    const DETECTOR: &str = "TypePatternAnalyzer";

    fn definition(name: &str, file: &str, body: &str) -> TypeDefinition {
        TypeDefinition {
            name: name.to_string(),
            kind: TypeDefinitionKind::Interface,
            file: file.to_string(),
            location: CodeLocation::default(),
            definition: body.to_string(),
        }
    }

    #[test]
    fn test_normalize_definition() {
        assert_eq!(
            normalize_definition("interface A {\n  id: string;\n}"),
            "interface A {id: string}"
        );
        assert_eq!(
            normalize_definition("interface A { id: string, }"),
            "interface A {id: string}"
        );
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("UserProfile"), "user_profile");
        assert_eq!(snake_case("order"), "order");
    }

    #[test]
    fn test_same_file_redeclaration_is_ignored() {
        let mut registry = TypeRegistry::new();
        registry.record_definition(definition("A", "a.ts", "interface A { x: 1 }"));
        registry.record_definition(definition("A", "a.ts", "interface A { y: 2 }"));
        assert!(detect_duplicate_definitions(DETECTOR, &registry).is_empty());
    }

    #[test]
    fn test_schema_match_heuristics() {
        let generated = definition(
            "Tables",
            "src/types/database.types.ts",
            "export type Tables = { users: Database['public']['Tables']['users']['Row'] }",
        );
        assert!(matches_schema_type("User", &generated));
        assert!(!matches_schema_type("Invoice", &generated));

        let aliased = definition("DbOrder", "src/lib/supabase.ts", "type DbOrder = {}");
        assert!(matches_schema_type("Order", &aliased));
        assert!(matches_schema_type("DbOrders", &aliased));
    }

    #[test]
    fn test_schema_mismatch_reported_on_manual_type() {
        let mut registry = TypeRegistry::new();
        registry.record_definition(definition(
            "Profile",
            "src/types/database.types.ts",
            "interface Profile { id: string }",
        ));
        registry.record_definition(definition(
            "Profiles",
            "src/features/profile/types.ts",
            "interface Profiles { id: string; name: string }",
        ));
        let issues = detect_schema_mismatches(DETECTOR, &registry);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].file, "src/features/profile/types.ts");
        assert!(issues[0]
            .description
            .ends_with("Found potential Supabase type in src/types/database.types.ts."));
    }

    #[test]
    fn test_empty_registry_yields_nothing() {
        assert!(detect_type_inconsistencies(DETECTOR, &TypeRegistry::new()).is_empty());
    }
}
