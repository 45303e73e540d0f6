//! Logic repeated across components: validation, effects, data
//! transformations and near-identical component structure

use super::discovery::{ComponentInfo, ComponentInventory, ComponentKind};
use crate::analyzers::typescript::parser::node_text;
use crate::analyzers::typescript::syntax::{
    call_callee, call_expressions, callee_text, find_descendants, function_name, is_function_like,
};
use crate::analyzers::Finding;
use crate::core::{EffortLevel, Issue, IssueCategory, IssueType, Severity};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tree_sitter::Node;

/// Lowercase keywords marking validation logic
pub const VALIDATION_KEYWORDS: &[&str] = &[
    "validate", "isvalid", "check", "verify", "test", "required", "optional", "min", "max",
    "pattern", "email", "phone", "url", "number", "string",
];

const EFFECT_HOOKS: &[&str] = &["useEffect", "useLayoutEffect", "React.useEffect"];

const TRANSFORM_METHODS: &[&str] = &["map", "filter", "reduce", "sort", "find", "findIndex"];

/// Components scoring above this are reported as structurally similar
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//[^\n]*").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static STRUCTURE_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"useEffect",
        r"useState",
        r"useCallback",
        r"useMemo",
        r"return\s*\(",
        r"onClick",
        r"onChange",
        r"className",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Strip comments and collapse whitespace so formatting does not matter
pub fn normalize_code(code: &str) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(code, "");
    let without_lines = LINE_COMMENT.replace_all(&without_blocks, "");
    WHITESPACE
        .replace_all(&without_lines, " ")
        .trim()
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogicKind {
    Validation,
    Effect,
    Transformation,
}

impl LogicKind {
    fn subject(self) -> &'static str {
        match self {
            LogicKind::Validation => "validation",
            LogicKind::Effect => "useEffect",
            LogicKind::Transformation => "data transformation",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            LogicKind::Validation => "validation",
            LogicKind::Effect => "effect",
            LogicKind::Transformation => "transformation",
        }
    }

    fn burden(self) -> &'static str {
        match self {
            LogicKind::Validation => "validation logic increases",
            LogicKind::Effect => "effects increase",
            LogicKind::Transformation => "transformations increase",
        }
    }

    fn recommendation(self) -> &'static str {
        match self {
            LogicKind::Validation => {
                "Extract this validation logic into a shared utility function or custom hook. \
                 This will make the validation logic reusable and easier to maintain. Consider \
                 creating a validation utility in a shared location."
            }
            LogicKind::Effect => {
                "Extract this effect logic into a custom hook. This will make the effect \
                 reusable and easier to maintain. Consider creating a custom hook like \
                 'use[DescriptiveName]' in a shared hooks directory."
            }
            LogicKind::Transformation => {
                "Extract this transformation logic into a shared utility function. This will \
                 make the transformation reusable and easier to maintain. Consider creating a \
                 utility function in a shared location."
            }
        }
    }

    fn tags(self) -> &'static [&'static str] {
        match self {
            LogicKind::Validation => &[
                "component",
                "code-duplication",
                "validation",
                "refactoring",
            ],
            LogicKind::Effect => &[
                "component",
                "code-duplication",
                "hooks",
                "useEffect",
                "refactoring",
            ],
            LogicKind::Transformation => &[
                "component",
                "code-duplication",
                "transformation",
                "refactoring",
            ],
        }
    }
}

#[derive(Debug, Clone)]
struct Occurrence<'t> {
    component: String,
    node: Node<'t>,
}

/// Occurrences grouped by normalized text, groups in first-seen order
#[derive(Debug, Default)]
struct FragmentGroups<'t> {
    index: HashMap<String, usize>,
    groups: Vec<Vec<Occurrence<'t>>>,
}

impl<'t> FragmentGroups<'t> {
    fn insert(&mut self, code: &str, occurrence: Occurrence<'t>) {
        let key = normalize_code(code);
        if key.is_empty() {
            return;
        }
        match self.index.get(&key) {
            Some(&slot) => self.groups[slot].push(occurrence),
            None => {
                self.index.insert(key, self.groups.len());
                self.groups.push(vec![occurrence]);
            }
        }
    }

    /// Groups whose members span at least two components
    fn shared(&self) -> Vec<(&[Occurrence<'t>], Vec<&str>)> {
        self.groups
            .iter()
            .filter_map(|group| {
                let mut owners: Vec<&str> = Vec::new();
                for occurrence in group {
                    if !owners.contains(&occurrence.component.as_str()) {
                        owners.push(&occurrence.component);
                    }
                }
                (owners.len() >= 2).then_some((group.as_slice(), owners))
            })
            .collect()
    }
}

fn validation_fragments<'t>(component: &ComponentInfo<'t>, source: &str) -> Vec<Node<'t>> {
    let scope = component.body_scope();
    let contains_keyword = |text: &str| {
        let lower = text.to_lowercase();
        VALIDATION_KEYWORDS.iter().any(|k| lower.contains(k))
    };
    find_descendants(scope, |node| {
        if node.kind() == "if_statement" {
            return node
                .child_by_field_name("condition")
                .is_some_and(|cond| contains_keyword(node_text(&cond, source)));
        }
        is_function_like(node)
            && function_name(node, source).is_some_and(|name| contains_keyword(&name))
    })
}

fn effect_fragments<'t>(component: &ComponentInfo<'t>, source: &str) -> Vec<Node<'t>> {
    call_expressions(component.body_scope())
        .into_iter()
        .filter(|call| callee_text(call, source).is_some_and(|c| EFFECT_HOOKS.contains(&c)))
        .collect()
}

fn transformation_fragments<'t>(component: &ComponentInfo<'t>, source: &str) -> Vec<Node<'t>> {
    call_expressions(component.body_scope())
        .into_iter()
        .filter(|call| {
            call_callee(call)
                .filter(|callee| callee.kind() == "member_expression")
                .and_then(|callee| callee.child_by_field_name("property"))
                .is_some_and(|method| TRANSFORM_METHODS.contains(&node_text(&method, source)))
        })
        .collect()
}

fn detect_duplicated(
    detector: &str,
    file: &str,
    inventory: &ComponentInventory,
    source: &str,
    kind: LogicKind,
) -> Vec<Issue> {
    let mut groups = FragmentGroups::default();
    for component in inventory.components() {
        let fragments = match kind {
            LogicKind::Validation => validation_fragments(component, source),
            LogicKind::Effect => effect_fragments(component, source),
            LogicKind::Transformation => transformation_fragments(component, source),
        };
        for node in fragments {
            let occurrence = Occurrence {
                component: component.name.clone(),
                node,
            };
            groups.insert(node_text(&node, source), occurrence);
        }
    }

    let mut issues = Vec::new();
    for (group, owners) in groups.shared() {
        for occurrence in group {
            let description = format!(
                "Duplicate {} logic found in component '{}'. This same {} appears in {} \
                 components: {}. Duplicated {} maintenance burden.",
                kind.subject(),
                occurrence.component,
                kind.noun(),
                owners.len(),
                owners.join(", "),
                kind.burden()
            );
            issues.push(
                Finding::new(
                    IssueType::CodeDuplication,
                    Severity::Medium,
                    IssueCategory::Components,
                    EffortLevel::Small,
                )
                .describe(description, kind.recommendation())
                .tags(kind.tags())
                .at(detector, file, &occurrence.node, source),
            );
        }
    }
    issues
}

pub fn detect_duplicate_validation(
    detector: &str,
    file: &str,
    inventory: &ComponentInventory,
    source: &str,
) -> Vec<Issue> {
    detect_duplicated(detector, file, inventory, source, LogicKind::Validation)
}

pub fn detect_duplicate_effects(
    detector: &str,
    file: &str,
    inventory: &ComponentInventory,
    source: &str,
) -> Vec<Issue> {
    detect_duplicated(detector, file, inventory, source, LogicKind::Effect)
}

pub fn detect_duplicate_transformations(
    detector: &str,
    file: &str,
    inventory: &ComponentInventory,
    source: &str,
) -> Vec<Issue> {
    detect_duplicated(detector, file, inventory, source, LogicKind::Transformation)
}

/// Share of matching structural features between two components, in [0, 1]
///
/// Four flags (kind, hooks, state, props) must be equal; eight markers
/// contribute the ratio of their smaller to larger occurrence count, and
/// only when both components use the marker.
pub fn structural_similarity(a: &ComponentInfo, b: &ComponentInfo, source: &str) -> f64 {
    let flags = [
        a.kind == b.kind,
        a.uses_hooks == b.uses_hooks,
        a.uses_state == b.uses_state,
        a.has_props == b.has_props,
    ];
    let mut score = flags.iter().filter(|same| **same).count() as f64;

    let text_a = node_text(&a.node, source);
    let text_b = node_text(&b.node, source);
    for marker in STRUCTURE_MARKERS.iter() {
        let count_a = marker.find_iter(text_a).count();
        let count_b = marker.find_iter(text_b).count();
        if count_a > 0 && count_b > 0 {
            score += count_a.min(count_b) as f64 / count_a.max(count_b) as f64;
        }
    }

    score / (flags.len() + STRUCTURE_MARKERS.len()) as f64
}

pub fn detect_similar_components(
    detector: &str,
    file: &str,
    inventory: &ComponentInventory,
    source: &str,
) -> Vec<Issue> {
    let components = inventory.components();
    let mut issues = Vec::new();
    for (i, first) in components.iter().enumerate() {
        for second in &components[i + 1..] {
            let similarity = structural_similarity(first, second, source);
            if similarity <= SIMILARITY_THRESHOLD {
                continue;
            }
            let description = format!(
                "Components '{}' and '{}' have very similar structures ({}% similar). This \
                 suggests they could be abstracted into a single reusable component.",
                first.name,
                second.name,
                (similarity * 100.0).round() as u32
            );
            issues.push(
                Finding::new(
                    IssueType::CodeDuplication,
                    Severity::Medium,
                    IssueCategory::Components,
                    EffortLevel::Medium,
                )
                .describe(
                    description,
                    "Consider creating a single component that accepts configuration props to \
                     handle both use cases. This reduces code duplication and makes the codebase \
                     more maintainable. Look for common patterns and extract them into a shared \
                     component.",
                )
                .tags(&["component", "code-duplication", "abstraction", "refactoring"])
                .at(detector, file, &first.node, source),
            );
        }
    }
    issues
}

/// Class components, reported as legacy code
pub fn detect_class_components(
    detector: &str,
    file: &str,
    inventory: &ComponentInventory,
    source: &str,
) -> Vec<Issue> {
    inventory
        .by_kind(ComponentKind::Class)
        .into_iter()
        .map(|component| {
            let name = &component.name;
            Finding::new(
                IssueType::LegacyCode,
                Severity::Low,
                IssueCategory::Components,
                EffortLevel::Medium,
            )
            .describe(
                format!(
                    "Class component '{name}' detected. Modern React development favors \
                     function components with hooks for better code reuse and simpler patterns."
                ),
                format!(
                    "Consider refactoring '{name}' to a function component using hooks \
                     (useState, useEffect, etc.). This improves code readability and enables \
                     better composition with custom hooks."
                ),
            )
            .tags(&["component", "class-component", "modernization", "hooks"])
            .at(detector, file, &component.node, source)
        })
        .collect()
}
