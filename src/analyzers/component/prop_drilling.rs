//! Prop drilling: a prop forwarded unchanged through a chain of components

use super::discovery::{ComponentInfo, ComponentInventory};
use crate::analyzers::typescript::parser::node_text;
use crate::analyzers::typescript::syntax::{
    descendants_of_kind, named_children, object_pattern_names, JSX_ELEMENT_KINDS,
};
use crate::analyzers::Finding;
use crate::core::{EffortLevel, Issue, IssueCategory, IssueType, Severity};
use regex::Regex;
use std::collections::HashSet;
use tree_sitter::Node;

/// Chains longer than this are not followed further
pub const MAX_PROP_TRACE_DEPTH: usize = 10;

/// Chains deeper than this are reported
pub const PROP_DRILLING_THRESHOLD: usize = 3;

/// A prop's path from the component that receives it to the deepest
/// component it reaches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropChain {
    pub prop: String,
    pub path: Vec<String>,
}

impl PropChain {
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    fn is_suffix_of(&self, other: &PropChain) -> bool {
        self.prop == other.prop
            && other.depth() > self.depth()
            && other.path.ends_with(&self.path)
    }
}

/// Props a function or arrow component receives
///
/// Destructured names when the first parameter is an object pattern,
/// otherwise every `param.name` access on the props parameter.
pub fn component_props(component: &ComponentInfo, source: &str) -> Vec<String> {
    let (Some(binding), Some(function)) = (component.props_binding(), component.function) else {
        return Vec::new();
    };
    match binding.kind() {
        "object_pattern" => object_pattern_names(&binding, source)
            .into_iter()
            .filter(|name| !is_rest_binding(&binding, name, source))
            .collect(),
        "identifier" => {
            let param = node_text(&binding, source);
            let pattern = format!(r"\b{}\.([A-Za-z_$][\w$]*)", regex::escape(param));
            let Ok(access) = Regex::new(&pattern) else {
                return Vec::new();
            };
            let mut props: Vec<String> = Vec::new();
            for capture in access.captures_iter(node_text(&function, source)) {
                let name = &capture[1];
                if !props.iter().any(|p| p == name) {
                    props.push(name.to_string());
                }
            }
            props
        }
        _ => Vec::new(),
    }
}

fn is_rest_binding(pattern: &Node, name: &str, source: &str) -> bool {
    named_children(pattern).iter().any(|element| {
        element.kind() == "rest_pattern"
            && node_text(element, source).trim_start_matches("...") == name
    })
}

/// Names through which a component can hand its props on
#[derive(Debug, Default)]
struct Forwarding {
    /// Bindings holding the whole props object
    whole: Vec<String>,
    /// `...rest` bindings of a destructured parameter
    rest: Vec<String>,
    /// Props pulled out of the object before the rest binding
    destructured: Vec<String>,
}

impl Forwarding {
    fn of(component: &ComponentInfo, source: &str) -> Self {
        let mut forwarding = Forwarding {
            whole: vec!["props".to_string()],
            ..Default::default()
        };
        let Some(binding) = component.props_binding() else {
            return forwarding;
        };
        match binding.kind() {
            "identifier" => forwarding
                .whole
                .push(node_text(&binding, source).to_string()),
            "object_pattern" => {
                for element in named_children(&binding) {
                    if element.kind() == "rest_pattern" {
                        let rest = node_text(&element, source).trim_start_matches("...");
                        forwarding.rest.push(rest.to_string());
                    }
                }
                forwarding.destructured = object_pattern_names(&binding, source)
                    .into_iter()
                    .filter(|name| !forwarding.rest.contains(name))
                    .collect();
            }
            _ => {}
        }
        forwarding
    }

    fn holds_whole_object(&self, name: &str) -> bool {
        self.whole.iter().any(|w| w == name)
    }

    /// Whether spreading `name` carries `prop` along
    fn spread_carries(&self, name: &str, prop: &str) -> bool {
        self.holds_whole_object(name)
            || (self.rest.iter().any(|r| r == name) && !self.destructured.iter().any(|d| d == prop))
    }
}

pub struct PropTracer<'a, 't> {
    inventory: &'a ComponentInventory<'t>,
    source: &'a str,
}

impl<'a, 't> PropTracer<'a, 't> {
    pub fn new(inventory: &'a ComponentInventory<'t>, source: &'a str) -> Self {
        Self { inventory, source }
    }

    /// Deepest chain `prop` follows starting at `component`
    pub fn trace(&self, prop: &str, component: &ComponentInfo<'t>) -> PropChain {
        let mut visited = HashSet::new();
        let path = self
            .trace_from(prop, component, 1, &mut visited)
            .unwrap_or_else(|| vec![component.name.clone()]);
        PropChain {
            prop: prop.to_string(),
            path,
        }
    }

    fn trace_from(
        &self,
        prop: &str,
        component: &ComponentInfo<'t>,
        depth: usize,
        visited: &mut HashSet<String>,
    ) -> Option<Vec<String>> {
        if depth > MAX_PROP_TRACE_DEPTH || !visited.insert(component.name.clone()) {
            return None;
        }

        let forwarding = Forwarding::of(component, self.source);
        let mut best = vec![component.name.clone()];

        for element in descendants_of_kind(component.node, JSX_ELEMENT_KINDS) {
            let Some(opening) = opening_tag(&element) else {
                continue;
            };
            let Some(child_name) = component_tag_name(&opening, self.source) else {
                continue;
            };
            if child_name == component.name || !self.forwards_prop(&opening, prop, &forwarding) {
                continue;
            }

            let candidate = match self.inventory.find(child_name) {
                Some(child) => {
                    let mut branch_visited = visited.clone();
                    self.trace_from(prop, child, depth + 1, &mut branch_visited)
                }
                None => Some(vec![child_name.to_string()]),
            };
            if let Some(tail) = candidate {
                if tail.len() + 1 > best.len() {
                    best = std::iter::once(component.name.clone()).chain(tail).collect();
                }
            }
        }

        Some(best)
    }

    /// `prop={prop}`, `prop={props.prop}`, a spread of the props object, or
    /// a rest spread that still contains `prop`
    fn forwards_prop(&self, opening: &Node, prop: &str, forwarding: &Forwarding) -> bool {
        named_children(opening).iter().any(|attribute| match attribute.kind() {
            "jsx_attribute" => {
                let mut parts = named_children(attribute).into_iter();
                let named_prop = parts
                    .next()
                    .is_some_and(|name| node_text(&name, self.source) == prop);
                named_prop
                    && parts
                        .next()
                        .filter(|value| value.kind() == "jsx_expression")
                        .and_then(|value| named_children(&value).into_iter().next())
                        .is_some_and(|expr| self.is_unchanged_prop(&expr, prop, forwarding))
            }
            "jsx_expression" => named_children(attribute)
                .into_iter()
                .find(|inner| inner.kind() == "spread_element")
                .and_then(|spread| named_children(&spread).into_iter().next())
                .is_some_and(|arg| forwarding.spread_carries(node_text(&arg, self.source), prop)),
            _ => false,
        })
    }

    fn is_unchanged_prop(&self, expr: &Node, prop: &str, forwarding: &Forwarding) -> bool {
        match expr.kind() {
            "identifier" => node_text(expr, self.source) == prop,
            "member_expression" => {
                let object_is_props = expr.child_by_field_name("object").is_some_and(|object| {
                    object.kind() == "identifier"
                        && forwarding.holds_whole_object(node_text(&object, self.source))
                });
                let property_matches = expr
                    .child_by_field_name("property")
                    .is_some_and(|property| node_text(&property, self.source) == prop);
                object_is_props && property_matches
            }
            _ => false,
        }
    }
}

fn opening_tag<'t>(element: &Node<'t>) -> Option<Node<'t>> {
    match element.kind() {
        "jsx_self_closing_element" => Some(*element),
        "jsx_element" => element
            .child_by_field_name("open_tag")
            .or_else(|| {
                named_children(element)
                    .into_iter()
                    .find(|child| child.kind() == "jsx_opening_element")
            }),
        _ => None,
    }
}

fn component_tag_name<'a>(opening: &Node, source: &'a str) -> Option<&'a str> {
    let name = opening.child_by_field_name("name")?;
    let text = node_text(&name, source);
    let capitalised = text.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    let simple = text.chars().all(|c| c.is_ascii_alphanumeric());
    (capitalised && simple).then_some(text)
}

/// Report every chain deeper than [`PROP_DRILLING_THRESHOLD`]
///
/// A chain that is the tail of a longer reported chain for the same prop
/// is folded into it, so one drilled prop yields one issue.
pub fn detect_prop_drilling(
    detector: &str,
    file: &str,
    inventory: &ComponentInventory,
    source: &str,
) -> Vec<Issue> {
    let tracer = PropTracer::new(inventory, source);
    let mut chains: Vec<(usize, PropChain)> = Vec::new();

    for (index, component) in inventory.components().iter().enumerate() {
        if !component.has_props {
            continue;
        }
        for prop in component_props(component, source) {
            let chain = tracer.trace(&prop, component);
            if chain.depth() > PROP_DRILLING_THRESHOLD {
                chains.push((index, chain));
            }
        }
    }

    chains
        .iter()
        .filter(|(_, chain)| !chains.iter().any(|(_, other)| chain.is_suffix_of(other)))
        .map(|(index, chain)| {
            let component = &inventory.components()[*index];
            drilling_issue(detector, file, component, chain, source)
        })
        .collect()
}

fn drilling_issue(
    detector: &str,
    file: &str,
    component: &ComponentInfo,
    chain: &PropChain,
    source: &str,
) -> Issue {
    let prop = &chain.prop;
    let depth = chain.depth();
    let description = format!(
        "Prop drilling detected: prop '{prop}' is passed through {depth} levels of components ({}). \
         This makes the code harder to maintain and understand.",
        chain.path.join(" → ")
    );
    let recommendation = format!(
        "Consider using React Context, a state management library (Redux, Zustand), or component \
         composition patterns to avoid passing '{prop}' through {depth} levels. This will make the \
         code more maintainable and reduce coupling between components."
    );
    Finding::new(
        IssueType::ConfusingLogic,
        Severity::Medium,
        IssueCategory::Components,
        EffortLevel::Medium,
    )
    .describe(description, recommendation)
    .tags(&["component", "prop-drilling", "state-management", "refactoring"])
    .at(detector, file, &component.node, source)
}
