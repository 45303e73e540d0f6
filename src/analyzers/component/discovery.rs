//! Component discovery
//!
//! Finds React-style components in three shapes: declared functions,
//! arrow/closure values bound to a name, and classes extending a known
//! base component.

use crate::analyzers::typescript::parser::node_text;
use crate::analyzers::typescript::syntax::{
    call_arguments, callee_text, contains_kind, descendants_of_kind, export_status, function_body,
    function_parameters, named_children, parameter_binding, ExportStatus,
};
use crate::core::TypeScriptAst;
use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

const JSX_KINDS: &[&str] = &["jsx_element", "jsx_self_closing_element", "jsx_fragment"];

static PASCAL_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap());
static HOOK_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\buse[A-Z][a-zA-Z0-9]*\(").unwrap());
static STATE_HOOK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\buseState\(").unwrap());

/// Structural shape of a component definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Function,
    Arrow,
    Class,
}

impl ComponentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Function => "function declaration",
            ComponentKind::Arrow => "arrow function",
            ComponentKind::Class => "class",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComponentInfo<'t> {
    pub name: String,
    pub kind: ComponentKind,
    /// Declaration node: function declaration, variable declarator or class
    pub node: Node<'t>,
    /// Callable holding the render logic; `None` for classes
    pub function: Option<Node<'t>>,
    pub file: String,
    pub export: ExportStatus,
    pub is_exported: bool,
    pub has_props: bool,
    pub uses_hooks: bool,
    pub uses_state: bool,
}

impl<'t> ComponentInfo<'t> {
    /// Node whose subtree holds the component's logic
    pub fn body_scope(&self) -> Node<'t> {
        self.function
            .and_then(|f| function_body(&f))
            .or_else(|| self.node.child_by_field_name("body"))
            .unwrap_or(self.node)
    }

    /// First parameter binding of a function or arrow component
    pub fn props_binding(&self) -> Option<Node<'t>> {
        let function = self.function?;
        function_parameters(&function)
            .first()
            .and_then(parameter_binding)
    }

    pub fn destructures_props(&self) -> bool {
        self.props_binding()
            .is_some_and(|binding| binding.kind() == "object_pattern")
    }
}

/// Components discovered in one file, in discovery order
#[derive(Debug, Clone, Default)]
pub struct ComponentInventory<'t> {
    components: Vec<ComponentInfo<'t>>,
}

impl<'t> ComponentInventory<'t> {
    pub fn components(&self) -> &[ComponentInfo<'t>] {
        &self.components
    }

    pub fn by_kind(&self, kind: ComponentKind) -> Vec<&ComponentInfo<'t>> {
        self.components.iter().filter(|c| c.kind == kind).collect()
    }

    pub fn exported(&self) -> Vec<&ComponentInfo<'t>> {
        self.components.iter().filter(|c| c.is_exported).collect()
    }

    pub fn using_hooks(&self) -> Vec<&ComponentInfo<'t>> {
        self.components.iter().filter(|c| c.uses_hooks).collect()
    }

    pub fn using_state(&self) -> Vec<&ComponentInfo<'t>> {
        self.components.iter().filter(|c| c.uses_state).collect()
    }

    pub fn find(&self, name: &str) -> Option<&ComponentInfo<'t>> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Run the three discovery passes over a parsed file
pub fn discover_components<'t>(ast: &'t TypeScriptAst, file: &str) -> ComponentInventory<'t> {
    let root = ast.root();
    let source = ast.source.as_str();
    let mut components = Vec::new();

    for func in descendants_of_kind(root, &["function_declaration"]) {
        let Some(name) = func
            .child_by_field_name("name")
            .map(|n| node_text(&n, source).to_string())
        else {
            continue;
        };
        if !is_component_function(&func, &name, source) {
            continue;
        }
        let export = export_status(&func, &name, &root, source);
        components.push(function_like_info(
            name,
            ComponentKind::Function,
            func,
            func,
            file,
            export,
            source,
        ));
    }

    for declarator in descendants_of_kind(root, &["variable_declarator"]) {
        let Some(name) = declarator
            .child_by_field_name("name")
            .filter(|n| n.kind() == "identifier")
            .map(|n| node_text(&n, source).to_string())
        else {
            continue;
        };
        let Some(function) = declarator
            .child_by_field_name("value")
            .and_then(|value| component_callable(value, source))
        else {
            continue;
        };
        if !is_component_function(&function, &name, source) {
            continue;
        }
        let export = export_status(&declarator, &name, &root, source);
        components.push(function_like_info(
            name,
            ComponentKind::Arrow,
            declarator,
            function,
            file,
            export,
            source,
        ));
    }

    for class in descendants_of_kind(root, &["class_declaration"]) {
        let Some(name) = class
            .child_by_field_name("name")
            .map(|n| node_text(&n, source).to_string())
        else {
            continue;
        };
        if !extends_base_component(&class, source) {
            continue;
        }
        let text = node_text(&class, source);
        let export = export_status(&class, &name, &root, source);
        components.push(ComponentInfo {
            name,
            kind: ComponentKind::Class,
            node: class,
            function: None,
            file: file.to_string(),
            export,
            is_exported: export.is_exported(),
            has_props: class_has_props(&class, source),
            uses_hooks: false,
            uses_state: text.contains("this.state") || text.contains("setState("),
        });
    }

    ComponentInventory { components }
}

fn function_like_info<'t>(
    name: String,
    kind: ComponentKind,
    node: Node<'t>,
    function: Node<'t>,
    file: &str,
    export: ExportStatus,
    source: &str,
) -> ComponentInfo<'t> {
    let text = node_text(&function, source);
    ComponentInfo {
        name,
        kind,
        node,
        function: Some(function),
        file: file.to_string(),
        export,
        is_exported: export.is_exported(),
        has_props: !function_parameters(&function).is_empty(),
        uses_hooks: HOOK_CALL.is_match(text),
        uses_state: STATE_HOOK.is_match(text),
    }
}

/// Arrow or function expression bound to a name, also through
/// `memo(...)` / `forwardRef(...)` wrappers
fn component_callable<'t>(value: Node<'t>, source: &str) -> Option<Node<'t>> {
    match value.kind() {
        "arrow_function" | "function_expression" | "function" => Some(value),
        "call_expression" => {
            let callee = callee_text(&value, source)?;
            let wrapper = callee.rsplit('.').next().unwrap_or(callee);
            if !matches!(wrapper, "memo" | "forwardRef") {
                return None;
            }
            call_arguments(&value)
                .into_iter()
                .next()
                .and_then(|arg| component_callable(arg, source))
        }
        _ => None,
    }
}

pub fn is_pascal_case(name: &str) -> bool {
    PASCAL_CASE.is_match(name)
}

/// Capitalised name plus either rendered markup or a hook call
pub fn is_component_function(function: &Node, name: &str, source: &str) -> bool {
    if !is_pascal_case(name) {
        return false;
    }
    contains_kind(function, JSX_KINDS) || HOOK_CALL.is_match(node_text(function, source))
}

fn extends_base_component(class: &Node, source: &str) -> bool {
    let Some(base) = superclass_text(class, source) else {
        return false;
    };
    base.contains("React.Component")
        || base.contains("React.PureComponent")
        || base == "Component"
        || base == "PureComponent"
}

fn superclass_text<'a>(class: &Node, source: &'a str) -> Option<&'a str> {
    let heritage = named_children(class)
        .into_iter()
        .find(|child| child.kind() == "class_heritage")?;
    let base = match named_children(&heritage).into_iter().next()? {
        clause if clause.kind() == "extends_clause" => clause
            .child_by_field_name("value")
            .or_else(|| named_children(&clause).into_iter().next())?,
        expr => expr,
    };
    Some(node_text(&base, source).trim())
}

fn class_has_props(class: &Node, source: &str) -> bool {
    let constructor_takes_props = descendants_of_kind(*class, &["method_definition"])
        .iter()
        .filter(|m| {
            m.child_by_field_name("name")
                .is_some_and(|n| node_text(&n, source) == "constructor")
        })
        .any(|m| !function_parameters(m).is_empty());
    constructor_takes_props || node_text(class, source).contains("this.props")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::typescript::parser::parse_file;
    use indoc::indoc;
    use std::path::Path;

    const SOURCE: &str = indoc! {r#"
        import React, { useState } from 'react';

        export function Header({ title }) {
          return <h1>{title}</h1>;
        }

        export const Counter = () => {
          const [count, setCount] = useState(0);
          return <button onClick={() => setCount(count + 1)}>{count}</button>;
        };

        const useToggle = () => useState(false);

        function formatDate(d) {
          return d.toISOString();
        }

        const Memoized = React.memo(function Inner(props) {
          return <span>{props.label}</span>;
        });

        class Legacy extends React.Component {
          render() {
            return <div>{this.props.name}</div>;
          }
        }

        export default Legacy;
    "#};

    #[test]
    fn test_discovers_all_three_kinds() {
        let ast = parse_file(SOURCE, Path::new("src/components/Widgets.tsx")).unwrap();
        let inventory = discover_components(&ast, "src/components/Widgets.tsx");

        let names: Vec<_> = inventory.components().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Header", "Counter", "Memoized", "Legacy"]);

        assert_eq!(inventory.by_kind(ComponentKind::Function).len(), 1);
        assert_eq!(inventory.by_kind(ComponentKind::Arrow).len(), 2);
        assert_eq!(inventory.by_kind(ComponentKind::Class).len(), 1);

        let exported: Vec<_> = inventory.exported().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(exported, vec!["Header", "Counter", "Legacy"]);
        assert_eq!(
            inventory.find("Legacy").map(|c| c.export),
            Some(ExportStatus::Default)
        );

        let stateful: Vec<_> = inventory.using_state().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(stateful, vec!["Counter"]);
        assert_eq!(inventory.using_hooks().len(), 1);
    }

    #[test]
    fn test_component_flags() {
        let ast = parse_file(SOURCE, Path::new("Widgets.tsx")).unwrap();
        let inventory = discover_components(&ast, "Widgets.tsx");

        let header = inventory.find("Header").unwrap();
        assert!(header.has_props);
        assert!(header.destructures_props());

        let counter = inventory.find("Counter").unwrap();
        assert!(!counter.has_props);
        assert!(counter.uses_hooks);

        let legacy = inventory.find("Legacy").unwrap();
        assert!(legacy.has_props);
        assert!(!legacy.uses_state);
    }

    #[test]
    fn test_pascal_case_gate() {
        assert!(is_pascal_case("Button"));
        assert!(is_pascal_case("B"));
        assert!(!is_pascal_case("button"));
        assert!(!is_pascal_case("My_Button"));
    }
}
