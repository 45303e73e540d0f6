//! Style consistency across the components of one file
//!
//! Props style, export style and definition style are tallied and the
//! minority side flagged. Event handler naming is checked the same way.

use super::discovery::{ComponentInfo, ComponentInventory, ComponentKind};
use crate::analyzers::typescript::parser::node_text;
use crate::analyzers::typescript::syntax::{
    descendants_of_kind, find_declaration, named_children, ExportStatus,
};
use crate::analyzers::Finding;
use crate::core::{EffortLevel, Issue, IssueCategory, IssueType, Severity};
use tree_sitter::Node;

/// JSX attributes that take an event handler
pub const EVENT_ATTRIBUTES: &[&str] = &[
    "onClick",
    "onChange",
    "onSubmit",
    "onFocus",
    "onBlur",
    "onKeyDown",
    "onKeyUp",
    "onKeyPress",
    "onMouseEnter",
    "onMouseLeave",
    "onMouseDown",
    "onMouseUp",
    "onInput",
    "onScroll",
    "onLoad",
];

fn inconsistency(aspect: &str) -> Finding {
    Finding::new(
        IssueType::InconsistentPattern,
        Severity::Low,
        IssueCategory::Components,
        EffortLevel::Trivial,
    )
    .tags(&["component", "inconsistent-pattern", aspect, "code-style"])
}

/// Side holding the majority; ties go to `first`
fn majority<T>(first: (T, usize), second: (T, usize)) -> T {
    if first.1 >= second.1 {
        first.0
    } else {
        second.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropStyle {
    Destructuring,
    Object,
}

impl PropStyle {
    fn label(self) -> &'static str {
        match self {
            PropStyle::Destructuring => "destructuring",
            PropStyle::Object => "object props",
        }
    }
}

fn prop_style(component: &ComponentInfo) -> Option<PropStyle> {
    if component.destructures_props() {
        Some(PropStyle::Destructuring)
    } else if component.has_props {
        Some(PropStyle::Object)
    } else {
        None
    }
}

pub fn check_prop_styles(
    detector: &str,
    file: &str,
    inventory: &ComponentInventory,
    source: &str,
) -> Vec<Issue> {
    let styled: Vec<_> = inventory
        .components()
        .iter()
        .filter_map(|c| prop_style(c).map(|style| (c, style)))
        .collect();
    let destructured = styled
        .iter()
        .filter(|(_, s)| *s == PropStyle::Destructuring)
        .count();
    let object = styled.len() - destructured;
    if destructured == 0 || object == 0 {
        return Vec::new();
    }

    let preferred = majority(
        (PropStyle::Destructuring, destructured),
        (PropStyle::Object, object),
    );
    styled
        .iter()
        .filter(|(_, style)| *style != preferred)
        .map(|(component, style)| {
            let description = format!(
                "Component '{}' uses {} for props, but {destructured} components use \
                 destructuring and {object} use object props. This inconsistency makes the \
                 codebase harder to understand.",
                component.name,
                style.label()
            );
            let recommendation = format!(
                "Consider using {} pattern for props consistently across all components. This \
                 improves code readability and maintainability.",
                preferred.label()
            );
            inconsistency("props")
                .describe(description, recommendation)
                .at(detector, file, &component.node, source)
        })
        .collect()
}

pub fn check_export_styles(
    detector: &str,
    file: &str,
    inventory: &ComponentInventory,
    source: &str,
) -> Vec<Issue> {
    let exported = inventory.exported();
    let defaults = exported
        .iter()
        .filter(|c| c.export == ExportStatus::Default)
        .count();
    let named = exported.len() - defaults;
    if defaults == 0 || named == 0 {
        return Vec::new();
    }

    let preferred = majority((ExportStatus::Default, defaults), (ExportStatus::Named, named));
    let label = |status: ExportStatus| match status {
        ExportStatus::Default => "default",
        _ => "named",
    };
    exported
        .iter()
        .filter(|c| c.export != preferred)
        .map(|component| {
            let description = format!(
                "Component '{}' uses {} export, but {defaults} components use default exports \
                 and {named} use named exports. This inconsistency can confuse developers.",
                component.name,
                label(component.export)
            );
            let recommendation = format!(
                "Consider using {} exports consistently across all components. This makes \
                 imports more predictable and consistent.",
                label(preferred)
            );
            inconsistency("exports")
                .describe(description, recommendation)
                .at(detector, file, &component.node, source)
        })
        .collect()
}

pub fn check_definition_styles(
    detector: &str,
    file: &str,
    inventory: &ComponentInventory,
    source: &str,
) -> Vec<Issue> {
    let function_count = inventory.by_kind(ComponentKind::Function).len();
    let arrow_count = inventory.by_kind(ComponentKind::Arrow).len();
    if function_count == 0 || arrow_count == 0 {
        return Vec::new();
    }

    let preferred = majority(
        (ComponentKind::Function, function_count),
        (ComponentKind::Arrow, arrow_count),
    );
    let minority = match preferred {
        ComponentKind::Function => inventory.by_kind(ComponentKind::Arrow),
        _ => inventory.by_kind(ComponentKind::Function),
    };

    minority
        .into_iter()
        .map(|component| {
            let description = format!(
                "Component '{}' is defined as {}, but {function_count} components use function \
                 declarations and {arrow_count} use arrow functions. This inconsistency affects \
                 code style uniformity.",
                component.name,
                component.kind.label()
            );
            let recommendation = format!(
                "Consider using {}s consistently for all function components. This creates a \
                 more uniform codebase.",
                preferred.label()
            );
            inconsistency("definition-style")
                .describe(description, recommendation)
                .at(detector, file, &component.node, source)
        })
        .collect()
}

/// Naming convention of an event handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerPrefix {
    Handle,
    On,
    Other,
}

impl HandlerPrefix {
    pub fn of(name: &str) -> Self {
        if name.starts_with("handle") {
            HandlerPrefix::Handle
        } else if name.starts_with("on") {
            HandlerPrefix::On
        } else {
            HandlerPrefix::Other
        }
    }

    fn label(self) -> &'static str {
        match self {
            HandlerPrefix::Handle => "handle",
            HandlerPrefix::On => "on",
            HandlerPrefix::Other => "other",
        }
    }

    fn example(self) -> &'static str {
        match self {
            HandlerPrefix::Handle => "handleClick",
            HandlerPrefix::On => "onClick",
            HandlerPrefix::Other => "descriptive names",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventHandler<'t> {
    pub name: String,
    pub prefix: HandlerPrefix,
    /// Function or variable declaration of the handler
    pub definition: Node<'t>,
}

/// Handlers wired to event attributes and defined inside the component
pub fn component_handlers<'t>(
    component: &ComponentInfo<'t>,
    source: &str,
) -> Vec<EventHandler<'t>> {
    let mut handlers: Vec<EventHandler<'t>> = Vec::new();
    for attribute in descendants_of_kind(component.node, &["jsx_attribute"]) {
        let mut parts = named_children(&attribute).into_iter();
        let is_event = parts
            .next()
            .is_some_and(|name| EVENT_ATTRIBUTES.contains(&node_text(&name, source)));
        if !is_event {
            continue;
        }
        let Some(handler) = parts
            .next()
            .filter(|value| value.kind() == "jsx_expression")
            .and_then(|value| named_children(&value).into_iter().next())
            .filter(|expr| expr.kind() == "identifier")
        else {
            continue;
        };
        let name = node_text(&handler, source);
        if handlers.iter().any(|h| h.name == name) {
            continue;
        }
        if let Some(definition) = find_declaration(component.node, name, source) {
            handlers.push(EventHandler {
                name: name.to_string(),
                prefix: HandlerPrefix::of(name),
                definition,
            });
        }
    }
    handlers
}

pub fn check_event_handlers(
    detector: &str,
    file: &str,
    inventory: &ComponentInventory,
    source: &str,
) -> Vec<Issue> {
    let handlers: Vec<EventHandler> = inventory
        .components()
        .iter()
        .flat_map(|c| component_handlers(c, source))
        .collect();
    let count = |prefix: HandlerPrefix| handlers.iter().filter(|h| h.prefix == prefix).count();
    let (handle, on, other) = (
        count(HandlerPrefix::Handle),
        count(HandlerPrefix::On),
        count(HandlerPrefix::Other),
    );
    let used = [handle, on, other].iter().filter(|n| **n > 0).count();
    if used < 2 {
        return Vec::new();
    }

    let dominant = if handle > on && handle > other {
        HandlerPrefix::Handle
    } else if on > other {
        HandlerPrefix::On
    } else {
        HandlerPrefix::Other
    };

    handlers
        .iter()
        .filter(|h| h.prefix != dominant)
        .map(|handler| {
            let description = format!(
                "Event handler '{}' uses '{}' prefix, but the codebase has {handle} 'handle' \
                 handlers, {on} 'on' handlers, and {other} other patterns. This inconsistency \
                 makes the code less predictable.",
                handler.name,
                handler.prefix.label()
            );
            let recommendation = format!(
                "Consider using '{}' prefix consistently for event handlers (e.g., {}). This \
                 improves code consistency and makes event handlers easier to identify.",
                dominant.label(),
                dominant.example()
            );
            Finding::new(
                IssueType::InconsistentPattern,
                Severity::Low,
                IssueCategory::Components,
                EffortLevel::Trivial,
            )
            .describe(description, recommendation)
            .tags(&["component", "inconsistent-pattern", "event-handlers", "naming"])
            .at(detector, file, &handler.definition, source)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::component::discovery::discover_components;
    use crate::analyzers::typescript::parser::parse_file;
    use indoc::indoc;
    use std::path::Path;

    const DETECTOR: &str = "ComponentPatternAnalyzer";

    #[test]
    fn test_prop_style_minority_flagged() {
        let source = indoc! {r#"
            function A({ x }) { return <p>{x}</p>; }
            function B({ y }) { return <p>{y}</p>; }
            function C(props) { return <p>{props.z}</p>; }
        "#};
        let ast = parse_file(source, Path::new("Abc.jsx")).unwrap();
        let inventory = discover_components(&ast, "Abc.jsx");
        let issues = check_prop_styles(DETECTOR, "Abc.jsx", &inventory, &ast.source);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].description.starts_with("Component 'C' uses object props"));
        assert!(issues[0].recommendation.contains("destructuring pattern"));
        assert!(issues[0].has_tag("props"));
    }

    #[test]
    fn test_export_style_tie_prefers_default() {
        let source = indoc! {r#"
            export function A() { return <p />; }
            function B() { return <p />; }
            export default B;
        "#};
        let ast = parse_file(source, Path::new("Ab.jsx")).unwrap();
        let inventory = discover_components(&ast, "Ab.jsx");
        let issues = check_export_styles(DETECTOR, "Ab.jsx", &inventory, &ast.source);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].description.starts_with("Component 'A' uses named export"));
    }

    #[test]
    fn test_definition_style() {
        let source = indoc! {r#"
            const A = () => <p />;
            const B = () => <p />;
            function C() { return <p />; }
        "#};
        let ast = parse_file(source, Path::new("Defs.jsx")).unwrap();
        let inventory = discover_components(&ast, "Defs.jsx");
        let issues = check_definition_styles(DETECTOR, "Defs.jsx", &inventory, &ast.source);
        assert_eq!(issues.len(), 1);
        assert!(issues[0]
            .description
            .contains("'C' is defined as function declaration"));
        assert!(issues[0].recommendation.contains("arrow functions consistently"));
    }

    #[test]
    fn test_event_handler_naming() {
        let source = indoc! {r#"
            function Form() {
              const handleSubmit = () => {};
              const handleReset = () => {};
              function onToggle() {}
              return (
                <form onSubmit={handleSubmit}>
                  <button onClick={handleReset}>reset</button>
                  <button onClick={handleReset}>again</button>
                  <input onChange={onToggle} />
                  <input onBlur={undefinedHandler} />
                </form>
              );
            }
        "#};
        let ast = parse_file(source, Path::new("Form.jsx")).unwrap();
        let inventory = discover_components(&ast, "Form.jsx");
        let handlers = component_handlers(&inventory.components()[0], &ast.source);
        let names: Vec<_> = handlers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["handleSubmit", "handleReset", "onToggle"]);

        let issues = check_event_handlers(DETECTOR, "Form.jsx", &inventory, &ast.source);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].description.contains("'onToggle' uses 'on' prefix"));
        assert!(issues[0].recommendation.contains("'handle' prefix"));
        assert_eq!(issues[0].location.start_line, 4);
    }
}
