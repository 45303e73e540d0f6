//! Cross-file accumulator for type declarations and type references
//!
//! One registry is filled per file and the caller merges them before the
//! cross-file query runs. Nothing here is shared between threads.

use crate::core::CodeLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeDefinitionKind {
    Interface,
    TypeAlias,
    Enum,
}

impl TypeDefinitionKind {
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "interface_declaration" => Some(TypeDefinitionKind::Interface),
            "type_alias_declaration" => Some(TypeDefinitionKind::TypeAlias),
            "enum_declaration" => Some(TypeDefinitionKind::Enum),
            _ => None,
        }
    }
}

/// Where a type reference appears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UsageContext {
    Variable,
    Parameter,
    Return,
    Property,
}

impl fmt::Display for UsageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UsageContext::Variable => "variable",
            UsageContext::Parameter => "parameter",
            UsageContext::Return => "return",
            UsageContext::Property => "property",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeDefinitionKind,
    pub file: String,
    pub location: CodeLocation,
    /// Full declaration text, used for duplicate comparison
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeUsage {
    pub type_name: String,
    pub file: String,
    pub location: CodeLocation,
    pub context: UsageContext,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeRegistry {
    definitions: Vec<TypeDefinition>,
    usages: Vec<TypeUsage>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_definition(&mut self, definition: TypeDefinition) {
        self.definitions.push(definition);
    }

    pub fn record_usage(&mut self, usage: TypeUsage) {
        self.usages.push(usage);
    }

    pub fn definitions(&self) -> &[TypeDefinition] {
        &self.definitions
    }

    pub fn usages(&self) -> &[TypeUsage] {
        &self.usages
    }

    pub fn definitions_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a TypeDefinition> {
        self.definitions.iter().filter(move |d| d.name == name)
    }

    pub fn usages_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TypeUsage> {
        self.usages.iter().filter(move |u| u.type_name == name)
    }

    /// Definitions grouped by name, groups in first-seen order
    pub fn definitions_by_name(&self) -> Vec<(&str, Vec<&TypeDefinition>)> {
        let mut groups: Vec<(&str, Vec<&TypeDefinition>)> = Vec::new();
        for definition in &self.definitions {
            match groups.iter_mut().find(|(name, _)| *name == definition.name) {
                Some((_, members)) => members.push(definition),
                None => groups.push((definition.name.as_str(), vec![definition])),
            }
        }
        groups
    }

    /// Append everything `other` recorded, keeping its order
    pub fn merge(&mut self, other: TypeRegistry) {
        self.definitions.extend(other.definitions);
        self.usages.extend(other.usages);
    }

    pub fn clear(&mut self) {
        self.definitions.clear();
        self.usages.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.usages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, file: &str) -> TypeDefinition {
        TypeDefinition {
            name: name.to_string(),
            kind: TypeDefinitionKind::Interface,
            file: file.to_string(),
            location: CodeLocation::default(),
            definition: format!("interface {name} {{}}"),
        }
    }

    #[test]
    fn test_merge_keeps_order_and_clear_empties() {
        let mut first = TypeRegistry::new();
        first.record_definition(definition("User", "a.ts"));
        let mut second = TypeRegistry::new();
        second.record_definition(definition("Order", "b.ts"));
        second.record_definition(definition("User", "b.ts"));
        second.record_usage(TypeUsage {
            type_name: "User".to_string(),
            file: "b.ts".to_string(),
            location: CodeLocation::default(),
            context: UsageContext::Parameter,
        });

        first.merge(second);
        let groups = first.definitions_by_name();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "User");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(first.definitions_named("User").count(), 2);
        assert_eq!(first.usages_of("User").count(), 1);

        first.clear();
        assert!(first.is_empty());
    }
}
