//! JSON description of an actor tree.
//!
//! ```json
//! {
//!   "type": "XfdashboardView",
//!   "types": ["XfdashboardActor"],
//!   "name": "search-view",
//!   "classes": "panel",
//!   "properties": {
//!     "background-color": { "type": "color", "default": "transparent" }
//!   },
//!   "children": [
//!     {
//!       "type": "XfdashboardButton",
//!       "pseudo_classes": "hover",
//!       "properties": {
//!         "style": { "type": "enum", "default": "icon", "values": ["icon", "text", "both"] }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Defaults are written the way a theme would write them and go through the
//! same converters.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use dashstyle_actor::{Actor, ActorId, ActorTree, PropertySpec, PropertyValue, ValueType};
use dashstyle_css::ConverterRegistry;
use serde::Deserialize;

/// One actor and its children.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorNode {
    /// Most derived type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Parent types, nearest first.
    #[serde(default)]
    pub types: Vec<String>,
    /// Name matched by `#id` selectors.
    #[serde(default)]
    pub name: Option<String>,
    /// `.`-delimited classes.
    #[serde(default)]
    pub classes: String,
    /// `:`-delimited pseudo-classes.
    #[serde(default)]
    pub pseudo_classes: String,
    /// Stylable properties by name.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyNode>,
    /// Child actors in order.
    #[serde(default)]
    pub children: Vec<ActorNode>,
}

/// Declaration of one stylable property.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyNode {
    /// Native type.
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Default value in theme notation.
    pub default: String,
    /// Members, for enumerations.
    #[serde(default)]
    pub values: Vec<String>,
}

/// Read a tree file.
pub fn load(path: &Path, converters: &ConverterRegistry) -> Result<ActorTree> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let root: ActorNode = serde_json::from_str(&text)
        .with_context(|| format!("invalid actor tree {}", path.display()))?;
    build(&root, converters)
}

/// Build an [`ActorTree`] with `root` attached to the stage.
pub fn build(root: &ActorNode, converters: &ConverterRegistry) -> Result<ActorTree> {
    let mut tree = ActorTree::new();
    let stage = tree.root();
    attach(&mut tree, stage, root, converters)?;
    Ok(tree)
}

fn attach(
    tree: &mut ActorTree,
    parent: ActorId,
    node: &ActorNode,
    converters: &ConverterRegistry,
) -> Result<()> {
    let id = tree.alloc(actor(node, converters)?);
    tree.append_child(parent, id);
    for child in &node.children {
        attach(tree, id, child, converters)?;
    }
    Ok(())
}

fn actor(node: &ActorNode, converters: &ConverterRegistry) -> Result<Actor> {
    let mut actor = Actor::new(node.type_name.as_str())
        .with_parent_types(node.types.iter().cloned())
        .with_classes(&node.classes)
        .with_pseudo_classes(&node.pseudo_classes);
    if let Some(name) = &node.name {
        actor = actor.with_name(name.as_str());
    }

    for (name, property) in &node.properties {
        if property.value_type == ValueType::Enum && property.values.is_empty() {
            bail!("{}: enum property '{name}' lists no values", node.type_name);
        }
        let mut spec = PropertySpec {
            name: name.clone(),
            value_type: property.value_type,
            default: PropertyValue::String(String::new()),
            enum_values: property.values.clone(),
        };
        spec.default = converters
            .convert(&property.default, &spec)
            .with_context(|| format!("{}: bad default for '{name}'", node.type_name))?;
        actor = actor.with_property(spec);
    }

    Ok(actor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashstyle_actor::{ColorValue, Stylable};

    fn parse(json: &str) -> Result<ActorTree> {
        let root: ActorNode = serde_json::from_str(json)?;
        build(&root, &ConverterRegistry::default())
    }

    #[test]
    fn test_build_nested_tree() {
        let tree = parse(
            r#"{
                "type": "XfdashboardView",
                "name": "view",
                "classes": "panel.dark",
                "properties": { "color": { "type": "color", "default": "white" } },
                "children": [ { "type": "XfdashboardButton", "types": ["XfdashboardActor"] } ]
            }"#,
        )
        .unwrap();

        let view = tree.find_by_name("view").unwrap();
        let stylable = tree.stylable(view).unwrap();
        assert!(stylable.has_class("dark"));
        assert_eq!(
            stylable.style_property("color"),
            Some(&PropertyValue::Color(ColorValue::WHITE))
        );

        let button = tree.children(view)[0];
        assert!(tree.stylable(button).unwrap().is_type("XfdashboardActor"));
        assert_eq!(tree.stylable_parent(button), Some(view));
    }

    #[test]
    fn test_bad_default_is_reported() {
        let error = parse(
            r#"{ "type": "A", "properties": { "opacity": { "type": "float", "default": "lots" } } }"#,
        )
        .unwrap_err();
        assert_eq!(error.to_string(), "A: bad default for 'opacity'");
    }

    #[test]
    fn test_enum_needs_values() {
        assert!(
            parse(r#"{ "type": "A", "properties": { "mode": { "type": "enum", "default": "x" } } }"#)
                .is_err()
        );
    }
}
