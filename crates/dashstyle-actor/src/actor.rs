//! A generic stylable actor.
//!
//! [`Actor`] stands in for the shell's widgets: it knows its type hierarchy,
//! stores one value per declared property and reports property changes to
//! connected handlers, batching them while notifications are frozen.

use core::fmt;
use std::collections::HashMap;

use dashstyle_common::warning::warn_once;

use crate::class_set::{CLASS_SEPARATOR, PSEUDO_CLASS_SEPARATOR, StyleClassSet};
use crate::stylable::Stylable;
use crate::value::{PropertySpec, PropertyValue};

type NotifyHandler = Box<dyn FnMut(&str, &PropertyValue)>;
type RevalidatedHandler = Box<dyn FnMut()>;

/// A stylable object with declared properties and change notification.
pub struct Actor {
    /// Most derived type first, e.g. `[XfdashboardButton, XfdashboardLabel, XfdashboardActor]`.
    type_hierarchy: Vec<String>,
    name: Option<String>,
    classes: StyleClassSet,
    pseudo_classes: StyleClassSet,
    properties: Vec<PropertySpec>,
    values: HashMap<String, PropertyValue>,
    freeze_count: u32,
    pending: Vec<String>,
    notify_handlers: Vec<NotifyHandler>,
    revalidated_handlers: Vec<RevalidatedHandler>,
}

impl Actor {
    /// Create an actor of the given type with no classes and no properties.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_hierarchy: vec![type_name.into()],
            name: None,
            classes: StyleClassSet::new(),
            pseudo_classes: StyleClassSet::new(),
            properties: Vec::new(),
            values: HashMap::new(),
            freeze_count: 0,
            pending: Vec::new(),
            notify_handlers: Vec::new(),
            revalidated_handlers: Vec::new(),
        }
    }

    /// Append parent types, nearest first.
    #[must_use]
    pub fn with_parent_types<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_hierarchy.extend(parents.into_iter().map(Into::into));
        self
    }

    /// Set the name used by `#id` selectors.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the initial classes from a `.`-delimited list.
    #[must_use]
    pub fn with_classes(mut self, list: &str) -> Self {
        self.classes = StyleClassSet::parse(list, CLASS_SEPARATOR);
        self
    }

    /// Set the initial pseudo-classes from a `:`-delimited list.
    #[must_use]
    pub fn with_pseudo_classes(mut self, list: &str) -> Self {
        self.pseudo_classes = StyleClassSet::parse(list, PSEUDO_CLASS_SEPARATOR);
        self
    }

    /// Declare a stylable property. Its value starts at the declared default.
    ///
    /// Declaring the same name twice replaces the earlier declaration.
    #[must_use]
    pub fn with_property(mut self, spec: PropertySpec) -> Self {
        let _ = self
            .values
            .insert(spec.name.clone(), spec.default.clone());
        self.properties.retain(|p| p.name != spec.name);
        self.properties.push(spec);
        self
    }

    /// Type hierarchy, most derived first.
    #[must_use]
    pub fn type_hierarchy(&self) -> &[String] {
        &self.type_hierarchy
    }

    /// Register a handler called with `(property, new value)` on every change.
    pub fn connect_notify(&mut self, handler: impl FnMut(&str, &PropertyValue) + 'static) {
        self.notify_handlers.push(Box::new(handler));
    }

    /// Register a handler called after every invalidation pass.
    pub fn connect_style_revalidated(&mut self, handler: impl FnMut() + 'static) {
        self.revalidated_handlers.push(Box::new(handler));
    }

    /// Whether change notifications are currently batched.
    #[must_use]
    pub const fn is_notify_frozen(&self) -> bool {
        self.freeze_count > 0
    }

    fn emit_notify(&mut self, name: &str) {
        if let Some(value) = self.values.get(name) {
            for handler in &mut self.notify_handlers {
                handler(name, value);
            }
        }
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("type_hierarchy", &self.type_hierarchy)
            .field("name", &self.name)
            .field("classes", &self.classes)
            .field("pseudo_classes", &self.pseudo_classes)
            .field("values", &self.values)
            .field("freeze_count", &self.freeze_count)
            .finish_non_exhaustive()
    }
}

impl Stylable for Actor {
    fn type_name(&self) -> &str {
        self.type_hierarchy.first().map_or("", String::as_str)
    }

    fn is_type(&self, type_name: &str) -> bool {
        self.type_hierarchy.iter().any(|t| t == type_name)
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn classes(&self) -> &StyleClassSet {
        &self.classes
    }

    fn classes_mut(&mut self) -> &mut StyleClassSet {
        &mut self.classes
    }

    fn pseudo_classes(&self) -> &StyleClassSet {
        &self.pseudo_classes
    }

    fn pseudo_classes_mut(&mut self) -> &mut StyleClassSet {
        &mut self.pseudo_classes
    }

    fn stylable_properties(&self) -> &[PropertySpec] {
        &self.properties
    }

    fn set_style_property(&mut self, name: &str, value: PropertyValue) {
        if !self.properties.iter().any(|p| p.name == name) {
            let _ = warn_once(
                "Actor",
                &format!(
                    "'{}' has no stylable property '{name}'",
                    self.type_name()
                ),
            );
            return;
        }

        if self.values.get(name) == Some(&value) {
            return;
        }
        let _ = self.values.insert(name.to_string(), value);

        if self.is_notify_frozen() {
            if !self.pending.iter().any(|p| p == name) {
                self.pending.push(name.to_string());
            }
        } else {
            self.emit_notify(name);
        }
    }

    fn style_property(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    fn freeze_notify(&mut self) {
        self.freeze_count += 1;
    }

    fn thaw_notify(&mut self) {
        self.freeze_count = self.freeze_count.saturating_sub(1);
        if self.freeze_count > 0 {
            return;
        }
        for name in std::mem::take(&mut self.pending) {
            self.emit_notify(&name);
        }
    }

    fn style_revalidated(&mut self) {
        for handler in &mut self.revalidated_handlers {
            handler();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn label() -> Actor {
        Actor::new("XfdashboardLabel")
            .with_parent_types(["XfdashboardBackground", "XfdashboardActor"])
            .with_property(PropertySpec::new("font", PropertyValue::String("Sans 10".into())))
            .with_property(PropertySpec::new("opacity", PropertyValue::Float(1.0)))
    }

    #[test]
    fn test_type_hierarchy_matching() {
        let actor = label();
        assert_eq!(actor.type_name(), "XfdashboardLabel");
        assert!(actor.is_type("XfdashboardActor"));
        assert!(!actor.is_type("XfdashboardButton"));
    }

    #[test]
    fn test_values_start_at_defaults() {
        let actor = label();
        assert_eq!(
            actor.style_property("opacity"),
            Some(&PropertyValue::Float(1.0))
        );
    }

    #[test]
    fn test_frozen_notifications_fire_once_on_thaw() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut actor = label();
        let sink = Rc::clone(&seen);
        actor.connect_notify(move |name, _| sink.borrow_mut().push(name.to_string()));

        actor.freeze_notify();
        actor.set_style_property("opacity", PropertyValue::Float(0.5));
        actor.set_style_property("opacity", PropertyValue::Float(0.25));
        actor.set_style_property("font", PropertyValue::String("Sans 12".into()));
        assert!(seen.borrow().is_empty());

        actor.thaw_notify();
        assert_eq!(*seen.borrow(), vec!["opacity".to_string(), "font".to_string()]);
        assert_eq!(
            actor.style_property("opacity"),
            Some(&PropertyValue::Float(0.25))
        );
    }

    #[test]
    fn test_unchanged_value_does_not_notify() {
        let count = Rc::new(RefCell::new(0));
        let mut actor = label();
        let sink = Rc::clone(&count);
        actor.connect_notify(move |_, _| *sink.borrow_mut() += 1);

        actor.set_style_property("opacity", PropertyValue::Float(1.0));
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_unknown_property_is_ignored() {
        let mut actor = label();
        actor.set_style_property("no-such-property", PropertyValue::Bool(true));
        assert_eq!(actor.style_property("no-such-property"), None);
    }
}
