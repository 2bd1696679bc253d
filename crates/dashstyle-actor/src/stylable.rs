//! The stylable capability.
//!
//! Every object that takes part in style resolution implements [`Stylable`].
//! The cascade only ever talks to objects through this trait and never assumes
//! a concrete widget type.
//!
//! Mutating classes or pseudo-classes does not re-style anything by itself:
//! callers batch their changes and then invalidate once.

use core::fmt;

use dashstyle_common::warning::warn_once;

use crate::class_set::{CLASS_SEPARATOR, PSEUDO_CLASS_SEPARATOR, StyleClassSet};
use crate::value::{PropertySpec, PropertyValue};

/// An object whose properties can be set from theme rules.
pub trait Stylable: fmt::Debug {
    /// Runtime type name, matched by type selectors (e.g. `XfdashboardButton`).
    fn type_name(&self) -> &str;

    /// Whether this object is of type `type_name` or derives from it.
    ///
    /// The default only compares against [`Stylable::type_name`].
    fn is_type(&self, type_name: &str) -> bool {
        self.type_name() == type_name
    }

    /// Identifier matched by `#id` selectors.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Current style classes.
    fn classes(&self) -> &StyleClassSet;

    /// Mutable access to the style classes.
    fn classes_mut(&mut self) -> &mut StyleClassSet;

    /// Current pseudo-classes (transient states such as `hover`).
    fn pseudo_classes(&self) -> &StyleClassSet;

    /// Mutable access to the pseudo-classes.
    fn pseudo_classes_mut(&mut self) -> &mut StyleClassSet;

    /// Properties the cascade may override, each with its type and default.
    ///
    /// Types that forget to implement this are reported once and treated as
    /// having no stylable properties.
    fn stylable_properties(&self) -> &[PropertySpec] {
        let _ = warn_once(
            "Stylable",
            &format!(
                "object of type '{}' does not declare stylable properties",
                self.type_name()
            ),
        );
        &[]
    }

    /// Set one property to an already converted value.
    fn set_style_property(&mut self, name: &str, value: PropertyValue) {
        let _ = value;
        let _ = warn_once(
            "Stylable",
            &format!(
                "object of type '{}' cannot set style property '{name}'",
                self.type_name()
            ),
        );
    }

    /// Current value of a style property, if the object exposes it.
    fn style_property(&self, name: &str) -> Option<&PropertyValue> {
        let _ = name;
        None
    }

    /// Start batching property change notifications.
    fn freeze_notify(&mut self) {}

    /// Stop batching; queued property change notifications fire now.
    fn thaw_notify(&mut self) {}

    /// Called once after every invalidation pass.
    fn style_revalidated(&mut self) {}

    /// Replace all classes from a `.`-delimited list.
    fn set_classes(&mut self, list: &str) {
        *self.classes_mut() = StyleClassSet::parse(list, CLASS_SEPARATOR);
    }

    /// Classes as a `.`-delimited list.
    fn class_list(&self) -> String {
        self.classes().join(CLASS_SEPARATOR)
    }

    /// Add a class. No-op if already present.
    fn add_class(&mut self, name: &str) {
        let _ = self.classes_mut().insert(name);
    }

    /// Remove a class. No-op if absent.
    fn remove_class(&mut self, name: &str) {
        let _ = self.classes_mut().remove(name);
    }

    /// Check for a class.
    fn has_class(&self, name: &str) -> bool {
        self.classes().contains(name)
    }

    /// Replace all pseudo-classes from a `:`-delimited list.
    fn set_pseudo_classes(&mut self, list: &str) {
        *self.pseudo_classes_mut() = StyleClassSet::parse(list, PSEUDO_CLASS_SEPARATOR);
    }

    /// Pseudo-classes as a `:`-delimited list.
    fn pseudo_class_list(&self) -> String {
        self.pseudo_classes().join(PSEUDO_CLASS_SEPARATOR)
    }

    /// Add a pseudo-class. No-op if already present.
    fn add_pseudo_class(&mut self, name: &str) {
        let _ = self.pseudo_classes_mut().insert(name);
    }

    /// Remove a pseudo-class. No-op if absent.
    fn remove_pseudo_class(&mut self, name: &str) {
        let _ = self.pseudo_classes_mut().remove(name);
    }

    /// Check for a pseudo-class.
    fn has_pseudo_class(&self, name: &str) -> bool {
        self.pseudo_classes().contains(name)
    }
}
