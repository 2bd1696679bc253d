//! Theme parsing, selector matching, cascade and invalidation for dashstyle actors.
//!
//! # Scope
//!
//! This crate implements:
//! - **Theme tokenizer and parser**
//!   - Comments, strings, selector lists
//!   - `@name: value;` constants substituted into declaration values
//!   - Error recovery: a broken declaration or rule is recorded and skipped
//!
//! - **Selectors**
//!   - Type (matched against the whole type hierarchy), universal, class, id
//!     and pseudo-class selectors
//!   - Descendant and child combinators
//!   - Specificity calculation
//!
//! - **Style sheets and the cascade**
//!   - Rules ordered by `(specificity, source order)`
//!   - Per-actor resolution of the winning raw values
//!
//! - **Value conversion** from theme strings into typed property values
//!
//! - **Invalidation**: apply the resolved style to an actor with batched
//!   change notification
//!
//! - **Themes**: `theme.json` manifests, search paths and the active style sheet
//!
//! # Example
//!
//! ```
//! use dashstyle_actor::{Actor, ActorId, ActorTree, PropertySpec, PropertyValue, Stylable};
//! use dashstyle_css::{ConverterRegistry, StyleSheet, invalidate};
//!
//! let sheet = StyleSheet::parse(".button:hover { opacity: 0.5; }");
//!
//! let mut tree = ActorTree::new();
//! let button = tree.alloc(
//!     Actor::new("XfdashboardButton")
//!         .with_classes("button")
//!         .with_property(PropertySpec::new("opacity", PropertyValue::Float(1.0))),
//! );
//! tree.append_child(ActorId::ROOT, button);
//!
//! let converters = ConverterRegistry::default();
//! let _ = invalidate(&mut tree, button, Some(&sheet), &converters);
//! assert_eq!(
//!     tree.stylable(button).and_then(|s| s.style_property("opacity")),
//!     Some(&PropertyValue::Float(1.0))
//! );
//!
//! if let Some(actor) = tree.stylable_mut(button) {
//!     actor.add_pseudo_class("hover");
//! }
//! let _ = invalidate(&mut tree, button, Some(&sheet), &converters);
//! assert_eq!(
//!     tree.stylable(button).and_then(|s| s.style_property("opacity")),
//!     Some(&PropertyValue::Float(0.5))
//! );
//! ```

/// Invalidation driver applying resolved styles to actors.
pub mod cascade;
/// Conversion of theme strings into typed property values.
pub mod convert;
/// Error types.
pub mod error;
/// Theme source parser.
pub mod parser;
/// Selector parsing and matching.
pub mod selector;
/// Style sheets and per-actor property lookup.
pub mod stylesheet;
/// Theme manifests and the active style sheet.
pub mod theme;
/// Theme source tokenizer.
pub mod tokenizer;

pub use cascade::{InvalidationReport, invalidate, invalidate_subtree};
pub use convert::{Converter, ConverterRegistry};
pub use error::{ConversionError, ParseError, ParseErrorKind, SelectorError, ThemeError};
pub use parser::{Declaration, ThemeParser};
pub use selector::{Combinator, ParsedSelector, Specificity, parse_selector};
pub use stylesheet::{Rule, StyleSheet, StyleSheetBuilder, StyleValue};
pub use theme::{Theme, ThemeManager, ThemeManifest};
pub use tokenizer::{ThemeTokenizer, Token, TokenKind};
