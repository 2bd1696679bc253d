//! Style sheets: the ordered rule list of a theme and the per-actor lookup.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use dashstyle_actor::{ActorId, ActorTree};
use dashstyle_common::warning::warn_once;

use crate::error::{ParseError, ParseErrorKind, ThemeError};
use crate::parser::{Constants, Declaration, ThemeParser};
use crate::selector::{ParsedSelector, Specificity, parse_selector};

/// Origin used for sources that do not come from a file.
const INLINE_ORIGIN: &str = "<inline>";

/// One selector together with the declarations it applies.
///
/// A rule written with a selector list (`A, B { ... }`) becomes one `Rule` per
/// selector, all sharing the declarations and the `source_order`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// The parsed selector.
    pub selector: ParsedSelector,
    /// Declarations in source order. Property names are unique.
    pub declarations: Vec<Declaration>,
    /// Position of the rule across every source of the style sheet.
    pub source_order: usize,
    /// Source the rule was read from.
    pub origin: String,
    /// Line the selector was written on.
    pub line: usize,
}

impl Rule {
    /// The raw value this rule declares for `property`.
    #[must_use]
    pub fn declaration(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.name == property)
            .map(|d| d.value.as_str())
    }
}

/// A raw value that won the cascade for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleValue {
    /// The value as written (constants already substituted).
    pub value: String,
    /// Specificity of the winning rule.
    pub specificity: Specificity,
    /// Source order of the winning rule.
    pub source_order: usize,
    /// `origin:line` of the winning declaration.
    pub source: String,
}

/// An immutable, ordered set of style rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    rules: Vec<Rule>,
    errors: Vec<ParseError>,
}

impl StyleSheet {
    /// Parse a single inline source.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut builder = StyleSheetBuilder::new();
        let _ = builder.add_source(INLINE_ORIGIN, source);
        builder.build()
    }

    /// Start building a style sheet from several sources.
    #[must_use]
    pub fn builder() -> StyleSheetBuilder {
        StyleSheetBuilder::new()
    }

    /// Rules in source order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Every error recorded while loading. The affected rules were skipped.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Rules whose selector matches `id`, lowest priority first.
    ///
    /// Priority is `(specificity, source_order)`: among equal specificity the
    /// later rule comes last.
    #[must_use]
    pub fn matching_rules(&self, tree: &ActorTree, id: ActorId) -> Vec<&Rule> {
        let mut matched: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|rule| rule.selector.matches(tree, id))
            .collect();
        matched.sort_by_key(|rule| (rule.selector.specificity, rule.source_order));
        matched
    }

    /// Resolve the winning raw value for every property some matching rule
    /// declares. Properties no rule mentions are absent from the map.
    #[must_use]
    pub fn matching_properties(&self, tree: &ActorTree, id: ActorId) -> HashMap<String, StyleValue> {
        let mut properties = HashMap::new();
        for rule in self.matching_rules(tree, id) {
            for decl in &rule.declarations {
                let _ = properties.insert(
                    decl.name.clone(),
                    StyleValue {
                        value: decl.value.clone(),
                        specificity: rule.selector.specificity,
                        source_order: rule.source_order,
                        source: format!("{}:{}", rule.origin, decl.line),
                    },
                );
            }
        }
        properties
    }
}

/// Accumulates theme sources into a [`StyleSheet`].
///
/// Constants defined in one source are visible to every later source.
#[derive(Debug, Default)]
pub struct StyleSheetBuilder {
    rules: Vec<Rule>,
    errors: Vec<ParseError>,
    constants: Constants,
    next_order: usize,
}

impl StyleSheetBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source` and append its rules. `origin` names it in errors.
    pub fn add_source(&mut self, origin: &str, source: &str) -> &mut Self {
        let theme = ThemeParser::new(source, origin, &mut self.constants).parse();

        for error in theme.errors {
            self.record(error);
        }

        for style_rule in theme.rules {
            let source_order = self.next_order;
            self.next_order += 1;

            for selector in style_rule.selectors {
                match parse_selector(&selector.text) {
                    Ok(parsed) => self.rules.push(Rule {
                        selector: parsed,
                        declarations: style_rule.declarations.clone(),
                        source_order,
                        origin: origin.to_string(),
                        line: selector.line,
                    }),
                    Err(error) => self.record(ParseError {
                        origin: origin.to_string(),
                        line: selector.line,
                        kind: ParseErrorKind::InvalidSelector {
                            text: selector.text,
                            error,
                        },
                    }),
                }
            }
        }

        tracing::debug!(
            origin,
            rules = self.rules.len(),
            errors = self.errors.len(),
            "loaded theme source"
        );
        self
    }

    /// Read and add a theme file.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Io`] if the file cannot be read. Syntax errors
    /// inside the file are recorded, not returned.
    pub fn add_file(&mut self, path: &Path) -> Result<&mut Self, ThemeError> {
        let source = fs::read_to_string(path).map_err(|error| ThemeError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Ok(self.add_source(&path.display().to_string(), &source))
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> StyleSheet {
        StyleSheet {
            rules: self.rules,
            errors: self.errors,
        }
    }

    fn record(&mut self, error: ParseError) {
        let _ = warn_once("Theme", &error.to_string());
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_list_shares_source_order() {
        let sheet = StyleSheet::parse("A, B { x: 1 } C { x: 2 }");
        let orders: Vec<_> = sheet.rules().iter().map(|r| r.source_order).collect();
        assert_eq!(orders, vec![0, 0, 1]);
    }

    #[test]
    fn test_bad_list_member_keeps_siblings() {
        let sheet = StyleSheet::parse("A, ..b, C { x: 1 }");
        assert_eq!(sheet.rules().len(), 2);
        assert_eq!(sheet.errors().len(), 1);
        assert!(matches!(
            sheet.errors()[0].kind,
            ParseErrorKind::InvalidSelector { .. }
        ));
    }

    #[test]
    fn test_last_declaration_wins_within_rule() {
        let sheet = StyleSheet::parse("A { color: red; color: blue }");
        let rule = &sheet.rules()[0];
        assert_eq!(rule.declarations.len(), 1);
        assert_eq!(rule.declaration("color"), Some("blue"));
    }

    #[test]
    fn test_constants_carry_across_sources() {
        let mut builder = StyleSheet::builder();
        let _ = builder
            .add_source("base.css", "@accent: #2563eb;")
            .add_source("widgets.css", "A { color: @accent }");
        let sheet = builder.build();
        assert!(sheet.errors().is_empty());
        assert_eq!(sheet.rules()[0].declaration("color"), Some("#2563eb"));
        assert_eq!(sheet.rules()[0].origin, "widgets.css");
    }
}
