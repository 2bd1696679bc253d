//! Theme selector parsing and matching.
//!
//! Supported syntax is a CSS subset:
//! - type selectors (`XfdashboardButton`) and the universal selector (`*`)
//! - `.class`, `#id` and `:pseudo-class`
//! - compound selectors (`XfdashboardButton.primary:hover`)
//! - descendant (`A B`) and child (`A > B`) combinators
//!
//! Matching goes through the [`Stylable`] capability and the tree's stylable
//! parent chain only, so any widget type can be matched.

use core::fmt;
use std::collections::HashMap;

use dashstyle_actor::{ActorId, ActorTree, MAX_ANCESTOR_DEPTH, Stylable};
use strum_macros::Display;

use crate::error::SelectorError;
use crate::tokenizer::tokenizer::{is_ident_code_point, is_ident_start_code_point};

/// A single condition on a stylable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// Matches objects of this type or of a type derived from it.
    ///
    /// Example: `XfdashboardButton`
    Type(String),

    /// Matches any type.
    ///
    /// Example: `*`
    Universal,

    /// Matches objects carrying the class.
    ///
    /// Example: `.primary`
    Class(String),

    /// Matches objects whose name is exactly this.
    ///
    /// Example: `#search-view`
    Id(String),

    /// Matches objects currently in this state.
    ///
    /// Examples: `:hover`, `:selected`, `:toggled`
    PseudoClass(String),
}

impl SimpleSelector {
    /// Check if this simple selector matches the given stylable.
    #[must_use]
    pub fn matches(&self, stylable: &dyn Stylable) -> bool {
        match self {
            Self::Type(name) => stylable.is_type(name),
            Self::Universal => true,
            Self::Class(name) => stylable.has_class(name),
            Self::Id(id) => stylable.name() == Some(id.as_str()),
            Self::PseudoClass(name) => stylable.has_pseudo_class(name),
        }
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => f.write_str(name),
            Self::Universal => f.write_str("*"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::PseudoClass(name) => write!(f, ":{name}"),
        }
    }
}

/// A sequence of simple selectors not separated by a combinator, all of
/// which must hold for the same object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// Check if every simple selector matches.
    ///
    /// An empty compound has no discriminator and never matches.
    #[must_use]
    pub fn matches(&self, stylable: &dyn Stylable) -> bool {
        !self.simple_selectors.is_empty()
            && self.simple_selectors.iter().all(|s| s.matches(stylable))
    }

    fn specificity(&self) -> Specificity {
        let mut spec = Specificity::default();
        for simple in &self.simple_selectors {
            match simple {
                SimpleSelector::Id(_) => spec.0 += 1,
                SimpleSelector::Class(_) | SimpleSelector::PseudoClass(_) => spec.1 += 1,
                SimpleSelector::Type(_) => spec.2 += 1,
                SimpleSelector::Universal => {}
            }
        }
        spec
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for simple in &self.simple_selectors {
            write!(f, "{simple}")?;
        }
        Ok(())
    }
}

/// Relationship between two compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Combinator {
    /// `A B`: B has some stylable ancestor matching A.
    #[strum(serialize = " ")]
    Descendant,

    /// `A > B`: B's stylable parent matches A.
    #[strum(serialize = ">")]
    Child,
}

/// A chain of compound selectors separated by combinators.
///
/// Example: `XfdashboardView > XfdashboardButton.primary XfdashboardLabel`
/// is parsed as:
/// ```text
/// [XfdashboardView] --(Child)--> [XfdashboardButton.primary] --(Descendant)--> [XfdashboardLabel]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector, the object being styled.
    pub subject: CompoundSelector,

    /// Chain of (combinator, `compound_selector`) pairs going left from the subject.
    ///
    /// For `A > B C`, this would be `[(Descendant, B), (Child, A)]`.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// Sum the specificity of every compound in the chain, so a selector with
    /// more ancestors outranks the same subject on its own.
    #[must_use]
    pub fn calculate_specificity(&self) -> Specificity {
        let mut spec = self.subject.specificity();
        for (_, compound) in &self.combinators {
            let compound_spec = compound.specificity();
            spec.0 += compound_spec.0;
            spec.1 += compound_spec.1;
            spec.2 += compound_spec.2;
        }
        spec
    }
}

/// Selector priority: (ids, classes and pseudo-classes, types).
///
/// Compared component by component, so one id outranks any number of classes
/// and one class outranks any number of types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (ids, classes, types) components.
    #[must_use]
    pub const fn new(ids: u32, classes: u32, types: u32) -> Self {
        Self(ids, classes, types)
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0, self.1, self.2)
    }
}

/// A parsed selector ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The complex selector (compound selectors with combinators).
    pub complex: ComplexSelector,
    /// The specificity of this selector.
    pub specificity: Specificity,
}

impl ParsedSelector {
    /// Check if this is a simple selector (no combinators).
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        self.complex.combinators.is_empty()
    }

    /// Match against the stylable at `id`.
    ///
    /// Nodes without a stylable never match. Every compound of the chain must
    /// be found within [`MAX_ANCESTOR_DEPTH`] parent links of `id`, counted
    /// from `id` itself, so a corrupted (cyclic) parent chain yields "no
    /// match" instead of looping.
    #[must_use]
    pub fn matches(&self, tree: &ActorTree, id: ActorId) -> bool {
        let Some(stylable) = tree.stylable(id) else {
            return false;
        };
        if !self.complex.subject.matches(stylable) {
            return false;
        }
        let mut failed = HashMap::new();
        self.matches_combinators(tree, id, 0, 0, &mut failed)
    }

    /// Match `combinators[index..]` walking up from `current`, which is
    /// `distance` links above the subject.
    ///
    /// Descendant combinators backtrack: if the nearest matching ancestor
    /// does not satisfy the rest of the chain, farther ones are tried.
    /// `failed` holds, per `(index, node)`, the smallest distance at which the
    /// rest of the chain was already found not to match. Starting farther up
    /// leaves less of the budget, so that cannot match either.
    fn matches_combinators(
        &self,
        tree: &ActorTree,
        current: ActorId,
        distance: usize,
        index: usize,
        failed: &mut HashMap<(usize, ActorId), usize>,
    ) -> bool {
        let Some((combinator, compound)) = self.complex.combinators.get(index) else {
            return true;
        };
        if failed
            .get(&(index, current))
            .is_some_and(|&seen| distance >= seen)
        {
            return false;
        }

        let compound_matches =
            |ancestor: ActorId| tree.stylable(ancestor).is_some_and(|s| compound.matches(s));
        let mut candidates = tree
            .ancestors(current)
            .take(MAX_ANCESTOR_DEPTH.saturating_sub(distance))
            .zip(distance + 1..)
            .filter(|&(ancestor, _)| tree.stylable(ancestor).is_some());

        let found = match combinator {
            Combinator::Descendant => candidates.any(|(ancestor, depth)| {
                compound_matches(ancestor)
                    && self.matches_combinators(tree, ancestor, depth, index + 1, failed)
            }),

            Combinator::Child => candidates.next().is_some_and(|(parent, depth)| {
                compound_matches(parent)
                    && self.matches_combinators(tree, parent, depth, index + 1, failed)
            }),
        };

        if !found {
            let _ = failed.insert((index, current), distance);
        }
        found
    }
}

impl fmt::Display for ParsedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (combinator, compound) in self.complex.combinators.iter().rev() {
            match combinator {
                Combinator::Descendant => write!(f, "{compound} ")?,
                Combinator::Child => write!(f, "{compound} > ")?,
            }
        }
        write!(f, "{}", self.complex.subject)
    }
}

/// Parse a raw selector string into a [`ParsedSelector`].
///
/// # Errors
///
/// Returns a [`SelectorError`] for an empty selector, a `.`/`#`/`:` without a
/// name, a pseudo-element, a combinator missing an operand, or any code point
/// outside the supported syntax.
pub fn parse_selector(raw: &str) -> Result<ParsedSelector, SelectorError> {
    /// Push the compound being built, if any. Returns whether one was pushed.
    fn flush_compound(
        current: &mut Vec<SimpleSelector>,
        compounds: &mut Vec<CompoundSelector>,
    ) -> bool {
        if current.is_empty() {
            return false;
        }
        compounds.push(CompoundSelector {
            simple_selectors: std::mem::take(current),
        });
        true
    }

    /// Collect an identifier; `None` if the next code point cannot start one.
    fn take_name(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> Option<String> {
        let mut name = String::new();
        if let Some(&(_, c)) = chars.peek() {
            if is_ident_start_code_point(c) || c == '-' {
                name.push(c);
                let _ = chars.next();
            }
        }
        if name.is_empty() {
            return None;
        }
        while let Some(&(_, c)) = chars.peek() {
            if !is_ident_code_point(c) {
                break;
            }
            name.push(c);
            let _ = chars.next();
        }
        Some(name)
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::Empty);
    }

    // Compounds left to right, with the combinator that follows each one
    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut combinators_between: Vec<Combinator> = Vec::new();
    let mut current: Vec<SimpleSelector> = Vec::new();
    // Set once a combinator has been seen and its right operand is still missing
    let mut pending: Option<Combinator> = None;

    let mut chars = trimmed.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            '.' | '#' => {
                let _ = chars.next();
                let name = take_name(&mut chars).ok_or(SelectorError::MissingName(c))?;
                current.push(if c == '.' {
                    SimpleSelector::Class(name)
                } else {
                    SimpleSelector::Id(name)
                });
                pending = None;
            }

            ':' => {
                let _ = chars.next();
                if chars.peek().is_some_and(|&(_, n)| n == ':') {
                    return Err(SelectorError::PseudoElement);
                }
                let name = take_name(&mut chars).ok_or(SelectorError::MissingName(':'))?;
                current.push(SimpleSelector::PseudoClass(name));
                pending = None;
            }

            '*' => {
                let _ = chars.next();
                current.push(SimpleSelector::Universal);
                pending = None;
            }

            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|&(_, n)| n.is_whitespace()) {
                    let _ = chars.next();
                }
                // Whitespace around '>' is not a descendant combinator
                if chars.peek().is_some_and(|&(_, n)| n == '>') {
                    continue;
                }
                if flush_compound(&mut current, &mut compounds) {
                    combinators_between.push(Combinator::Descendant);
                    pending = Some(Combinator::Descendant);
                }
            }

            '>' => {
                let _ = chars.next();
                if !flush_compound(&mut current, &mut compounds) {
                    return Err(SelectorError::DanglingCombinator(Combinator::Child));
                }
                combinators_between.push(Combinator::Child);
                pending = Some(Combinator::Child);
                while chars.peek().is_some_and(|&(_, n)| n.is_whitespace()) {
                    let _ = chars.next();
                }
            }

            c if is_ident_start_code_point(c) || c == '-' => {
                // A type name can only open a compound
                if !current.is_empty() {
                    return Err(SelectorError::UnexpectedChar { found: c, offset });
                }
                let name = take_name(&mut chars).ok_or(SelectorError::UnexpectedChar {
                    found: c,
                    offset,
                })?;
                current.push(SimpleSelector::Type(name));
                pending = None;
            }

            _ => return Err(SelectorError::UnexpectedChar { found: c, offset }),
        }
    }

    let _ = flush_compound(&mut current, &mut compounds);

    if let Some(combinator) = pending {
        return Err(SelectorError::DanglingCombinator(combinator));
    }
    if compounds.is_empty() {
        return Err(SelectorError::Empty);
    }
    if compounds.len() != combinators_between.len() + 1 {
        return Err(SelectorError::DanglingCombinator(Combinator::Descendant));
    }

    let Some(subject) = compounds.pop() else {
        return Err(SelectorError::Empty);
    };

    // For "A > B C": compounds [A, B], combinators [Child, Descendant]
    // become [(Descendant, B), (Child, A)] so matching walks up from C
    let combinators = compounds
        .into_iter()
        .zip(combinators_between)
        .rev()
        .map(|(compound, combinator)| (combinator, compound))
        .collect();

    let complex = ComplexSelector {
        subject,
        combinators,
    };
    let specificity = complex.calculate_specificity();

    Ok(ParsedSelector {
        complex,
        specificity,
    })
}
