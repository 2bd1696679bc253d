//! Small ordered sets of style class and pseudo-class names.
//!
//! Themes address classes as `.name` and pseudo-classes as `:name`; the string
//! form of a set joins its members with the same character.

use core::fmt;

/// Separator used by the string form of a class list (`primary.large`).
pub const CLASS_SEPARATOR: char = '.';

/// Separator used by the string form of a pseudo-class list (`hover:selected`).
pub const PSEUDO_CLASS_SEPARATOR: char = ':';

/// A set of short identifiers where membership matters and order does not.
///
/// Sets stay tiny in practice, so a `Vec` with linear lookup beats hashing.
/// Insertion order is kept only so the string form is stable.
#[derive(Debug, Clone, Default)]
pub struct StyleClassSet {
    names: Vec<String>,
}

impl StyleClassSet {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Build a set from a `separator`-delimited list.
    ///
    /// Surrounding whitespace and empty segments are ignored, duplicates
    /// collapse. An empty string yields an empty set.
    #[must_use]
    pub fn parse(list: &str, separator: char) -> Self {
        let mut set = Self::new();
        for name in list.split(separator) {
            let _ = set.insert(name);
        }
        set
    }

    /// Add `name`. Returns `false` if it was already present or is not a
    /// valid member name (see [`StyleClassSet::is_valid_name`]).
    pub fn insert(&mut self, name: &str) -> bool {
        let Some(name) = normalize(name) else {
            return false;
        };
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Remove `name`. Returns `false` if it was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };
        let _ = self.names.remove(index);
        true
    }

    /// Check membership. `name` is trimmed the same way [`insert`] trims it.
    ///
    /// [`insert`]: StyleClassSet::insert
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Whether `name` can be a member once trimmed.
    ///
    /// Names must be non-empty and may not contain whitespace or either list
    /// separator, so that the string form parses back to the same set.
    #[must_use]
    pub fn is_valid_name(name: &str) -> bool {
        normalize(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = normalize(name)?;
        self.names.iter().position(|n| n == name)
    }

    /// Iterate over member names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Remove all members.
    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// String form with members joined by `separator`.
    #[must_use]
    pub fn join(&self, separator: char) -> String {
        let mut out = String::new();
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            out.push_str(name);
        }
        out
    }
}

/// Trimmed `name`, or `None` if it cannot be a member.
fn normalize(name: &str) -> Option<&str> {
    let name = name.trim();
    let valid = !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c == CLASS_SEPARATOR || c == PSEUDO_CLASS_SEPARATOR);
    valid.then_some(name)
}

impl PartialEq for StyleClassSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|name| other.contains(name))
    }
}

impl Eq for StyleClassSet {}

impl fmt::Display for StyleClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(CLASS_SEPARATOR))
    }
}

impl<'a> FromIterator<&'a str> for StyleClassSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut set = Self::new();
        for name in iter {
            let _ = set.insert(name);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_empty_segments() {
        let set = StyleClassSet::parse(".primary..large.", CLASS_SEPARATOR);
        assert_eq!(set.len(), 2);
        assert!(set.contains("primary"));
        assert!(set.contains("large"));
        assert!(StyleClassSet::parse("", CLASS_SEPARATOR).is_empty());
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = StyleClassSet::parse("hover:selected", PSEUDO_CLASS_SEPARATOR);
        let b = StyleClassSet::parse("selected:hover", PSEUDO_CLASS_SEPARATOR);
        assert_eq!(a, b);
        assert_eq!(a.join(PSEUDO_CLASS_SEPARATOR), "hover:selected");
    }

    #[test]
    fn test_insert_and_remove_are_idempotent() {
        let mut set = StyleClassSet::new();
        assert!(set.insert("active"));
        assert!(!set.insert("active"));
        assert_eq!(set.len(), 1);
        assert!(set.remove("active"));
        assert!(!set.remove("active"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_lookup_trims_like_insert() {
        let mut set = StyleClassSet::new();
        assert!(set.insert(" x "));
        assert!(set.contains(" x"));
        assert!(set.contains("x"));
        assert!(!set.insert("x"));
        assert!(set.remove("x "));
        assert!(set.is_empty());
    }

    #[test]
    fn test_names_with_separators_are_rejected() {
        let mut set = StyleClassSet::new();
        for name in ["a.b", "hover:focus", "two words", "", "  "] {
            assert!(!StyleClassSet::is_valid_name(name), "{name:?}");
            assert!(!set.insert(name), "{name:?}");
            assert!(!set.contains(name), "{name:?}");
        }
        assert!(set.is_empty());
    }
}
