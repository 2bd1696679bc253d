//! Theme and style warnings routed through `tracing`.
//!
//! Provides deduplication so that a broken theme rule or a widget type that
//! never declared its stylable properties does not flood the log on every
//! invalidation pass.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a style problem (emitted once per unique message).
///
/// Returns `true` if the warning was emitted, `false` if it had already been
/// reported since the last [`clear_warnings`].
///
/// # Example
/// ```
/// use dashstyle_common::warning::warn_once;
///
/// let first = warn_once("Style", "cannot convert 'bogus' for property 'color'");
/// let again = warn_once("Style", "cannot convert 'bogus' for property 'color'");
/// assert!(first);
/// assert!(!again);
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
    should_emit
}

/// Clear all recorded warnings (call when a new theme is loaded)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_components_are_not_merged() {
        assert!(warn_once("Parser", "unique message for component test"));
        assert!(warn_once("Cascade", "unique message for component test"));
        assert!(!warn_once("Parser", "unique message for component test"));
    }
}
