//! Invalidation: re-resolving and re-applying an actor's style.
//!
//! The active style sheet is passed in explicitly. With no style sheet every
//! declared property is reset to its default.

use dashstyle_actor::{ActorId, ActorTree, PropertyValue};
use dashstyle_common::warning::warn_once;

use crate::convert::ConverterRegistry;
use crate::error::ConversionError;
use crate::stylesheet::StyleSheet;

/// What one invalidation did to an actor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvalidationReport {
    /// Properties set from a theme value.
    pub applied: Vec<String>,
    /// Properties reset to their default because no rule declared them.
    pub defaulted: Vec<String>,
    /// Theme values that did not convert. Those properties got their default.
    pub failures: Vec<ConversionError>,
}

impl InvalidationReport {
    /// Whether every matching theme value converted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Re-style the actor at `id`.
///
/// Every property the stylable declares is set exactly once: to the converted
/// theme value if a rule supplies one and conversion succeeds, otherwise to the
/// property's default. Change notifications are held back until all
/// properties are set, then `style_revalidated` fires once.
///
/// Nodes without a stylable are left alone and yield an empty report.
pub fn invalidate(
    tree: &mut ActorTree,
    id: ActorId,
    sheet: Option<&StyleSheet>,
    converters: &ConverterRegistry,
) -> InvalidationReport {
    let mut report = InvalidationReport::default();

    // Resolve first: matching needs the whole tree, applying needs one node
    let resolved: Vec<(String, PropertyValue)> = {
        let Some(stylable) = tree.stylable(id) else {
            return report;
        };
        let matched = sheet
            .map(|sheet| sheet.matching_properties(tree, id))
            .unwrap_or_default();

        stylable
            .stylable_properties()
            .iter()
            .map(|spec| {
                let value = match matched.get(&spec.name) {
                    Some(style) => match converters.convert(&style.value, spec) {
                        Ok(value) => {
                            report.applied.push(spec.name.clone());
                            value
                        }
                        Err(error) => {
                            let _ = warn_once(
                                "Stylable",
                                &format!("{error} (from {}), using default", style.source),
                            );
                            report.failures.push(error);
                            spec.default.clone()
                        }
                    },
                    None => {
                        report.defaulted.push(spec.name.clone());
                        spec.default.clone()
                    }
                };
                (spec.name.clone(), value)
            })
            .collect()
    };

    let Some(stylable) = tree.stylable_mut(id) else {
        return report;
    };
    stylable.freeze_notify();
    for (name, value) in resolved {
        stylable.set_style_property(&name, value);
    }
    stylable.thaw_notify();
    stylable.style_revalidated();

    tracing::debug!(
        actor = id.0,
        type_name = stylable.type_name(),
        applied = report.applied.len(),
        defaulted = report.defaulted.len(),
        failures = report.failures.len(),
        "style revalidated"
    );

    report
}

/// Re-style `id` and every stylable below it, parents before children.
pub fn invalidate_subtree(
    tree: &mut ActorTree,
    id: ActorId,
    sheet: Option<&StyleSheet>,
    converters: &ConverterRegistry,
) -> Vec<(ActorId, InvalidationReport)> {
    let stylables: Vec<ActorId> = tree
        .descendants(id)
        .into_iter()
        .filter(|&node| tree.stylable(node).is_some())
        .collect();

    stylables
        .into_iter()
        .map(|node| (node, invalidate(tree, node, sheet, converters)))
        .collect()
}
