//! Applies one [`Diff`](crate::diff::Diff)'s effects to one locale file.
//!
//! After reconciliation the locale's key order equals the default file's
//! current order, restricted to keys the locale actually holds. Keys the
//! default file no longer has are dropped; keys it has but the locale lacks
//! are only ever introduced through translation.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};

use crate::{
    error::Error,
    traits::Parser,
    types::{ResourceSet, StringResource},
};

/// What reconciliation did to a locale file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing to apply; the file was not read.
    Skipped,
    /// Changes applied in memory produced the same content; the file was left alone.
    Unchanged,
    /// The file was rewritten with this many entries.
    Written { entries: usize },
}

/// Merges `translated` into `existing`, drops `deleted` and re-sequences the
/// result by `current_order`.
///
/// A key the locale marks `translatable="false"` keeps its locale value.
pub fn merge_translations(
    mut existing: ResourceSet,
    translated: &IndexMap<String, String>,
    deleted: &IndexSet<String>,
    current_order: &[String],
) -> ResourceSet {
    for (name, value) in translated {
        match existing.get_mut(name) {
            Some(resource) if resource.translatable => resource.value = value.clone(),
            Some(_) => {}
            None => {
                existing.insert(StringResource::new(name.clone(), value.clone()));
            }
        }
    }
    prune_and_reorder(existing, deleted, current_order)
}

/// Keeps only keys listed in `current_order` and absent from `deleted`, in
/// `current_order` sequence.
pub fn prune_and_reorder(
    existing: ResourceSet,
    deleted: &IndexSet<String>,
    current_order: &[String],
) -> ResourceSet {
    let surviving: Vec<&String> = current_order
        .iter()
        .filter(|k| !deleted.contains(k.as_str()))
        .collect();
    existing.ordered_by(&surviving)
}

/// Reconciles the locale file at `target_path`.
///
/// - With translations: merge, prune and reorder.
/// - Without translations but with deletions or `force_order_sync`: prune
///   and reorder only.
/// - Otherwise: nothing.
///
/// The file is written at most once, as a whole, and only when its content
/// changes.
pub fn reconcile(
    target_path: &Path,
    translated: &IndexMap<String, String>,
    deleted: &IndexSet<String>,
    current_order: &[String],
    force_order_sync: bool,
) -> Result<ReconcileOutcome, Error> {
    if translated.is_empty() && deleted.is_empty() && !force_order_sync {
        return Ok(ReconcileOutcome::Skipped);
    }

    let existing = ResourceSet::read_or_default(target_path)?;
    let updated = if translated.is_empty() {
        prune_and_reorder(existing.clone(), deleted, current_order)
    } else {
        merge_translations(existing.clone(), translated, deleted, current_order)
    };

    if updated == existing {
        tracing::debug!(path = %target_path.display(), "locale file already up to date");
        return Ok(ReconcileOutcome::Unchanged);
    }

    updated.write_to(target_path)?;
    tracing::debug!(
        path = %target_path.display(),
        entries = updated.len(),
        "locale file written"
    );
    Ok(ReconcileOutcome::Written {
        entries: updated.len(),
    })
}
