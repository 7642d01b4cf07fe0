//! Structural diff between two snapshots of the default resource file.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::types::ResourceSet;

/// Delta between the last committed and the working-copy default resource set.
///
/// Entries with `translatable = false` in either snapshot never appear in
/// `added`, `modified` or `deleted`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    /// Keys present now and absent before, with their current text.
    pub added: IndexMap<String, String>,
    /// Keys present in both snapshots whose text changed, with their current text.
    pub modified: IndexMap<String, String>,
    /// Keys present before and absent now.
    pub deleted: IndexSet<String>,
    /// Whether the relative order of keys common to both snapshots changed.
    pub order_changed: bool,
    /// Full key sequence of the current default set.
    pub current_order: Vec<String>,
}

impl Diff {
    /// Diff for a file with no previous snapshot: every translatable entry is added.
    pub fn all_added(current: &ResourceSet) -> Self {
        Diff {
            added: current
                .translatable()
                .map(|r| (r.name.clone(), r.value.clone()))
                .collect(),
            current_order: current.key_order(),
            ..Diff::default()
        }
    }

    /// Compares `previous` against `current`.
    pub fn between(previous: &ResourceSet, current: &ResourceSet) -> Self {
        let mut diff = Diff {
            current_order: current.key_order(),
            ..Diff::default()
        };

        for resource in current.translatable() {
            match previous.get(&resource.name) {
                None => {
                    diff.added
                        .insert(resource.name.clone(), resource.value.clone());
                }
                // Excluded while either snapshot marks it "do not translate".
                Some(prev) if !prev.translatable => {}
                Some(prev) if prev.value != resource.value => {
                    diff.modified
                        .insert(resource.name.clone(), resource.value.clone());
                }
                Some(_) => {}
            }
        }

        for resource in previous.translatable() {
            if !current.contains(&resource.name) {
                diff.deleted.insert(resource.name.clone());
            }
        }

        diff.order_changed = common_order_changed(previous, current);
        diff
    }

    /// Keys whose text has to be (re)translated, added first then modified.
    pub fn strings_to_translate(&self) -> IndexMap<String, String> {
        self.added
            .iter()
            .chain(self.modified.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of keys needing translation.
    pub fn total_strings(&self) -> usize {
        self.added.len() + self.modified.len()
    }

    /// True when no content changed and the order of surviving keys is intact.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.modified.is_empty()
            && self.deleted.is_empty()
            && !self.order_changed
    }
}

/// Compares the order of the keys both snapshots share.
fn common_order_changed(previous: &ResourceSet, current: &ResourceSet) -> bool {
    let previous_common: Vec<&str> = previous.keys().filter(|k| current.contains(k)).collect();
    let current_common: Vec<&str> = current.keys().filter(|k| previous.contains(k)).collect();

    previous_common.len() == current_common.len()
        && previous_common
            .iter()
            .zip(current_common.iter())
            .any(|(p, c)| p != c)
}
