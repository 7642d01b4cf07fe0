//! Core types for langsync: string entries and ordered resource sets.
//! The Android reader decodes into these; the writer serializes these.

use std::{fmt::Display, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{error::Error, traits::Parser};

/// One localizable `<string>` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StringResource {
    /// Unique key within a resource file (`name` attribute).
    pub name: String,

    /// Text content; may contain positional placeholders such as `%s` or `%1$s`.
    pub value: String,

    /// `false` marks a "do not translate" entry.
    #[serde(default = "default_translatable")]
    pub translatable: bool,
}

fn default_translatable() -> bool {
    true
}

impl StringResource {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        StringResource {
            name: name.into(),
            value: value.into(),
            translatable: true,
        }
    }

    pub fn untranslatable(name: impl Into<String>, value: impl Into<String>) -> Self {
        StringResource {
            translatable: false,
            ..StringResource::new(name, value)
        }
    }
}

impl Display for StringResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StringResource {{ name: {}, value: {}, translatable: {} }}",
            self.name, self.value, self.translatable
        )
    }
}

/// An ordered collection of [`StringResource`]s keyed by name.
///
/// Insertion order is the authoring order of the file and is reproduced on
/// serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceSet {
    entries: IndexMap<String, StringResource>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a resource file, yielding an empty set when the file does not exist.
    pub fn read_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        match Self::read_from(path) {
            Ok(set) => Ok(set),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&StringResource> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut StringResource> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Inserts an entry. An existing entry with the same name is replaced in
    /// place and keeps its position; a new one is appended.
    pub fn insert(&mut self, resource: StringResource) -> Option<StringResource> {
        self.entries.insert(resource.name.clone(), resource)
    }

    /// Removes an entry, preserving the relative order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<StringResource> {
        self.entries.shift_remove(name)
    }

    /// Entry names in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn key_order(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StringResource> {
        self.entries.values()
    }

    /// Entries that take part in diffing and translation.
    pub fn translatable(&self) -> impl Iterator<Item = &StringResource> {
        self.entries.values().filter(|r| r.translatable)
    }

    /// Builds a new set containing only the names listed in `order`, in that
    /// sequence. Names in `order` that this set lacks are skipped.
    pub fn ordered_by<S: AsRef<str>>(&self, order: &[S]) -> ResourceSet {
        let mut out = ResourceSet::new();
        for name in order {
            if let Some(resource) = self.entries.get(name.as_ref()) {
                out.insert(resource.clone());
            }
        }
        out
    }
}

impl FromIterator<StringResource> for ResourceSet {
    fn from_iter<T: IntoIterator<Item = StringResource>>(iter: T) -> Self {
        let mut set = ResourceSet::new();
        for resource in iter {
            set.insert(resource);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ResourceSet {
    type Item = &'a StringResource;
    type IntoIter = indexmap::map::Values<'a, String, StringResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResourceSet {
        [
            StringResource::new("a", "1"),
            StringResource::new("b", "2"),
            StringResource::untranslatable("c", "3"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_insert_existing_keeps_position() {
        let mut set = sample();
        set.insert(StringResource::new("a", "updated"));
        assert_eq!(set.key_order(), vec!["a", "b", "c"]);
        assert_eq!(set.get("a").unwrap().value, "updated");
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut set = sample();
        set.remove("b");
        assert_eq!(set.key_order(), vec!["a", "c"]);
    }

    #[test]
    fn test_translatable_filter() {
        let set = sample();
        let names: Vec<_> = set.translatable().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_ordered_by_skips_unknown_and_drops_unlisted() {
        let set = sample();
        let reordered = set.ordered_by(&["c", "x", "a"]);
        assert_eq!(reordered.key_order(), vec!["c", "a"]);
        assert!(!reordered.contains("b"));
    }

    #[test]
    fn test_read_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let set = ResourceSet::read_or_default(dir.path().join("nope/strings.xml")).unwrap();
        assert!(set.is_empty());
    }
}
