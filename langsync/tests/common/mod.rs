#![allow(dead_code)]

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Mutex,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use indexmap::IndexMap;
use langsync::{
    Error, FileStatus, ResourceSet, StringResource, TranslationProvider, VersionControl,
    translate::{BatchRequest, TranslationRequest},
};

/// Provider that "translates" by prefixing the target locale code.
#[derive(Default)]
pub struct ScriptedProvider {
    /// Locales whose chunk requests fail.
    pub failing_batches: HashSet<String>,
    /// Locales whose single requests fail.
    pub failing_singles: HashSet<String>,
    /// Keys left out of every chunk response.
    pub dropped_keys: HashSet<String>,
    /// Locales that echo the source text back unchanged.
    pub echo_locales: HashSet<String>,
    pub batch_sizes: Mutex<Vec<(String, usize)>>,
    pub batch_texts: Mutex<Vec<String>>,
    pub single_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_batches(mut self, locale: &str) -> Self {
        self.failing_batches.insert(locale.to_string());
        self
    }

    pub fn failing_singles(mut self, locale: &str) -> Self {
        self.failing_singles.insert(locale.to_string());
        self
    }

    pub fn dropping(mut self, key: &str) -> Self {
        self.dropped_keys.insert(key.to_string());
        self
    }

    pub fn echoing(mut self, locale: &str) -> Self {
        self.echo_locales.insert(locale.to_string());
        self
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn batch_sizes_for(&self, locale: &str) -> Vec<usize> {
        self.batch_sizes
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| l == locale)
            .map(|(_, n)| *n)
            .collect()
    }

    fn render(&self, locale: &str, text: &str) -> String {
        if self.echo_locales.contains(locale) {
            text.to_string()
        } else {
            format!("[{}] {}", locale, text)
        }
    }
}

#[async_trait]
impl TranslationProvider for ScriptedProvider {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, Error> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_singles.contains(&request.target.code) {
            return Err(Error::provider_error("scripted single failure", None));
        }
        Ok(self.render(&request.target.code, &request.text))
    }

    async fn translate_batch(
        &self,
        request: &BatchRequest,
    ) -> Result<IndexMap<String, String>, Error> {
        self.batch_sizes
            .lock()
            .unwrap()
            .push((request.target.code.clone(), request.entries.len()));
        self.batch_texts
            .lock()
            .unwrap()
            .extend(request.entries.values().cloned());
        if self.failing_batches.contains(&request.target.code) {
            return Err(Error::provider_error("scripted chunk failure", None));
        }
        Ok(request
            .entries
            .iter()
            .filter(|(k, _)| !self.dropped_keys.contains(k.as_str()))
            .map(|(k, v)| (k.clone(), self.render(&request.target.code, v)))
            .collect())
    }
}

/// In-memory repository holding a single file's status and committed content.
pub struct FakeVcs {
    pub root: PathBuf,
    pub status: FileStatus,
    pub committed: Option<String>,
}

impl FakeVcs {
    pub fn new(root: &Path, status: FileStatus, committed: Option<&str>) -> Self {
        FakeVcs {
            root: std::fs::canonicalize(root).unwrap(),
            status,
            committed: committed.map(str::to_string),
        }
    }
}

#[async_trait]
impl VersionControl for FakeVcs {
    async fn repository_root(&self) -> Result<PathBuf, Error> {
        Ok(self.root.clone())
    }

    async fn status(&self, _path: &str) -> Result<FileStatus, Error> {
        Ok(self.status)
    }

    async fn committed_content(&self, _path: &str) -> Result<Option<String>, Error> {
        Ok(self.committed.clone())
    }
}

/// Builds `<resources>` XML from (name, value) pairs.
pub fn strings_xml(entries: &[(&str, &str)]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n");
    for (name, value) in entries {
        out.push_str(&format!("    <string name=\"{}\">{}</string>\n", name, value));
    }
    out.push_str("</resources>\n");
    out
}

pub fn set_of(entries: &[(&str, &str)]) -> ResourceSet {
    entries
        .iter()
        .map(|(k, v)| StringResource::new(*k, *v))
        .collect()
}

/// Writes `content` to `<root>/app/src/main/res/values/strings.xml` and returns that path.
pub fn write_default_file(root: &Path, content: &str) -> PathBuf {
    let path = root.join("app/src/main/res/values/strings.xml");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    path
}
