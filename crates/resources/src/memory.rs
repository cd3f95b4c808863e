use std::collections::HashMap;

use crate::{LoadError, LoadFuture, ResourceLoader};

/// Serves resources from a fixed in-memory map, keyed by path.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    files: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<P, T, I>(entries: I) -> Self
    where
        P: Into<String>,
        T: Into<String>,
        I: IntoIterator<Item = (P, T)>,
    {
        Self {
            files: entries
                .into_iter()
                .map(|(path, text)| (path.into(), text.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ResourceLoader for MemoryLoader {
    fn load_file<'a>(&'a self, path: &'a str) -> LoadFuture<'a> {
        Box::pin(async move {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| LoadError::NotFound(path.to_string()))
        })
    }
}
