use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use resources::{LoadError, LoadFuture, ResourceLoader};

/// Wraps a loader and records how often each path was read.
///
/// Every load yields to the scheduler once before reading, which gives
/// concurrent callers a chance to pile up on the same fixture.
pub struct CountingLoader<L> {
    inner: L,
    total: AtomicUsize,
    per_path: Mutex<HashMap<String, usize>>,
}

impl<L: ResourceLoader> CountingLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            total: AtomicUsize::new(0),
            per_path: Mutex::new(HashMap::new()),
        }
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn loads_of(&self, path: &str) -> usize {
        self.per_path
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(path)
            .copied()
            .unwrap_or(0)
    }
}

impl<L: ResourceLoader> ResourceLoader for CountingLoader<L> {
    fn load_file<'a>(&'a self, path: &'a str) -> LoadFuture<'a> {
        Box::pin(async move {
            self.total.fetch_add(1, Ordering::SeqCst);
            *self
                .per_path
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .entry(path.to_string())
                .or_default() += 1;
            tokio::task::yield_now().await;
            self.inner.load_file(path).await
        })
    }
}

/// Fails the first `failures` loads, then delegates.
pub struct FailingLoader<L> {
    inner: L,
    remaining: AtomicUsize,
}

impl<L: ResourceLoader> FailingLoader<L> {
    pub fn new(inner: L, failures: usize) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(failures),
        }
    }

    /// A loader whose every load fails.
    pub fn always(inner: L) -> Self {
        Self::new(inner, usize::MAX)
    }
}

impl<L: ResourceLoader> ResourceLoader for FailingLoader<L> {
    fn load_file<'a>(&'a self, path: &'a str) -> LoadFuture<'a> {
        let fail = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Box::pin(async move {
                Err(LoadError::Io {
                    path: path.to_string(),
                    source: io::Error::other("injected failure"),
                })
            });
        }
        self.inner.load_file(path)
    }
}

#[cfg(test)]
mod tests {
    use resources::MemoryLoader;

    use super::*;

    #[tokio::test]
    async fn counts_each_path() {
        let loader = CountingLoader::new(MemoryLoader::from_entries([("a", "1"), ("b", "2")]));
        loader.load_file("a").await.unwrap();
        loader.load_file("a").await.unwrap();
        loader.load_file("b").await.unwrap();
        assert_eq!(loader.total(), 3);
        assert_eq!(loader.loads_of("a"), 2);
        assert_eq!(loader.loads_of("c"), 0);
    }

    #[tokio::test]
    async fn fails_then_recovers() {
        let loader = FailingLoader::new(MemoryLoader::from_entries([("a", "1")]), 1);
        assert!(loader.load_file("a").await.is_err());
        assert_eq!(loader.load_file("a").await.unwrap(), "1");
    }
}
