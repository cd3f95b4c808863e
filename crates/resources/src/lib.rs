//! Loading of suite descriptions and test fixtures.
//!
//! Everything the harness reads goes through [`ResourceLoader`], so the same
//! suite model works whether fixtures live on disk, behind an HTTP server, or
//! in memory.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

mod fs;
mod http;
mod memory;

pub use crate::fs::FsLoader;
pub use crate::http::HttpLoader;
pub use crate::memory::MemoryLoader;

/// Fixtures larger than this are rejected rather than buffered.
pub const MAX_RESOURCE_BYTES: u64 = 16 * 1024 * 1024;

const READ_CHUNK: usize = 64 * 1024;

pub type LoadFuture<'a> = Pin<Box<dyn Future<Output = Result<String, LoadError>> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {message}")]
    Http { url: String, message: String },
    #[error("invalid URL {input}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("resource {path} exceeds {MAX_RESOURCE_BYTES} bytes")]
    TooLarge { path: String },
    #[error("no such resource: {0}")]
    NotFound(String),
    #[error("loader task failed: {0}")]
    Task(String),
}

/// Reads a resource as text.
///
/// Bytes that are not valid UTF-8 decode to U+FFFD rather than failing the
/// load; callers sniff byte order marks from the decoded text.
pub trait ResourceLoader: Send + Sync {
    fn load_file<'a>(&'a self, path: &'a str) -> LoadFuture<'a>;
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for Arc<L> {
    fn load_file<'a>(&'a self, path: &'a str) -> LoadFuture<'a> {
        (**self).load_file(path)
    }
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for Box<L> {
    fn load_file<'a>(&'a self, path: &'a str) -> LoadFuture<'a> {
        (**self).load_file(path)
    }
}

/// Pick a loader for a document base: `http(s)://` bases are fetched,
/// anything else is read from disk.
pub fn loader_for_base(document_base: &str) -> Result<Arc<dyn ResourceLoader>, LoadError> {
    if document_base.starts_with("http://") || document_base.starts_with("https://") {
        Ok(Arc::new(HttpLoader::new(document_base)?))
    } else {
        Ok(Arc::new(FsLoader::new()))
    }
}
