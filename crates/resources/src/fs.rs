use tokio::io::AsyncReadExt;

use tools::Utf8Decoder;

use crate::{LoadError, LoadFuture, MAX_RESOURCE_BYTES, READ_CHUNK, ResourceLoader};

/// Reads resources from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLoader;

impl FsLoader {
    pub fn new() -> Self {
        Self
    }

    async fn read(path: &str) -> Result<String, LoadError> {
        let io_err = |source| LoadError::Io {
            path: path.to_string(),
            source,
        };
        let file = tokio::fs::File::open(path).await.map_err(io_err)?;
        let len = file.metadata().await.map_err(io_err)?.len();
        if len > MAX_RESOURCE_BYTES {
            return Err(LoadError::TooLarge {
                path: path.to_string(),
            });
        }

        let mut reader = tokio::io::BufReader::new(file);
        let mut decoder = Utf8Decoder::with_capacity(len as usize);
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            let n = reader.read(&mut buf).await.map_err(io_err)?;
            if n == 0 {
                break;
            }
            decoder.push(&buf[..n]);
        }
        log::debug!(target: "resources", "read {len} bytes from {path}");
        Ok(decoder.finish())
    }
}

impl ResourceLoader for FsLoader {
    fn load_file<'a>(&'a self, path: &'a str) -> LoadFuture<'a> {
        Box::pin(Self::read(path))
    }
}
