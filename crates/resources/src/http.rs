use std::io::Read;
use std::time::Duration;

use tools::Utf8Decoder;
use url::Url;

use crate::{LoadError, LoadFuture, MAX_RESOURCE_BYTES, READ_CHUNK, ResourceLoader};

const USER_AGENT: &str = concat!("xmlconf/", env!("CARGO_PKG_VERSION"));

/// Fetches resources over HTTP(S).
///
/// Relative paths are resolved against `root`; absolute URLs are used as
/// they are. The blocking fetch runs on tokio's blocking pool.
#[derive(Clone, Debug)]
pub struct HttpLoader {
    root: Url,
    agent: ureq::Agent,
}

impl HttpLoader {
    pub fn new(root: &str) -> Result<Self, LoadError> {
        let mut root = Url::parse(root).map_err(|source| LoadError::InvalidUrl {
            input: root.to_string(),
            source,
        })?;
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build();
        Ok(Self { root, agent })
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<Url, LoadError> {
        let invalid = |source| LoadError::InvalidUrl {
            input: path.to_string(),
            source,
        };
        match Url::parse(path) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.root.join(path).map_err(invalid),
            Err(source) => Err(invalid(source)),
        }
    }
}

fn fetch(agent: &ureq::Agent, url: &Url) -> Result<String, LoadError> {
    let http_err = |message: String| LoadError::Http {
        url: url.to_string(),
        message,
    };
    let response = match agent.get(url.as_str()).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(404, _)) => return Err(LoadError::NotFound(url.to_string())),
        Err(ureq::Error::Status(code, response)) => {
            return Err(http_err(format!("HTTP {code} {}", response.status_text())));
        }
        Err(err) => return Err(http_err(err.to_string())),
    };

    let mut reader = response.into_reader().take(MAX_RESOURCE_BYTES + 1);
    let mut decoder = Utf8Decoder::new();
    let mut buf = vec![0u8; READ_CHUNK];
    let mut total: u64 = 0;
    loop {
        let n = reader.read(&mut buf).map_err(|err| http_err(err.to_string()))?;
        if n == 0 {
            break;
        }
        total += n as u64;
        if total > MAX_RESOURCE_BYTES {
            return Err(LoadError::TooLarge {
                path: url.to_string(),
            });
        }
        decoder.push(&buf[..n]);
    }
    log::debug!(target: "resources", "fetched {total} bytes from {url}");
    Ok(decoder.finish())
}

impl ResourceLoader for HttpLoader {
    fn load_file<'a>(&'a self, path: &'a str) -> LoadFuture<'a> {
        Box::pin(async move {
            let url = self.resolve(path)?;
            let agent = self.agent.clone();
            tokio::task::spawn_blocking(move || fetch(&agent, &url))
                .await
                .map_err(|err| LoadError::Task(err.to_string()))?
        })
    }
}
