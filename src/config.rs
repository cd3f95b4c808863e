use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;
use suite::Errata;

pub const DEFAULT_CONFIG_FILE: &str = "xmlconf.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0} is not set; give it in the configuration file or on the command line")]
    Missing(&'static str),
    #[error("invalid log level: {0}")]
    LogLevel(String),
}

/// Contents of `xmlconf.toml`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// The flattened suite description.
    pub suite: Option<String>,
    /// What fixture URIs are resolved against: a directory or an
    /// `http(s)` URL.
    pub document_base: Option<String>,
    pub batch_size: usize,
    pub log_level: String,
    pub run: RunConfig,
    /// Extra attribute corrections: `[errata."<test id>"] ATTR = "value"`.
    pub errata: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RunConfig {
    pub driver: String,
    pub selection: String,
    /// Title of the run.
    pub name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suite: None,
            document_base: None,
            batch_size: selection::DEFAULT_BATCH_SIZE,
            log_level: "warn".to_string(),
            run: RunConfig::default(),
            errata: BTreeMap::new(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            driver: drivers::PerfectDriver::NAME.to_string(),
            selection: "base".to_string(),
            name: "xmlconf".to_string(),
        }
    }
}

/// Values given on the command line, which win over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub suite: Option<String>,
    pub document_base: Option<String>,
    pub batch_size: Option<usize>,
    pub driver: Option<String>,
    pub selection: Option<String>,
}

impl Config {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path`, or [`DEFAULT_CONFIG_FILE`] when none is given. Only an
    /// explicitly named file has to exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, path),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                log::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(suite) = overrides.suite {
            self.suite = Some(suite);
        }
        if let Some(document_base) = overrides.document_base {
            self.document_base = Some(document_base);
        }
        if let Some(batch_size) = overrides.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(driver) = overrides.driver {
            self.run.driver = driver;
        }
        if let Some(selection) = overrides.selection {
            self.run.selection = selection;
        }
    }

    pub fn suite(&self) -> Result<&str, ConfigError> {
        self.suite.as_deref().ok_or(ConfigError::Missing("suite"))
    }

    pub fn document_base(&self) -> Result<&str, ConfigError> {
        self.document_base
            .as_deref()
            .ok_or(ConfigError::Missing("document_base"))
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level).map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    /// The built-in errata with the configured corrections on top.
    pub fn errata(&self) -> Errata {
        let mut errata = Errata::builtin();
        errata.merge(
            self.errata
                .iter()
                .flat_map(|(id, attributes)| {
                    attributes
                        .iter()
                        .map(move |(name, value)| (id.clone(), name.clone(), value.clone()))
                })
                .collect(),
        );
        errata
    }
}
