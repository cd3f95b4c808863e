use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use resources::{LoadError, ResourceLoader};
use selection::{Driver, DriverError, Selection, SelectionError, build_plan, handling_listing, run_plan};
use suite::{QueryableProperty, Suite, SuiteError, TestSpec};
use tokio::io::AsyncReadExt;

use crate::config::{Config, ConfigError};
use crate::{BomMethod, Command, DumpAspect};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Suite(#[from] SuiteError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error(transparent)]
    UnknownDriver(#[from] drivers::UnknownDriver),
    #[error("no test with id {0}")]
    UnknownTest(String),
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

struct Session {
    loader: Arc<dyn ResourceLoader>,
    suite: Suite,
}

async fn open(config: &Config) -> Result<Session, CommandError> {
    let document_base = config.document_base()?;
    let loader = resources::loader_for_base(document_base)?;
    let suite = suite::load_tests(
        Arc::clone(&loader),
        config.suite()?,
        document_base,
        Arc::new(config.errata()),
    )
    .await?;
    Ok(Session { loader, suite })
}

pub async fn execute(command: Command, config: &Config) -> Result<ExitCode, CommandError> {
    let session = open(config).await?;
    let mut out = io::stdout().lock();
    match command {
        Command::Values { name, attribute } => {
            let stats = if attribute {
                session.suite.xml_attribute_stats(&name)
            } else {
                session.suite.property_stats(name.parse::<QueryableProperty>()?)?
            };
            for (value, count) in stats {
                let value = value.as_deref().unwrap_or("<unset>");
                write_line(&mut out, format_args!("{value}\t{count}"))?;
            }
        }
        Command::FindBom { method } => {
            for test in session.suite.tests() {
                let has_bom = match method {
                    BomMethod::GetHasBom => test.has_bom().await?,
                    BomMethod::Bytes => starts_with_bom(Path::new(&test.resolved_uri()?)).await?,
                };
                if has_bom {
                    write_line(&mut out, format_args!("{}", test.id()))?;
                }
            }
        }
        Command::Dump { id, aspect } => {
            let test = session
                .suite
                .find_test(&id)
                .ok_or_else(|| CommandError::UnknownTest(id.clone()))?;
            match aspect {
                DumpAspect::Definition => {
                    let record = test.serialized_representation().await?;
                    write_line(&mut out, format_args!("{}", serde_json::to_string_pretty(&record)?))?;
                }
                DumpAspect::File => {
                    write_line(&mut out, format_args!("{}", test.content().await?))?;
                }
            }
        }
        Command::Handling => {
            let driver = drivers::driver_by_name(&config.run.driver, Arc::clone(&session.loader))?;
            let selection = Selection::by_name(&config.run.selection, driver.spec().clone())?;
            let plan = build_plan(&session.suite, &config.run.name, Arc::new(selection), config.batch_size).await?;
            for line in handling_listing(&plan) {
                write_line(&mut out, format_args!("{line}"))?;
            }
        }
        Command::Run { results } => {
            let driver = drivers::driver_by_name(&config.run.driver, Arc::clone(&session.loader))?;
            let selection = Selection::by_name(&config.run.selection, driver.spec().clone())?;
            let plan = build_plan(&session.suite, &config.run.name, Arc::new(selection), config.batch_size).await?;
            let report = run_plan(&plan, driver, config.batch_size).await?;
            write_line(&mut out, format_args!("{report}"))?;

            if let Some(path) = results {
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|elapsed| elapsed.as_secs())
                    .unwrap_or_default();
                let json = serde_json::to_string_pretty(&report.results(timestamp).await?)?;
                std::fs::write(&path, json).map_err(|source| CommandError::Io { path, source })?;
            }
            if !report.all_passed() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn write_line(out: &mut impl Write, line: std::fmt::Arguments<'_>) -> Result<(), CommandError> {
    writeln!(out, "{line}").map_err(|source| CommandError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    })
}

/// Whether the file starts with a UTF-16 byte order mark.
async fn starts_with_bom(path: &Path) -> Result<bool, CommandError> {
    let io_error = |source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = tokio::fs::File::open(path).await.map_err(io_error)?;
    let mut head = [0u8; 2];
    let mut filled = 0;
    while filled < head.len() {
        let read = file.read(&mut head[filled..]).await.map_err(io_error)?;
        if read == 0 {
            break;
        }
        filled += read;
    }
    Ok(filled == 2 && matches!(head, [0xFF, 0xFE] | [0xFE, 0xFF]))
}
