//! What a parser wrapper must provide, and how its outcome is judged.

use core_types::{DriverSpec, TestHandling};
use resources::LoadError;
use suite::{SuiteError, Test};

use crate::policy::BoxFuture;

const SUITE_DIR: &str = "/xmlconf/";

/// Observed outcome disagrees with the expected one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResultMismatch {
    #[error("parsing should have failed but succeeded; path: {path}")]
    UnexpectedSuccess { path: String },
    #[error("parsing should have succeeded but failed; path: {path}")]
    UnexpectedFailure { path: String },
    #[error("unexpected handling value: skip")]
    SkipHandling,
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Mismatch(#[from] ResultMismatch),
    #[error(transparent)]
    Suite(#[from] SuiteError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("driver task failed: {0}")]
    Task(String),
}

/// A wrapper around one parser.
pub trait Driver: Send + Sync {
    fn spec(&self) -> &DriverSpec;

    /// Parse the fixture of `test` and check the outcome against `handling`,
    /// usually by ending with [`Driver::process_result`].
    fn run<'a>(&'a self, test: &'a Test, handling: TestHandling) -> BoxFuture<'a, Result<(), DriverError>>;

    fn process_result(
        &self,
        test: &Test,
        handling: TestHandling,
        succeeded: bool,
    ) -> Result<(), DriverError> {
        let uri = test.resolved_uri()?;
        Ok(process_result(&uri, handling, succeeded)?)
    }
}

/// Compare an observed outcome with `handling`.
pub fn process_result(
    resolved_uri: &str,
    handling: TestHandling,
    succeeded: bool,
) -> Result<(), ResultMismatch> {
    match (handling, succeeded) {
        (TestHandling::Fails, true) => Err(ResultMismatch::UnexpectedSuccess {
            path: suite_relative(resolved_uri),
        }),
        (TestHandling::Succeeds, false) => Err(ResultMismatch::UnexpectedFailure {
            path: suite_relative(resolved_uri),
        }),
        (TestHandling::Skip, _) => Err(ResultMismatch::SkipHandling),
        _ => Ok(()),
    }
}

/// Drop everything before the last `/xmlconf/` so messages do not depend on
/// where the suite lives.
fn suite_relative(path: &str) -> String {
    match path.rfind(SUITE_DIR) {
        Some(at) => format!("xmlconf/{}", &path[at + SUITE_DIR.len()..]),
        None => path.to_string(),
    }
}
