use std::path::PathBuf;
use std::process::Stdio;

use core_types::{DriverSpec, TestHandling, TestType};
use selection::{BoxFuture, Driver, DriverError};
use suite::{Test, TestSpec};
use tokio::process::Command;

/// Runs libxml2's `xmllint` on the fixture file. The suite must live on the
/// local filesystem.
#[derive(Clone, Debug)]
pub struct XmllintDriver {
    spec: DriverSpec,
    program: PathBuf,
}

impl XmllintDriver {
    pub const NAME: &'static str = "xmllint";

    pub fn new() -> Self {
        Self::with_program(Self::NAME)
    }

    /// Use another executable taking the same arguments.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            spec: DriverSpec::new(Self::NAME, true, true),
            program: program.into(),
        }
    }

    async fn exit_code(&self, path: &str, validate: bool) -> Result<Option<i32>, DriverError> {
        let mut command = Command::new(&self.program);
        // --noent is left out: it substitutes entities before validation.
        command.arg("--noout");
        if validate {
            command.arg("--valid");
        }
        command
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let status = command.status().await.map_err(|source| DriverError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;
        Ok(status.code())
    }
}

impl Default for XmllintDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for XmllintDriver {
    fn spec(&self) -> &DriverSpec {
        &self.spec
    }

    fn run<'a>(&'a self, test: &'a Test, handling: TestHandling) -> BoxFuture<'a, Result<(), DriverError>> {
        Box::pin(async move {
            let path = test.resolved_uri()?;
            // Validating without a DTD is an error of its own.
            let validate = test.test_type() != TestType::NotWf || test.has_dtd().await?;
            let code = self.exit_code(&path, validate).await?;
            log::debug!(target: "drivers", "{}: xmllint exited with {code:?}", test.id());
            self.process_result(test, handling, code == Some(0))
        })
    }
}
