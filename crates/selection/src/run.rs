//! Running a plan through a driver.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use core_types::{DriverSpec, TestHandling, TestType};
use serde::{Deserialize, Serialize};
use suite::{SerializedTest, SuiteError, Test, TestSpec};

use crate::batch::in_batches;
use crate::driver::{Driver, DriverError};
use crate::plan::PlanNode;

/// Version of the [`RunResults`] layout.
pub const RESULTS_FORMAT_VERSION: u32 = 1;

const MAX_LISTED_FAILURES: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaseStatus {
    Passed,
    Failed(String),
    Skipped,
}

#[derive(Clone, Debug)]
pub struct CaseOutcome {
    pub test: Test,
    /// Titles of the enclosing groups, outermost first.
    pub groups: Vec<String>,
    pub handling: TestHandling,
    pub status: CaseStatus,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Clone, Debug)]
pub struct RunReport {
    pub name: String,
    pub driver: DriverSpec,
    /// One per case, in document order.
    pub outcomes: Vec<CaseOutcome>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.count(|status| *status == CaseStatus::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, CaseStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| *status == CaseStatus::Skipped)
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&CaseStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&CaseOutcome, &str)> + '_ {
        self.outcomes.iter().filter_map(|outcome| match &outcome.status {
            CaseStatus::Failed(message) => Some((outcome, message.as_str())),
            _ => None,
        })
    }

    pub fn by_type(&self) -> BTreeMap<TestType, TypeCounts> {
        let mut out: BTreeMap<TestType, TypeCounts> = BTreeMap::new();
        for outcome in &self.outcomes {
            let counts = out.entry(outcome.test.test_type()).or_default();
            match outcome.status {
                CaseStatus::Passed => counts.passed += 1,
                CaseStatus::Failed(_) => counts.failed += 1,
                CaseStatus::Skipped => counts.skipped += 1,
            }
        }
        out
    }

    /// The serializable record of the run. Skipped cases are left out.
    pub async fn results(&self, timestamp: u64) -> Result<RunResults, SuiteError> {
        let mut test_results = Vec::new();
        for outcome in &self.outcomes {
            let result = match outcome.status {
                CaseStatus::Passed => true,
                CaseStatus::Failed(_) => false,
                CaseStatus::Skipped => continue,
            };
            test_results.push(TestResult {
                test: outcome.test.serialized_representation().await?,
                result,
            });
        }
        Ok(RunResults {
            name: self.name.clone(),
            timestamp,
            format_version: RESULTS_FORMAT_VERSION,
            driver: self.driver.clone(),
            test_results,
        })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} with {} ===", self.name, self.driver.name)?;
        writeln!(f, "Total:   {}", self.total())?;
        writeln!(f, "Passed:  {}", self.passed())?;
        writeln!(f, "Failed:  {}", self.failed())?;
        writeln!(f, "Skipped: {}", self.skipped())?;
        let ran = self.total() - self.skipped();
        if ran > 0 {
            let pct = self.passed() as f64 / ran as f64 * 100.0;
            writeln!(f, "Pass rate: {pct:.1}% (of non-skipped)")?;
        }

        writeln!(f, "\n--- Breakdown by test type ---")?;
        for (test_type, counts) in self.by_type() {
            writeln!(
                f,
                "  {:>8}: {} passed, {} failed, {} skipped",
                test_type.as_str(),
                counts.passed,
                counts.failed,
                counts.skipped
            )?;
        }

        let failed = self.failed();
        if failed > 0 {
            writeln!(f, "\n--- Failures (first {MAX_LISTED_FAILURES}) ---")?;
            for (outcome, message) in self.failures().take(MAX_LISTED_FAILURES) {
                writeln!(
                    f,
                    "  {} [{}] in {}: {message}",
                    outcome.test.id(),
                    outcome.test.test_type(),
                    outcome.groups.join(" > ")
                )?;
            }
            if failed > MAX_LISTED_FAILURES {
                writeln!(f, "  ... and {} more", failed - MAX_LISTED_FAILURES)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test: SerializedTest,
    pub result: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResults {
    pub name: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub format_version: u32,
    pub driver: DriverSpec,
    pub test_results: Vec<TestResult>,
}

/// Run every non-skipped case of `plan` through `driver`.
///
/// A result mismatch fails its case only. Any other driver error stops the
/// run.
pub async fn run_plan(
    plan: &PlanNode,
    driver: Arc<dyn Driver>,
    batch_size: usize,
) -> Result<RunReport, DriverError> {
    let cases = plan.cases();
    let jobs: Vec<(Test, TestHandling)> = cases
        .iter()
        .map(|case| (case.test.clone(), case.handling))
        .collect();

    let statuses = in_batches(
        jobs,
        batch_size,
        "selection.run",
        |(test, handling): (Test, TestHandling)| {
            let driver = Arc::clone(&driver);
            async move {
                if handling == TestHandling::Skip {
                    return Ok(CaseStatus::Skipped);
                }
                match driver.run(&test, handling).await {
                    Ok(()) => Ok(CaseStatus::Passed),
                    Err(DriverError::Mismatch(mismatch)) => {
                        log::warn!(target: "selection.run", "{}: {mismatch}", test.id());
                        Ok(CaseStatus::Failed(mismatch.to_string()))
                    }
                    Err(err) => Err(err),
                }
            }
        },
        |err| DriverError::Task(err.to_string()),
    )
    .await?;

    let outcomes: Vec<CaseOutcome> = cases
        .into_iter()
        .zip(statuses)
        .map(|(case, status)| CaseOutcome {
            test: case.test.clone(),
            groups: case.groups.iter().map(|g| g.to_string()).collect(),
            handling: case.handling,
            status,
        })
        .collect();

    let report = RunReport {
        name: plan.title().unwrap_or_default().to_string(),
        driver: driver.spec().clone(),
        outcomes,
    };
    log::info!(
        target: "selection.run",
        "{}: {} passed, {} failed, {} skipped",
        report.name,
        report.passed(),
        report.failed(),
        report.skipped()
    );
    Ok(report)
}
