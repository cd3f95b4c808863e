use core_types::{DriverSpec, TestHandling};
use selection::{BoxFuture, Driver, DriverError};
use suite::Test;

/// Always reports the expected outcome. Used to check the harness itself.
#[derive(Clone, Debug)]
pub struct PerfectDriver {
    spec: DriverSpec,
}

impl PerfectDriver {
    pub const NAME: &'static str = "perfect";

    pub fn new() -> Self {
        Self {
            spec: DriverSpec::new(Self::NAME, true, true),
        }
    }
}

impl Default for PerfectDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for PerfectDriver {
    fn spec(&self) -> &DriverSpec {
        &self.spec
    }

    fn run<'a>(&'a self, test: &'a Test, handling: TestHandling) -> BoxFuture<'a, Result<(), DriverError>> {
        Box::pin(async move { self.process_result(test, handling, handling == TestHandling::Succeeds) })
    }
}
