use core_types::{DriverSpec, TestHandling, TestType};
use suite::TestSpec;

use crate::error::SelectionError;

/// What the XHTML syntax requires of browsers: XML 1.0 fifth edition with
/// Namespaces 1.0, and no validation.
#[derive(Clone, Debug)]
pub struct WhatwgSelection {
    pub(crate) driver: DriverSpec,
}

impl WhatwgSelection {
    pub fn new(driver: DriverSpec) -> Self {
        Self { driver }
    }

    pub(crate) fn handling_by_type(test_type: TestType) -> TestHandling {
        match test_type {
            TestType::NotWf => TestHandling::Fails,
            TestType::Valid => TestHandling::Succeeds,
            TestType::Invalid | TestType::Error => TestHandling::Skip,
        }
    }

    pub(crate) async fn should_skip<T: TestSpec>(test: &T) -> Result<bool, SelectionError> {
        if test.includes_recommendation("NS1.1") || !super::targets_1_0_edition_5(test) {
            return Ok(true);
        }
        // Browsers cannot turn namespace processing off.
        if test.forbids_namespaces() {
            return Ok(true);
        }
        // Byte order marks need a look at the raw bytes, which browsers do
        // not expose.
        Ok(test.has_bom().await?)
    }
}
