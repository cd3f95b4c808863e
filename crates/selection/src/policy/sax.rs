use core_types::{DriverSpec, TestHandling, TestType};
use suite::TestSpec;

use crate::error::SelectionError;

/// Entities, external parsed entities and notations.
pub const EXCLUDED_SECTIONS: &[&str] = &[
    "4.2", "4.2.1", "4.2.2", "4.3", "4.3.1", "4.3.2", "4.3.3", "4.7",
];

/// Productions of the DTD grammar.
pub const EXCLUDED_PRODUCTIONS: &[&str] = &["[28]", "[29]", "[30]", "[31]"];

/// For streaming parsers that neither validate nor read DTDs.
#[derive(Clone, Debug)]
pub struct SaxSelection {
    pub(crate) driver: DriverSpec,
    excluded_sections: Vec<String>,
    excluded_productions: Vec<String>,
}

impl SaxSelection {
    pub fn new(driver: DriverSpec) -> Self {
        Self::with_exclusions(driver, EXCLUDED_SECTIONS, EXCLUDED_PRODUCTIONS)
    }

    pub fn with_exclusions(driver: DriverSpec, sections: &[&str], productions: &[&str]) -> Self {
        Self {
            driver,
            excluded_sections: sections.iter().map(|s| s.to_string()).collect(),
            excluded_productions: productions.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub(crate) fn handling_by_type(test_type: TestType) -> TestHandling {
        match test_type {
            TestType::NotWf => TestHandling::Fails,
            TestType::Valid => TestHandling::Succeeds,
            TestType::Invalid | TestType::Error => TestHandling::Skip,
        }
    }

    pub(crate) fn should_skip<T: TestSpec>(&self, test: &T) -> Result<bool, SelectionError> {
        if super::targets_1_0_edition_5(test) {
            return Ok(true);
        }
        let sections: Vec<&str> = self.excluded_sections.iter().map(String::as_str).collect();
        let productions: Vec<&str> = self.excluded_productions.iter().map(String::as_str).collect();
        Ok(test.includes_sections(&sections)? || test.includes_productions(&productions)?)
    }
}
