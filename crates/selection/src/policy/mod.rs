//! Policies deciding how each test is handled for a given driver.

use std::future::Future;
use std::pin::Pin;

use core_types::{DriverSpec, TestHandling, TestType};
use suite::{TestSpec, is_bad_test};

use crate::error::SelectionError;

mod base;
mod chrome;
mod sax;
mod whatwg;
mod xmllint;

pub use base::BaseSelection;
pub use chrome::{ChromeSelection, PROBLEMATIC, PlatformIssue};
pub use sax::{EXCLUDED_PRODUCTIONS, EXCLUDED_SECTIONS, SaxSelection};
pub use whatwg::WhatwgSelection;
pub use xmllint::{OTHER_EXCLUSIONS, STANDALONE_EXCLUSIONS, XmllintSelection};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Names accepted by [`Selection::by_name`].
pub const SELECTION_NAMES: [&str; 5] = ["base", "sax", "whatwg", "xmllint", "chrome"];

/// A test selection policy, bound to one driver's capabilities.
#[derive(Clone, Debug)]
pub enum Selection {
    Base(BaseSelection),
    Sax(SaxSelection),
    Whatwg(WhatwgSelection),
    Xmllint(XmllintSelection),
    Chrome(ChromeSelection),
}

impl Selection {
    pub fn base(driver: DriverSpec) -> Self {
        Self::Base(BaseSelection::new(driver))
    }

    pub fn sax(driver: DriverSpec) -> Self {
        Self::Sax(SaxSelection::new(driver))
    }

    pub fn whatwg(driver: DriverSpec) -> Self {
        Self::Whatwg(WhatwgSelection::new(driver))
    }

    pub fn xmllint(driver: DriverSpec) -> Self {
        Self::Xmllint(XmllintSelection::new(driver))
    }

    /// The Chrome overlay on top of `inner`.
    pub fn chrome(inner: Selection) -> Self {
        Self::Chrome(ChromeSelection::new(inner))
    }

    /// Build a selection by name. `chrome` overlays the WHATWG selection.
    pub fn by_name(name: &str, driver: DriverSpec) -> Result<Self, SelectionError> {
        match name {
            "base" => Ok(Self::base(driver)),
            "sax" => Ok(Self::sax(driver)),
            "whatwg" => Ok(Self::whatwg(driver)),
            "xmllint" => Ok(Self::xmllint(driver)),
            "chrome" => Ok(Self::chrome(Self::whatwg(driver))),
            other => Err(SelectionError::UnknownSelection(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Base(_) => "base",
            Self::Sax(_) => "sax",
            Self::Whatwg(_) => "whatwg",
            Self::Xmllint(_) => "xmllint",
            Self::Chrome(_) => "chrome",
        }
    }

    pub fn driver(&self) -> &DriverSpec {
        match self {
            Self::Base(s) => &s.driver,
            Self::Sax(s) => &s.driver,
            Self::Whatwg(s) => &s.driver,
            Self::Xmllint(s) => &s.driver,
            Self::Chrome(s) => s.inner().driver(),
        }
    }

    /// Handling implied by the test type alone.
    pub fn get_handling_by_type(&self, test_type: TestType) -> TestHandling {
        match self {
            Self::Base(_) => BaseSelection::handling_by_type(test_type),
            Self::Sax(_) => SaxSelection::handling_by_type(test_type),
            Self::Whatwg(_) => WhatwgSelection::handling_by_type(test_type),
            Self::Xmllint(_) => XmllintSelection::handling_by_type(test_type),
            Self::Chrome(s) => s.inner().get_handling_by_type(test_type),
        }
    }

    /// Policy-specific exclusions. May read the fixture.
    pub fn should_skip_test<'a, T: TestSpec>(
        &'a self,
        test: &'a T,
    ) -> BoxFuture<'a, Result<bool, SelectionError>> {
        Box::pin(async move {
            match self {
                Self::Base(_) => Ok(false),
                Self::Sax(s) => s.should_skip(test),
                Self::Whatwg(_) => WhatwgSelection::should_skip(test).await,
                Self::Xmllint(_) => Ok(XmllintSelection::should_skip(test)),
                Self::Chrome(s) => s.should_skip(test).await,
            }
        })
    }

    /// A driver that cannot validate must skip validity tests, and, when it
    /// also ignores external entities, well-formedness and validity tests
    /// that depend on them.
    pub fn skip_for_non_validating_parser<T: TestSpec>(&self, test: &T) -> bool {
        let driver = self.driver();
        !driver.can_validate
            && (test.skip_for_non_validating_parser()
                || (!driver.processes_external_entities
                    && matches!(test.test_type(), TestType::NotWf | TestType::Valid)
                    && test.entities() != "none"))
    }

    pub async fn get_test_handling<T: TestSpec>(
        &self,
        test: &T,
    ) -> Result<TestHandling, SelectionError> {
        let id = test.id();
        if is_bad_test(id) {
            log::debug!(target: "selection", "{id}: skipped, known bad test");
            return Ok(TestHandling::Skip);
        }
        if self.should_skip_test(test).await? {
            log::debug!(target: "selection", "{id}: skipped by the {} selection", self.name());
            return Ok(TestHandling::Skip);
        }
        if self.skip_for_non_validating_parser(test) {
            log::debug!(target: "selection", "{id}: skipped, driver cannot validate");
            return Ok(TestHandling::Skip);
        }
        Ok(self.get_handling_by_type(test.test_type()))
    }
}

/// Restricts to XML 1.0 fifth edition, the version browsers and libxml2
/// document conformance to.
pub(crate) fn targets_1_0_edition_5<T: TestSpec>(test: &T) -> bool {
    test.includes_version("1.0") && test.includes_edition("5")
}
