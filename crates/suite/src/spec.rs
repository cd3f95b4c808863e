use std::future::Future;

use core_types::TestType;

use crate::error::SuiteError;

/// The read-only view of a test that selections and drivers work with.
///
/// [`crate::Test`] implements it over the suite tree, [`crate::TestStub`]
/// over a serialized record. Test code can supply its own fakes.
pub trait TestSpec: Sync {
    fn id(&self) -> &str;

    fn test_type(&self) -> TestType;

    /// XML version the test applies to. `None` means every version.
    fn version(&self) -> Option<&str>;

    fn recommendation(&self) -> &str;

    /// Editions the test applies to. `None` means every edition.
    fn editions(&self) -> Option<&[String]>;

    fn sections(&self) -> Result<&[String], SuiteError>;

    /// Production references, brackets included (`[53]`).
    fn productions(&self) -> Result<&[String], SuiteError>;

    /// External entities that must be read for the test to be meaningful.
    /// `"none"` when nothing has to be read.
    fn entities(&self) -> &str;

    fn forbids_namespaces(&self) -> bool;

    fn has_dtd(&self) -> impl Future<Output = Result<bool, SuiteError>> + Send;

    fn has_bom(&self) -> impl Future<Output = Result<bool, SuiteError>> + Send;

    /// A non-validating parser cannot report validity errors.
    fn skip_for_non_validating_parser(&self) -> bool {
        self.test_type() == TestType::Invalid
    }

    fn includes_recommendation(&self, recommendation: &str) -> bool {
        self.recommendation() == recommendation
    }

    fn includes_version(&self, version: &str) -> bool {
        self.version().is_none_or(|own| own == version)
    }

    fn includes_edition(&self, edition: &str) -> bool {
        self.editions()
            .is_none_or(|editions| editions.iter().any(|own| own == edition))
    }

    /// Whether any of `sections` is referenced by the test.
    fn includes_sections(&self, sections: &[&str]) -> Result<bool, SuiteError> {
        let own = self.sections()?;
        Ok(sections.iter().any(|wanted| own.iter().any(|s| s == wanted)))
    }

    /// Whether any of `productions` is referenced by the test.
    fn includes_productions(&self, productions: &[&str]) -> Result<bool, SuiteError> {
        let own = self.productions()?;
        Ok(productions
            .iter()
            .any(|wanted| own.iter().any(|p| p == wanted)))
    }
}
