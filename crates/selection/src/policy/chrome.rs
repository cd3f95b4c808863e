use std::fmt;

use suite::TestSpec;

use super::Selection;
use crate::error::SelectionError;

/// Why Chrome cannot pass a test.
///
/// The first three are limits of the JavaScript runtime rather than of the
/// parser; the last two are parser bugs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlatformIssue {
    /// A lone surrogate derails V8.
    SurrogateEncoding,
    /// Malformed Unicode is passed through instead of raising an error.
    UnicodeGarbage,
    /// The original encoding is gone by the time the parser sees the text.
    XmlDeclarationEncoding,
    /// Well-formedness errors inside DOCTYPE go unreported.
    IgnoresDoctypeErrors,
    /// Names such as `a:b:c` are dropped instead of rejected.
    NamespaceNaming,
}

impl PlatformIssue {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SurrogateEncoding => "surrogate encoding",
            Self::UnicodeGarbage => "unicode garbage-in garbage-out",
            Self::XmlDeclarationEncoding => "xml declaration encoding",
            Self::IgnoresDoctypeErrors => "ignores wf errors in DOCTYPE",
            Self::NamespaceNaming => "naming error with namespaces",
        }
    }
}

impl fmt::Display for PlatformIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const PROBLEMATIC: &[(&str, PlatformIssue)] = &[
    ("not-wf-sa-168", PlatformIssue::SurrogateEncoding),
    ("not-wf-sa-169", PlatformIssue::SurrogateEncoding),
    ("not-wf-sa-170", PlatformIssue::UnicodeGarbage),
    ("ibm-not-wf-P02-ibm02n30.xml", PlatformIssue::SurrogateEncoding),
    ("ibm-not-wf-P02-ibm02n31.xml", PlatformIssue::SurrogateEncoding),
    ("ibm-not-wf-P82-ibm82n03.xml", PlatformIssue::IgnoresDoctypeErrors),
    ("rmt-e2e-27", PlatformIssue::SurrogateEncoding),
    ("rmt-e2e-61", PlatformIssue::XmlDeclarationEncoding),
    ("rmt-ns10-013", PlatformIssue::NamespaceNaming),
    ("rmt-ns10-016", PlatformIssue::NamespaceNaming),
    ("rmt-ns10-026", PlatformIssue::NamespaceNaming),
    ("x-ibm-1-0.5-not-wf-P04-ibm04n21.xml", PlatformIssue::SurrogateEncoding),
    ("x-ibm-1-0.5-not-wf-P04-ibm04n22.xml", PlatformIssue::SurrogateEncoding),
    ("x-ibm-1-0.5-not-wf-P04-ibm04n23.xml", PlatformIssue::SurrogateEncoding),
    ("x-ibm-1-0.5-not-wf-P04-ibm04n24.xml", PlatformIssue::SurrogateEncoding),
    ("x-ibm-1-0.5-not-wf-P04a-ibm04an21.xml", PlatformIssue::SurrogateEncoding),
    ("x-ibm-1-0.5-not-wf-P04a-ibm04an22.xml", PlatformIssue::SurrogateEncoding),
    ("x-ibm-1-0.5-not-wf-P04a-ibm04an23.xml", PlatformIssue::SurrogateEncoding),
    ("x-ibm-1-0.5-not-wf-P04a-ibm04an24.xml", PlatformIssue::SurrogateEncoding),
    ("hst-lhs-007", PlatformIssue::XmlDeclarationEncoding),
];

/// Overlay that skips the tests Chrome is known to fail and defers
/// everything else to the wrapped selection.
#[derive(Clone, Debug)]
pub struct ChromeSelection {
    inner: Box<Selection>,
}

impl ChromeSelection {
    pub fn new(inner: Selection) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn inner(&self) -> &Selection {
        &self.inner
    }

    pub fn problem(id: &str) -> Option<PlatformIssue> {
        PROBLEMATIC
            .iter()
            .find(|(problematic, _)| *problematic == id)
            .map(|(_, issue)| *issue)
    }

    pub(crate) async fn should_skip<T: TestSpec>(&self, test: &T) -> Result<bool, SelectionError> {
        if let Some(issue) = Self::problem(test.id()) {
            log::debug!(target: "selection", "{}: known Chrome problem: {issue}", test.id());
            return Ok(true);
        }
        self.inner.should_skip_test(test).await
    }
}
