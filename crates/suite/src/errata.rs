//! Known problems in the W3C suite description.
//!
//! Two kinds of data live here: attribute corrections applied to a test
//! before any of its properties are derived, and the tests that no parser can
//! be fairly judged against.

use std::collections::{BTreeMap, HashMap};

use crate::element::Attributes;

/// Tests the suite authors acknowledge as wrong. Every selection skips them.
pub const BAD_TESTS: &[&str] = &[
    "ibm-not-wf-P21-ibm21n02.xml",
    "rmt-e2e-15g",
    "rmt-e2e-15h",
];

pub fn is_bad_test(id: &str) -> bool {
    BAD_TESTS.contains(&id)
}

/// Corrections compiled into the harness, as `(test id, attribute, value)`.
const BUILTIN_CORRECTIONS: &[(&str, &str, &str)] = &[];

/// Attribute corrections keyed by test id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Errata {
    corrections: HashMap<String, BTreeMap<String, String>>,
}

impl Errata {
    /// An errata table without any correction.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The corrections shipped with the harness.
    pub fn builtin() -> Self {
        let mut errata = Self::empty();
        for (id, attribute, value) in BUILTIN_CORRECTIONS {
            errata.correct(*id, *attribute, *value);
        }
        errata
    }

    /// Record a correction, replacing any earlier one for the same attribute.
    pub fn correct(
        &mut self,
        id: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.corrections
            .entry(id.into())
            .or_default()
            .insert(attribute.into(), value.into());
        self
    }

    /// Layer another table on top of this one. Corrections in `other` win.
    pub fn merge(&mut self, other: Errata) {
        for (id, attributes) in other.corrections {
            self.corrections.entry(id).or_default().extend(attributes);
        }
    }

    pub fn corrections_for(&self, id: &str) -> Option<&BTreeMap<String, String>> {
        self.corrections.get(id)
    }

    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }

    /// Patch `attributes` for test `id`. Returns whether anything changed.
    pub(crate) fn apply(&self, id: &str, attributes: &mut Attributes) -> bool {
        let Some(corrections) = self.corrections.get(id) else {
            return false;
        };
        for (name, value) in corrections {
            log::debug!(target: "suite.test", "errata for {id}: {name}={value:?}");
            attributes.insert(name.clone(), value.clone());
        }
        !corrections.is_empty()
    }
}

impl FromIterator<(String, String, String)> for Errata {
    fn from_iter<I: IntoIterator<Item = (String, String, String)>>(iter: I) -> Self {
        let mut errata = Self::empty();
        for (id, attribute, value) in iter {
            errata.correct(id, attribute, value);
        }
        errata
    }
}
