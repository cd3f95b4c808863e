use core_types::{DriverSpec, TestHandling, TestType};
use suite::TestSpec;

/// Validity constraints that follow from `standalone="yes"`, which xmllint
/// does not enforce.
pub const STANDALONE_EXCLUSIONS: &[&str] = &[
    "inv-not-sa05",
    "inv-not-sa06",
    "inv-not-sa07",
    "inv-not-sa09",
    "inv-not-sa10",
    "inv-not-sa11",
    "inv-not-sa12",
    "ibm-invalid-P32-ibm32i03.xml",
];

/// Erratum E9 of the second edition. xmllint fails it; later editions may
/// have made it obsolete.
pub const OTHER_EXCLUSIONS: &[&str] = &["rmt-e2e-9a"];

/// For libxml2's `xmllint`, which validates and documents conformance to
/// XML 1.0 fifth edition with Namespaces 1.0.
#[derive(Clone, Debug)]
pub struct XmllintSelection {
    pub(crate) driver: DriverSpec,
}

impl XmllintSelection {
    pub fn new(driver: DriverSpec) -> Self {
        Self { driver }
    }

    pub(crate) fn handling_by_type(test_type: TestType) -> TestHandling {
        match test_type {
            TestType::NotWf | TestType::Invalid => TestHandling::Fails,
            TestType::Valid => TestHandling::Succeeds,
            TestType::Error => TestHandling::Skip,
        }
    }

    pub(crate) fn should_skip<T: TestSpec>(test: &T) -> bool {
        let id = test.id();
        STANDALONE_EXCLUSIONS.contains(&id)
            || OTHER_EXCLUSIONS.contains(&id)
            || test.includes_recommendation("NS1.1")
            || !super::targets_1_0_edition_5(test)
    }
}

#[cfg(test)]
mod tests {
    use suite_test_support::FakeTest;

    use crate::Selection;

    use super::*;

    fn xmllint() -> Selection {
        Selection::xmllint(DriverSpec::new("xmllint", true, true))
    }

    #[tokio::test]
    async fn invalid_fails_and_error_is_skipped() {
        let selection = xmllint();
        let invalid = FakeTest::new("t", TestType::Invalid);
        assert_eq!(selection.get_test_handling(&invalid).await.unwrap(), TestHandling::Fails);
        let error = FakeTest::new("t", TestType::Error);
        assert_eq!(selection.get_test_handling(&error).await.unwrap(), TestHandling::Skip);
    }

    #[tokio::test]
    async fn curated_exclusions() {
        let selection = xmllint();
        for id in STANDALONE_EXCLUSIONS.iter().chain(OTHER_EXCLUSIONS) {
            let test = FakeTest::new(id, TestType::Invalid);
            assert!(selection.should_skip_test(&test).await.unwrap(), "{id}");
        }
        let test = FakeTest::new("inv-not-sa08", TestType::Invalid);
        assert!(!selection.should_skip_test(&test).await.unwrap());
    }

    #[tokio::test]
    async fn restricted_to_edition_5_and_namespaces_1_0() {
        let selection = xmllint();
        let ns11 = FakeTest::new("t", TestType::Valid).recommendation("NS1.1");
        assert!(selection.should_skip_test(&ns11).await.unwrap());
        let old = FakeTest::new("t", TestType::Valid).editions(&["1", "2"]);
        assert!(selection.should_skip_test(&old).await.unwrap());
        let bom = FakeTest::new("t", TestType::Valid).with_bom();
        assert!(!selection.should_skip_test(&bom).await.unwrap());
    }
}
