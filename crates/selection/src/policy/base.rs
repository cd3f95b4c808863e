use core_types::{DriverSpec, TestHandling, TestType};

/// Runs everything a validating parser could be judged on.
#[derive(Clone, Debug)]
pub struct BaseSelection {
    pub(crate) driver: DriverSpec,
}

impl BaseSelection {
    pub fn new(driver: DriverSpec) -> Self {
        Self { driver }
    }

    pub(crate) fn handling_by_type(test_type: TestType) -> TestHandling {
        match test_type {
            TestType::NotWf | TestType::Invalid | TestType::Error => TestHandling::Fails,
            TestType::Valid => TestHandling::Succeeds,
        }
    }
}

#[cfg(test)]
mod tests {
    use suite_test_support::FakeTest;

    use crate::Selection;

    use super::*;

    #[tokio::test]
    async fn validating_driver_runs_by_type() {
        let selection = Selection::base(DriverSpec::new("perfect", true, true));
        let expected = [
            (TestType::NotWf, TestHandling::Fails),
            (TestType::Invalid, TestHandling::Fails),
            (TestType::Error, TestHandling::Fails),
            (TestType::Valid, TestHandling::Succeeds),
        ];
        for (test_type, handling) in expected {
            let test = FakeTest::new("t", test_type)
                .entities("both")
                .recommendation("NS1.1")
                .with_bom();
            assert_eq!(selection.get_test_handling(&test).await.unwrap(), handling);
        }
    }

    #[tokio::test]
    async fn base_never_excludes() {
        let selection = Selection::base(DriverSpec::new("d", true, true));
        let test = FakeTest::new("t", TestType::Valid).unreadable();
        assert!(!selection.should_skip_test(&test).await.unwrap());
    }
}
