use std::sync::Arc;

use drivers::{PerfectDriver, QuickXmlDriver};
use resources::ResourceLoader;
use selection::{
    DEFAULT_BATCH_SIZE, Driver, DriverError, ResultMismatch, SELECTION_NAMES, Selection,
    TestHandling, build_plan, run_plan,
};
use suite::Suite;
use suite_test_support::{sample_loader, sample_suite};

async fn setup() -> (Arc<dyn ResourceLoader>, Suite) {
    let loader: Arc<dyn ResourceLoader> = Arc::new(sample_loader());
    let suite = sample_suite(Arc::clone(&loader)).await.unwrap();
    (loader, suite)
}

#[tokio::test]
async fn perfect_driver_passes_under_every_selection() {
    let (_, suite) = setup().await;
    let driver = Arc::new(PerfectDriver::new());
    for name in SELECTION_NAMES {
        let selection = Selection::by_name(name, driver.spec().clone()).unwrap();
        let plan = build_plan(&suite, "xmlconf", Arc::new(selection), DEFAULT_BATCH_SIZE)
            .await
            .unwrap();
        let report = run_plan(&plan, driver.clone(), DEFAULT_BATCH_SIZE).await.unwrap();
        assert!(report.all_passed(), "{name}:\n{report}");
        assert_eq!(report.total(), 17);
    }
}

#[tokio::test]
async fn quick_xml_accepts_well_formed_fixtures() {
    let (loader, suite) = setup().await;
    let driver = QuickXmlDriver::new(loader);
    for id in ["valid-sa-001", "valid-sa-094", "rmt-e2e-9a"] {
        let test = suite.find_test(id).unwrap();
        driver.run(&test, TestHandling::Succeeds).await.unwrap();
    }
}

#[tokio::test]
async fn quick_xml_rejects_malformed_fixtures() {
    let (loader, suite) = setup().await;
    let driver = QuickXmlDriver::new(loader);
    let test = suite.find_test("not-wf-sa-001").unwrap();
    driver.run(&test, TestHandling::Fails).await.unwrap();
    let err = driver.run(&test, TestHandling::Succeeds).await.unwrap_err();
    assert!(matches!(
        err,
        DriverError::Mismatch(ResultMismatch::UnexpectedFailure { .. })
    ));
}

#[tokio::test]
async fn quick_xml_follows_the_namespace_attribute() {
    let (loader, suite) = setup().await;
    let driver = QuickXmlDriver::new(loader);
    // `<a:foo/>` is only well-formed without namespace processing.
    let test = suite.find_test("rmt-ns10-043").unwrap();
    driver.run(&test, TestHandling::Succeeds).await.unwrap();
}

#[tokio::test]
async fn quick_xml_reports_missing_fixtures() {
    let (_, suite) = setup().await;
    let driver = QuickXmlDriver::new(Arc::new(resources::MemoryLoader::new()));
    let test = suite.find_test("valid-sa-001").unwrap();
    let err = driver.run(&test, TestHandling::Succeeds).await.unwrap_err();
    assert!(matches!(err, DriverError::Load(_)), "{err}");
}
