use core_types::TestType;
use serde::{Deserialize, Serialize};

use crate::error::SuiteError;
use crate::spec::TestSpec;

/// A test with every property resolved, for storage or transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedTest {
    pub id: String,
    pub test_type: TestType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editions: Option<Vec<String>>,
    pub sections: Vec<String>,
    pub productions: Vec<String>,
    pub entities: String,
    pub skip_for_non_validating_parser: bool,
    pub forbids_namespaces: bool,
    #[serde(rename = "hasDTD")]
    pub has_dtd: bool,
    #[serde(rename = "hasBOM")]
    pub has_bom: bool,
}

/// A test rebuilt from its [`SerializedTest`] record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestStub {
    record: SerializedTest,
}

impl TestStub {
    pub fn record(&self) -> &SerializedTest {
        &self.record
    }
}

impl From<SerializedTest> for TestStub {
    fn from(record: SerializedTest) -> Self {
        Self { record }
    }
}

impl TestSpec for TestStub {
    fn id(&self) -> &str {
        &self.record.id
    }

    fn test_type(&self) -> TestType {
        self.record.test_type
    }

    fn version(&self) -> Option<&str> {
        self.record.version.as_deref()
    }

    fn recommendation(&self) -> &str {
        &self.record.recommendation
    }

    fn editions(&self) -> Option<&[String]> {
        self.record.editions.as_deref()
    }

    fn sections(&self) -> Result<&[String], SuiteError> {
        Ok(&self.record.sections)
    }

    fn productions(&self) -> Result<&[String], SuiteError> {
        Ok(&self.record.productions)
    }

    fn entities(&self) -> &str {
        &self.record.entities
    }

    fn skip_for_non_validating_parser(&self) -> bool {
        self.record.skip_for_non_validating_parser
    }

    fn forbids_namespaces(&self) -> bool {
        self.record.forbids_namespaces
    }

    async fn has_dtd(&self) -> Result<bool, SuiteError> {
        Ok(self.record.has_dtd)
    }

    async fn has_bom(&self) -> Result<bool, SuiteError> {
        Ok(self.record.has_bom)
    }
}
