use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What kind of test is being performed.
///
/// - `NotWf`: the document is malformed, the parser must report an error.
/// - `Valid`: the document is valid, the parser must not report any error.
/// - `Invalid`: the document is invalid, a validating parser must report an error.
/// - `Error`: the document has errors that validating processors may optionally report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TestType {
    #[serde(rename = "not-wf")]
    NotWf,
    #[serde(rename = "valid")]
    Valid,
    #[serde(rename = "invalid")]
    Invalid,
    #[serde(rename = "error")]
    Error,
}

impl TestType {
    pub const ALL: [TestType; 4] = [
        TestType::NotWf,
        TestType::Valid,
        TestType::Invalid,
        TestType::Error,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotWf => "not-wf",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unexpected test type: {0}")]
pub struct UnknownTestType(pub String);

impl FromStr for TestType {
    type Err = UnknownTestType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "not-wf" => Ok(Self::NotWf),
            "valid" => Ok(Self::Valid),
            "invalid" => Ok(Self::Invalid),
            "error" => Ok(Self::Error),
            other => Err(UnknownTestType(other.to_string())),
        }
    }
}

/// Disposition of a test for a given driver.
///
/// `Fails` means the parser must report an error, `Succeeds` means it must
/// parse without error, `Skip` takes the test out of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestHandling {
    Fails,
    Succeeds,
    Skip,
}

impl TestHandling {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fails => "fails",
            Self::Succeeds => "succeeds",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for TestHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static capability declaration of a driver, also its serialized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSpec {
    /// Typically the name of the parser being driven.
    pub name: String,
    pub can_validate: bool,
    pub processes_external_entities: bool,
}

impl DriverSpec {
    pub fn new(name: impl Into<String>, can_validate: bool, processes_external_entities: bool) -> Self {
        Self {
            name: name.into(),
            can_validate,
            processes_external_entities,
        }
    }
}
