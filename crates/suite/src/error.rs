use core_types::UnknownTestType;
use resources::LoadError;

use crate::sections::SectionsError;

#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error("malformed suite document: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("unexpected element {0}")]
    UnexpectedElement(String),
    #[error("unclosed element {0}")]
    UnclosedElement(String),
    #[error("stack underflow")]
    StackUnderflow,
    #[error("the top element must be a suite")]
    TopElementNotSuite,
    #[error("the top level element must be TESTSUITE")]
    TopElementNotTestSuite,
    #[error("the suite document has no top element")]
    EmptyDocument,
    #[error("attribute {0} is not set")]
    MissingAttribute(String),
    #[error(transparent)]
    UnexpectedTestType(#[from] UnknownTestType),
    #[error("unknown test property: {0}")]
    UnknownProperty(String),
    #[error("element {0} is not a TEST")]
    NotATest(String),
    #[error("element {0} is not a suite")]
    NotASuite(String),
    #[error("node already has a parent")]
    AlreadyAttached,
    #[error("cannot append a node to itself")]
    SelfAppend,
    #[error("cannot append a node to one of its descendants")]
    AncestorAppend,
    #[error("node {0} does not belong to this tree")]
    UnknownNode(usize),
    #[error(transparent)]
    Sections(#[from] SectionsError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl SuiteError {
    pub(crate) fn missing(name: &str) -> Self {
        Self::MissingAttribute(name.to_string())
    }
}
