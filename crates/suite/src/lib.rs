//! Model of the W3C XML conformance suite description.
//!
//! [`load_tests`] reads the flattened suite into a tree of [`Suite`] and
//! [`Test`] nodes. Tests expose the interpreted meaning of their attributes
//! through [`TestSpec`], including properties that depend on the fixture
//! text and are computed on first use.

mod element;
mod errata;
mod error;
mod parser;
mod sections;
mod serialized;
mod spec;
mod suite;
mod test;

pub use element::{Attributes, Element, Id, TEST, TESTCASES, TESTSUITE, Tree, TreeBuilder};
pub use errata::{BAD_TESTS, Errata, is_bad_test};
pub use error::SuiteError;
pub use parser::{SuiteParser, load_tests, parse_suite};
pub use sections::{Sections, SectionsError, parse_sections};
pub use serialized::{SerializedTest, TestStub};
pub use spec::TestSpec;
pub use suite::{QueryableProperty, Suite};
pub use test::Test;

pub use core_types::TestType;
