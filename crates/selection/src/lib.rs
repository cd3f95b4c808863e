//! Deciding which tests a parser is held to, and running them.
//!
//! A [`Selection`] reduces a test and the capabilities of a driver to a
//! [`TestHandling`]. [`build_plan`] applies it across a suite, and
//! [`run_plan`] feeds the result to a [`Driver`].

mod batch;
mod driver;
mod error;
mod plan;
mod policy;
mod run;

pub use driver::{Driver, DriverError, ResultMismatch, process_result};
pub use error::SelectionError;
pub use plan::{DEFAULT_BATCH_SIZE, PlanNode, PlannedCase, build_plan, handling_listing};
pub use policy::{
    BaseSelection, BoxFuture, ChromeSelection, EXCLUDED_PRODUCTIONS, EXCLUDED_SECTIONS,
    OTHER_EXCLUSIONS, PROBLEMATIC, PlatformIssue, SELECTION_NAMES, STANDALONE_EXCLUSIONS,
    SaxSelection, Selection, WhatwgSelection, XmllintSelection,
};
pub use run::{
    CaseOutcome, CaseStatus, RESULTS_FORMAT_VERSION, RunReport, RunResults, TestResult,
    TypeCounts, run_plan,
};

pub use core_types::{DriverSpec, TestHandling};
