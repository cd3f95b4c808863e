//! The suite tree, annotated with the handling of every test.

use std::collections::HashMap;
use std::sync::Arc;

use core_types::TestHandling;
use suite::{Element, Id, Suite, Test, TestSpec};

use crate::batch::in_batches;
use crate::error::SelectionError;
use crate::policy::Selection;

/// How many tests are decided or run concurrently.
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Clone, Debug)]
pub enum PlanNode {
    Group { title: String, children: Vec<PlanNode> },
    Case { test: Test, handling: TestHandling },
}

/// A case with the titles of the groups enclosing it, outermost first.
#[derive(Clone, Debug)]
pub struct PlannedCase<'a> {
    pub groups: Vec<&'a str>,
    pub test: &'a Test,
    pub handling: TestHandling,
}

impl PlanNode {
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Group { title, .. } => Some(title),
            Self::Case { .. } => None,
        }
    }

    /// Every case, in document order.
    pub fn cases(&self) -> Vec<PlannedCase<'_>> {
        fn walk<'a>(node: &'a PlanNode, groups: &mut Vec<&'a str>, out: &mut Vec<PlannedCase<'a>>) {
            match node {
                PlanNode::Group { title, children } => {
                    groups.push(title);
                    for child in children {
                        walk(child, groups, out);
                    }
                    groups.pop();
                }
                PlanNode::Case { test, handling } => out.push(PlannedCase {
                    groups: groups.clone(),
                    test,
                    handling: *handling,
                }),
            }
        }

        let mut out = Vec::new();
        walk(self, &mut Vec::new(), &mut out);
        out
    }
}

/// Title of the group standing for a `TESTCASES` element.
fn group_title(element: &Element) -> String {
    ["PROFILE", "xml:base"]
        .iter()
        .filter_map(|name| element.attribute(name))
        .find(|value| !value.is_empty())
        .unwrap_or(element.name())
        .to_string()
}

fn mirror(element: &Element, handlings: &HashMap<Id, TestHandling>) -> Vec<PlanNode> {
    element
        .children()
        .filter_map(|child| {
            if let Some(test) = child.as_test() {
                let handling = *handlings.get(&test.node_id())?;
                Some(PlanNode::Case { test, handling })
            } else if child.is_suite() {
                Some(PlanNode::Group {
                    title: group_title(&child),
                    children: mirror(&child, handlings),
                })
            } else {
                None
            }
        })
        .collect()
}

/// Decide the handling of every test under `suite` and mirror the suite
/// tree into groups and cases. The top group is titled `name`.
pub async fn build_plan(
    suite: &Suite,
    name: &str,
    selection: Arc<Selection>,
    batch_size: usize,
) -> Result<PlanNode, SelectionError> {
    let tests: Vec<Test> = suite.tests().collect();
    let handlings = in_batches(
        tests.clone(),
        batch_size,
        "selection.plan",
        |test: Test| {
            let selection = Arc::clone(&selection);
            async move { selection.get_test_handling(&test).await }
        },
        |err| SelectionError::Task(err.to_string()),
    )
    .await?;

    let skipped = handlings.iter().filter(|h| **h == TestHandling::Skip).count();
    log::info!(
        target: "selection.plan",
        "{name}: {} tests, {skipped} skipped by the {} selection",
        tests.len(),
        selection.name()
    );

    let by_node: HashMap<Id, TestHandling> = tests
        .iter()
        .map(|test| test.node_id())
        .zip(handlings)
        .collect();
    Ok(PlanNode::Group {
        title: name.to_string(),
        children: mirror(suite.element(), &by_node),
    })
}

/// `id<TAB>handling` for every case.
pub fn handling_listing(plan: &PlanNode) -> Vec<String> {
    plan.cases()
        .iter()
        .map(|case| format!("{}\t{}", case.test.id(), case.handling))
        .collect()
}
