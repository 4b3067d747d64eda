//! The frozen, runnable form of a builder's rule sequence

use serde_json::Value;
use tracing::trace;

use crate::error::FenceResult;
use crate::report::Report;
use crate::rule::Rule;

/// An immutable, ordered rule pipeline produced by
/// [`FenceBuilder::build`](crate::FenceBuilder::build)
///
/// Running a fence never mutates it, so independent runs against different
/// subjects can proceed from any thread. The only state shared between runs
/// is each memoized rule's own cache, which persists across runs of the same
/// fence deliberately.
#[derive(Debug, Clone, PartialEq)]
pub struct Fence {
    rules: Vec<Rule>,
}

impl Fence {
    pub(crate) fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Get the rule sequence captured at build time
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Check if this fence captured no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Invoke every rule against the same `subjects`, in registration order,
    /// and collect the outcomes into a [`Report`]
    ///
    /// A fence built from an empty sequence has nothing to report and fails
    /// with [`FenceError::InvalidResult`](crate::FenceError::InvalidResult).
    pub fn run(&self, subjects: &[Value]) -> FenceResult<Report> {
        trace!(rules = self.rules.len(), "running fence");

        let outcomes = self.rules.iter().map(|rule| rule.invoke(subjects)).collect();
        Report::new(self.rules.clone(), outcomes, subjects.to_vec())
    }

    /// [`run`](Fence::run) against a single subject
    pub fn run_one(&self, subject: &Value) -> FenceResult<Report> {
        self.run(std::slice::from_ref(subject))
    }
}
