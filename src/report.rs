//! Structured outcome of one fence run
//!
//! A [`Report`] maps the rules that ran to what they produced and supports a
//! small aggregation algebra over the outcomes: AND ([`for_all`]), OR
//! ([`for_any`]), and name-based filtering ([`for_one`]). Composite rules
//! nest further reports, so the algebra recurses.
//!
//! [`for_all`]: Report::for_all
//! [`for_any`]: Report::for_any
//! [`for_one`]: Report::for_one

use std::io::{self, Write};

use serde_json::Value;

use crate::error::{FenceError, FenceResult};
use crate::rule::{Outcome, Rule};

/// The outcome of running a [`Fence`](crate::Fence): one entry per rule, in
/// registration order, plus the subjects the rules ran against
///
/// Created once per run and read-only thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    rules: Vec<Rule>,
    outcomes: Vec<Outcome>,
    subjects: Vec<Value>,
}

impl Report {
    /// Pair rules with their outcomes
    ///
    /// The sequences must be non-empty and the same length; a report cannot
    /// represent zero rules, and mis-pairing rules with outcomes would make
    /// every query silently wrong, so both violations fail with
    /// [`FenceError::InvalidResult`].
    pub fn new(rules: Vec<Rule>, outcomes: Vec<Outcome>, subjects: Vec<Value>) -> FenceResult<Self> {
        if rules.is_empty() || outcomes.is_empty() {
            return Err(FenceError::invalid_result(
                "a report requires at least one rule and one outcome",
            ));
        }
        if rules.len() != outcomes.len() {
            return Err(FenceError::invalid_result(format!(
                "rule/outcome length mismatch: {} rules, {} outcomes",
                rules.len(),
                outcomes.len()
            )));
        }

        Ok(Self {
            rules,
            outcomes,
            subjects,
        })
    }

    /// Get the rules that produced this report
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Get the outcomes, one per rule, in run order
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Get the subjects the rules ran against
    pub fn subjects(&self) -> &[Value] {
        &self.subjects
    }

    /// `true` when every outcome passed
    ///
    /// A nested outcome contributes the AND of each child report's own
    /// `for_all`, computed independently of its siblings.
    pub fn for_all(&self) -> bool {
        self.outcomes.iter().fold(true, |acc, outcome| {
            acc && match outcome {
                Outcome::Pass(value) => *value,
                Outcome::Nested(children) => {
                    children.iter().fold(true, |sub, child| sub && child.for_all())
                }
            }
        })
    }

    /// `true` when at least one outcome passed
    ///
    /// A nested outcome contributes the OR of each child report's own
    /// `for_any`.
    pub fn for_any(&self) -> bool {
        self.outcomes.iter().fold(false, |acc, outcome| {
            acc || match outcome {
                Outcome::Pass(value) => *value,
                Outcome::Nested(children) => {
                    children.iter().fold(false, |sub, child| sub || child.for_any())
                }
            }
        })
    }

    /// Outcomes of every rule registered under `name`, preserving run order
    ///
    /// Returns an empty sequence when no rule matches; fails with
    /// [`FenceError::InvalidArgument`] on an empty name.
    pub fn for_one(&self, name: &str) -> FenceResult<Vec<Outcome>> {
        if name.trim().is_empty() {
            return Err(FenceError::invalid_argument(
                "for_one requires a non-empty rule name",
            ));
        }

        Ok(self
            .rules
            .iter()
            .zip(&self.outcomes)
            .filter(|(rule, _)| rule.name() == name)
            .map(|(_, outcome)| outcome.clone())
            .collect())
    }

    /// Render a human-readable breakdown into `sink`
    ///
    /// One line per rule, labelled with its name and bound arguments, nested
    /// reports indented one `indent_unit` deeper. The traversal order equals
    /// the outcome order; the text itself is diagnostic only and not a
    /// stable contract.
    pub fn explain<W: Write>(&self, sink: &mut W, indent_unit: &str) -> io::Result<()> {
        let deeper = format!("{indent_unit}{indent_unit}");

        writeln!(sink, "{indent_unit}subject: {}", Value::Array(self.subjects.clone()))?;
        writeln!(sink, "{deeper}{} forAll", mark(self.for_all()))?;
        writeln!(sink, "{deeper}{} forAny", mark(self.for_any()))?;

        writeln!(sink, "{indent_unit}tests:")?;
        for (rule, outcome) in self.rules.iter().zip(&self.outcomes) {
            let mut label = rule.name().to_string();
            if !rule.bound_args().is_empty() {
                label.push_str(&format!(" ({})", Value::Array(rule.bound_args().to_vec())));
            }
            writeln!(sink, "{deeper}{} {label}", mark(outcome.passed()))?;

            if let Outcome::Nested(children) = outcome {
                for child in children {
                    child.explain(sink, &deeper)?;
                }
            }
        }

        Ok(())
    }

    /// [`explain`](Report::explain) to standard output with a two-space indent
    pub fn explain_stdout(&self) -> io::Result<()> {
        let stdout = io::stdout();
        self.explain(&mut stdout.lock(), "  ")
    }
}

fn mark(passed: bool) -> &'static str {
    if passed { "[✓]" } else { "[x]" }
}
