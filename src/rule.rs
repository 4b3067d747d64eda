//! Named rule wrappers and their invocation outcomes
//!
//! A [`Rule`] pairs an externally supplied function with a name and a set of
//! arguments fixed when the rule was appended to a builder. The function is
//! opaque to the engine; the only shape it must honor is the [`Outcome`] it
//! returns.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FenceError, FenceResult};
use crate::report::Report;

/// The callable behind a rule
///
/// Receives the runtime subjects concatenated with the rule's bound
/// arguments, in that order. Plain predicates return [`Outcome::Pass`];
/// composite rules built with [`policy`](crate::policy::policy) return
/// [`Outcome::Nested`].
pub type RuleFn = Arc<dyn Fn(&[Value]) -> Outcome + Send + Sync>;

/// What one rule invocation produced
///
/// This is a closed enum, so a nested outcome can only ever contain reports;
/// the "nested element of the wrong type" failure mode is unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A plain predicate verdict
    Pass(bool),
    /// A composite rule's nested reports, one per sub-fence that ran
    Nested(Vec<Report>),
}

impl Outcome {
    /// Collapse this outcome to a single verdict
    ///
    /// A nested outcome passes when every child report passes `for_all`.
    pub fn passed(&self) -> bool {
        match self {
            Outcome::Pass(value) => *value,
            Outcome::Nested(reports) => reports.iter().all(Report::for_all),
        }
    }

    /// Check if this outcome nests child reports
    pub fn is_nested(&self) -> bool {
        matches!(self, Outcome::Nested(_))
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        Outcome::Pass(value)
    }
}

// Cache key for invocations that carried no runtime subject.
const NO_SUBJECT_KEY: &str = "\u{0}fence:no-subject";

/// A named rule: one function reference, the arguments bound at call time,
/// and an optional invocation cache
///
/// Rules are immutable once constructed, except for the cache, which is
/// lazily attached and detached via [`memoize`](Rule::memoize) and
/// [`dememoize`](Rule::dememoize).
#[derive(Clone)]
pub struct Rule {
    name: String,
    func: RuleFn,
    bound_args: Vec<Value>,
    cache: Option<DashMap<String, Outcome>>,
}

impl Rule {
    /// Wrap `func` under `name` with `bound_args` fixed for every invocation
    ///
    /// Functions carry no discoverable name of their own, so an empty name
    /// fails with [`FenceError::InvalidRule`].
    pub fn new(
        name: impl Into<String>,
        func: RuleFn,
        bound_args: Vec<Value>,
        memoize: bool,
    ) -> FenceResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FenceError::invalid_rule("a rule requires a non-empty name"));
        }

        let mut rule = Self {
            name,
            func,
            bound_args,
            cache: None,
        };
        if memoize {
            rule.memoize();
        }
        Ok(rule)
    }

    /// Get the rule name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the arguments bound at call time
    pub fn bound_args(&self) -> &[Value] {
        &self.bound_args
    }

    /// Check if invocations are currently cached
    pub fn is_memoized(&self) -> bool {
        self.cache.is_some()
    }

    /// Run the underlying function against `subjects`, with the bound
    /// arguments appended after them
    ///
    /// When memoization is active the cache is keyed by the first subject
    /// only; a hit returns the cached outcome without invoking the function.
    pub fn invoke(&self, subjects: &[Value]) -> Outcome {
        if let Some(cache) = &self.cache {
            let key = Self::cache_key(subjects.first());
            if let Some(hit) = cache.get(&key) {
                return hit.clone();
            }

            let outcome = self.call(subjects);
            cache.insert(key, outcome.clone());
            return outcome;
        }

        self.call(subjects)
    }

    fn call(&self, subjects: &[Value]) -> Outcome {
        let mut args = Vec::with_capacity(subjects.len() + self.bound_args.len());
        args.extend_from_slice(subjects);
        args.extend_from_slice(&self.bound_args);
        (self.func)(&args)
    }

    /// Attach an empty invocation cache, replacing any existing one
    pub fn memoize(&mut self) {
        self.cache = Some(DashMap::new());
    }

    /// Drop the cache; subsequent invocations always call the function
    ///
    /// Idempotent.
    pub fn dememoize(&mut self) {
        self.cache = None;
    }

    // The canonical JSON encoding of the subject: keys collide only when the
    // subjects are equal, unlike a hash.
    fn cache_key(subject: Option<&Value>) -> String {
        match subject {
            Some(value) => value.to_string(),
            None => NO_SUBJECT_KEY.to_string(),
        }
    }

    /// Snapshot everything about this rule that survives persistence
    ///
    /// The function reference is not portable and is never serialized;
    /// replaying the snapshot requires an environment where a constructor of
    /// the same name is registered.
    pub fn serialize(&self) -> SerializedRule {
        SerializedRule {
            name: self.name.clone(),
            args: self.bound_args.clone(),
            memoize: self.is_memoized(),
        }
    }
}

// Function identity is not comparable; rules compare by name, bound
// arguments, and memoization state.
impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.bound_args == other.bound_args
            && self.is_memoized() == other.is_memoized()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("bound_args", &self.bound_args)
            .field("memoized", &self.is_memoized())
            .finish_non_exhaustive()
    }
}

/// The persistable slice of a [`Rule`]: `{ name, args, memoize }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedRule {
    /// The registered rule-constructor name
    pub name: String,
    /// Arguments bound when the constructor was called
    #[serde(default)]
    pub args: Vec<Value>,
    /// Whether the registration enabled memoization
    #[serde(default)]
    pub memoize: bool,
}
