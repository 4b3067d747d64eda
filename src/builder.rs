//! Generation-based builder for assembling fences out of named rules
//!
//! Registered rule-constructors live in an explicit capability set: an
//! immutable map from rule name to registered function, owned by each
//! builder *generation* and dispatched by name through
//! [`FenceBuilder::call`]. Forks share the frozen map; extensions always
//! produce a new generation, so no builder can be extended out from under
//! another.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{FenceError, FenceResult};
use crate::fence::Fence;
use crate::policy::predicate;
use crate::rule::{Rule, RuleFn, SerializedRule};

/// One registered rule-constructor: the function plus the options fixed at
/// registration time.
#[derive(Clone)]
struct Registration {
    func: RuleFn,
    memoize: bool,
}

/// An immutable, append-oriented registry of named rule-constructors
///
/// A builder generation couples a frozen capability set with its own rule
/// sequence. [`register`](FenceBuilder::register) and
/// [`fork`](FenceBuilder::fork) always return a new generation; nothing ever
/// leaks back into an existing builder or sideways into siblings, which is
/// what makes derived builders independently extensible. The capability map
/// is never mutated after a generation is created, so forks share it by
/// reference.
#[derive(Clone, Default)]
pub struct FenceBuilder {
    capabilities: Arc<HashMap<String, Registration>>,
    rules: Vec<Rule>,
}

impl FenceBuilder {
    /// The root builder: no registered names, no accumulated rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `func` under `name`
    ///
    /// Returns a new generation whose capability set includes the name and
    /// whose rule sequence is empty; the current generation is untouched.
    /// Re-registering a name replaces the previous binding in the new
    /// generation only. An empty or blank name fails with
    /// [`FenceError::InvalidName`].
    pub fn register(&self, name: impl Into<String>, func: RuleFn, memoize: bool) -> FenceResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FenceError::invalid_name(name));
        }

        debug!(rule = %name, memoize, "registering rule constructor");

        let mut capabilities: HashMap<_, _> = (*self.capabilities).clone();
        capabilities.insert(name, Registration { func, memoize });

        Ok(Self {
            capabilities: Arc::new(capabilities),
            rules: Vec::new(),
        })
    }

    /// [`register`](FenceBuilder::register) a plain boolean predicate
    ///
    /// The function receives the runtime subjects concatenated with the
    /// arguments bound at call time.
    pub fn register_predicate<F>(&self, name: impl Into<String>, func: F, memoize: bool) -> FenceResult<Self>
    where
        F: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        self.register(name, predicate(func), memoize)
    }

    /// Append one [`Rule`] under a registered name, binding `args` after the
    /// runtime subjects
    ///
    /// This is the dispatch surface for registered names: chaining `call`s
    /// accumulates this generation's rule sequence. An unregistered name
    /// fails with [`FenceError::UnknownRule`].
    pub fn call(mut self, name: &str, args: Vec<Value>) -> FenceResult<Self> {
        let registration = self
            .capabilities
            .get(name)
            .ok_or_else(|| FenceError::unknown_rule(name))?;

        let rule = Rule::new(name, registration.func.clone(), args, registration.memoize)?;
        self.rules.push(rule);
        Ok(self)
    }

    /// New generation sharing this one's capability set, with an
    /// independent, empty rule sequence
    ///
    /// Later registrations on either side do not appear on the other.
    pub fn fork(&self) -> Self {
        Self {
            capabilities: Arc::clone(&self.capabilities),
            rules: Vec::new(),
        }
    }

    /// Fork without `name` in the capability set, dropping any accumulated
    /// rules registered under it
    ///
    /// Unknown names are a silent no-op: the fork simply carries the current
    /// sequence unchanged.
    pub fn unregister(&self, name: &str) -> Self {
        debug!(rule = %name, "unregistering rule constructor");

        let mut capabilities = (*self.capabilities).clone();
        capabilities.remove(name);

        let rules = self
            .rules
            .iter()
            .filter(|rule| rule.name() != name)
            .cloned()
            .collect();

        Self {
            capabilities: Arc::new(capabilities),
            rules,
        }
    }

    /// Snapshot the accumulated sequence into a runnable [`Fence`]
    ///
    /// The builder stays usable; later calls and registrations do not affect
    /// the built fence.
    pub fn build(&self) -> Fence {
        Fence::new(self.rules.clone())
    }

    /// Check if `name` is callable on this generation
    pub fn is_registered(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    /// Names callable on this generation, in no particular order
    pub fn registered_names(&self) -> Vec<&str> {
        self.capabilities.keys().map(String::as_str).collect()
    }

    /// Get the accumulated rule sequence
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Persistable snapshot of the accumulated call sequence, in order
    ///
    /// Function references are not serialized; replaying the snapshot
    /// requires matching names to be registered on the hydrating side.
    pub fn serialize(&self) -> Vec<SerializedRule> {
        self.rules.iter().map(Rule::serialize).collect()
    }

    /// [`serialize`](FenceBuilder::serialize) as a JSON text blob
    pub fn serialize_json(&self) -> FenceResult<String> {
        Ok(serde_json::to_string(&self.serialize())?)
    }

    /// Replay a serialized call sequence onto a fresh fork of this generation
    ///
    /// Every entry must name a registered rule-constructor; one unknown name
    /// fails the whole reconstruction with [`FenceError::UnknownRule`]. The
    /// memoize flag comes from the live registration, not the snapshot.
    pub fn hydrate(&self, entries: &[SerializedRule]) -> FenceResult<Self> {
        debug!(entries = entries.len(), "hydrating builder");

        let mut builder = self.fork();
        for entry in entries {
            builder = builder.call(&entry.name, entry.args.clone())?;
        }
        Ok(builder)
    }

    /// [`hydrate`](FenceBuilder::hydrate) from a JSON text blob produced by
    /// [`serialize_json`](FenceBuilder::serialize_json)
    pub fn hydrate_json(&self, blob: &str) -> FenceResult<Self> {
        let entries: Vec<SerializedRule> = serde_json::from_str(blob)?;
        self.hydrate(&entries)
    }
}

impl fmt::Debug for FenceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FenceBuilder")
            .field("capabilities", &self.registered_names())
            .field("rules", &self.rules)
            .finish()
    }
}
