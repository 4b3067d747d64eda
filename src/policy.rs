//! Adapters from caller-supplied functions to [`RuleFn`]
//!
//! Two kinds of external function exist at the boundary: plain boolean
//! predicates, and composite "policy" rules that validate an aggregate
//! subject field-by-field against previously built fences. Both become the
//! same [`RuleFn`] shape, so the executor needs no special cases.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::fence::Fence;
use crate::rule::{Outcome, RuleFn};

/// Mapping from field name to the fence validating that field
pub type PolicyMap = HashMap<String, Fence>;

/// Wrap a plain boolean predicate as a [`RuleFn`]
///
/// The function receives the runtime subjects concatenated with the rule's
/// bound arguments, in that order.
pub fn predicate<F>(func: F) -> RuleFn
where
    F: Fn(&[Value]) -> bool + Send + Sync + 'static,
{
    Arc::new(move |args| Outcome::Pass(func(args)))
}

/// Build a composite rule from a field-name → [`Fence`] mapping
///
/// The resulting rule expects an object subject. For every field present in
/// both the subject and the map, it runs that field's fence against the
/// field value and nests the report, in the subject's field order. Fields
/// without a mapped fence, fences with no rules, and non-object subjects
/// contribute nothing. This is how hierarchical validation trees compose
/// out of the flat primitives.
pub fn policy(map: PolicyMap) -> RuleFn {
    Arc::new(move |args| {
        let mut reports = Vec::new();

        if let Some(Value::Object(fields)) = args.first() {
            for (field, value) in fields {
                let Some(fence) = map.get(field) else { continue };
                if let Ok(report) = fence.run_one(value) {
                    reports.push(report);
                }
            }
        }

        Outcome::Nested(reports)
    })
}
