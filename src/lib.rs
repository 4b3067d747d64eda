//! Fence - composable rule pipelines with a forkable builder, an immutable executor, and a queryable result algebra

pub mod builder;
pub mod error;
pub mod fence;
pub mod policy;
pub mod report;
pub mod rule;

// Re-export core types
pub use builder::FenceBuilder;
pub use error::{FenceError, FenceResult};
pub use fence::Fence;
pub use policy::{PolicyMap, policy, predicate};
pub use report::Report;
pub use rule::{Outcome, Rule, RuleFn, SerializedRule};

// Re-export common dependencies
pub use serde_json::Value;
