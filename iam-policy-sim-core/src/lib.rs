//! This crate provides the core logic of iam-policy-sim:
//! - Input decoding and normalization of action/resource statements
//! - Collection of a role's managed and inline policy documents
//! - Policy simulation of every action/resource pair and decision aggregation
//!

mod aws;
mod collector;
pub mod commands;
mod error;
pub mod input;
mod pagination;
pub mod simulation;
#[cfg(test)]
mod testing;
mod types;

// Re-exports for a small, focused public API
pub use aws::iam_client::AwsIamClient;
pub use aws::policy_document::unescape_policy_document;
pub use aws::{Marker, PolicyStore};
pub use collector::collect_policy_documents;
pub use commands::PolicySimulatorService;
pub use error::{PolicySimError, PolicySimResult};
pub use input::{parse_checks, read_checks};
pub use pagination::paginate;
pub use simulation::{aggregate, simulate, DecisionReporter, LogReporter};
pub use types::{
    AttachedPolicy, DecisionKind, DecisionRecord, EvaluationPair, EvaluationResult,
    ManagedPolicy, NormalizedCheck, Page, PolicyReference, RunResult,
};
