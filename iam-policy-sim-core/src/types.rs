//! Shared data types for policy collection, simulation and aggregation.

use std::fmt;

/// One statement of the input after normalization.
///
/// Both lists are guaranteed non-empty when produced by
/// [`normalize`](crate::input::normalize).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCheck {
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

impl NormalizedCheck {
    /// Cross product of actions and resources, action-major.
    pub fn pairs(&self) -> impl Iterator<Item = EvaluationPair> + '_ {
        self.actions.iter().flat_map(move |action| {
            self.resources.iter().map(move |resource| EvaluationPair {
                action: action.clone(),
                resource: resource.clone(),
            })
        })
    }
}

/// A single (action, resource) pair sent to the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationPair {
    pub action: String,
    pub resource: String,
}

/// A policy bound to a role, as discovered while listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyReference {
    Managed { arn: String, name: String },
    Inline { name: String },
}

impl fmt::Display for PolicyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Managed { arn, .. } => write!(f, "managed policy '{arn}'"),
            Self::Inline { name } => write!(f, "inline policy '{name}'"),
        }
    }
}

/// A managed policy attachment as returned by the attachment listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedPolicy {
    pub policy_arn: String,
    pub policy_name: String,
}

/// Managed policy metadata needed to locate its default version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedPolicy {
    pub arn: String,
    pub default_version_id: String,
}

/// One raw evaluation result returned by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationResult {
    pub action: String,
    pub resource: Option<String>,
    pub decision: DecisionKind,
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T, C> {
    pub items: Vec<T>,
    /// Cursor for the following page; `None` when this is the last page.
    pub next_cursor: Option<C>,
}

/// Classified simulator decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionKind {
    Allowed,
    ImplicitDeny,
    ExplicitDeny,
    Unknown(String),
}

impl DecisionKind {
    /// Map the simulator's wire value. Only the exact IAM spellings are known.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "allowed" => Self::Allowed,
            "implicitDeny" => Self::ImplicitDeny,
            "explicitDeny" => Self::ExplicitDeny,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => f.write_str("Allowed"),
            Self::ImplicitDeny => f.write_str("Implicit deny"),
            Self::ExplicitDeny => f.write_str("Explicit deny"),
            Self::Unknown(raw) => write!(f, "Unexpected decision type '{raw}'"),
        }
    }
}

/// Outcome of simulating one pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRecord {
    pub action: String,
    pub resource: String,
    pub decision: DecisionKind,
}

/// Aggregate outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub any_failed: bool,
    pub records: Vec<DecisionRecord>,
}

impl RunResult {
    pub fn failed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.decision.is_allowed())
            .count()
    }
}
