//! Error taxonomy for a simulation run.
//!
//! Every variant is fatal to the run. Denied pairs are not errors; they are
//! recorded in [`RunResult`](crate::RunResult).

use thiserror::Error;

/// Errors that abort a simulation run.
#[derive(Debug, Error)]
pub enum PolicySimError {
    /// The input did not have the expected shape.
    #[error("Failed to decode input: {0}")]
    InputDecode(#[from] serde_json::Error),

    /// The input declared no statements at all.
    #[error("No statements specified in input")]
    NoStatements,

    /// A statement resolved to an empty action or resource list.
    #[error("Statement {index}: {field} must not be empty")]
    EmptyField { index: usize, field: &'static str },

    /// A call to the policy store or the simulator failed.
    #[error("{operation} failed: {message}")]
    RemoteCall {
        operation: &'static str,
        message: String,
    },

    /// A policy document was not valid percent-encoding.
    #[error("Failed to decode policy document {source_name}: {message}")]
    DecodeDocument {
        source_name: String,
        message: String,
    },

    /// The role has neither managed nor inline policies.
    #[error("No policy is attached to role '{role_name}'")]
    NoPolicyAttached { role_name: String },

    /// The simulator returned something that cannot be classified.
    #[error("Unexpected simulation result for action '{action}' on resource '{resource}': {detail}")]
    UnexpectedDecision {
        action: String,
        resource: String,
        detail: String,
    },

    /// Cancellation was requested before the next remote call.
    #[error("Operation cancelled")]
    Cancelled,
}

impl PolicySimError {
    pub(crate) fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        Self::RemoteCall {
            operation,
            message: message.into(),
        }
    }

    /// Prefix a remote call error with the step that triggered it.
    pub(crate) fn within(self, step: impl std::fmt::Display) -> Self {
        match self {
            Self::RemoteCall { operation, message } => Self::RemoteCall {
                operation,
                message: format!("{step}: {message}"),
            },
            other => other,
        }
    }
}

/// Result type alias for simulation operations.
pub type PolicySimResult<T> = Result<T, PolicySimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_prefixes_remote_call_errors() {
        let err = PolicySimError::remote("GetPolicy", "AccessDenied")
            .within("managed policy 'arn:aws:iam::aws:policy/ReadOnlyAccess'");
        assert_eq!(
            err.to_string(),
            "GetPolicy failed: managed policy 'arn:aws:iam::aws:policy/ReadOnlyAccess': AccessDenied"
        );
    }

    #[test]
    fn test_within_leaves_other_errors_untouched() {
        let err = PolicySimError::Cancelled.within("role 'app'");
        assert!(matches!(err, PolicySimError::Cancelled));
    }

    #[test]
    fn test_empty_field_message_names_statement() {
        let err = PolicySimError::EmptyField {
            index: 2,
            field: "resource",
        };
        assert_eq!(err.to_string(), "Statement 2: resource must not be empty");
    }
}
