//! Policy simulator service layer
//!
//! The service owns the policy store and the run's cancellation token and
//! exposes the high-level operations used by the CLI.

use tokio_util::sync::CancellationToken;

use crate::aws::iam_client::AwsIamClient;
use crate::aws::PolicyStore;
use aws_sdk_iam::Client as IamClient;

/// Main service struct that holds the policy store and cancellation state
pub struct PolicySimulatorService<S: PolicyStore = AwsIamClient> {
    pub(crate) store: S,
    pub(crate) cancel: CancellationToken,
}

impl PolicySimulatorService<AwsIamClient> {
    /// Create a new service instance backed by AWS IAM
    ///
    /// The configuration is loaded using the default credential provider chain.
    pub async fn new() -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;

        Self::with_store(AwsIamClient::new(IamClient::new(&config)))
    }
}

impl<S: PolicyStore> PolicySimulatorService<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the run before its next remote call once cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // run() and collect_policy_documents() are implemented in simulate.rs
}
