//! IAM integration: the policy store seam, its AWS SDK implementation and
//! policy document decoding.

pub(crate) mod iam_client;
pub(crate) mod policy_document;

use async_trait::async_trait;

use crate::error::PolicySimResult;
use crate::types::{AttachedPolicy, EvaluationResult, ManagedPolicy, Page};

/// Opaque continuation marker returned by paginated IAM calls.
pub type Marker = String;

/// Remote operations needed to collect a role's policies and simulate them.
///
/// Documents are returned exactly as the store sends them (percent-encoded).
#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn list_attached_role_policies(
        &self,
        role_name: &str,
        marker: Option<Marker>,
    ) -> PolicySimResult<Page<AttachedPolicy, Marker>>;

    async fn get_policy(&self, policy_arn: &str) -> PolicySimResult<ManagedPolicy>;

    async fn get_policy_version_document(
        &self,
        policy_arn: &str,
        version_id: &str,
    ) -> PolicySimResult<String>;

    async fn list_role_policy_names(
        &self,
        role_name: &str,
        marker: Option<Marker>,
    ) -> PolicySimResult<Page<String, Marker>>;

    async fn get_role_policy_document(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> PolicySimResult<String>;

    /// Simulate one action on one resource against decoded policy documents.
    async fn simulate_custom_policy(
        &self,
        action: &str,
        resource: &str,
        policy_documents: &[String],
        marker: Option<Marker>,
    ) -> PolicySimResult<Page<EvaluationResult, Marker>>;
}
