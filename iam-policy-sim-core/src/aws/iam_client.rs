//! AWS IAM client wrapper implementing [`PolicyStore`].

use async_trait::async_trait;
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::types::PolicyEvaluationDecisionType;
use aws_sdk_iam::Client as IamClient;
use log::debug;

use crate::aws::{Marker, PolicyStore};
use crate::error::{PolicySimError, PolicySimResult};
use crate::types::{AttachedPolicy, DecisionKind, EvaluationResult, ManagedPolicy, Page};

pub struct AwsIamClient {
    client: IamClient,
}

impl AwsIamClient {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }
}

/// IAM only returns a usable marker when the listing is truncated. A truncated
/// response without one would silently drop the remaining pages.
fn next_marker(
    operation: &'static str,
    is_truncated: bool,
    marker: Option<&str>,
) -> PolicySimResult<Option<Marker>> {
    if !is_truncated {
        return Ok(None);
    }
    marker
        .map(|m| Some(m.to_string()))
        .ok_or_else(|| PolicySimError::remote(operation, "response is truncated but has no Marker"))
}

fn decision_kind(decision: &PolicyEvaluationDecisionType) -> DecisionKind {
    match decision {
        PolicyEvaluationDecisionType::Allowed => DecisionKind::Allowed,
        PolicyEvaluationDecisionType::ImplicitDeny => DecisionKind::ImplicitDeny,
        PolicyEvaluationDecisionType::ExplicitDeny => DecisionKind::ExplicitDeny,
        other => DecisionKind::Unknown(other.as_str().to_string()),
    }
}

fn required<'a>(
    operation: &'static str,
    field: &str,
    value: Option<&'a str>,
) -> PolicySimResult<&'a str> {
    value.ok_or_else(|| PolicySimError::remote(operation, format!("response has no {field}")))
}

#[async_trait]
impl PolicyStore for AwsIamClient {
    async fn list_attached_role_policies(
        &self,
        role_name: &str,
        marker: Option<Marker>,
    ) -> PolicySimResult<Page<AttachedPolicy, Marker>> {
        debug!(
            "Invoking ListAttachedRolePolicies roleName={} marker={:?}",
            role_name, marker
        );
        let response = self
            .client
            .list_attached_role_policies()
            .role_name(role_name)
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| {
                PolicySimError::remote(
                    "ListAttachedRolePolicies",
                    format!("role '{role_name}': {}", DisplayErrorContext(&e)),
                )
            })?;

        let items = response
            .attached_policies()
            .iter()
            .map(|policy| -> PolicySimResult<AttachedPolicy> {
                let policy_arn =
                    required("ListAttachedRolePolicies", "PolicyArn", policy.policy_arn())?;
                Ok(AttachedPolicy {
                    policy_arn: policy_arn.to_string(),
                    policy_name: policy.policy_name().unwrap_or(policy_arn).to_string(),
                })
            })
            .collect::<PolicySimResult<Vec<_>>>()?;
        debug!("ListAttachedRolePolicies numAttachedPolicies={}", items.len());

        Ok(Page {
            items,
            next_cursor: next_marker(
                "ListAttachedRolePolicies",
                response.is_truncated(),
                response.marker(),
            )?,
        })
    }

    async fn get_policy(&self, policy_arn: &str) -> PolicySimResult<ManagedPolicy> {
        debug!("Invoking GetPolicy policyArn={}", policy_arn);
        let response = self
            .client
            .get_policy()
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| PolicySimError::remote("GetPolicy", DisplayErrorContext(&e).to_string()))?;

        let policy = response
            .policy()
            .ok_or_else(|| PolicySimError::remote("GetPolicy", "response has no Policy"))?;
        let default_version_id =
            required("GetPolicy", "DefaultVersionId", policy.default_version_id())?;

        Ok(ManagedPolicy {
            arn: policy.arn().unwrap_or(policy_arn).to_string(),
            default_version_id: default_version_id.to_string(),
        })
    }

    async fn get_policy_version_document(
        &self,
        policy_arn: &str,
        version_id: &str,
    ) -> PolicySimResult<String> {
        debug!(
            "Invoking GetPolicyVersion policyArn={} versionId={}",
            policy_arn, version_id
        );
        let response = self
            .client
            .get_policy_version()
            .policy_arn(policy_arn)
            .version_id(version_id)
            .send()
            .await
            .map_err(|e| {
                PolicySimError::remote("GetPolicyVersion", DisplayErrorContext(&e).to_string())
            })?;

        let document = response
            .policy_version()
            .and_then(|version| version.document());
        Ok(required("GetPolicyVersion", "Document", document)?.to_string())
    }

    async fn list_role_policy_names(
        &self,
        role_name: &str,
        marker: Option<Marker>,
    ) -> PolicySimResult<Page<String, Marker>> {
        debug!(
            "Invoking ListRolePolicies roleName={} marker={:?}",
            role_name, marker
        );
        let response = self
            .client
            .list_role_policies()
            .role_name(role_name)
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| {
                PolicySimError::remote(
                    "ListRolePolicies",
                    format!("role '{role_name}': {}", DisplayErrorContext(&e)),
                )
            })?;

        let items = response.policy_names().to_vec();
        debug!("ListRolePolicies numPolicyNames={}", items.len());

        Ok(Page {
            items,
            next_cursor: next_marker(
                "ListRolePolicies",
                response.is_truncated(),
                response.marker(),
            )?,
        })
    }

    async fn get_role_policy_document(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> PolicySimResult<String> {
        debug!(
            "Invoking GetRolePolicy roleName={} policyName={}",
            role_name, policy_name
        );
        let response = self
            .client
            .get_role_policy()
            .role_name(role_name)
            .policy_name(policy_name)
            .send()
            .await
            .map_err(|e| {
                PolicySimError::remote("GetRolePolicy", DisplayErrorContext(&e).to_string())
            })?;

        Ok(response.policy_document().to_string())
    }

    async fn simulate_custom_policy(
        &self,
        action: &str,
        resource: &str,
        policy_documents: &[String],
        marker: Option<Marker>,
    ) -> PolicySimResult<Page<EvaluationResult, Marker>> {
        debug!(
            "Invoking SimulateCustomPolicy action={} resource={} marker={:?}",
            action, resource, marker
        );
        let response = self
            .client
            .simulate_custom_policy()
            .action_names(action)
            .resource_arns(resource)
            .set_policy_input_list(Some(policy_documents.to_vec()))
            .set_marker(marker)
            .send()
            .await
            .map_err(|e| {
                PolicySimError::remote(
                    "SimulateCustomPolicy",
                    format!(
                        "action '{action}' on resource '{resource}': {}",
                        DisplayErrorContext(&e)
                    ),
                )
            })?;

        let items = response
            .evaluation_results()
            .iter()
            .map(|result| EvaluationResult {
                action: result.eval_action_name().to_string(),
                resource: result.eval_resource_name().map(str::to_string),
                decision: decision_kind(result.eval_decision()),
            })
            .collect();

        Ok(Page {
            items,
            next_cursor: next_marker(
                "SimulateCustomPolicy",
                response.is_truncated(),
                response.marker(),
            )?,
        })
    }
}
