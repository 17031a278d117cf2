//! In-memory [`PolicyStore`] for unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::aws::{Marker, PolicyStore};
use crate::error::{PolicySimError, PolicySimResult};
use crate::types::{AttachedPolicy, DecisionKind, EvaluationResult, ManagedPolicy, Page};

pub(crate) const ALLOW_GET_OBJECT: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":"s3:GetObject","Resource":"arn:aws:s3:::bucket/*"}]}"#;

/// Percent-encode every reserved character the way IAM does.
pub(crate) fn encode(document: &str) -> String {
    percent_encoding::utf8_percent_encode(document, percent_encoding::NON_ALPHANUMERIC)
        .to_string()
}

fn page_of<T: Clone>(pages: &[Vec<T>], marker: Option<&Marker>) -> Page<T, Marker> {
    let index = marker.map_or(0, |m| m.parse::<usize>().unwrap());
    let next_cursor = (index + 1 < pages.len()).then(|| (index + 1).to_string());
    Page {
        items: pages.get(index).cloned().unwrap_or_default(),
        next_cursor,
    }
}

#[derive(Default)]
pub(crate) struct FakeStore {
    pub attached_pages: Vec<Vec<AttachedPolicy>>,
    pub inline_pages: Vec<Vec<String>>,
    /// Policy ARN -> (default version id, encoded document).
    pub managed: HashMap<String, (String, String)>,
    /// Inline policy name -> encoded document.
    pub inline: HashMap<String, String>,
    /// (action, resource) -> pages of raw decisions. Missing pairs are allowed.
    pub decisions: HashMap<(String, String), Vec<Vec<String>>>,
    /// Operation names that fail unconditionally.
    pub failing: HashSet<&'static str>,
    /// Every remote call in order, e.g. `SimulateCustomPolicy(a,r,None)`.
    pub calls: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn with_managed(mut self, arn: &str, document: &str) -> Self {
        let name = arn.rsplit('/').next().unwrap_or(arn).to_string();
        if self.attached_pages.is_empty() {
            self.attached_pages.push(Vec::new());
        }
        self.attached_pages
            .last_mut()
            .unwrap()
            .push(AttachedPolicy {
                policy_arn: arn.to_string(),
                policy_name: name,
            });
        self.managed
            .insert(arn.to_string(), ("v1".to_string(), encode(document)));
        self
    }

    pub fn with_inline(mut self, name: &str, document: &str) -> Self {
        if self.inline_pages.is_empty() {
            self.inline_pages.push(Vec::new());
        }
        self.inline_pages.last_mut().unwrap().push(name.to_string());
        self.inline.insert(name.to_string(), encode(document));
        self
    }

    pub fn with_decision(mut self, action: &str, resource: &str, pages: &[&[&str]]) -> Self {
        let pages = pages
            .iter()
            .map(|page| page.iter().map(|d| (*d).to_string()).collect())
            .collect();
        self.decisions
            .insert((action.to_string(), resource.to_string()), pages);
        self
    }

    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(&format!("{operation}(")))
            .count()
    }

    fn record(&self, operation: &'static str, detail: String) -> PolicySimResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation}({detail})"));
        if self.failing.contains(operation) {
            return Err(PolicySimError::remote(operation, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl PolicyStore for FakeStore {
    async fn list_attached_role_policies(
        &self,
        role_name: &str,
        marker: Option<Marker>,
    ) -> PolicySimResult<Page<AttachedPolicy, Marker>> {
        self.record(
            "ListAttachedRolePolicies",
            format!("{role_name},{marker:?}"),
        )?;
        Ok(page_of(&self.attached_pages, marker.as_ref()))
    }

    async fn get_policy(&self, policy_arn: &str) -> PolicySimResult<ManagedPolicy> {
        self.record("GetPolicy", policy_arn.to_string())?;
        let (version, _) = self
            .managed
            .get(policy_arn)
            .ok_or_else(|| PolicySimError::remote("GetPolicy", "NoSuchEntity"))?;
        Ok(ManagedPolicy {
            arn: policy_arn.to_string(),
            default_version_id: version.clone(),
        })
    }

    async fn get_policy_version_document(
        &self,
        policy_arn: &str,
        version_id: &str,
    ) -> PolicySimResult<String> {
        self.record("GetPolicyVersion", format!("{policy_arn},{version_id}"))?;
        self.managed
            .get(policy_arn)
            .map(|(_, document)| document.clone())
            .ok_or_else(|| PolicySimError::remote("GetPolicyVersion", "NoSuchEntity"))
    }

    async fn list_role_policy_names(
        &self,
        role_name: &str,
        marker: Option<Marker>,
    ) -> PolicySimResult<Page<String, Marker>> {
        self.record("ListRolePolicies", format!("{role_name},{marker:?}"))?;
        Ok(page_of(&self.inline_pages, marker.as_ref()))
    }

    async fn get_role_policy_document(
        &self,
        role_name: &str,
        policy_name: &str,
    ) -> PolicySimResult<String> {
        self.record("GetRolePolicy", format!("{role_name},{policy_name}"))?;
        self.inline
            .get(policy_name)
            .cloned()
            .ok_or_else(|| PolicySimError::remote("GetRolePolicy", "NoSuchEntity"))
    }

    async fn simulate_custom_policy(
        &self,
        action: &str,
        resource: &str,
        policy_documents: &[String],
        marker: Option<Marker>,
    ) -> PolicySimResult<Page<EvaluationResult, Marker>> {
        self.record(
            "SimulateCustomPolicy",
            format!("{action},{resource},{}docs,{marker:?}", policy_documents.len()),
        )?;
        let default_pages = vec![vec!["allowed".to_string()]];
        let pages = self
            .decisions
            .get(&(action.to_string(), resource.to_string()))
            .unwrap_or(&default_pages);
        let page = page_of(pages, marker.as_ref());
        Ok(Page {
            items: page
                .items
                .into_iter()
                .map(|decision| EvaluationResult {
                    action: action.to_string(),
                    resource: Some(resource.to_string()),
                    decision: DecisionKind::from_raw(&decision),
                })
                .collect(),
            next_cursor: page.next_cursor,
        })
    }
}
