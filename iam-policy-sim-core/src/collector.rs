//! Collects every policy document effectively attached to a role.

use futures::StreamExt;
use log::debug;
use tokio_util::sync::CancellationToken;

use crate::aws::policy_document::unescape_policy_document;
use crate::aws::PolicyStore;
use crate::error::{PolicySimError, PolicySimResult};
use crate::pagination::{ensure_active, paginate};
use crate::types::PolicyReference;

// A role can have at most 20 managed policies attached.
const EXPECTED_POLICY_COUNT: usize = 20;

/// Collect decoded policy documents of `role_name`: managed policies in
/// attachment order first, then inline policies in listing order.
///
/// Fails with [`PolicySimError::NoPolicyAttached`] if the role has none.
pub async fn collect_policy_documents<S>(
    store: &S,
    role_name: &str,
    cancel: &CancellationToken,
) -> PolicySimResult<Vec<String>>
where
    S: PolicyStore + ?Sized,
{
    let mut documents = Vec::with_capacity(EXPECTED_POLICY_COUNT);

    let attached = paginate(cancel.clone(), move |marker| {
        store.list_attached_role_policies(role_name, marker)
    });
    let mut attached = std::pin::pin!(attached);
    while let Some(attachment) = attached.next().await {
        let attachment = attachment
            .map_err(|e| e.within(format_args!("listing managed policies of role '{role_name}'")))?;
        let reference = PolicyReference::Managed {
            arn: attachment.policy_arn,
            name: attachment.policy_name,
        };
        documents.push(fetch_document(store, role_name, &reference, cancel).await?);
    }

    let inline = paginate(cancel.clone(), move |marker| {
        store.list_role_policy_names(role_name, marker)
    });
    let mut inline = std::pin::pin!(inline);
    while let Some(name) = inline.next().await {
        let name =
            name.map_err(|e| e.within(format_args!("listing inline policies of role '{role_name}'")))?;
        let reference = PolicyReference::Inline { name };
        documents.push(fetch_document(store, role_name, &reference, cancel).await?);
    }

    if documents.is_empty() {
        return Err(PolicySimError::NoPolicyAttached {
            role_name: role_name.to_string(),
        });
    }
    debug!(
        "Collected {} policy documents for role '{}'",
        documents.len(),
        role_name
    );
    Ok(documents)
}

/// Fetch and decode the document behind one policy reference.
async fn fetch_document<S>(
    store: &S,
    role_name: &str,
    reference: &PolicyReference,
    cancel: &CancellationToken,
) -> PolicySimResult<String>
where
    S: PolicyStore + ?Sized,
{
    let raw = match reference {
        PolicyReference::Managed { arn, name } => {
            debug!("Resolving default version of {} ({})", reference, name);
            ensure_active(cancel)?;
            let policy = store
                .get_policy(arn)
                .await
                .map_err(|e| e.within(reference))?;
            ensure_active(cancel)?;
            store
                .get_policy_version_document(&policy.arn, &policy.default_version_id)
                .await
                .map_err(|e| {
                    e.within(format_args!(
                        "{reference} version {}",
                        policy.default_version_id
                    ))
                })?
        }
        PolicyReference::Inline { name } => {
            ensure_active(cancel)?;
            store
                .get_role_policy_document(role_name, name)
                .await
                .map_err(|e| e.within(format_args!("{reference} of role '{role_name}'")))?
        }
    };

    unescape_policy_document(&raw, &reference.to_string())
}
