//! Evaluation matrix expansion and simulator invocation.

pub mod aggregate;

use futures::stream::{self, Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::aws::PolicyStore;
use crate::error::{PolicySimError, PolicySimResult};
use crate::pagination::{paginate, stop_after_error};
use crate::types::{DecisionRecord, EvaluationPair, NormalizedCheck};

pub use aggregate::{aggregate, describe, DecisionReporter, LogReporter};

/// Every pair to evaluate: checks in declaration order, then actions, then
/// resources.
pub fn evaluation_pairs(checks: &[NormalizedCheck]) -> impl Iterator<Item = EvaluationPair> + '_ {
    checks.iter().flat_map(NormalizedCheck::pairs)
}

/// Lazily simulate every pair of `checks` against all `documents`.
///
/// One record is yielded per evaluation result returned by the simulator.
/// The first error ends the sequence; no further pairs are simulated.
pub fn simulate<'a, S>(
    store: &'a S,
    checks: &'a [NormalizedCheck],
    documents: &'a [String],
    cancel: CancellationToken,
) -> impl Stream<Item = PolicySimResult<DecisionRecord>> + 'a
where
    S: PolicyStore + ?Sized,
{
    let records = stream::iter(evaluation_pairs(checks))
        .flat_map(move |pair| simulate_pair(store, pair, documents, cancel.clone()));
    stop_after_error(records)
}

/// Simulate one pair, following simulator pagination.
///
/// A pair for which the simulator returns no result at all fails with
/// [`PolicySimError::UnexpectedDecision`].
fn simulate_pair<'a, S>(
    store: &'a S,
    pair: EvaluationPair,
    documents: &'a [String],
    cancel: CancellationToken,
) -> impl Stream<Item = PolicySimResult<DecisionRecord>> + 'a
where
    S: PolicyStore + ?Sized,
{
    let requested = pair.clone();
    let results = paginate(cancel, move |marker| {
        let EvaluationPair { action, resource } = requested.clone();
        async move {
            store
                .simulate_custom_policy(&action, &resource, documents, marker)
                .await
        }
    });

    let fallback_resource = pair.resource.clone();
    let records = results
        .map(move |result| -> PolicySimResult<DecisionRecord> {
            let result = result?;
            Ok(DecisionRecord {
                action: result.action,
                resource: result
                    .resource
                    .unwrap_or_else(|| fallback_resource.clone()),
                decision: result.decision,
            })
        })
        .peekable();

    stream::once(async move {
        let mut records = Box::pin(records);
        if records.as_mut().peek().await.is_some() {
            return records.left_stream();
        }
        let EvaluationPair { action, resource } = pair;
        stream::iter(vec![Err::<DecisionRecord, _>(PolicySimError::UnexpectedDecision {
            action,
            resource,
            detail: "simulator returned no evaluation results".to_string(),
        })])
        .right_stream()
    })
    .flatten()
}
