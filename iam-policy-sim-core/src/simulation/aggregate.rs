//! Reduction of simulated decisions into a single run outcome.

use futures::{Stream, StreamExt};
use log::{info, log, Level};

use crate::error::PolicySimResult;
use crate::types::{DecisionRecord, RunResult};

/// Receives one diagnostic per simulated pair.
pub trait DecisionReporter {
    fn report(&mut self, record: &DecisionRecord);
}

/// Reports decisions through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl DecisionReporter for LogReporter {
    fn report(&mut self, record: &DecisionRecord) {
        let (level, message) = describe(record);
        log!(level, "{message}");
    }
}

/// Diagnostic level and line for one decision.
pub fn describe(record: &DecisionRecord) -> (Level, String) {
    let level = if record.decision.is_allowed() {
        Level::Info
    } else {
        Level::Error
    };
    (
        level,
        format!(
            "{} action={} resource={}",
            record.decision, record.action, record.resource
        ),
    )
}

/// Consume every record, reporting each one, and compute the run outcome.
///
/// Denies do not stop consumption; an error item aborts the run.
pub async fn aggregate<St, R>(records: St, reporter: &mut R) -> PolicySimResult<RunResult>
where
    St: Stream<Item = PolicySimResult<DecisionRecord>>,
    R: DecisionReporter + ?Sized,
{
    let mut records = std::pin::pin!(records);
    let mut result = RunResult::default();

    while let Some(record) = records.next().await {
        let record = record?;
        reporter.report(&record);
        result.any_failed |= !record.decision.is_allowed();
        result.records.push(record);
    }

    info!(
        "Simulated {} pairs, {} not allowed",
        result.records.len(),
        result.failed_count()
    );
    Ok(result)
}
