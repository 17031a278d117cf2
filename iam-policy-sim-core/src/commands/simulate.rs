//! Simulation run logic for the policy simulator service

use log::{debug, info};

use crate::aws::PolicyStore;
use crate::collector;
use crate::error::PolicySimResult;
use crate::simulation::{aggregate, simulate, DecisionReporter};
use crate::types::{NormalizedCheck, RunResult};

impl<S: PolicyStore> super::service::PolicySimulatorService<S> {
    /// Collect the decoded policy documents attached to `role_name`.
    pub async fn collect_policy_documents(&self, role_name: &str) -> PolicySimResult<Vec<String>> {
        collector::collect_policy_documents(&self.store, role_name, &self.cancel).await
    }

    /// Simulate every pair of `checks` against the policies of `role_name`.
    ///
    /// Each pair is reported to `reporter` as it is evaluated. Any remote,
    /// decoding or cancellation failure aborts the run; denies do not.
    pub async fn run<R>(
        &self,
        role_name: &str,
        checks: &[NormalizedCheck],
        reporter: &mut R,
    ) -> PolicySimResult<RunResult>
    where
        R: DecisionReporter + ?Sized,
    {
        info!("Simulating {} statements against role '{}'", checks.len(), role_name);
        let documents = self.collect_policy_documents(role_name).await?;
        debug!("Simulating against {} policy documents", documents.len());

        let records = simulate(&self.store, checks, &documents, self.cancel.clone());
        aggregate(records, reporter).await
    }
}
