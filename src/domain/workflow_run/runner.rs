use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};

use crate::{
    api::{
        config_dto::CpiConfig,
        workflow_dto::{RunWorkflowRequest, WorkflowDefinition},
    },
    domain::{
        rackhd::rackhd_trait::RackHdApi,
        utils::id::{NodeId, WorkflowRunId},
        workflow_run::{
            publisher::WorkflowPublisher,
            status_resolver::{ResolvedStatus, resolve_response},
        },
    },
    error::{Error, Result},
};

const WORKFLOW_OUTCOME_TARGET: &str = "workflow_outcome";

/// How a run ended when it did not end in an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunCompletion {
    Succeeded,
    /// Cancelled on the RackHD side. Reported as a clean finish, not as a failure.
    Cancelled,
}

/// Submits workflow runs against a node and follows them until they finish.
///
/// A run goes through `Submitted -> Polling` and ends in one of:
/// - `Succeeded` / `Cancelled`: `Ok(RunCompletion)`
/// - `Failed`: `Error::WorkflowFailed`
/// - an unknown status: `Error::UnexpectedStatus`
/// - deadline reached: the node's active workflows are deleted, then
///   `Error::WorkflowTimedOut`, or `Error::AbortFailed` if the delete failed.
///
/// The deadline always wins over a poll that has not produced a result yet.
#[derive(Clone)]
pub struct WorkflowRunner {
    api: Arc<dyn RackHdApi>,
    publisher: WorkflowPublisher,
    poll_interval: Duration,
}

impl WorkflowRunner {
    /// Fails with `Error::InvalidConfig` on a zero `poll_interval`, which the poll timer cannot run with.
    pub fn new(api: Arc<dyn RackHdApi>, poll_interval: Duration) -> Result<Self> {
        if poll_interval.is_zero() {
            return Err(Error::InvalidConfig("poll interval must be greater than zero".to_string()));
        }

        let publisher = WorkflowPublisher::new(api.clone());
        Ok(WorkflowRunner { api, publisher, poll_interval })
    }

    pub fn from_config(api: Arc<dyn RackHdApi>, config: &CpiConfig) -> Result<Self> {
        Self::new(api, config.poll_interval())
    }

    /// Publishes `definition` to the workflow library and runs it on `node_id`.
    pub async fn publish_and_run(
        &self,
        node_id: &NodeId,
        definition: &WorkflowDefinition,
        options: HashMap<String, serde_json::Value>,
        timeout: Duration,
    ) -> Result<RunCompletion> {
        let definition_bytes = serde_json::to_vec(definition)?;
        self.publisher.publish_workflow(&definition_bytes).await?;

        let request = RunWorkflowRequest::new(definition.name.clone()).with_options(options);
        self.run_workflow(node_id, &request, timeout).await
    }

    pub async fn run_workflow(&self, node_id: &NodeId, request: &RunWorkflowRequest, timeout: Duration) -> Result<RunCompletion> {
        // Submission is not idempotent, so a failed submit is never retried.
        let run = self.api.run_workflow(node_id, request).await?;
        let run_id = WorkflowRunId::new(run.id);
        log::info!("submitted workflow: {} as run {} against node: {}", request.name, run_id, node_id);

        let deadline = sleep(timeout);
        tokio::pin!(deadline);

        let mut poll_timer = interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut polls: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = &mut deadline => return Err(self.abort_timed_out(node_id, &request.name).await),
                _ = poll_timer.tick() => {}
            }

            let status = tokio::select! {
                biased;
                _ = &mut deadline => return Err(self.abort_timed_out(node_id, &request.name).await),
                status = self.poll_status(node_id, &run_id) => status?,
            };
            polls += 1;

            tracing::trace!(node_id = %node_id, run_id = %run_id, status = ?status, "polled workflow run");

            if status.is_terminal() {
                tracing::info!(
                    target: WORKFLOW_OUTCOME_TARGET,
                    node_id = %node_id,
                    workflow = %request.name,
                    run_id = %run_id,
                    outcome = ?status,
                    polls = polls,
                    "workflow run finished"
                );
            }

            match status {
                ResolvedStatus::Running => {
                    log::debug!("workflow: {} is still running against node: {}", request.name, node_id);
                }
                ResolvedStatus::Succeeded => {
                    log::info!("workflow: {} completed successfully against node: {}", request.name, node_id);
                    return Ok(RunCompletion::Succeeded);
                }
                ResolvedStatus::Failed => {
                    log::error!("workflow: {} failed against node: {}", request.name, node_id);
                    return Err(Error::WorkflowFailed { workflow: request.name.clone(), node_id: node_id.to_string() });
                }
                ResolvedStatus::Cancelled => {
                    log::warn!("workflow: {} was cancelled against node: {}", request.name, node_id);
                    return Ok(RunCompletion::Cancelled);
                }
                ResolvedStatus::Unknown(status) => {
                    log::error!("workflow: {} has unexpected status {} on node: {}", request.name, status, node_id);
                    return Err(Error::UnexpectedStatus { workflow: request.name.clone(), status, node_id: node_id.to_string() });
                }
            }
        }
    }

    async fn poll_status(&self, node_id: &NodeId, run_id: &WorkflowRunId) -> Result<ResolvedStatus> {
        let runs = self.api.get_node_workflows(node_id).await.inspect_err(|e| {
            log::error!("Unable to fetch workflow status for run {} on node {}: {}", run_id, node_id, e);
        })?;

        match runs.iter().find(|run| run.id == run_id.as_str()) {
            Some(run) => Ok(resolve_response(run)),
            None => {
                log::error!("could not find workflow run with id: {} on node: {}", run_id, node_id);
                Err(Error::WorkflowRunNotFound { run_id: run_id.to_string(), node_id: node_id.to_string() })
            }
        }
    }

    async fn abort_timed_out(&self, node_id: &NodeId, workflow: &str) -> Error {
        match self.api.kill_active_workflows(node_id).await {
            Ok(()) => {
                log::warn!("Timed out running workflow: {} on node: {}", workflow, node_id);
                Error::WorkflowTimedOut { workflow: workflow.to_string(), node_id: node_id.to_string() }
            }
            Err(e) => {
                log::error!("Could not abort timed out workflow: {} on node: {}: {}", workflow, node_id, e);
                Error::AbortFailed { workflow: workflow.to_string(), node_id: node_id.to_string(), source: Box::new(e) }
            }
        }
    }
}
