use crate::api::workflow_dto::WorkflowResponse;

pub const WORKFLOW_VALID_STATUS: &str = "valid";
pub const WORKFLOW_SUCCEEDED_STATUS: &str = "succeeded";
pub const WORKFLOW_FAILED_STATUS: &str = "failed";
pub const WORKFLOW_CANCELLED_STATUS: &str = "cancelled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedStatus {
    Running,
    Succeeded,
    Failed,
    Cancelled,
    Unknown(String),
}

impl ResolvedStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ResolvedStatus::Running)
    }
}

/// Maps a RackHD run status onto an outcome.
///
/// RackHD can keep reporting `valid` after the last task finished, so a valid
/// run without pending tasks counts as succeeded.
pub fn resolve_status<T>(status: &str, pending_tasks: &[T]) -> ResolvedStatus {
    match status {
        WORKFLOW_VALID_STATUS if pending_tasks.is_empty() => ResolvedStatus::Succeeded,
        WORKFLOW_VALID_STATUS => ResolvedStatus::Running,
        WORKFLOW_SUCCEEDED_STATUS => ResolvedStatus::Succeeded,
        WORKFLOW_FAILED_STATUS => ResolvedStatus::Failed,
        WORKFLOW_CANCELLED_STATUS => ResolvedStatus::Cancelled,
        other => ResolvedStatus::Unknown(other.to_string()),
    }
}

pub fn resolve_response(response: &WorkflowResponse) -> ResolvedStatus {
    resolve_status(&response.status, &response.pending_tasks)
}
