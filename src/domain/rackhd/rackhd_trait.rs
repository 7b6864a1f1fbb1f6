use async_trait::async_trait;

use crate::{
    api::{
        node_dto::{NodeDto, ObmSettingDto},
        workflow_dto::{DefinitionStub, RunWorkflowRequest, WorkflowResponse},
    },
    domain::{rackhd::rackhd_endpoint::LibraryKind, utils::id::NodeId},
    error::Result,
};

/// The RackHD calls the selector, publisher and runner depend on.
///
/// Every method is a single remote round trip. Non-success responses come back
/// as `Error::UnexpectedResponse` carrying the status and body text.
#[async_trait]
pub trait RackHdApi: Send + Sync {
    // GET /api/common/nodes
    async fn get_nodes(&self) -> Result<Vec<NodeDto>>;

    // GET /api/common/nodes/{id}
    async fn get_obm_settings(&self, node_id: &NodeId) -> Result<Vec<ObmSettingDto>>;

    // GET /api/1.1/nodes/{id}/workflows/active
    async fn get_active_workflows(&self, node_id: &NodeId) -> Result<Vec<WorkflowResponse>>;

    // PUT /api/1.1/workflows or /api/1.1/workflows/tasks
    async fn put_definition(&self, kind: LibraryKind, definition: Vec<u8>) -> Result<()>;

    // GET /api/1.1/workflows/library or /api/1.1/workflows/tasks/library
    async fn get_library(&self, kind: LibraryKind) -> Result<Vec<DefinitionStub>>;

    // POST /api/1.1/nodes/{id}/workflows/, expects 201 Created
    async fn run_workflow(&self, node_id: &NodeId, request: &RunWorkflowRequest) -> Result<WorkflowResponse>;

    // GET /api/1.1/nodes/{id}/workflows
    async fn get_node_workflows(&self, node_id: &NodeId) -> Result<Vec<WorkflowResponse>>;

    // DELETE /api/1.1/nodes/{id}/workflows/active
    async fn kill_active_workflows(&self, node_id: &NodeId) -> Result<()>;
}
