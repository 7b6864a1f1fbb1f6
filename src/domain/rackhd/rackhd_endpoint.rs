use crate::domain::utils::id::NodeId;

/// Which RackHD library a definition is published into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryKind {
    Workflow,
    Task,
}

impl LibraryKind {
    pub fn publish_endpoint(&self) -> RackHdEndpoint {
        match self {
            Self::Workflow => RackHdEndpoint::Workflows,
            Self::Task => RackHdEndpoint::Tasks,
        }
    }

    pub fn library_endpoint(&self) -> RackHdEndpoint {
        match self {
            Self::Workflow => RackHdEndpoint::WorkflowLibrary,
            Self::Task => RackHdEndpoint::TaskLibrary,
        }
    }
}

impl std::fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Workflow => write!(f, "workflow"),
            Self::Task => write!(f, "task"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RackHdEndpoint {
    Nodes,
    Node(NodeId),
    NodeWorkflows(NodeId),
    NodeActiveWorkflows(NodeId),
    RunWorkflow(NodeId),
    Workflows,
    WorkflowLibrary,
    Tasks,
    TaskLibrary,
}

impl RackHdEndpoint {
    pub fn path(&self) -> String {
        match self {
            Self::Nodes => "/api/common/nodes".to_string(),
            Self::Node(node_id) => format!("/api/common/nodes/{}", node_id),
            Self::NodeWorkflows(node_id) => format!("/api/1.1/nodes/{}/workflows", node_id),
            Self::NodeActiveWorkflows(node_id) => format!("/api/1.1/nodes/{}/workflows/active", node_id),
            // RackHD routes the run request with a trailing slash.
            Self::RunWorkflow(node_id) => format!("/api/1.1/nodes/{}/workflows/", node_id),
            Self::Workflows => "/api/1.1/workflows".to_string(),
            Self::WorkflowLibrary => "/api/1.1/workflows/library".to_string(),
            Self::Tasks => "/api/1.1/workflows/tasks".to_string(),
            Self::TaskLibrary => "/api/1.1/workflows/tasks/library".to_string(),
        }
    }

    pub fn url(&self, api_url: &str) -> String {
        format!("{}{}", api_url.trim_end_matches('/'), self.path())
    }
}
