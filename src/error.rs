use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Error sending request to RackHD: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed {method} {url} with status: {status}, message: {body}")]
    UnexpectedResponse { method: String, url: String, status: StatusCode, body: String },

    #[error("all nodes have been reserved")]
    NoAvailableNodes,

    #[error("{kind} {name} was not successfully uploaded to server")]
    PublishVerificationFailed { kind: String, name: String },

    #[error("could not find workflow run with id: {run_id} on node: {node_id}")]
    WorkflowRunNotFound { run_id: String, node_id: String },

    #[error("workflow: {workflow} failed against node: {node_id}")]
    WorkflowFailed { workflow: String, node_id: String },

    #[error("workflow: {workflow} has unexpected status {status} on node: {node_id}")]
    UnexpectedStatus { workflow: String, status: String, node_id: String },

    #[error("Timed out running workflow: {workflow} on node: {node_id}")]
    WorkflowTimedOut { workflow: String, node_id: String },

    #[error("Could not abort timed out workflow: {workflow} on node: {node_id}: {source}")]
    AbortFailed {
        workflow: String,
        node_id: String,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
