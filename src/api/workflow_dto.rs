use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `friendlyName` stamped on every definition this crate uploads.
pub const DEFAULT_UNUSED_NAME: &str = "UPLOADED_BY_RACKHD_CPI";

/// The part of a workflow or task definition needed to find it in a library listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionStub {
    #[serde(rename = "injectableName")]
    pub name: String,

    #[serde(rename = "friendlyName", default)]
    pub unused_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTask {
    pub label: String,
    pub task_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_on: Option<HashMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_failure: Option<bool>,
}

/// A graph template stored in the RackHD workflow library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    #[serde(rename = "injectableName")]
    pub name: String,

    #[serde(rename = "friendlyName", default)]
    pub unused_name: String,

    #[serde(default)]
    pub tasks: Vec<WorkflowTask>,

    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,
}

impl WorkflowDefinition {
    /// Renames the definition to `<name>.<uuid>` so concurrent requests never share a library entry.
    pub fn with_unique_name(mut self) -> Self {
        self.name = format!("{}.{}", self.name, Uuid::new_v4());
        self.unused_name = DEFAULT_UNUSED_NAME.to_string();
        self
    }
}

/// A task definition stored in the RackHD task library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    #[serde(rename = "injectableName")]
    pub name: String,

    #[serde(rename = "friendlyName", default)]
    pub unused_name: String,

    pub implements_task: String,

    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,

    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

/// Body of `POST /api/1.1/nodes/{id}/workflows/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunWorkflowRequest {
    pub name: String,

    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,
}

impl RunWorkflowRequest {
    pub fn new(name: impl Into<String>) -> Self {
        RunWorkflowRequest { name: name.into(), options: HashMap::new() }
    }

    pub fn with_options(mut self, options: HashMap<String, serde_json::Value>) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    #[serde(default)]
    pub state: String,

    #[serde(flatten)]
    pub extra_fields: HashMap<String, serde_json::Value>,
}

/// A workflow run as reported by RackHD. Written only by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResponse {
    pub id: String,

    #[serde(rename = "injectableName", default)]
    pub name: String,

    #[serde(default)]
    pub tasks: HashMap<String, TaskResponse>,

    #[serde(rename = "_status", default)]
    pub status: String,

    #[serde(rename = "pendingTasks", default)]
    pub pending_tasks: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_name_keeps_base_and_differs_per_call() {
        let definition = WorkflowDefinition {
            name: "Graph.BOSH.ProvisionNode".to_string(),
            unused_name: String::new(),
            tasks: vec![],
            options: HashMap::new(),
        };

        let first = definition.clone().with_unique_name();
        let second = definition.with_unique_name();

        assert!(first.name.starts_with("Graph.BOSH.ProvisionNode."));
        assert_ne!(first.name, second.name);
        assert_eq!(first.unused_name, DEFAULT_UNUSED_NAME);
    }

    #[test]
    fn workflow_response_reads_remote_field_names() {
        let body = r#"{"id": "run-1", "injectableName": "Graph.X", "_status": "valid", "pendingTasks": [{"label": "a"}], "tasks": {"a": {"state": "pending"}}}"#;
        let response: WorkflowResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.id, "run-1");
        assert_eq!(response.status, "valid");
        assert_eq!(response.pending_tasks.len(), 1);
        assert_eq!(response.tasks["a"].state, "pending");
    }

    #[test]
    fn workflow_task_serializes_camel_case_and_skips_empty_options() {
        let task = WorkflowTask { label: "set-boot-pxe".to_string(), task_name: "Task.Obm.Node.PxeBoot".to_string(), wait_on: None, ignore_failure: Some(true) };
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["taskName"], "Task.Obm.Node.PxeBoot");
        assert_eq!(json["ignoreFailure"], true);
        assert!(json.get("waitOn").is_none());
    }
}
