use async_trait::async_trait;
use reqwest::{
    Method, StatusCode,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;

use crate::{
    api::{
        config_dto::CpiConfig,
        node_dto::{NodeDto, NodeObmDto, ObmSettingDto},
        workflow_dto::{DefinitionStub, RunWorkflowRequest, WorkflowResponse},
    },
    domain::{
        rackhd::{
            rackhd_endpoint::{LibraryKind, RackHdEndpoint},
            rackhd_trait::RackHdApi,
        },
        utils::id::NodeId,
    },
    error::{Error, Result},
};

/// `RackHdApi` over HTTP.
#[derive(Debug, Clone)]
pub struct RackHdClient {
    http: reqwest::Client,
    api_url: String,
}

impl RackHdClient {
    pub fn new(config: &CpiConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder().default_headers(headers).timeout(config.request_timeout()).build()?;

        Ok(RackHdClient { http, api_url: config.api_url.clone() })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Sends one request and returns the body text if `accept` approves the status.
    async fn send(&self, method: Method, endpoint: RackHdEndpoint, body: Option<Vec<u8>>, accept: fn(StatusCode) -> bool) -> Result<String> {
        let url = endpoint.url(&self.api_url);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            log::error!("Error sending {} request to {}: {}", method, url, e);
            Error::TransportError(e)
        })?;

        let status = response.status();
        let body_text = response.text().await?;

        if !accept(status) {
            log::error!("Failed {} {} with status: {}, message: {}", method, url, status, body_text);
            return Err(Error::UnexpectedResponse { method: method.to_string(), url, status, body: body_text });
        }

        log::trace!("{} {} answered {}: {}", method, url, status, body_text);
        Ok(body_text)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: RackHdEndpoint) -> Result<T> {
        let body = self.send(Method::GET, endpoint, None, is_success).await?;
        parse_body(&body)
    }
}

fn is_success(status: StatusCode) -> bool {
    status.is_success()
}

fn is_created(status: StatusCode) -> bool {
    status == StatusCode::CREATED
}

/// RackHD answers an empty body instead of `[]` for some empty listings.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let body = if body.trim().is_empty() { "[]" } else { body };
    serde_json::from_str(body).map_err(|e| {
        log::error!("Error unmarshalling RackHD response: {}", e);
        Error::DeserializationError(e)
    })
}

#[async_trait]
impl RackHdApi for RackHdClient {
    async fn get_nodes(&self) -> Result<Vec<NodeDto>> {
        self.get_json(RackHdEndpoint::Nodes).await
    }

    async fn get_obm_settings(&self, node_id: &NodeId) -> Result<Vec<ObmSettingDto>> {
        let node: NodeObmDto = self.get_json(RackHdEndpoint::Node(node_id.clone())).await?;
        Ok(node.obm_settings)
    }

    async fn get_active_workflows(&self, node_id: &NodeId) -> Result<Vec<WorkflowResponse>> {
        self.get_json(RackHdEndpoint::NodeActiveWorkflows(node_id.clone())).await
    }

    async fn put_definition(&self, kind: LibraryKind, definition: Vec<u8>) -> Result<()> {
        self.send(Method::PUT, kind.publish_endpoint(), Some(definition), is_success).await?;
        Ok(())
    }

    async fn get_library(&self, kind: LibraryKind) -> Result<Vec<DefinitionStub>> {
        self.get_json(kind.library_endpoint()).await
    }

    async fn run_workflow(&self, node_id: &NodeId, request: &RunWorkflowRequest) -> Result<WorkflowResponse> {
        let body = serde_json::to_vec(request)?;
        let response = self.send(Method::POST, RackHdEndpoint::RunWorkflow(node_id.clone()), Some(body), is_created).await?;
        log::debug!("run workflow response for node {}: {}", node_id, response);

        serde_json::from_str(&response).map_err(|e| {
            log::error!("Error unmarshalling run workflow response for node {}: {}", node_id, e);
            Error::DeserializationError(e)
        })
    }

    async fn get_node_workflows(&self, node_id: &NodeId) -> Result<Vec<WorkflowResponse>> {
        self.get_json(RackHdEndpoint::NodeWorkflows(node_id.clone())).await
    }

    async fn kill_active_workflows(&self, node_id: &NodeId) -> Result<()> {
        self.send(Method::DELETE, RackHdEndpoint::NodeActiveWorkflows(node_id.clone()), None, is_success).await?;
        Ok(())
    }
}
