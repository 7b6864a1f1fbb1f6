use std::sync::Arc;

use crate::api::config_dto::CpiConfig;
use crate::domain::node_selector::NodeSelector;
use crate::domain::rackhd::rackhd_client::RackHdClient;
use crate::domain::rackhd::rackhd_trait::RackHdApi;
use crate::domain::workflow_run::publisher::WorkflowPublisher;
use crate::domain::workflow_run::runner::WorkflowRunner;
use crate::error::Result;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// The three entry points wired to a single RackHD connection.
#[derive(Clone)]
pub struct Cpi {
    pub config: CpiConfig,
    pub selector: NodeSelector,
    pub publisher: WorkflowPublisher,
    pub runner: WorkflowRunner,
}

impl Cpi {
    pub fn new(config: CpiConfig, api: Arc<dyn RackHdApi>) -> Result<Self> {
        config.validate()?;

        let selector = NodeSelector::new(api.clone());
        let publisher = WorkflowPublisher::new(api.clone());
        let runner = WorkflowRunner::from_config(api, &config)?;

        Ok(Cpi { config, selector, publisher, runner })
    }

    /// Loads the config file and connects to the RackHD server it names.
    pub fn from_config_file(file_path: &str) -> Result<Self> {
        let config = CpiConfig::load(file_path)?;
        let client = RackHdClient::new(&config)?;
        log::info!("Using RackHD api server {}", client.api_url());

        Self::new(config, Arc::new(client))
    }
}
