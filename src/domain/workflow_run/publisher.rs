use std::sync::Arc;

use crate::{
    api::workflow_dto::DefinitionStub,
    domain::rackhd::{rackhd_endpoint::LibraryKind, rackhd_trait::RackHdApi},
    error::{Error, Result},
};

/// Uploads workflow and task definitions and checks that RackHD actually lists them.
///
/// RackHD may answer the upload with 200 before the definition shows up in the
/// library, so a definition only counts as published once a fresh listing contains it.
#[derive(Clone)]
pub struct WorkflowPublisher {
    api: Arc<dyn RackHdApi>,
}

impl WorkflowPublisher {
    pub fn new(api: Arc<dyn RackHdApi>) -> Self {
        WorkflowPublisher { api }
    }

    pub async fn publish_workflow(&self, definition: &[u8]) -> Result<()> {
        self.publish(LibraryKind::Workflow, definition).await
    }

    pub async fn publish_task(&self, definition: &[u8]) -> Result<()> {
        self.publish(LibraryKind::Task, definition).await
    }

    /// Publishes `definition` into the `kind` library. Re-publishing an existing name is not an error.
    pub async fn publish(&self, kind: LibraryKind, definition: &[u8]) -> Result<()> {
        let stub: DefinitionStub = serde_json::from_slice(definition).map_err(|e| {
            log::error!("error unmarshalling {} definition: {}", kind, e);
            Error::DeserializationError(e)
        })?;

        self.api.put_definition(kind, definition.to_vec()).await?;
        log::debug!("uploaded {} {}", kind, stub.name);

        let library = self.api.get_library(kind).await?;
        if !library.iter().any(|published| published.name == stub.name) {
            log::error!("{} {} was not successfully uploaded to server", kind, stub.name);
            return Err(Error::PublishVerificationFailed { kind: kind.to_string(), name: stub.name });
        }

        log::info!("published {} {}", kind, stub.name);
        Ok(())
    }
}
