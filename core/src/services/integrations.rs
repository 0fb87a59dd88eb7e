/// Integration endpoints — read-mostly channel wiring
use crate::api::ApiClient;
use crate::error::Result;
use crate::types::{Ack, Integration, IntegrationCreate, IntegrationUpdate};
use std::sync::Arc;

pub struct IntegrationService {
    api: Arc<ApiClient>,
}

impl IntegrationService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Integration>> {
        self.api.get("/integrations", &[]).await
    }

    pub async fn create(&self, payload: &IntegrationCreate) -> Result<Integration> {
        self.api.post("/integrations", payload).await
    }

    pub async fn update(&self, integration_id: &str, patch: &IntegrationUpdate) -> Result<Integration> {
        self.api
            .put(&format!("/integrations/{}", integration_id), patch)
            .await
    }

    pub async fn delete(&self, integration_id: &str) -> Result<Ack> {
        self.api
            .delete(&format!("/integrations/{}", integration_id))
            .await
    }

    /// One-shot remote probe of the channel
    pub async fn test(&self, integration_id: &str) -> Result<serde_json::Value> {
        self.api
            .post_empty(&format!("/integrations/test/{}", integration_id))
            .await
    }
}
