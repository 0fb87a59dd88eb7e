/// Automation endpoints
use crate::api::ApiClient;
use crate::error::Result;
use crate::types::{Ack, Automation, AutomationCreate, AutomationTemplate, AutomationUpdate};
use std::sync::Arc;

pub const DEFAULT_LOG_LIMIT: u32 = 50;

pub struct AutomationService {
    api: Arc<ApiClient>,
}

impl AutomationService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Automation>> {
        self.api.get("/automation", &[]).await
    }

    pub async fn get(&self, automation_id: &str) -> Result<Automation> {
        self.api.get(&format!("/automation/{}", automation_id), &[]).await
    }

    pub async fn create(&self, payload: &AutomationCreate) -> Result<Automation> {
        self.api.post("/automation", payload).await
    }

    pub async fn update(&self, automation_id: &str, patch: &AutomationUpdate) -> Result<Automation> {
        self.api
            .put(&format!("/automation/{}", automation_id), patch)
            .await
    }

    pub async fn delete(&self, automation_id: &str) -> Result<Ack> {
        self.api.delete(&format!("/automation/{}", automation_id)).await
    }

    /// Fire the rule manually. Side-effecting.
    pub async fn trigger(&self, automation_id: &str, payload: &serde_json::Value) -> Result<serde_json::Value> {
        self.api
            .post(&format!("/automation/{}/trigger", automation_id), payload)
            .await
    }

    /// Dry-run probe; nothing persists
    pub async fn test(&self, automation_id: &str, payload: &serde_json::Value) -> Result<serde_json::Value> {
        self.api
            .post(&format!("/automation/{}/test", automation_id), payload)
            .await
    }

    pub async fn logs(&self, automation_id: &str, limit: Option<u32>) -> Result<Vec<serde_json::Value>> {
        self.api
            .get(
                &format!("/automation/{}/logs", automation_id),
                &[("limit", limit.unwrap_or(DEFAULT_LOG_LIMIT).to_string())],
            )
            .await
    }

    pub async fn templates(&self) -> Result<Vec<AutomationTemplate>> {
        self.api.get("/automation/templates", &[]).await
    }
}
