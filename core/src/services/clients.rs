/// Client endpoints
use crate::api::ApiClient;
use crate::error::Result;
use crate::types::{Ack, CallAck, Client, ClientCreate, ClientStatus, ClientUpdate, DashboardStats, MessageSource};
use std::sync::Arc;

pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

pub struct ClientService {
    api: Arc<ApiClient>,
}

impl ClientService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// List clients, optionally filtered by status and source
    pub async fn list(
        &self,
        status: Option<ClientStatus>,
        source: Option<MessageSource>,
        limit: Option<u32>,
    ) -> Result<Vec<Client>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(source) = source {
            query.push(("source", source.as_str().to_string()));
        }
        query.push(("limit", limit.unwrap_or(DEFAULT_LIST_LIMIT).to_string()));
        self.api.get("/clients", &query).await
    }

    pub async fn get(&self, client_id: &str) -> Result<Client> {
        self.api.get(&format!("/clients/{}", client_id), &[]).await
    }

    pub async fn create(&self, payload: &ClientCreate) -> Result<Client> {
        self.api.post("/clients", payload).await
    }

    pub async fn update(&self, client_id: &str, patch: &ClientUpdate) -> Result<Client> {
        self.api.put(&format!("/clients/{}", client_id), patch).await
    }

    /// Most recently active chats
    pub async fn recent(&self, limit: u32) -> Result<Vec<Client>> {
        self.api
            .get("/clients/recent", &[("limit", limit.to_string())])
            .await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.api.get("/clients/dashboard", &[]).await
    }

    /// Trigger external telephony. Side-effecting.
    pub async fn call(&self, client_id: &str) -> Result<CallAck> {
        self.api.post_empty(&format!("/clients/{}/call", client_id)).await
    }

    /// Close the lead. Side-effecting.
    pub async fn close(&self, client_id: &str) -> Result<Ack> {
        self.api.post_empty(&format!("/clients/{}/close", client_id)).await
    }
}
