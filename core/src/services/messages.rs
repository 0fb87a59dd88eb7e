/// Message endpoints
use crate::api::ApiClient;
use crate::error::Result;
use crate::types::{Ack, Message, MessageCreate, UnreadCount};
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_CHAT_LIMIT: u32 = 100;
pub const DEFAULT_INBOX_LIMIT: u32 = 50;
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

#[derive(Serialize)]
struct RespondBody<'a> {
    client_id: &'a str,
    content: &'a str,
}

pub struct MessageService {
    api: Arc<ApiClient>,
}

impl MessageService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Full thread for one client, newest first
    pub async fn for_client(&self, client_id: &str, limit: Option<u32>) -> Result<Vec<Message>> {
        self.api
            .get(
                &format!("/messages/client/{}", client_id),
                &[("limit", limit.unwrap_or(DEFAULT_CHAT_LIMIT).to_string())],
            )
            .await
    }

    /// Recent messages across all clients (unified inbox)
    pub async fn recent(&self, limit: Option<u32>) -> Result<Vec<Message>> {
        self.api
            .get(
                "/messages",
                &[("limit", limit.unwrap_or(DEFAULT_INBOX_LIMIT).to_string())],
            )
            .await
    }

    /// Send a reply to a client. Side-effecting; the created outgoing
    /// message comes back in the response.
    pub async fn respond(&self, client_id: &str, content: &str) -> Result<Message> {
        self.api
            .post("/messages/respond", &RespondBody { client_id, content })
            .await
    }

    /// Record an externally received message (webhook replays, manual import)
    pub async fn create(&self, payload: &MessageCreate) -> Result<Message> {
        self.api.post("/messages", payload).await
    }

    /// Idempotent: is_read only ever transitions false → true
    pub async fn mark_read(&self, message_id: &str) -> Result<Ack> {
        self.api
            .patch_empty(&format!("/messages/{}/read", message_id))
            .await
    }

    pub async fn unread_count(&self) -> Result<UnreadCount> {
        self.api.get("/messages/unread-count", &[]).await
    }

    pub async fn search(&self, query: &str, limit: Option<u32>) -> Result<Vec<Message>> {
        self.api
            .get(
                "/messages/search",
                &[
                    ("query", query.to_string()),
                    ("limit", limit.unwrap_or(DEFAULT_SEARCH_LIMIT).to_string()),
                ],
            )
            .await
    }
}
