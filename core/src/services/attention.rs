/// Attention triage endpoints — classification is entirely server-side
use crate::api::ApiClient;
use crate::error::Result;
use crate::types::{AttentionListing, AttentionSummary};
use std::sync::Arc;

pub struct AttentionService {
    api: Arc<ApiClient>,
}

impl AttentionService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn listings(&self) -> Result<Vec<AttentionListing>> {
        self.api.get("/attention/listings", &[]).await
    }

    pub async fn summary(&self) -> Result<AttentionSummary> {
        self.api.get("/attention/summary", &[]).await
    }
}
