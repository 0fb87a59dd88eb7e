/// AI assistant endpoints — suggestions are produced remotely, this
/// client only ferries prompts and history back and forth
use crate::api::ApiClient;
use crate::error::Result;
use crate::types::{Ack, AiResponse, AiSettings};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Serialize)]
struct SuggestBody<'a> {
    client_id: &'a str,
    conversation_history: &'a [String],
}

#[derive(Serialize)]
struct TipsBody<'a> {
    client_id: &'a str,
}

#[derive(Serialize)]
struct AnalyzeBody<'a> {
    listing_id: &'a str,
    listing_text: &'a str,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    prompt: &'a str,
    context: &'a Value,
}

pub struct AiService {
    api: Arc<ApiClient>,
}

impl AiService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Reply suggestions based on the conversation so far
    pub async fn suggest_response(
        &self,
        client_id: &str,
        conversation_history: &[String],
    ) -> Result<AiResponse> {
        self.api
            .post(
                "/ai/suggest-response",
                &SuggestBody {
                    client_id,
                    conversation_history,
                },
            )
            .await
    }

    pub async fn close_deal_tips(&self, client_id: &str) -> Result<AiResponse> {
        self.api
            .post("/ai/close-deal-tips", &TipsBody { client_id })
            .await
    }

    pub async fn analyze_listing(&self, listing_id: &str, listing_text: &str) -> Result<AiResponse> {
        self.api
            .post(
                "/ai/analyze-listing",
                &AnalyzeBody {
                    listing_id,
                    listing_text,
                },
            )
            .await
    }

    pub async fn generate_response(&self, prompt: &str, context: &Value) -> Result<Value> {
        self.api
            .post("/ai/generate-response", &GenerateBody { prompt, context })
            .await
    }

    pub async fn settings(&self) -> Result<AiSettings> {
        self.api.get("/ai/settings", &[]).await
    }

    pub async fn update_settings(&self, settings: &AiSettings) -> Result<Ack> {
        self.api.post("/ai/settings", settings).await
    }
}
