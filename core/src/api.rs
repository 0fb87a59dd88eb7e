/// API gateway client
///
/// Single choke point for every outbound HTTP call: base URL + `/api`
/// prefix, fixed timeout, identity header, request-id correlation, and the
/// error taxonomy the views rely on. No retries and no backoff — failures
/// surface immediately and the owning view offers a manual retry.
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::host::HostContext;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Opaque identity payload from the host platform, forwarded verbatim
pub const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";
/// Per-call correlation id for backend log spelunking
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    host: Arc<HostContext>,
}

impl ApiClient {
    pub fn new(config: &Config, host: Arc<HostContext>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            http,
            base_url: format!("{}/api", config.base_url.trim_end_matches('/')),
            host,
        })
    }

    // ─── Verb helpers ────────────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.request::<(), T>(Method::GET, path, None, query).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    /// POST with no body (action endpoints: call, close, test, trigger)
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<(), T>(Method::POST, path, None, &[]).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.request(Method::PUT, path, Some(body), &[]).await
    }

    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<(), T>(Method::PATCH, path, None, &[]).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<(), T>(Method::DELETE, path, None, &[]).await
    }

    // ─── Core request path ───────────────────────────────────────────────────

    pub async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method.clone(), &url);

        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        // Identity is read from the host per call, not cached at build time:
        // the host may only hand us credentials after the first views loaded.
        if let Some(init_data) = self.host.init_data().await {
            req = req.header(INIT_DATA_HEADER, init_data);
        }
        let request_id = Uuid::new_v4().to_string();
        req = req.header(REQUEST_ID_HEADER, &request_id);

        debug!(%method, path, %request_id, "api request");

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(format!("{} {}", method, path))
            } else {
                ClientError::Http(e)
            }
        })?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(path, %request_id, "unauthorized response from backend");
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            let message = read_error_message(resp).await;
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<T>().await.map_err(ClientError::Http)
    }
}

/// Backend errors come as `{"detail": "..."}`; fall back to the raw body.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    error: Option<String>,
}

async fn read_error_message(resp: reqwest::Response) -> String {
    match resp.text().await {
        Ok(text) => match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body
                .detail
                .or(body.error)
                .unwrap_or_else(|| fallback_message(&text)),
            Err(_) => fallback_message(&text),
        },
        Err(_) => "request failed".to_string(),
    }
}

fn fallback_message(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        "request failed".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
