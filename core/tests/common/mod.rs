/// Minimal HTTP stub backend for integration tests
///
/// Binds an ephemeral port, records every request and answers from the
/// provided responder closure.
use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub body: String,
    pub init_data: Option<String>,
    pub request_id: Option<String>,
}

pub struct StubBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubBackend {
    pub async fn spawn<F>(responder: F) -> Self
    where
        F: Fn(&Recorded) -> (StatusCode, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Arc<Mutex<Vec<Recorded>>> = Arc::new(Mutex::new(Vec::new()));
        let responder = Arc::new(responder);

        let reqs = requests.clone();
        tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                let io = TokioIo::new(stream);
                let reqs = reqs.clone();
                let responder = responder.clone();
                tokio::spawn(async move {
                    let svc = service_fn(move |req: Request<Incoming>| {
                        let reqs = reqs.clone();
                        let responder = responder.clone();
                        async move {
                            let (parts, body) = req.into_parts();
                            let body = body
                                .collect()
                                .await
                                .map(|b| b.to_bytes())
                                .unwrap_or_default();
                            let recorded = Recorded {
                                method: parts.method.to_string(),
                                path: parts.uri.path().to_string(),
                                query: parts.uri.query().unwrap_or("").to_string(),
                                body: String::from_utf8_lossy(&body).to_string(),
                                init_data: header(&parts.headers, "X-Telegram-Init-Data"),
                                request_id: header(&parts.headers, "X-Request-Id"),
                            };
                            let (status, body) = responder(&recorded);
                            reqs.lock().unwrap().push(recorded);
                            Ok::<_, Infallible>(
                                Response::builder()
                                    .status(status)
                                    .header("Content-Type", "application/json")
                                    .body(Full::new(Bytes::from(body)))
                                    .unwrap(),
                            )
                        }
                    });
                    let _ = http1::Builder::new().serve_connection(io, svc).await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

fn header(headers: &hyper::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Config pointed at the stub with a short timeout
pub fn test_config(base_url: String) -> leadlink_core::Config {
    leadlink_core::Config {
        base_url,
        request_timeout: std::time::Duration::from_secs(5),
        init_data_path: None,
        theme_override: None,
    }
}

// JSON fixtures shared by the integration tests

pub fn client_json(id: &str, name: &str, status: &str) -> String {
    format!(
        r#"{{"id":"{}","name":"{}","phone":"+48600100200","source":"telegram","status":"{}","listing_id":"l1","listing_title":"2-room flat","created_at":"2025-06-01T10:00:00Z","updated_at":"2025-06-01T11:00:00Z","last_message_at":"2025-06-01T11:30:00Z","messages_count":3}}"#,
        id, name, status
    )
}

pub fn message_json(id: &str, client_id: &str, message_type: &str, content: &str) -> String {
    format!(
        r#"{{"id":"{}","client_id":"{}","content":"{}","message_type":"{}","source":"telegram","timestamp":"2025-06-01T11:30:00Z","is_read":false}}"#,
        id, client_id, content, message_type
    )
}
