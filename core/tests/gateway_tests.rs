/// API gateway tests
/// Identity header forwarding, error taxonomy, timeout behavior.
mod common;

use common::{test_config, StubBackend};
use hyper::StatusCode;
use leadlink_core::api::ApiClient;
use leadlink_core::types::Client;
use leadlink_core::{ClientError, HostContext};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_identity_header_attached_per_call() {
    let stub = StubBackend::spawn(|_| (StatusCode::OK, "{}".to_string())).await;
    let host = Arc::new(HostContext::detached());
    let api = ApiClient::new(&test_config(stub.base_url()), host.clone()).unwrap();

    let _: serde_json::Value = api.get("/ai/settings", &[]).await.unwrap();

    // Identity arrives late; the next call must carry it without rebuilding
    // the client
    host.set_init_data("auth_date=1700000000&hash=abc".to_string()).await;
    let _: serde_json::Value = api.get("/ai/settings", &[]).await.unwrap();

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].init_data.is_none());
    assert_eq!(
        requests[1].init_data.as_deref(),
        Some("auth_date=1700000000&hash=abc")
    );

    // Every call carries a fresh correlation id
    let id0 = requests[0].request_id.clone().unwrap();
    let id1 = requests[1].request_id.clone().unwrap();
    assert_ne!(id0, id1);
}

#[tokio::test]
async fn test_unauthorized_maps_to_distinct_error() {
    let stub = StubBackend::spawn(|_| {
        (
            StatusCode::UNAUTHORIZED,
            r#"{"detail":"invalid init data"}"#.to_string(),
        )
    })
    .await;
    let host = Arc::new(HostContext::detached());
    let api = ApiClient::new(&test_config(stub.base_url()), host).unwrap();

    let err = api
        .get::<serde_json::Value>("/clients", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn test_backend_detail_message_propagates() {
    let stub = StubBackend::spawn(|_| {
        (
            StatusCode::NOT_FOUND,
            r#"{"detail":"Client not found"}"#.to_string(),
        )
    })
    .await;
    let host = Arc::new(HostContext::detached());
    let api = ApiClient::new(&test_config(stub.base_url()), host).unwrap();

    let err = api
        .get::<Client>("/clients/does-not-exist", &[])
        .await
        .unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Client not found");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_with_plain_body() {
    let stub =
        StubBackend::spawn(|_| (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string())).await;
    let host = Arc::new(HostContext::detached());
    let api = ApiClient::new(&test_config(stub.base_url()), host).unwrap();

    let err = api
        .get::<serde_json::Value>("/clients", &[])
        .await
        .unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_surfaces_as_timeout() {
    // A listener that accepts and never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            if let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        }
    });

    let mut config = test_config(format!("http://{}", addr));
    config.request_timeout = Duration::from_millis(200);
    let host = Arc::new(HostContext::detached());
    let api = ApiClient::new(&config, host).unwrap();

    let err = api
        .get::<serde_json::Value>("/clients", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Timeout(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_query_parameters_reach_the_backend() {
    let stub = StubBackend::spawn(|_| (StatusCode::OK, "[]".to_string())).await;
    let host = Arc::new(HostContext::detached());
    let api = Arc::new(ApiClient::new(&test_config(stub.base_url()), host).unwrap());
    let services = leadlink_core::services::Services::new(api);

    use leadlink_core::types::{ClientStatus, MessageSource};
    services
        .clients
        .list(Some(ClientStatus::New), Some(MessageSource::Telegram), None)
        .await
        .unwrap();

    let requests = stub.requests();
    assert_eq!(requests[0].path, "/api/clients");
    assert!(requests[0].query.contains("status=new"));
    assert!(requests[0].query.contains("source=telegram"));
    assert!(requests[0].query.contains("limit=50"));
}
