/// View flow tests against a stub backend
/// Covers the end-to-end properties: list rendering, filter refetch, the
/// send state machine, and the automation toggle contract.
mod common;

use common::{client_json, message_json, test_config, StubBackend};
use hyper::StatusCode;
use leadlink_core::api::ApiClient;
use leadlink_core::services::Services;
use leadlink_core::types::{AutomationStatus, ClientStatus};
use leadlink_core::views::chat::ChatData;
use leadlink_core::views::{ChatView, ClientsView};
use leadlink_core::HostContext;
use std::sync::Arc;

async fn services_for(stub: &StubBackend) -> Services {
    let host = Arc::new(HostContext::detached());
    let api = Arc::new(ApiClient::new(&test_config(stub.base_url()), host).unwrap());
    Services::new(api)
}

fn err_text(e: leadlink_core::ClientError) -> String {
    e.to_string()
}

#[tokio::test]
async fn test_clients_view_one_card_then_zero_on_closed_filter() {
    let stub = StubBackend::spawn(|req| match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/api/clients") => {
            if req.query.contains("status=closed") {
                (StatusCode::OK, "[]".to_string())
            } else {
                (StatusCode::OK, format!("[{}]", client_json("1", "Anna", "new")))
            }
        }
        _ => (StatusCode::NOT_FOUND, r#"{"detail":"not found"}"#.to_string()),
    })
    .await;
    let services = services_for(&stub).await;

    // No filters: exactly one rendered card
    let mut view = ClientsView::new();
    let result = services.clients.list(None, None, None).await.map_err(err_text);
    view.on_loaded(result);
    assert_eq!(view.visible().len(), 1);
    assert_eq!(view.visible()[0].name, "Anna");

    // Closed filter: zero cards, and no error either
    view.status_filter = Some(ClientStatus::Closed);
    let result = services
        .clients
        .list(view.status_filter, None, None)
        .await
        .map_err(err_text);
    view.on_loaded(result);
    assert_eq!(view.visible().len(), 0);
    assert!(view.state.ready().is_some(), "empty result is not an error");
}

#[tokio::test]
async fn test_send_flow_appends_one_message_and_blocks_duplicates() {
    let stub = StubBackend::spawn(|req| match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/api/clients/c1") => (StatusCode::OK, client_json("c1", "Anna", "in_progress")),
        ("GET", "/api/messages/client/c1") => (
            StatusCode::OK,
            format!("[{}]", message_json("m1", "c1", "incoming", "Is it available?")),
        ),
        ("POST", "/api/messages/respond") => {
            assert!(req.body.contains("\"content\":\"Hello\""));
            (StatusCode::OK, message_json("m2", "c1", "outgoing", "Hello"))
        }
        _ => (StatusCode::NOT_FOUND, r#"{"detail":"not found"}"#.to_string()),
    })
    .await;
    let services = services_for(&stub).await;

    // Load client and thread the way the chat view does
    let mut chat = ChatView::new("c1".to_string());
    let (client, messages) = tokio::join!(
        services.clients.get("c1"),
        services.messages.for_client("c1", None),
    );
    chat.on_loaded(Ok(ChatData {
        client: client.unwrap(),
        messages: messages.unwrap(),
    }));

    chat.compose = "Hello".to_string();
    let content = chat.submit().expect("first submit goes through");

    // A second submit while the send is unresolved must not produce a call
    chat.compose = "Hello again".to_string();
    assert!(chat.submit().is_none());

    let sent = services.messages.respond("c1", &content).await.unwrap();
    chat.on_send_ok(sent);

    let data = chat.state.ready().unwrap();
    assert_eq!(data.messages.len(), 2);
    assert_eq!(data.messages.last().unwrap().content, "Hello");
    assert!(chat.compose.is_empty());
    assert_eq!(stub.count("POST", "/api/messages/respond"), 1);
}

#[tokio::test]
async fn test_automation_toggle_single_update_then_refetch() {
    let automation = r#"{"id":"a1","name":"Auto reply","description":"replies for you","trigger":"new_message","status":"active","conditions":{},"actions":[{"type":"send_message"}]}"#;
    let paused = automation.replace("\"active\"", "\"paused\"");

    let stub = StubBackend::spawn(move |req| match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/api/automation") => (StatusCode::OK, format!("[{}]", automation)),
        ("GET", "/api/automation/templates") => (StatusCode::OK, "[]".to_string()),
        ("PUT", "/api/automation/a1") => {
            assert!(req.body.contains("\"status\":\"paused\""));
            (StatusCode::OK, paused.clone())
        }
        _ => (StatusCode::NOT_FOUND, r#"{"detail":"not found"}"#.to_string()),
    })
    .await;
    let services = services_for(&stub).await;

    use leadlink_core::views::automation::AutomationData;
    use leadlink_core::views::AutomationView;

    let mut view = AutomationView::new();
    let (automations, templates) =
        tokio::join!(services.automation.list(), services.automation.templates());
    view.on_loaded(Ok(AutomationData {
        automations: automations.unwrap(),
        templates: templates.unwrap(),
    }));

    let (id, patch) = view.toggle_request().expect("toggle on the selected rule");
    assert_eq!(patch.status, Some(AutomationStatus::Paused));

    let updated = services.automation.update(&id, &patch).await.unwrap();
    assert_eq!(updated.status, AutomationStatus::Paused);

    // The list is refetched after the ack
    view.on_action_done(Ok("toggled".to_string()));
    let _ = services.automation.list().await.unwrap();

    assert_eq!(stub.count("PUT", "/api/automation/a1"), 1);
    assert_eq!(stub.count("GET", "/api/automation"), 2);
}

#[tokio::test]
async fn test_inbox_aggregates_and_unknown_reason_is_tolerated() {
    let stub = StubBackend::spawn(|req| match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/api/messages") => (
            StatusCode::OK,
            format!(
                "[{},{},{}]",
                message_json("m3", "c2", "incoming", "newest"),
                message_json("m2", "c1", "incoming", "older"),
                message_json("m1", "c2", "outgoing", "oldest"),
            ),
        ),
        ("GET", "/api/attention/listings") => (
            StatusCode::OK,
            r#"[{"listing_id":"l1","listing_title":"Bike","reason":"brand_new_reason","details":"???"}]"#.to_string(),
        ),
        _ => (StatusCode::NOT_FOUND, r#"{"detail":"not found"}"#.to_string()),
    })
    .await;
    let services = services_for(&stub).await;

    let messages = services.messages.recent(None).await.unwrap();
    let conversations = leadlink_core::inbox::group_by_client(messages);
    assert_eq!(conversations.len(), 2);
    let total: usize = conversations.iter().map(|c| c.message_count()).sum();
    assert_eq!(total, 3);

    // Unknown reason codes decode to the generic fallback instead of failing
    let listings = services.attention.listings().await.unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].reason.label(), "Needs attention");
}

#[tokio::test]
async fn test_mark_read_and_unread_count() {
    let stub = StubBackend::spawn(|req| match (req.method.as_str(), req.path.as_str()) {
        ("PATCH", "/api/messages/m1/read") => {
            (StatusCode::OK, r#"{"message":"Message marked as read"}"#.to_string())
        }
        ("GET", "/api/messages/unread-count") => {
            (StatusCode::OK, r#"{"unread_count":4}"#.to_string())
        }
        _ => (StatusCode::NOT_FOUND, r#"{"detail":"not found"}"#.to_string()),
    })
    .await;
    let services = services_for(&stub).await;

    let ack = services.messages.mark_read("m1").await.unwrap();
    assert_eq!(ack.message, "Message marked as read");
    let unread = services.messages.unread_count().await.unwrap();
    assert_eq!(unread.unread_count, 4);
}
