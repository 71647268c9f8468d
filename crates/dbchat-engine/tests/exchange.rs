//! End-to-end exchanges: view update -> HTTP call -> view update.

use dbchat_engine::{
    ChatClient, ConversationView, Effect, MessageContent, RenderedBody, Role, ViewEvent,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn exchange(view: ConversationView, client: &ChatClient, draft: &str) -> ConversationView {
    let (view, effect) = view.update(ViewEvent::Submit {
        draft: draft.to_string(),
    });
    let Some(Effect::Send(request)) = effect else {
        return view;
    };

    let outcome = client.send(&request).await;
    let (view, effect) = view.update(ViewEvent::ReplyReceived {
        request_id: request.request_id,
        outcome,
    });
    assert!(effect.is_none());
    view
}

#[tokio::test]
async fn structured_exchange_renders_table() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "top customers by amount"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sql": "SELECT a, b FROM t LIMIT 200;",
            "columns": ["a", "b"],
            "rows": [[1, 2], [3, 4]],
            "narrative": "Returned 2 rows."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(format!("{}/chat", server.uri()), None);
    let view = exchange(ConversationView::default(), &client, "top customers by amount").await;

    let conversation = view.conversation();
    assert_eq!(conversation.len(), 3);

    let rendered: Vec<_> = conversation.render().collect();
    assert_eq!(rendered[0].role, Role::System);
    assert_eq!(rendered[0].body, RenderedBody::Text("Ask about DB"));
    assert_eq!(rendered[1].body, RenderedBody::Text("top customers by amount"));

    let RenderedBody::Structured {
        narrative,
        query,
        table: Some(table),
    } = &rendered[2].body
    else {
        panic!("expected a structured reply with a table");
    };
    assert_eq!(*narrative, Some("Returned 2 rows."));
    assert_eq!(*query, Some("SELECT a, b FROM t LIMIT 200;"));
    assert_eq!(table.header.len(), 2);
    assert_eq!(table.rows.len(), 2);
    assert!(table.rows.iter().all(|row| row.len() == 2));
    let cells: Vec<&str> = table.rows.iter().flatten().map(String::as_str).collect();
    assert_eq!(cells, vec!["1", "2", "3", "4"]);
}

#[tokio::test]
async fn connection_refused_appends_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ChatClient::new(format!("http://{addr}/chat"), None);
    let view = exchange(ConversationView::default(), &client, "hello").await;

    assert_eq!(view.conversation().len(), 3);
    let last = view.conversation().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert!(last.content.is_error());
}

#[tokio::test]
async fn empty_draft_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("never")))
        .expect(0)
        .mount(&server)
        .await;

    let client = ChatClient::new(format!("{}/chat", server.uri()), None);
    let view = exchange(ConversationView::default(), &client, "").await;

    assert_eq!(view.conversation().len(), 1);
}

#[tokio::test]
async fn error_field_in_success_body_renders_as_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "no such table"})))
        .mount(&server)
        .await;

    let client = ChatClient::new(format!("{}/chat", server.uri()), None);
    let view = exchange(ConversationView::default(), &client, "orders").await;

    assert_eq!(
        view.conversation().last().map(|m| &m.content),
        Some(&MessageContent::error("no such table"))
    );
}
