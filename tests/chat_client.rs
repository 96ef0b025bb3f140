//! Chat endpoint client against a wiremock server.

use futures::StreamExt;
use serde_json::json;
use voice_dialogue::core::chat::{ChatCompletion, ChatConfig, ChatError, ChatMessage, HttpChatClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpChatClient {
    HttpChatClient::new(ChatConfig {
        api_url: format!("{}/v1/chat/completions", server.uri()),
        api_key: "link-key".to_string(),
        app_code: "app-42".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_complete_posts_history_with_app_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer link-key"))
        .and(body_partial_json(json!({
            "app_code": "app-42",
            "stream": false,
            "messages": [
                {"role": "user", "content": "hello"},
                {"role": "assistant", "content": "hi"},
                {"role": "user", "content": "how are you"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "fine, thanks"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![
        ChatMessage::user("hello"),
        ChatMessage::assistant("hi"),
        ChatMessage::user("how are you"),
    ];
    let reply = client(&server).complete(&history).await.unwrap();
    assert_eq!(reply, "fine, thanks");
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete(&[ChatMessage::user("hello")])
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ChatError::Http {
            status: 401,
            body: "invalid key".to_string()
        }
    );
}

#[tokio::test]
async fn test_empty_choices_is_invalid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = client(&server)
        .complete(&[ChatMessage::user("hello")])
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_stream_yields_deltas_until_done() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: [DONE]\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n\n",
    );
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let stream = client(&server)
        .complete_stream(&[ChatMessage::user("hello")])
        .await
        .unwrap();
    let deltas: Vec<String> = stream.map(|d| d.unwrap()).collect().await;
    assert_eq!(deltas, vec!["Hel".to_string(), "lo".to_string()]);
}

#[tokio::test]
async fn test_stream_without_done_marker() {
    let server = MockServer::start().await;
    let body = "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let stream = client(&server)
        .complete_stream(&[ChatMessage::user("hello")])
        .await
        .unwrap();
    let deltas: Vec<String> = stream.map(|d| d.unwrap()).collect().await;
    assert_eq!(deltas, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn test_stream_error_status_fails_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let result = client(&server)
        .complete_stream(&[ChatMessage::user("hello")])
        .await;
    assert!(matches!(result, Err(ChatError::Http { status: 503, .. })));
}
