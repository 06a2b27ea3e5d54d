use dstl_chat::services::llm_client::{
    ChatMessage, LlmClient, LlmClientError, OpenAiCompatibleClient,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn history() -> Vec<ChatMessage> {
    vec![
        ChatMessage::new("system", "You are helpful."),
        ChatMessage::new("user", "hi"),
    ]
}

#[test]
fn test_client_strips_trailing_slash() {
    let client = OpenAiCompatibleClient::new("http://localhost:11434/v1/".to_string(), "m".to_string());
    assert_eq!(client.base_url(), "http://localhost:11434/v1");
    assert_eq!(client.model(), "m");
}

#[tokio::test]
async fn test_generate_returns_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "llama3.1:8b",
            "messages": [
                { "role": "system", "content": "You are helpful." },
                { "role": "user", "content": "hi" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Hello!" },
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiCompatibleClient::new(server.uri(), "llama3.1:8b".to_string());
    let reply = client.generate(&history()).await.unwrap();

    assert_eq!(reply, "Hello!");
}

#[tokio::test]
async fn test_generate_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "authorized" }, "finish_reason": "stop" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiCompatibleClient::new(server.uri(), "m".to_string())
        .with_api_key(Some("sk-test".to_string()));

    assert_eq!(client.generate(&history()).await.unwrap(), "authorized");
}

#[tokio::test]
async fn test_generate_maps_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let client = OpenAiCompatibleClient::new(server.uri(), "m".to_string());
    let err = client.generate(&history()).await.unwrap_err();

    match err {
        LlmClientError::ApiError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_generate_rejects_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = OpenAiCompatibleClient::new(server.uri(), "m".to_string());
    let err = client.generate(&history()).await.unwrap_err();

    assert!(matches!(err, LlmClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_generate_rejects_null_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": null }, "finish_reason": "length" }]
        })))
        .mount(&server)
        .await;

    let client = OpenAiCompatibleClient::new(server.uri(), "m".to_string());
    let err = client.generate(&history()).await.unwrap_err();

    assert!(matches!(err, LlmClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_generate_unreachable_provider() {
    // Nothing listens on the discard port
    let client = OpenAiCompatibleClient::new("http://127.0.0.1:9".to_string(), "m".to_string());
    let err = client.generate(&history()).await.unwrap_err();

    assert!(matches!(err, LlmClientError::Http(_)));
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let client = OpenAiCompatibleClient::new(server.uri(), "m".to_string());
    assert!(client.health_check().await.unwrap());
}
