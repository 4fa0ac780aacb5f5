use super::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(endpoint: String) -> OpenAiCompletionClient {
    OpenAiCompletionClient::new(&CompletionConfig {
        endpoint,
        api_key: "test_key".to_string(),
        model: "gpt-4o".to_string(),
    })
}

// --- Payload construction ---

#[test]
fn payload_text_only_has_single_content_part() {
    let client = test_client("http://unused".to_string());
    let payload = client.build_payload("what is this?", None);

    assert_eq!(payload["model"], "gpt-4o");
    assert_eq!(payload["max_tokens"], 100);
    assert_eq!(payload["messages"][0]["role"], "user");

    let content = payload["messages"][0]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["type"], "text");
    let text = content[0]["text"].as_str().unwrap();
    assert!(text.starts_with("Limit your response to 1500 characters"));
    assert!(text.ends_with("what is this?"));
}

#[test]
fn payload_with_image_appends_data_url_part() {
    let client = test_client("http://unused".to_string());
    let payload = client.build_payload("describe it", Some("aW1hZ2U="));

    let content = payload["messages"][0]["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(content[1]["type"], "image_url");
    assert_eq!(
        content[1]["image_url"]["url"],
        "data:image/jpeg;base64,aW1hZ2U="
    );
}

// --- Response parsing ---

#[test]
fn parse_extracts_first_choice_content() {
    let json = serde_json::json!({
        "choices": [
            {"message": {"role": "assistant", "content": "It is a cat."}},
            {"message": {"role": "assistant", "content": "ignored"}}
        ]
    });
    assert_eq!(
        OpenAiCompletionClient::parse_response(&json),
        CompletionOutcome::Answer("It is a cat.".to_string())
    );
}

#[test]
fn parse_missing_choices_is_no_answer() {
    let json = serde_json::json!({"id": "cmpl-1"});
    assert_eq!(
        OpenAiCompletionClient::parse_response(&json),
        CompletionOutcome::NoAnswer
    );
}

#[test]
fn parse_null_content_is_no_answer() {
    let json = serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": null}}]
    });
    assert_eq!(
        OpenAiCompletionClient::parse_response(&json),
        CompletionOutcome::NoAnswer
    );
}

// --- Wiremock tests ---

#[tokio::test]
async fn complete_success_returns_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("Authorization", "Bearer test_key"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": {"role": "assistant", "content": "A red bicycle."},
                "finish_reason": "stop"
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(format!("{}/chat", server.uri()));
    let outcome = client.complete("what is in the photo?", None).await.unwrap();

    assert_eq!(outcome, CompletionOutcome::Answer("A red bicycle.".to_string()));
}

#[tokio::test]
async fn complete_sends_image_part_when_attached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}]
        })))
        .mount(&server)
        .await;

    let client = test_client(format!("{}/chat", server.uri()));
    client
        .complete("describe", Some("aW1hZ2U=".to_string()))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let content = body["messages"][0]["content"].as_array().unwrap();
    assert_eq!(content.len(), 2);
    assert_eq!(
        content[1]["image_url"]["url"],
        "data:image/jpeg;base64,aW1hZ2U="
    );
}

#[tokio::test]
async fn complete_body_without_choices_is_no_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cmpl-1", "object": "chat.completion"
        })))
        .mount(&server)
        .await;

    let client = test_client(format!("{}/chat", server.uri()));
    let outcome = client.complete("hello", None).await.unwrap();

    assert_eq!(outcome, CompletionOutcome::NoAnswer);
}

#[tokio::test]
async fn complete_non_2xx_is_a_completion_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = test_client(format!("{}/chat", server.uri()));
    let err = client.complete("hello", None).await.unwrap_err();

    assert!(matches!(err, LensbotError::Completion(_)));
    assert!(err.to_string().contains("500"), "Error: {}", err);
}

#[tokio::test]
async fn complete_connection_failure_is_a_completion_error() {
    let client = test_client("http://127.0.0.1:9/chat".to_string());
    let err = client.complete("hello", None).await.unwrap_err();

    assert!(matches!(err, LensbotError::Completion(_)));
}
