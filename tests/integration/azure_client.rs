use complaintbase::config::LlmSettings;
use complaintbase::llm::{AzureOpenAiClient, CompletionClient, LlmError};
use mockito::{Matcher, Server};
use serde_json::json;

const COMPLETIONS_PATH: &str = r"^/openai/deployments/gpt-4o/chat/completions";

fn settings(endpoint: String) -> LlmSettings {
    LlmSettings {
        endpoint,
        timeout_ms: 5_000,
        ..LlmSettings::default()
    }
}

#[test]
fn posts_system_and_user_messages_and_returns_content() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", Matcher::Regex(COMPLETIONS_PATH.into()))
        .match_query(Matcher::UrlEncoded(
            "api-version".into(),
            "2025-01-01-preview".into(),
        ))
        .match_header("api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "max_tokens": 300,
            "messages": [
                {"role": "system", "content": "You are a Telkom complaints assistant."},
                {"role": "user", "content": "Summarize please"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "Billing dominates."}}]}"#)
        .create();

    let client = AzureOpenAiClient::new(&settings(format!("{}/", server.url())), "test-key").unwrap();
    let answer = client
        .complete("You are a Telkom complaints assistant.", "Summarize please")
        .unwrap();
    assert_eq!(answer, "Billing dominates.");
    mock.assert();
}

#[test]
fn error_status_is_reported_with_body() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", Matcher::Any)
        .with_status(500)
        .with_body("deployment unavailable")
        .create();

    let client = AzureOpenAiClient::new(&settings(server.url()), "test-key").unwrap();
    match client.complete("system", "prompt") {
        Err(LlmError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "deployment unavailable");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn responses_without_content_are_malformed() {
    let mut server = Server::new();
    let _empty = server
        .mock("POST", Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": []}"#)
        .create();

    let client = AzureOpenAiClient::new(&settings(server.url()), "test-key").unwrap();
    let err = client.complete("system", "prompt").unwrap_err();
    assert!(matches!(err, LlmError::MalformedResponse(_)), "{err:?}");
}

#[test]
fn unreachable_endpoint_is_a_transport_error() {
    let client =
        AzureOpenAiClient::new(&settings("http://127.0.0.1:9".into()), "test-key").unwrap();
    let err = client.complete("system", "prompt").unwrap_err();
    assert!(matches!(err, LlmError::Transport(_)), "{err:?}");
}

#[test]
fn empty_endpoint_is_rejected_up_front() {
    let err = AzureOpenAiClient::new(&settings(String::new()), "test-key")
        .err()
        .expect("empty endpoint must fail");
    assert!(matches!(err, LlmError::Config(_)));
}
