//! services/api/tests/openai_adapter.rs
//!
//! Runs the real OpenAI text adapter against a local mock of the provider.

use api_lib::adapters::{openai_client, OpenAiTextAdapter};
use api_lib::config::Config;
use httpmock::MockServer;
use lingo_core::domain::{ChatMessage, GenerationOptions, GenerationRequest, GenerationStatus};
use lingo_core::ports::{PortError, TextGenerationService};
use serde_json::json;
use std::time::Duration;

fn adapter_for(server: &MockServer) -> OpenAiTextAdapter {
    let base = server.base_url();
    let config = Config::from_source(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/lingo_test".to_string()),
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "OPENAI_API_BASE" => Some(base.clone()),
        "REQUEST_TIMEOUT_SECS" => Some("5".to_string()),
        _ => None,
    })
    .expect("test config");
    OpenAiTextAdapter::new(openai_client(&config).expect("client"))
}

fn chat_request() -> GenerationRequest {
    GenerationRequest::Chat {
        messages: vec![ChatMessage::user("Say hello")],
    }
}

#[tokio::test]
async fn rate_limit_is_returned_after_a_single_attempt() {
    let server = MockServer::start_async().await;
    let limited = server
        .mock_async(|when, then| {
            when.method("POST").path("/chat/completions");
            then.status(429).json_body(json!({
                "error": {
                    "message": "Rate limit reached for gpt-4o-mini",
                    "type": "requests",
                    "param": null,
                    "code": "rate_limit_exceeded"
                }
            }));
        })
        .await;

    let adapter = adapter_for(&server);
    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        adapter.generate(&chat_request(), &GenerationOptions::for_model("gpt-4o-mini")),
    )
    .await
    .expect("provider error surfaced without retrying");

    match outcome {
        Err(PortError::ExternalService { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "OpenAI API error: Rate limit reached for gpt-4o-mini");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(limited.hits_async().await, 1);
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start_async().await;
    let failing = server
        .mock_async(|when, then| {
            when.method("POST").path("/responses");
            then.status(503).body("upstream unavailable");
        })
        .await;

    let adapter = adapter_for(&server);
    let request = GenerationRequest::SingleInput {
        text: "hi".to_string(),
        instructions: None,
    };
    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        adapter.generate(&request, &GenerationOptions::for_model("gpt-4o-mini")),
    )
    .await
    .expect("provider error surfaced without retrying");

    assert!(
        matches!(outcome, Err(PortError::ExternalService { status: 500, .. })),
        "unexpected outcome: {:?}",
        outcome
    );
    assert_eq!(failing.hits_async().await, 1);
}

#[tokio::test]
async fn chat_requests_use_the_chat_completions_endpoint() {
    let server = MockServer::start_async().await;
    let chat = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/chat/completions")
                .body_contains("\"messages\"");
            then.status(200).json_body(json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1_700_000_000,
                "model": "gpt-4o-mini-2024-07-18",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Hello!"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 9, "completion_tokens": 3}
            }));
        })
        .await;
    let responses = server
        .mock_async(|when, then| {
            when.method("POST").path("/responses");
            then.status(500);
        })
        .await;

    let adapter = adapter_for(&server);
    let result = adapter
        .generate(&chat_request(), &GenerationOptions::for_model("gpt-4o-mini"))
        .await
        .expect("chat completion");

    assert_eq!(result.text, "Hello!");
    assert_eq!(result.model_id, "gpt-4o-mini-2024-07-18");
    assert_eq!(result.provider_request_id, "chatcmpl-1");
    assert_eq!(result.usage.total_tokens, 12);
    assert_eq!(chat.hits_async().await, 1);
    assert_eq!(responses.hits_async().await, 0);
}

#[tokio::test]
async fn single_input_requests_use_the_responses_endpoint() {
    let server = MockServer::start_async().await;
    let responses = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/responses")
                .body_contains("\"input\":\"Write a greeting\"");
            then.status(200).json_body(json!({
                "id": "resp_1",
                "object": "response",
                "created_at": 1_700_000_000,
                "status": "completed",
                "model": "gpt-4o-mini",
                "output": [{
                    "type": "message",
                    "role": "assistant",
                    "content": [{"type": "output_text", "text": "Good morning!"}]
                }],
                "usage": {"input_tokens": 5, "output_tokens": 4, "total_tokens": 9}
            }));
        })
        .await;

    let adapter = adapter_for(&server);
    let request = GenerationRequest::SingleInput {
        text: "Write a greeting".to_string(),
        instructions: None,
    };
    let result = adapter
        .generate(&request, &GenerationOptions::for_model("gpt-4o-mini"))
        .await
        .expect("responses call");

    assert_eq!(result.text, "Good morning!");
    assert_eq!(result.status, GenerationStatus::Completed);
    assert_eq!(result.provider_request_id, "resp_1");
    assert_eq!(result.usage.total_tokens, 9);
    assert_eq!(responses.hits_async().await, 1);
}
