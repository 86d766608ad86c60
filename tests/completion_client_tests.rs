use std::time::Duration;

use openrouter_playground::{
    CallFailure, CompletionClient, GenerationRequest, HttpClientConfig, OpenRouterConfig,
    ResponseBody, Usage,
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, Request as WiremockRequest, ResponseTemplate,
    matchers::{bearer_token, body_json, header, method, path},
};

const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

fn client_for(server: &MockServer) -> CompletionClient {
    let config =
        OpenRouterConfig::new("sk-test").with_base_url(format!("{}/api/v1", server.uri()));
    CompletionClient::new(config).expect("client should build")
}

fn summarize_request() -> GenerationRequest {
    GenerationRequest::new("openai/gpt-4o-mini", "Summarize X")
        .with_temperature(0.2)
        .with_max_tokens(800)
}

fn success_body() -> Value {
    json!({
        "id": "gen-123",
        "choices": [{"message": {"role": "assistant", "content": "hello"}}],
        "usage": {"prompt_tokens": 5, "completion_tokens": 3}
    })
}

fn request_body(request: &WiremockRequest) -> Value {
    serde_json::from_slice(&request.body).expect("request body should be JSON")
}

fn roles(body: &Value) -> Vec<&str> {
    body["messages"]
        .as_array()
        .expect("messages array")
        .iter()
        .map(|message| message["role"].as_str().expect("role string"))
        .collect()
}

#[tokio::test]
async fn success_returns_text_usage_and_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .complete(&summarize_request())
        .await
        .expect("completion should succeed");

    assert_eq!(result.text, "hello");
    assert_eq!(
        result.usage,
        Usage {
            prompt_tokens: Some(5),
            completion_tokens: Some(3),
            total_tokens: None,
        }
    );
    assert!(result.elapsed_seconds() >= 0.0);
    assert_eq!(result.raw_payload, success_body());
}

#[tokio::test]
async fn request_carries_auth_identification_and_schema() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(bearer_token("sk-test"))
        .and(header("content-type", "application/json"))
        .and(header("HTTP-Referer", "http://localhost:8501"))
        .and(header("X-Title", "OpenRouter Playground"))
        .and(body_json(json!({
            "model": "openai/gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "Be concise."},
                {"role": "user", "content": "Summarize X"}
            ],
            "temperature": 0.2,
            "max_tokens": 800
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;

    let request = summarize_request().with_system_message("Be concise.");
    client_for(&server)
        .complete(&request)
        .await
        .expect("request should match every matcher");
}

#[tokio::test]
async fn messages_follow_system_message_presence() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .complete(&summarize_request().with_system_message("Be concise."))
        .await
        .unwrap();
    client.complete(&summarize_request()).await.unwrap();

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 2);
    assert_eq!(roles(&request_body(&requests[0])), vec!["system", "user"]);
    assert_eq!(roles(&request_body(&requests[1])), vec!["user"]);
}

#[tokio::test]
async fn identical_requests_produce_identical_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = summarize_request().with_system_message("Be concise.");
    client.complete(&request).await.unwrap();
    client.complete(&request).await.unwrap();

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn blank_prompt_is_sent_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .complete(&GenerationRequest::new("openai/gpt-4o-mini", "  "))
        .await
        .unwrap();

    let requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(request_body(&requests[0])["messages"][0]["content"], "  ");
}

#[tokio::test]
async fn unauthorized_returns_http_failure_with_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid key"})))
        .expect(1)
        .mount(&server)
        .await;

    let failure = client_for(&server)
        .complete(&summarize_request())
        .await
        .unwrap_err();

    assert_eq!(
        failure,
        CallFailure::Http {
            status_code: 401,
            body: ResponseBody::Json(json!({"error": "invalid key"})),
        }
    );
}

#[tokio::test]
async fn server_error_is_not_retried_and_keeps_raw_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let failure = client_for(&server)
        .complete(&summarize_request())
        .await
        .unwrap_err();

    assert_eq!(
        failure,
        CallFailure::Http {
            status_code: 503,
            body: ResponseBody::Text("upstream unavailable".to_string()),
        }
    );
}

#[tokio::test]
async fn missing_choices_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"usage": {"prompt_tokens": 5}})),
        )
        .mount(&server)
        .await;

    let failure = client_for(&server)
        .complete(&summarize_request())
        .await
        .unwrap_err();

    assert!(
        matches!(failure, CallFailure::MalformedResponse { .. }),
        "got {failure:?}"
    );
}

#[tokio::test]
async fn non_json_success_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let failure = client_for(&server)
        .complete(&summarize_request())
        .await
        .unwrap_err();

    match failure {
        CallFailure::MalformedResponse { detail } => assert!(detail.contains("not valid JSON")),
        other => panic!("expected malformed response, got {other:?}"),
    }
}

#[tokio::test]
async fn timeout_is_a_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = OpenRouterConfig::new("sk-test")
        .with_base_url(format!("{}/api/v1", server.uri()))
        .with_http_config(HttpClientConfig {
            timeout: Duration::from_millis(100),
        });
    let client = CompletionClient::new(config).unwrap();

    let failure = client.complete(&summarize_request()).await.unwrap_err();
    assert!(
        matches!(failure, CallFailure::Transport { .. }),
        "got {failure:?}"
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = OpenRouterConfig::new("sk-test").with_base_url(format!("http://{addr}/api/v1"));
    let client = CompletionClient::new(config).unwrap();

    let failure = client.complete(&summarize_request()).await.unwrap_err();
    assert!(
        matches!(failure, CallFailure::Transport { .. }),
        "got {failure:?}"
    );
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .expect(4)
        .mount(&server)
        .await;

    let client = std::sync::Arc::new(client_for(&server));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                let request = GenerationRequest::new("openai/gpt-4o-mini", format!("prompt {i}"));
                client.complete(&request).await
            })
        })
        .collect();

    for handle in handles {
        let result = handle.await.expect("task should not panic").unwrap();
        assert_eq!(result.text, "hello");
    }
}
