//! Integration tests for the analyze API and the provider cascade.
//!
//! Each test spins up a mock provider server (Gemini + Hugging Face routes)
//! and the Automail service on random ports, then drives the real HTTP
//! contract with reqwest.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use automail::api::{AppState, analyze_routes};
use automail::classifier::{CategoryTag, RuleClassifier, policy};
use automail::config::AppConfig;
use automail::pipeline::types::NO_TEXT_RESPONSE;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

const MEETING: &str = "Podemos agendar uma reunião para amanhã?";

const REMOTE_JSON: &str =
    r#"{"category": "Improdutivo", "suggested_response": "Agradecemos o contato!"}"#;

// ── Mock provider ───────────────────────────────────────────────────────

/// How a mocked provider answers.
#[derive(Clone, Copy)]
enum Behavior {
    Reply(&'static str),
    Status(u16),
    Hang,
}

#[derive(Default)]
struct MockLog {
    gemini_calls: AtomicUsize,
    hf_calls: AtomicUsize,
    gemini_path: Mutex<Option<String>>,
    gemini_key: Mutex<Option<String>>,
    hf_model: Mutex<Option<String>>,
    hf_auth: Mutex<Option<String>>,
    hf_body: Mutex<Option<Value>>,
}

#[derive(Clone)]
struct MockState {
    gemini: Behavior,
    hf: Behavior,
    log: Arc<MockLog>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

async fn respond(behavior: Behavior, wrap: impl Fn(&str) -> Value) -> Response {
    match behavior {
        Behavior::Reply(text) => Json(wrap(text)).into_response(),
        Behavior::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            "mock provider failure",
        )
            .into_response(),
        Behavior::Hang => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(wrap(REMOTE_JSON)).into_response()
        }
    }
}

async fn gemini_handler(
    State(state): State<MockState>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> Response {
    state.log.gemini_calls.fetch_add(1, Ordering::SeqCst);
    *state.log.gemini_path.lock().unwrap() = Some(model_action);
    *state.log.gemini_key.lock().unwrap() = header(&headers, "x-goog-api-key");

    respond(state.gemini, |text| {
        json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
    })
    .await
}

async fn hf_handler(
    State(state): State<MockState>,
    Path(model): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.log.hf_calls.fetch_add(1, Ordering::SeqCst);
    *state.log.hf_model.lock().unwrap() = Some(model);
    *state.log.hf_auth.lock().unwrap() = header(&headers, "authorization");
    *state.log.hf_body.lock().unwrap() = Some(body);

    respond(state.hf, |text| json!([{"generated_text": text}])).await
}

/// Start the mock provider server, return (base URL, call log).
async fn start_mock(gemini: Behavior, hf: Behavior) -> (String, Arc<MockLog>) {
    let log = Arc::new(MockLog::default());
    let state = MockState {
        gemini,
        hf,
        log: Arc::clone(&log),
    };
    let app = Router::new()
        .route("/v1beta/models/{model_action}", post(gemini_handler))
        .route("/models/{*model}", post(hf_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{port}"), log)
}

// ── Service ─────────────────────────────────────────────────────────────

/// Config pointing the enabled providers at `mock_url`.
fn config_for(mock_url: &str, gemini: bool, hf: bool, timeout_secs: u64) -> AppConfig {
    let mut vars: HashMap<&str, String> = HashMap::new();
    if gemini {
        vars.insert("GEMINI_API_KEY", "test-gemini-key".into());
        vars.insert("GEMINI_API_BASE", mock_url.into());
    }
    if hf {
        vars.insert("HF_API_KEY", "test-hf-key".into());
        vars.insert("HF_API_BASE", mock_url.into());
    }
    vars.insert("AUTOMAIL_PROVIDER_TIMEOUT_SECS", timeout_secs.to_string());
    AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Start Automail on a random port, return its base URL.
async fn start_service(config: AppConfig) -> String {
    let state = AppState::from_config(&config).unwrap();
    let app = analyze_routes(state, &config.frontend_url);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}")
}

async fn analyze_json(base: &str, text: &str) -> Value {
    let response = reqwest::Client::new()
        .post(format!("{base}/api/analyze"))
        .json(&json!({ "text": text }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    response.json().await.unwrap()
}

fn fallback_for(text: &str) -> Value {
    serde_json::to_value(RuleClassifier::default().classify(text)).unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_endpoint() {
    timeout(TEST_TIMEOUT, async {
        let base = start_service(AppConfig::default()).await;
        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, json!({"status": "ok"}));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn no_providers_uses_rule_based_fallback() {
    timeout(TEST_TIMEOUT, async {
        let base = start_service(AppConfig::default()).await;

        let body = analyze_json(&base, MEETING).await;
        assert_eq!(body["category"], "Produtivo");
        assert_eq!(
            body["suggested_response"],
            policy::response_for(CategoryTag::MeetingProposal).unwrap()
        );

        let body = analyze_json(&base, "Parabéns pela conquista, equipe!").await;
        assert_eq!(body["category"], "Improdutivo");
        assert_eq!(body["suggested_response"], policy::DEFAULT_UNPRODUCTIVE_RESPONSE);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn gemini_markdown_reply_short_circuits() {
    timeout(TEST_TIMEOUT, async {
        let (mock, log) = start_mock(
            Behavior::Reply(
                "```json\n{\"category\": \"Produtivo\", \"suggested_response\": \"Vamos verificar o chamado.\"}\n```",
            ),
            Behavior::Reply(REMOTE_JSON),
        )
        .await;
        let base = start_service(config_for(&mock, true, true, 2)).await;

        let body = analyze_json(&base, "Feliz aniversário!").await;
        assert_eq!(body["category"], "Produtivo");
        assert_eq!(body["suggested_response"], "Vamos verificar o chamado.");

        assert_eq!(log.gemini_calls.load(Ordering::SeqCst), 1);
        assert_eq!(log.hf_calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            log.gemini_path.lock().unwrap().as_deref(),
            Some("gemini-flash-latest:generateContent")
        );
        assert_eq!(
            log.gemini_key.lock().unwrap().as_deref(),
            Some("test-gemini-key")
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn gemini_server_error_advances_to_huggingface() {
    timeout(TEST_TIMEOUT, async {
        let (mock, log) = start_mock(Behavior::Status(500), Behavior::Reply(REMOTE_JSON)).await;
        let base = start_service(config_for(&mock, true, true, 2)).await;

        let body = analyze_json(&base, MEETING).await;
        assert_eq!(body["category"], "Improdutivo");
        assert_eq!(body["suggested_response"], "Agradecemos o contato!");

        assert_eq!(log.gemini_calls.load(Ordering::SeqCst), 1);
        assert_eq!(log.hf_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            log.hf_model.lock().unwrap().as_deref(),
            Some("google/flan-t5-small")
        );
        assert_eq!(
            log.hf_auth.lock().unwrap().as_deref(),
            Some("Bearer test-hf-key")
        );

        let hf_body = log.hf_body.lock().unwrap().clone().unwrap();
        assert_eq!(hf_body["parameters"]["max_new_tokens"], 256);
        assert!(hf_body["inputs"].as_str().unwrap().ends_with(MEETING));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unparsable_reply_without_secondary_uses_fallback() {
    timeout(TEST_TIMEOUT, async {
        let (mock, log) = start_mock(
            Behavior::Reply("Este e-mail é Produtivo. Responda com cordialidade."),
            Behavior::Reply(REMOTE_JSON),
        )
        .await;
        let base = start_service(config_for(&mock, true, false, 2)).await;

        let body = analyze_json(&base, MEETING).await;
        assert_eq!(body, fallback_for(MEETING));
        assert_eq!(log.hf_calls.load(Ordering::SeqCst), 0);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rejected_credentials_on_both_providers_use_fallback() {
    timeout(TEST_TIMEOUT, async {
        let (mock, log) = start_mock(Behavior::Status(401), Behavior::Status(403)).await;
        let base = start_service(config_for(&mock, true, true, 2)).await;

        let text = "Parabéns pela conquista, equipe!";
        let body = analyze_json(&base, text).await;
        assert_eq!(body, fallback_for(text));
        assert_eq!(log.gemini_calls.load(Ordering::SeqCst), 1);
        assert_eq!(log.hf_calls.load(Ordering::SeqCst), 1);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn slow_primary_times_out_into_fallback() {
    timeout(TEST_TIMEOUT, async {
        let (mock, _log) = start_mock(Behavior::Hang, Behavior::Reply(REMOTE_JSON)).await;
        let base = start_service(config_for(&mock, true, false, 1)).await;

        let body = analyze_json(&base, MEETING).await;
        assert_eq!(body, fallback_for(MEETING));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn txt_upload_is_classified() {
    timeout(TEST_TIMEOUT, async {
        let base = start_service(AppConfig::default()).await;

        let part = reqwest::multipart::Part::bytes(MEETING.as_bytes().to_vec())
            .file_name("email.txt")
            .mime_str("text/plain")
            .unwrap();
        let form = reqwest::multipart::Form::new().part("file", part);

        let body: Value = reqwest::Client::new()
            .post(format!("{base}/api/analyze"))
            .multipart(form)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, fallback_for(MEETING));
        assert_eq!(body["category"], "Produtivo");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn form_text_field_is_classified() {
    timeout(TEST_TIMEOUT, async {
        let base = start_service(AppConfig::default()).await;

        let form = reqwest::multipart::Form::new().text("text", MEETING);
        let body: Value = reqwest::Client::new()
            .post(format!("{base}/api/analyze"))
            .multipart(form)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["category"], "Produtivo");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn empty_text_skips_providers() {
    timeout(TEST_TIMEOUT, async {
        let (mock, log) = start_mock(Behavior::Reply(REMOTE_JSON), Behavior::Reply(REMOTE_JSON)).await;
        let base = start_service(config_for(&mock, true, true, 2)).await;

        let body = analyze_json(&base, "   \n  ").await;
        assert_eq!(body["category"], "Improdutivo");
        assert_eq!(body["suggested_response"], NO_TEXT_RESPONSE);
        assert_eq!(log.gemini_calls.load(Ordering::SeqCst), 0);
        assert_eq!(log.hf_calls.load(Ordering::SeqCst), 0);
    })
    .await
    .expect("test timed out");
}
