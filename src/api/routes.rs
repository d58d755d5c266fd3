//! REST endpoints for email analysis.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State};
use axum::http::{HeaderValue, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::LlmError;
use crate::pipeline::Cascade;
use crate::pipeline::extract::extract_text_from_file;
use crate::pipeline::types::ClassificationResult;

/// Max request body, uploads included.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared state for the analyze routes.
#[derive(Clone)]
pub struct AppState {
    pub cascade: Arc<Cascade>,
}

impl AppState {
    pub fn new(cascade: Cascade) -> Self {
        Self {
            cascade: Arc::new(cascade),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        Ok(Self::new(Cascade::from_config(config)?))
    }
}

/// Build the Axum router with the analyze endpoint, probes, and CORS.
pub fn analyze_routes(state: AppState, frontend_url: &str) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(frontend_url))
        .with_state(state)
}

/// `*` allows any origin without credentials; a concrete origin enables them.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let any_origin = || {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    if frontend_url == "*" {
        return any_origin();
    }

    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request()),
        Err(e) => {
            warn!(frontend_url, error = %e, "Invalid FRONTEND_URL, allowing any origin");
            any_origin()
        }
    }
}

// ── Probes ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "API do Automail" }))
}

// ── Analyze ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TextForm {
    text: Option<String>,
}

/// POST /api/analyze
///
/// Accepts JSON `{"text": ...}`, multipart (a `file` part wins over `text`),
/// or an urlencoded `text` field. Empty text is answered without classifying.
async fn analyze(State(state): State<AppState>, request: Request) -> Json<ClassificationResult> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = if content_type.contains("application/json") {
        json_text(request).await
    } else if content_type.starts_with("multipart/form-data") {
        multipart_text(request).await
    } else {
        form_text(request).await
    };

    let text = raw.trim();
    if text.is_empty() {
        debug!(content_type = %content_type, "No text to analyze");
        return Json(ClassificationResult::no_text());
    }

    info!(chars = text.chars().count(), "Analyzing email");
    Json(state.cascade.analyze(text).await)
}

/// `text` from a JSON body. Unreadable bodies and non-string values count as empty.
async fn json_text(request: Request) -> String {
    let body = match Bytes::from_request(request, &()).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Failed to read JSON body");
            return String::new();
        }
    };

    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) => value
            .get("text")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Err(e) => {
            debug!(error = %e, "Unreadable JSON body");
            String::new()
        }
    }
}

async fn form_text(request: Request) -> String {
    match Form::<TextForm>::from_request(request, &()).await {
        Ok(Form(form)) => form.text.unwrap_or_default(),
        Err(e) => {
            debug!(error = %e, "Unreadable form body");
            String::new()
        }
    }
}

/// Text of the `file` part if one was uploaded, else the `text` field.
async fn multipart_text(request: Request) -> String {
    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(e) => {
            warn!(error = %e, "Invalid multipart request");
            return String::new();
        }
    };

    let mut text_field = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Malformed multipart body");
                break;
            }
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(error = %e, "Failed to read uploaded file");
                        return String::new();
                    }
                };
                // Browsers send an empty part when no file was chosen.
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                return extract_upload(filename, bytes).await;
            }
            Some("text") => text_field = field.text().await.ok(),
            _ => {}
        }
    }

    text_field.unwrap_or_default()
}

async fn extract_upload(filename: String, bytes: Bytes) -> String {
    debug!(filename = %filename, size = bytes.len(), "Extracting uploaded file");
    tokio::task::spawn_blocking(move || extract_text_from_file(&filename, &bytes))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "File extraction task failed");
            String::new()
        })
}
