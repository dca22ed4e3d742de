//! HTTP surface for SOAP note generation.
//!
//! - `POST /api/generate`: run the pipeline on a JSON body
//! - `GET /health`: liveness plus which providers have credentials
//! - optional static directory served for every other path

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use soap_pipeline::SoapGenerator;
use soap_types::{Issue, Provider, SoapError};

/// Maximum accepted request body.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    generator: Arc<SoapGenerator>,
}

impl AppState {
    pub fn new(generator: SoapGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<Issue>,
}

/// Build the application router.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/api/generate", post(handle_generate))
        .route("/health", get(handle_health));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: tokio::net::TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
}

/// GET /health: never reveals key values
async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let creds = state.generator.credentials();
    Json(json!({
        "status": "ok",
        "providers": {
            "google": creds.has(Provider::Google),
            "openai": creds.has(Provider::OpenAi),
            "mistral": creds.has(Provider::Mistral),
        }
    }))
}

/// POST /api/generate
async fn handle_generate(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    // An unreadable body normalizes like an empty one and fails validation.
    let body = match body {
        Ok(Json(value)) => value,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return rejection.into_response();
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Request body is not JSON");
            Value::Null
        }
    };

    let span = tracing::info_span!("generate", request_id = %uuid::Uuid::new_v4());
    async move {
        match state.generator.generate(&body).await {
            Ok(generation) => {
                tracing::info!(source = ?generation.source, "SOAP note generated");
                (StatusCode::OK, Json(json!({ "soap": generation.soap }))).into_response()
            }
            Err(e) => error_response(e),
        }
    }
    .instrument(span)
    .await
}

fn error_response(err: SoapError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(error = %err, "Generation failed");
    } else {
        tracing::warn!(error = %err, "Generation rejected");
    }

    let error = err.client_message();
    let issues = match err {
        SoapError::Validation(report) => report.issues,
        _ => Vec::new(),
    };
    (status, Json(ErrorBody { error, issues })).into_response()
}
