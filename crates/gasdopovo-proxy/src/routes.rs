//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use gasdopovo_core::{Error, QueryOutcome};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::proxy::{self, AppState};

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/consultar", post(consultar))
        .fallback(fallback)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics_handle {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

/// Lookup request body
#[derive(Debug, Serialize, Deserialize)]
pub struct ConsultarRequest {
    #[serde(default)]
    pub cpf: Option<String>,
}

/// Lookup handler
async fn consultar(
    State(state): State<AppState>,
    payload: Result<Json<ConsultarRequest>, JsonRejection>,
) -> Result<Json<QueryOutcome>, AppError> {
    metrics::counter!("gasdopovo_requests_total").increment(1);

    let req = match payload {
        Ok(Json(req)) => req,
        // No JSON content type: treated as a request without a CPF
        Err(JsonRejection::MissingJsonContentType(_)) => ConsultarRequest { cpf: None },
        Err(e) => return Err(AppError::InvalidRequest(e.status(), e.body_text())),
    };
    let cpf = req.cpf.unwrap_or_default();

    let outcome = proxy::execute_lookup(&state, &cpf).await?;
    Ok(Json(outcome))
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(StatusCode, String),
    MissingIdentifier,
    InvalidIdentifier,
    Upstream(String),
    InternalError(String),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::MissingIdentifier => AppError::MissingIdentifier,
            Error::InvalidIdentifier { .. } => AppError::InvalidIdentifier,
            Error::Upstream(msg) => AppError::Upstream(msg),
            Error::Timeout => AppError::Upstream("timed out".to_string()),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidRequest(status, msg) => {
                warn!(%status, "Rejected request body: {}", msg);
                let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "Requisição muito grande"
                } else {
                    "Requisição inválida"
                };
                (status, message.to_string())
            }
            AppError::MissingIdentifier => {
                (StatusCode::BAD_REQUEST, "CPF é obrigatório".to_string())
            }
            AppError::InvalidIdentifier => (
                StatusCode::BAD_REQUEST,
                "Por favor, digite um CPF válido com 11 dígitos.".to_string(),
            ),
            AppError::Upstream(msg) => {
                error!("Upstream unavailable: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Erro ao conectar com o servidor do Gás do Povo".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro ao processar a resposta".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
