// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ENDPOINT HANDLERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::types::*;
use super::AppState;
use crate::generator::GenerationError;
use crate::types::GeneratedContent;

// ── GET / ───────────────────────────────────────

/// Liveness
pub async fn root() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        message: "Service is running".into(),
    })
}

// ── GET /heartbeat ──────────────────────────────

/// Health check; não toca nas APIs externas
pub async fn heartbeat() -> Json<Heartbeat> {
    Json(Heartbeat {
        status: "OK".into(),
    })
}

// ── POST /generate-post ─────────────────────────

/// Endpoint principal: notícias + três completions
pub async fn generate_post(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GeneratePostRequest>,
) -> Result<Json<GeneratedContent>, GenerationError> {
    let request_id = uuid::Uuid::new_v4();
    log::info!("[{}] POST /generate-post topic='{}'", request_id, body.topic);

    match state.generator.generate(&body.topic).await {
        Ok(content) => Ok(Json(content)),
        Err(err) => {
            log::error!("[{}] Falha ao gerar post: {}", request_id, err);
            Err(err)
        }
    }
}

// ── Helpers ─────────────────────────────────────

impl IntoResponse for GenerationError {
    fn into_response(self) -> Response {
        error_response(StatusCode::INTERNAL_SERVER_ERROR, self.detail())
    }
}

fn error_response(status: StatusCode, detail: &str) -> Response {
    (
        status,
        Json(ApiError {
            detail: detail.into(),
        }),
    )
        .into_response()
}
