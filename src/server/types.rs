// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SCHEMAS API
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};

/// Request para POST /generate-post
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratePostRequest {
    pub topic: String,
}

/// Resposta de GET /
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub message: String,
}

/// Resposta de GET /heartbeat
#[derive(Debug, Serialize, Deserialize)]
pub struct Heartbeat {
    pub status: String,
}

/// Resposta de erro da API
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
}
