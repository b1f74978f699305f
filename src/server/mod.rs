// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP SERVER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//!
//! Servidor HTTP do gerador de posts.
//!
//! ## Endpoints
//!
//! - `GET /` - Liveness (`{"message": "Service is running"}`)
//! - `GET /heartbeat` - Health check (`{"status": "OK"}`)
//! - `POST /generate-post` - `{"topic": "..."}` → título, meta-descrição e corpo
//!
//! Erros de geração saem como HTTP 500 com `{"detail": "..."}`.
//!
//! ## Uso
//!
//! ```bash
//! cargo run -- --port=8000
//! ```

pub mod types;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::generator::ContentGenerator;

pub use types::*;

/// Estado compartilhado entre todos os handlers
pub struct AppState {
    /// Orquestrador com os clientes de notícias e LLM já configurados
    pub generator: ContentGenerator,
}

impl AppState {
    /// Cria o estado a partir do orquestrador.
    pub fn new(generator: ContentGenerator) -> Self {
        Self { generator }
    }
}

/// Monta o router com todas as rotas, CORS e estado.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/heartbeat", get(handlers::heartbeat))
        .route("/generate-post", post(handlers::generate_post))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Inicia o servidor HTTP no endereço especificado.
pub async fn start_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("News post server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
