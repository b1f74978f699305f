//! # News Post Generator
//!
//! Serviço HTTP que recebe um tópico, busca as manchetes recentes sobre ele
//! e pede a um LLM um **título**, uma **meta-descrição** e o **corpo** de um
//! post.
//!
//! ## Fluxo
//!
//! 1. [`news::NewsSource`] busca até 5 manchetes (Currents API)
//! 2. [`llm::LlmClient`] gera o título a partir do tópico + manchetes
//! 3. A meta-descrição é gerada a partir do título
//! 4. O corpo é gerado a partir do tópico + manchetes, com rubrica de estrutura
//!
//! Tudo em série e sem retry; a primeira falha vira um HTTP 500.
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use news_post_generator::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let news = Arc::new(CurrentsClient::from_config(&load_news_config()));
//!     let llm = Arc::new(OpenAiClient::from_config(&load_llm_config()));
//!     let generator = ContentGenerator::new(news, llm);
//!     let post = generator.generate("electric vehicles").await.unwrap();
//!     println!("{}", post.title);
//! }
//! ```

#![warn(rust_2018_idioms)]

/// Tipos compartilhados: [`NewsDigest`], [`CompletionRequest`],
/// [`GeneratedContent`].
pub mod types;

/// Configuração do runtime, servidor, LLM e API de notícias via ambiente.
///
/// **Credenciais:**
/// - `OPENAI_API_KEY`: chave da API do modelo
/// - `CURRENTS_API_KEY`: chave da API de notícias
///
/// **Servidor:**
/// - `PORT`: porta (padrão: 8000)
/// - `HOST`: endereço (padrão: 0.0.0.0)
///
/// **LLM:**
/// - `LLM_MODEL`: modelo (padrão: "gpt-4o-mini")
/// - `LLM_API_BASE_URL`: URL base customizada (opcional)
/// - `LLM_TIMEOUT_SECS`: timeout por chamada (opcional)
///
/// **Notícias:**
/// - `NEWS_API_BASE_URL`: URL base customizada (opcional)
///
/// **Runtime Tokio:**
/// - `TOKIO_THREADS`, `TOKIO_MAX_THREADS`, `TOKIO_MAX_BLOCKING`
pub mod config;

/// Cliente de notícias (`NewsSource`, `CurrentsClient`, mock).
pub mod news;

/// Cliente LLM (`LlmClient`, `OpenAiClient`, mock).
pub mod llm;

/// Orquestrador da geração e templates de prompt.
pub mod generator;

/// Servidor HTTP (axum).
pub mod server;

pub use config::{
    create_tokio_runtime, install_panic_hook, load_llm_config, load_news_config,
    load_runtime_config, load_server_config, LlmConfig, NewsConfig, RuntimeConfig, ServerConfig,
};
pub use generator::{ContentGenerator, GenerationError};
pub use types::*;

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
pub mod prelude {
    pub use crate::config::*;
    pub use crate::generator::{ContentGenerator, GenerationError};
    pub use crate::llm::{LlmClient, LlmError, OpenAiClient};
    pub use crate::news::{CurrentsClient, NewsError, NewsSource};
    pub use crate::server::{router, start_server, AppState};
    pub use crate::types::*;
}
