// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ORQUESTRADOR DE CONTEÚDO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Sequência de uma requisição:
//   notícias → título → meta-descrição (usa o título) → corpo
//
// Tudo em série, sem retry: a primeira falha aborta a geração.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod prompts;

use std::sync::Arc;
use std::time::Instant;

use crate::llm::{LlmClient, LlmError};
use crate::news::{NewsError, NewsSource};
use crate::types::{GeneratedContent, NewsDigest};

/// Erros da geração de conteúdo.
///
/// Só duas categorias chegam ao cliente HTTP: credencial ausente ou falha
/// de uma API externa. A mensagem é legível e vai inteira no `detail`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Credencial de uma API externa não configurada
    #[error("{0}")]
    Configuration(String),

    /// Resposta de erro (ou falha de transporte) de uma API externa
    #[error("{0}")]
    Upstream(String),
}

impl GenerationError {
    /// Mensagem exposta ao cliente.
    pub fn detail(&self) -> &str {
        match self {
            Self::Configuration(msg) | Self::Upstream(msg) => msg,
        }
    }
}

impl From<NewsError> for GenerationError {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::MissingApiKey => Self::Configuration(err.to_string()),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => Self::Configuration(err.to_string()),
            other => Self::Upstream(format!("Error calling OpenAI: {}", other)),
        }
    }
}

/// Orquestrador: recebe os dois colaboradores explicitamente.
#[derive(Clone)]
pub struct ContentGenerator {
    news: Arc<dyn NewsSource>,
    llm: Arc<dyn LlmClient>,
}

impl ContentGenerator {
    pub fn new(news: Arc<dyn NewsSource>, llm: Arc<dyn LlmClient>) -> Self {
        Self { news, llm }
    }

    /// Verifica as duas credenciais antes de qualquer chamada de rede.
    ///
    /// A do modelo é checada primeiro.
    pub fn ensure_configured(&self) -> Result<(), GenerationError> {
        if !self.llm.is_configured() {
            return Err(LlmError::MissingApiKey.into());
        }
        if !self.news.is_configured() {
            return Err(NewsError::MissingApiKey.into());
        }
        Ok(())
    }

    /// Busca o digest de notícias do tópico.
    pub async fn fetch_news(&self, topic: &str) -> Result<NewsDigest, GenerationError> {
        Ok(self.news.fetch_news(topic).await?)
    }

    /// Gera título, meta-descrição e corpo para o tópico.
    pub async fn generate(&self, topic: &str) -> Result<GeneratedContent, GenerationError> {
        self.ensure_configured()?;
        let started = Instant::now();

        let step = Instant::now();
        let news = self.fetch_news(topic).await?;
        log::debug!(
            "📰 Notícias em {}ms (vazio: {})",
            step.elapsed().as_millis(),
            news.is_empty()
        );

        let step = Instant::now();
        let title = self.llm.complete(&prompts::title_request(topic, &news)).await?;
        log::debug!("✏️  Título em {}ms: {}", step.elapsed().as_millis(), title);

        let step = Instant::now();
        let meta_description = self.llm.complete(&prompts::description_request(&title)).await?;
        log::debug!("✏️  Meta-descrição em {}ms", step.elapsed().as_millis());

        let step = Instant::now();
        let post_content = self.llm.complete(&prompts::body_request(topic, &news)).await?;
        log::debug!(
            "✏️  Corpo em {}ms ({} chars)",
            step.elapsed().as_millis(),
            post_content.chars().count()
        );

        log::info!(
            "✅ Post gerado para '{}' em {}ms",
            topic,
            started.elapsed().as_millis()
        );

        Ok(GeneratedContent {
            title,
            meta_description,
            post_content,
        })
    }
}
