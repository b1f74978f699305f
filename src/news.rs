// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE DE NOTÍCIAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para buscar manchetes recentes de um tópico.
// Produção usa a Currents API (`/latest-news`).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::NewsConfig;
use crate::types::{NewsDigest, MAX_HEADLINES};

/// Erros do cliente de notícias
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("CURRENTS_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("Error fetching news: {body}")]
    ApiError { status: u16, body: String },

    #[error("Error fetching news: {0}")]
    NetworkError(String),

    #[error("Error fetching news: invalid response: {0}")]
    ParseError(String),
}

/// Fonte de notícias recentes.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// `false` quando falta a credencial; nenhuma chamada de rede é feita.
    fn is_configured(&self) -> bool;

    /// Busca as manchetes recentes do tópico e monta o digest.
    async fn fetch_news(&self, topic: &str) -> Result<NewsDigest, NewsError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Fonte mock para testes unitários
#[derive(Debug, Default)]
pub struct MockNewsSource {
    pub titles: Vec<String>,
    pub unconfigured: bool,
    pub fail_with: Option<String>,
}

impl MockNewsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn failing(body: impl Into<String>) -> Self {
        Self {
            fail_with: Some(body.into()),
            ..Self::default()
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl NewsSource for MockNewsSource {
    fn is_configured(&self) -> bool {
        !self.unconfigured
    }

    async fn fetch_news(&self, _topic: &str) -> Result<NewsDigest, NewsError> {
        if self.unconfigured {
            return Err(NewsError::MissingApiKey);
        }
        if let Some(body) = &self.fail_with {
            return Err(NewsError::ApiError {
                status: 500,
                body: body.clone(),
            });
        }
        Ok(NewsDigest::from_titles(self.titles.clone(), MAX_HEADLINES))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO CURRENTS API
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
struct LatestNewsResponse {
    #[serde(default)]
    news: Option<Vec<NewsArticle>>,
}

#[derive(Debug, Deserialize)]
struct NewsArticle {
    #[serde(default)]
    title: Option<String>,
}

/// Cliente para a Currents API
pub struct CurrentsClient {
    api_key: Option<String>,
    base_url: String,
    language: String,
    client: reqwest::Client,
}

impl CurrentsClient {
    pub fn from_config(config: &NewsConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            client: reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    fn latest_news_url(&self) -> String {
        format!("{}/latest-news", self.base_url)
    }
}

#[async_trait]
impl NewsSource for CurrentsClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_news(&self, topic: &str) -> Result<NewsDigest, NewsError> {
        let api_key = self.api_key.as_deref().ok_or(NewsError::MissingApiKey)?;

        log::debug!("📰 Buscando notícias: {}", topic);

        let response = self
            .client
            .get(self.latest_news_url())
            .query(&[
                ("language", self.language.as_str()),
                ("keywords", topic),
                ("apiKey", api_key),
            ])
            .send()
            .await
            .map_err(|e| NewsError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("📰 Currents API respondeu {}: {}", status, body);
            return Err(NewsError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let payload: LatestNewsResponse = response
            .json()
            .await
            .map_err(|e| NewsError::ParseError(e.to_string()))?;

        let articles = payload.news.unwrap_or_default();
        log::debug!("📰 {} artigos recebidos", articles.len());

        Ok(NewsDigest::from_titles(
            articles.into_iter().map(|a| a.title.unwrap_or_default()),
            MAX_HEADLINES,
        ))
    }
}
