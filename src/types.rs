// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS FUNDAMENTAIS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Estruturas de dados que circulam entre a busca de notícias, o LLM e o
// servidor HTTP. Nada aqui vive além de uma requisição.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::fmt;

/// Texto devolvido quando a API de notícias não encontra nenhum artigo.
pub const NO_NEWS_FOUND: &str = "No recent news found.";

/// Quantidade máxima de manchetes usadas como contexto.
pub const MAX_HEADLINES: usize = 5;

/// Resumo das notícias recentes de um tópico.
///
/// Contém até [`MAX_HEADLINES`] títulos separados por `\n`, na ordem em que
/// a API os devolveu, ou o sentinela [`NO_NEWS_FOUND`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsDigest {
    text: String,
    empty: bool,
}

impl NewsDigest {
    /// Monta o digest a partir dos títulos recebidos.
    ///
    /// Apenas os primeiros `limit` títulos são usados. Lista vazia vira o
    /// sentinela.
    pub fn from_titles<I, S>(titles: I, limit: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let titles: Vec<String> = titles.into_iter().take(limit).map(Into::into).collect();

        if titles.is_empty() {
            Self::empty()
        } else {
            Self {
                text: titles.join("\n"),
                empty: false,
            }
        }
    }

    /// Digest sem notícias.
    pub fn empty() -> Self {
        Self {
            text: NO_NEWS_FOUND.to_string(),
            empty: true,
        }
    }

    /// `true` quando nenhuma notícia foi encontrada.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Texto do digest.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for NewsDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Parâmetros de uma única completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Prompt enviado como mensagem do usuário
    pub prompt: String,
    /// Máximo de tokens gerados
    pub max_tokens: u32,
    /// Temperatura de amostragem
    pub temperature: f32,
    /// Sequências de parada (opcional)
    pub stop: Option<Vec<String>>,
}

impl CompletionRequest {
    /// Temperatura usada em todas as etapas de geração.
    pub const DEFAULT_TEMPERATURE: f32 = 0.5;

    /// Cria uma requisição com a temperatura padrão e sem stop.
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            temperature: Self::DEFAULT_TEMPERATURE,
            stop: None,
        }
    }

    /// Define as sequências de parada.
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = Some(stop.into_iter().map(Into::into).collect());
        self
    }
}

/// Conteúdo gerado para um tópico.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub title: String,
    pub meta_description: String,
    pub post_content: String,
}
