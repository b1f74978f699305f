//! # Prompts de Geração
//!
//! Templates das três completions de um post. Funções puras: recebem o
//! tópico, o digest de notícias ou a saída anterior e devolvem o prompt.
//!
//! ## Prompts Disponíveis
//!
//! - [`title_prompt`] - Título a partir do tópico + notícias
//! - [`description_prompt`] - Meta-descrição a partir do título
//! - [`body_prompt`] - Corpo do artigo com a rubrica de estrutura

use crate::types::{CompletionRequest, NewsDigest};

/// Máximo de tokens do título.
pub const TITLE_MAX_TOKENS: u32 = 60;
/// Máximo de tokens da meta-descrição.
pub const DESCRIPTION_MAX_TOKENS: u32 = 120;
/// Máximo de tokens do corpo.
pub const BODY_MAX_TOKENS: u32 = 1500;

/// Requisitos de conteúdo embutidos no prompt do corpo.
const BODY_REQUIREMENTS: [&str; 8] = [
    "Informative and logically coherent",
    "At least 1500 characters long",
    "A clear structure with subheadings",
    "An analysis of current trends",
    "An introduction, a main body and a conclusion",
    "Examples drawn from the recent news",
    "Every paragraph at least 3-4 sentences long",
    "Easy to read and substantive",
];

// ============================================================================
// PROMPT 1: Título
// ============================================================================

/// Prompt do título. A geração para na primeira quebra de linha.
pub fn title_prompt(topic: &str, news: &NewsDigest) -> String {
    format!(
        "Come up with an engaging and accurate title for an article on the topic '{topic}', \
         taking into account the recent news:\n{news}. The title should be interesting \
         and clearly convey the essence of the topic."
    )
}

/// Requisição completa do título (stop em `\n` garante uma linha).
pub fn title_request(topic: &str, news: &NewsDigest) -> CompletionRequest {
    CompletionRequest::new(title_prompt(topic, news), TITLE_MAX_TOKENS).with_stop(["\n"])
}

// ============================================================================
// PROMPT 2: Meta-descrição
// ============================================================================

/// Prompt da meta-descrição, derivado apenas do título já gerado.
pub fn description_prompt(title: &str) -> String {
    format!(
        "Write a meta description for an article titled: '{title}'. \
         It should be complete, informative and contain the main keywords."
    )
}

/// Requisição da meta-descrição (stop em `.` corta em ~uma frase).
pub fn description_request(title: &str) -> CompletionRequest {
    CompletionRequest::new(description_prompt(title), DESCRIPTION_MAX_TOKENS).with_stop(["."])
}

// ============================================================================
// PROMPT 3: Corpo do artigo
// ============================================================================

/// Prompt do corpo com a rubrica numerada.
pub fn body_prompt(topic: &str, news: &NewsDigest) -> String {
    let requirements = BODY_REQUIREMENTS
        .iter()
        .enumerate()
        .map(|(i, req)| format!("{}) {}", i + 1, req))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Write a detailed article on the topic '{topic}', using the latest news:\n\
         {news}.\n\
         Requirements:\n\
         {requirements}"
    )
}

/// Requisição do corpo, sem stop.
pub fn body_request(topic: &str, news: &NewsDigest) -> CompletionRequest {
    CompletionRequest::new(body_prompt(topic, news), BODY_MAX_TOKENS)
}
