// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE LLM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para completions de texto.
// Produção usa qualquer API compatível com OpenAI Chat Completions.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::config::LlmConfig;
use crate::types::CompletionRequest;

/// Erros do cliente LLM
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("OPENAI_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response format: {0}")]
    ParseError(String),

    #[error("Response contained no completion choices")]
    EmptyResponse,
}

/// Trait principal para clientes LLM
///
/// Permite trocar o provedor (ou usar um mock) sem tocar no orquestrador.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// `false` quando falta a credencial; nenhuma chamada de rede é feita.
    fn is_configured(&self) -> bool;

    /// Executa uma completion e devolve o texto da primeira escolha, sem
    /// espaços nas pontas.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente mock para testes unitários
///
/// Devolve as respostas enfileiradas na ordem e registra cada requisição
/// recebida. Com a fila vazia responde `"Mock completion"`.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    unconfigured: bool,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Self::default()
        }
    }

    /// Enfileira uma falha; a chamada correspondente devolve `ApiError`.
    pub fn push_failure(&self, body: impl Into<String>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Err(body.into()));
        }
    }

    /// Requisições recebidas até agora, na ordem.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn is_configured(&self) -> bool {
        !self.unconfigured
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        if self.unconfigured {
            return Err(LlmError::MissingApiKey);
        }
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self.responses.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(Ok(text)) => Ok(text.trim().to_string()),
            Some(Err(body)) => Err(LlmError::ApiError { status: 500, body }),
            None => Ok("Mock completion".into()),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO OPENAI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Cliente para OpenAI API
pub struct OpenAiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn from_config(config: &LlmConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client: builder.build().unwrap_or_default(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stop: request.stop.as_deref(),
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerationError;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn client_for(server: &MockServer, api_key: Option<&str>) -> OpenAiClient {
        OpenAiClient::from_config(&LlmConfig {
            api_key: api_key.map(String::from),
            api_base_url: server.base_url(),
            ..LlmConfig::default()
        })
    }

    fn completion(text: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": text }, "finish_reason": "stop" }]
        })
    }

    #[tokio::test]
    async fn test_mock_client_queue_and_record() {
        let client = MockLlmClient::with_responses(["  first  ", "second"]);
        client.push_failure("boom");

        let req = CompletionRequest::new("p1", 10);
        assert_eq!(client.complete(&req).await.unwrap(), "first");
        assert_eq!(client.complete(&req).await.unwrap(), "second");
        assert!(matches!(
            client.complete(&req).await,
            Err(LlmError::ApiError { .. })
        ));
        assert_eq!(client.complete(&req).await.unwrap(), "Mock completion");
        assert_eq!(client.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_complete_sends_parameters_and_trims() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer sk-test")
                    .json_body_includes(
                        r#"{
                            "model": "gpt-4o-mini",
                            "messages": [{ "role": "user", "content": "Write a title" }],
                            "max_tokens": 60,
                            "temperature": 0.5,
                            "stop": ["\n"]
                        }"#,
                    );
                then.status(200).json_body(completion("  A Great Title \n"));
            })
            .await;

        let client = client_for(&server, Some("sk-test"));
        let request = CompletionRequest::new("Write a title", 60).with_stop(["\n"]);
        let text = client.complete(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "A Great Title");
    }

    #[test]
    fn test_stop_is_omitted_when_absent() {
        let request = CompletionRequest::new("body", 1500);
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stop: request.stop.as_deref(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("stop").is_none());
        assert_eq!(value["max_tokens"], 1500);
    }

    #[tokio::test]
    async fn test_api_error_keeps_status_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429).body("rate limited");
            })
            .await;

        let err = client_for(&server, Some("k"))
            .complete(&CompletionRequest::new("x", 5))
            .await
            .unwrap_err();
        match err {
            LlmError::ApiError { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let err = client_for(&server, Some("k"))
            .complete(&CompletionRequest::new("x", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(completion("x"));
            })
            .await;

        let client = client_for(&server, None);
        assert!(!client.is_configured());
        let err = client.complete(&CompletionRequest::new("x", 5)).await.unwrap_err();

        assert!(matches!(err, LlmError::MissingApiKey));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_configured_timeout_is_applied() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(completion("too late"));
            })
            .await;

        let client = OpenAiClient::from_config(&LlmConfig {
            api_key: Some("k".into()),
            api_base_url: server.base_url(),
            timeout: Some(Duration::from_millis(100)),
            ..LlmConfig::default()
        });

        let err = client.complete(&CompletionRequest::new("x", 5)).await.unwrap_err();
        assert!(matches!(err, LlmError::NetworkError(_)));

        let err = GenerationError::from(err);
        assert!(matches!(err, GenerationError::Upstream(_)));
        assert!(err.detail().starts_with("Error calling OpenAI"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = OpenAiClient::from_config(&LlmConfig {
            api_key: Some("k".into()),
            api_base_url: "http://127.0.0.1:1".into(),
            ..LlmConfig::default()
        });
        let err = client.complete(&CompletionRequest::new("x", 5)).await.unwrap_err();
        assert!(matches!(err, LlmError::NetworkError(_)));
    }
}
