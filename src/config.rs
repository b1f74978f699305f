// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO RUNTIME, SERVIDOR, LLM E API DE NOTÍCIAS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Todas as configurações podem ser definidas via .env ou variáveis de
// ambiente. Os loaders `*_from` recebem uma função de lookup para que os
// testes não precisem mexer no ambiente do processo.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Lê uma variável do ambiente do processo.
fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Lê uma variável e descarta valores vazios.
fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lê e converte uma variável; valores inválidos são ignorados com warning.
fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = non_empty(lookup, key)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("⚠ {}={} inválido, usando padrão", key, raw);
            None
        }
    }
}

// ─────────────────────────────────────────────────
// Runtime Tokio
// ─────────────────────────────────────────────────

/// Configuração do runtime Tokio.
///
/// Controla número de threads e comportamento do async runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Número de worker threads do Tokio.
    /// Se None, usa cálculo dinâmico: min(cpu_cores, max_threads).
    pub worker_threads: Option<usize>,

    /// Número máximo de threads (limite superior para cálculo dinâmico).
    /// Padrão: 16
    pub max_threads: usize,

    /// Número máximo de blocking threads.
    /// Padrão: 512 (padrão do Tokio)
    pub max_blocking_threads: usize,

    /// Nome das threads do runtime.
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            max_threads: 16,
            max_blocking_threads: 512,
            thread_name: "news-post-generator".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Calcula número efetivo de worker threads.
    ///
    /// Se `worker_threads` está definido, usa esse valor.
    /// Senão, calcula: min(cpu_cores, max_threads)
    pub fn effective_worker_threads(&self) -> usize {
        if let Some(threads) = self.worker_threads {
            threads
        } else {
            std::cmp::min(num_cpus::get(), self.max_threads)
        }
    }
}

/// Carrega configuração do runtime a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `TOKIO_THREADS`: Número fixo de threads (opcional)
/// - `TOKIO_MAX_THREADS`: Máximo de threads para cálculo dinâmico (padrão: 16)
/// - `TOKIO_MAX_BLOCKING`: Máximo de blocking threads (padrão: 512)
pub fn load_runtime_config() -> RuntimeConfig {
    load_runtime_config_from(env_lookup)
}

/// Igual a [`load_runtime_config`], lendo de `lookup`.
pub fn load_runtime_config_from<F>(lookup: F) -> RuntimeConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = RuntimeConfig::default();

    if let Some(threads) = parsed::<_, usize>(&lookup, "TOKIO_THREADS").filter(|t| *t > 0) {
        config.worker_threads = Some(threads);
        log::info!("📦 TOKIO_THREADS={} (fixo)", threads);
    }

    if let Some(max) = parsed::<_, usize>(&lookup, "TOKIO_MAX_THREADS").filter(|m| *m > 0) {
        config.max_threads = max;
        log::info!("📦 TOKIO_MAX_THREADS={}", max);
    }

    if let Some(blocking) = parsed::<_, usize>(&lookup, "TOKIO_MAX_BLOCKING").filter(|b| *b > 0) {
        config.max_blocking_threads = blocking;
        log::info!("📦 TOKIO_MAX_BLOCKING={}", blocking);
    }

    config
}

/// Instala panic hook que loga o panic em vez de escrever direto no stderr.
///
/// Um panic dentro de um handler derruba só a task daquela requisição; o
/// servidor continua atendendo as próximas. Depende de unwind: o perfil de
/// release não pode usar `panic = "abort"`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic payload".to_string()
        };

        log::error!(
            "[PANIC] Thread {:?} ({}) at {}: {}",
            thread.id(),
            thread_name,
            location,
            message
        );
    }));
}

/// Cria o runtime Tokio com configuração customizada.
pub fn create_tokio_runtime(config: &RuntimeConfig) -> std::io::Result<tokio::runtime::Runtime> {
    let worker_threads = config.effective_worker_threads();

    log::info!(
        "🚀 Criando runtime Tokio: {} workers, {} blocking max",
        worker_threads,
        config.max_blocking_threads
    );

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(config.max_blocking_threads)
        .thread_name(&config.thread_name)
        .enable_all()
        .build()
}

// ─────────────────────────────────────────────────
// Servidor HTTP
// ─────────────────────────────────────────────────

/// Endereço de escuta do servidor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Endereço completo para o `TcpListener`.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Carrega `HOST` e `PORT` (padrão `0.0.0.0:8000`).
pub fn load_server_config() -> ServerConfig {
    load_server_config_from(env_lookup)
}

/// Igual a [`load_server_config`], lendo de `lookup`.
pub fn load_server_config_from<F>(lookup: F) -> ServerConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ServerConfig::default();

    if let Some(host) = parsed::<_, IpAddr>(&lookup, "HOST") {
        config.host = host;
    }
    if let Some(port) = parsed::<_, u16>(&lookup, "PORT") {
        config.port = port;
    }

    config
}

// ─────────────────────────────────────────────────
// LLM
// ─────────────────────────────────────────────────

/// Configuração do cliente de completions.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Chave da API (`OPENAI_API_KEY`). Ausência só é tratada por requisição.
    pub api_key: Option<String>,
    /// Modelo usado em todas as completions
    pub model: String,
    /// URL base da API compatível com OpenAI
    pub api_base_url: String,
    /// Timeout por chamada; None usa o padrão do reqwest
    pub timeout: Option<Duration>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            api_base_url: "https://api.openai.com/v1".to_string(),
            timeout: None,
        }
    }
}

/// Carrega configuração do LLM.
///
/// - `OPENAI_API_KEY`: chave da API
/// - `LLM_MODEL`: modelo (padrão: "gpt-4o-mini")
/// - `LLM_API_BASE_URL`: URL base (padrão: "https://api.openai.com/v1")
/// - `LLM_TIMEOUT_SECS`: timeout por chamada (opcional)
pub fn load_llm_config() -> LlmConfig {
    load_llm_config_from(env_lookup)
}

/// Igual a [`load_llm_config`], lendo de `lookup`.
pub fn load_llm_config_from<F>(lookup: F) -> LlmConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = LlmConfig {
        api_key: non_empty(&lookup, "OPENAI_API_KEY"),
        ..LlmConfig::default()
    };

    if let Some(model) = non_empty(&lookup, "LLM_MODEL") {
        config.model = model;
    }
    if let Some(url) = non_empty(&lookup, "LLM_API_BASE_URL") {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = parsed::<_, u64>(&lookup, "LLM_TIMEOUT_SECS").filter(|s| *s > 0) {
        config.timeout = Some(Duration::from_secs(secs));
    }

    config
}

// ─────────────────────────────────────────────────
// API de notícias
// ─────────────────────────────────────────────────

/// Configuração do cliente da Currents API.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// Chave da API (`CURRENTS_API_KEY`)
    pub api_key: Option<String>,
    /// URL base da API
    pub api_base_url: String,
    /// Filtro de idioma
    pub language: String,
    /// Timeout da chamada
    pub timeout: Duration,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://api.currentsapi.services/v1".to_string(),
            language: "en".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Carrega configuração da API de notícias.
///
/// - `CURRENTS_API_KEY`: chave da API
/// - `NEWS_API_BASE_URL`: URL base (padrão: "https://api.currentsapi.services/v1")
pub fn load_news_config() -> NewsConfig {
    load_news_config_from(env_lookup)
}

/// Igual a [`load_news_config`], lendo de `lookup`.
pub fn load_news_config_from<F>(lookup: F) -> NewsConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = NewsConfig {
        api_key: non_empty(&lookup, "CURRENTS_API_KEY"),
        ..NewsConfig::default()
    };

    if let Some(url) = non_empty(&lookup, "NEWS_API_BASE_URL") {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_runtime_config_default() {
        let config = RuntimeConfig::default();
        assert!(config.worker_threads.is_none());
        assert_eq!(config.max_threads, 16);
        assert_eq!(config.max_blocking_threads, 512);
    }

    #[test]
    fn test_effective_worker_threads_fixed() {
        let config = RuntimeConfig {
            worker_threads: Some(4),
            ..RuntimeConfig::default()
        };
        assert_eq!(config.effective_worker_threads(), 4);
    }

    #[test]
    fn test_effective_worker_threads_dynamic() {
        let config = RuntimeConfig::default();
        assert_eq!(
            config.effective_worker_threads(),
            std::cmp::min(num_cpus::get(), 16)
        );
    }

    #[test]
    fn test_runtime_config_from_env() {
        let config = load_runtime_config_from(lookup_from(&[
            ("TOKIO_THREADS", "3"),
            ("TOKIO_MAX_BLOCKING", "64"),
            ("TOKIO_MAX_THREADS", "0"),
        ]));
        assert_eq!(config.worker_threads, Some(3));
        assert_eq!(config.max_blocking_threads, 64);
        assert_eq!(config.max_threads, 16);
    }

    #[test]
    fn test_panicking_task_does_not_stop_runtime() {
        let runtime = create_tokio_runtime(&RuntimeConfig {
            worker_threads: Some(2),
            ..RuntimeConfig::default()
        })
        .unwrap();

        runtime.block_on(async {
            let failed = tokio::spawn(async { panic!("handler failure") }).await;
            assert!(failed.unwrap_err().is_panic());

            let next = tokio::spawn(async { "still serving" }).await.unwrap();
            assert_eq!(next, "still serving");
        });
    }

    #[test]
    fn test_release_profile_unwinds() {
        let manifest = include_str!("../Cargo.toml");
        assert!(!manifest.contains("panic = \"abort\""));
    }

    #[test]
    fn test_server_config_defaults() {
        let config = load_server_config_from(lookup_from(&[]));
        assert_eq!(config.port, 8000);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_server_config_port_and_host() {
        let config = load_server_config_from(lookup_from(&[("PORT", "9100"), ("HOST", "127.0.0.1")]));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9100");
    }

    #[test]
    fn test_server_config_invalid_port_keeps_default() {
        let config = load_server_config_from(lookup_from(&[("PORT", "eighty")]));
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_llm_config() {
        let config = load_llm_config_from(lookup_from(&[]));
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_base_url, "https://api.openai.com/v1");
        assert!(config.timeout.is_none());

        let config = load_llm_config_from(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("LLM_MODEL", "gpt-4.1-mini"),
            ("LLM_API_BASE_URL", "http://localhost:9000/v1/"),
            ("LLM_TIMEOUT_SECS", "30"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.api_base_url, "http://localhost:9000/v1");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = load_llm_config_from(lookup_from(&[("OPENAI_API_KEY", "   ")]));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_news_config() {
        let config = load_news_config_from(lookup_from(&[("CURRENTS_API_KEY", "cur-key")]));
        assert_eq!(config.api_key.as_deref(), Some("cur-key"));
        assert_eq!(config.language, "en");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.api_base_url, "https://api.currentsapi.services/v1");
    }
}
