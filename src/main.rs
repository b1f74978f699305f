// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// NEWS POST SERVER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Uso:
//   news-post-server                      (PORT/HOST do ambiente, padrão 0.0.0.0:8000)
//   news-post-server --port=9000
//   news-post-server --host=127.0.0.1 --port=9000
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use news_post_generator::prelude::*;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
fn load_dotenv() {
    let possible_paths = [
        PathBuf::from(".env"),
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".env"),
    ];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => {
                    eprintln!("✓ Carregado .env de: {:?}", path);
                    return;
                }
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }
}

/// Aplica `--port=N` e `--host=ADDR` por cima da configuração do ambiente.
fn apply_cli_overrides(mut config: ServerConfig, args: &[String]) -> anyhow::Result<ServerConfig> {
    for arg in args {
        if let Some(port) = arg.strip_prefix("--port=") {
            config.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid --port value: {}", port))?;
        } else if let Some(host) = arg.strip_prefix("--host=") {
            config.host = host
                .parse::<IpAddr>()
                .map_err(|_| anyhow::anyhow!("invalid --host value: {}", host))?;
        } else {
            anyhow::bail!("unknown argument: {}", arg);
        }
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    load_dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    install_panic_hook();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let server_config = apply_cli_overrides(load_server_config(), &args)?;

    let runtime = create_tokio_runtime(&load_runtime_config())?;
    runtime.block_on(run(server_config))
}

async fn run(server_config: ServerConfig) -> anyhow::Result<()> {
    let llm_config = load_llm_config();
    let news_config = load_news_config();

    // Sem chave o servidor sobe mesmo assim; cada requisição responde 500.
    if llm_config.api_key.is_none() {
        log::warn!("⚠ OPENAI_API_KEY não definida");
    }
    if news_config.api_key.is_none() {
        log::warn!("⚠ CURRENTS_API_KEY não definida");
    }

    log::info!(
        "🔧 News post generator v{} | modelo: {}",
        news_post_generator::VERSION,
        llm_config.model
    );

    let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::from_config(&llm_config));
    let news: Arc<dyn NewsSource> = Arc::new(CurrentsClient::from_config(&news_config));
    let state = Arc::new(AppState::new(ContentGenerator::new(news, llm)));

    start_server(server_config.socket_addr(), state).await
}
