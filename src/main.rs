use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dstl_chat::{
    api::{routes::AppState, server},
    config::Config,
    services::{assistant::AssistantService, llm_client::OpenAiCompatibleClient},
    storage::{self, SeaOrmConversationRepository},
};

#[derive(Parser, Debug)]
#[command(name = "dstl-chat", version, about = "DSTL chat backend")]
struct Cli {
    /// Path to a TOML config file (defaults to ./chat.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the HTTP port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load config
    let mut config = Config::load_from(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server_port = port;
    }
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("ENVIRONMENT: {}", config.environment);

    // Initialize database
    let db = storage::init_db(&config.database_url, config.max_connections).await?;
    if config.seed_on_startup {
        storage::seed_db(&db).await?;
    }
    let repository = Arc::new(SeaOrmConversationRepository::new(db));

    // LLM provider
    let llm = OpenAiCompatibleClient::new(config.llm_base_url.clone(), config.llm_model.clone())
        .with_api_key(config.llm_api_key.clone());

    match llm.health_check().await {
        Ok(true) => tracing::info!(
            "LLM provider reachable at {} (model {})",
            llm.base_url(),
            llm.model()
        ),
        Ok(false) => tracing::warn!("LLM provider health check at {} returned an error status", llm.base_url()),
        Err(e) => tracing::warn!("LLM provider not available: {}. Replies will fail until it is.", e),
    }

    let assistant = Arc::new(AssistantService::new(
        repository.clone(),
        Arc::new(llm),
        config.system_prompt.clone(),
    ));

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.server_port).parse()?;

    let state = AppState {
        config: Arc::new(config),
        repo: repository,
        assistant,
    };

    server::run_server(server::build_app(state), addr, shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
