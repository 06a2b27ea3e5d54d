use serde::Deserialize;
use std::path::Path;
use validator::Validate;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant for the DSTL Chat App.";

/// Main configuration for the chat backend
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct Config {
    /// Interface the HTTP server binds to
    pub bind_address: String,

    /// HTTP server port
    #[validate(range(min = 1024, max = 65535))]
    pub server_port: u16,

    /// Database URL (SeaORM / SQLite)
    pub database_url: String,

    /// Maximum database connections
    #[validate(range(min = 1, max = 100))]
    pub max_connections: u32,

    /// Log level (e.g., info, debug, trace)
    pub log_level: String,

    /// Deployment environment; "production" also serves the frontend bundle
    pub environment: String,

    /// Directory holding the built frontend, mounted at `/app` in production
    pub static_dir: String,

    /// Insert the welcome conversation into an empty database at startup
    pub seed_on_startup: bool,

    /// Base URL of the OpenAI-compatible LLM provider
    #[validate(url)]
    pub llm_base_url: String,

    /// Bearer token for the LLM provider, if it requires one
    pub llm_api_key: Option<String>,

    /// Model name sent with every completion request
    #[validate(length(min = 1))]
    pub llm_model: String,

    /// Instruction prepended to every conversation sent to the LLM
    #[validate(length(min = 1))]
    pub system_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            server_port: 8000,
            database_url: "sqlite://chat.db".to_string(),
            max_connections: 10,
            log_level: "info".to_string(),
            environment: "development".to_string(),
            static_dir: "static".to_string(),
            seed_on_startup: true,
            llm_base_url: "http://localhost:11434/v1".to_string(),
            llm_api_key: None,
            llm_model: "llama3.1:8b".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl Config {
    /// Layering: defaults, then the config file (`path`, or `chat.toml` in the
    /// working directory if present), then `CHAT__*` variables, then the
    /// unprefixed `ENVIRONMENT` variable.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let file_source = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name("chat").required(false),
        };

        let settings = config::Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("server_port", i64::from(defaults.server_port))?
            .set_default("database_url", defaults.database_url)?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .set_default("log_level", defaults.log_level)?
            .set_default("environment", defaults.environment)?
            .set_default("static_dir", defaults.static_dir)?
            .set_default("seed_on_startup", defaults.seed_on_startup)?
            .set_default("llm_base_url", defaults.llm_base_url)?
            .set_default("llm_model", defaults.llm_model)?
            .set_default("system_prompt", defaults.system_prompt)?
            .add_source(file_source)
            // Environment overrides: CHAT__SERVER_PORT, CHAT__LLM_API_KEY, etc.
            .add_source(
                config::Environment::with_prefix("CHAT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("environment", std::env::var("ENVIRONMENT").ok())?
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> String {
        format!("dstl_chat={0},tower_http={0}", self.log_level)
    }
}
