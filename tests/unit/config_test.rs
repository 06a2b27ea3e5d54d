use dstl_chat::config::{Config, ConfigError, DEFAULT_SYSTEM_PROMPT};
use tempfile::TempDir;
use validator::Validate;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("chat.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.server_port, 8000);
    assert_eq!(config.database_url, "sqlite://chat.db");
    assert_eq!(config.environment, "development");
    assert_eq!(config.static_dir, "static");
    assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    assert!(config.seed_on_startup);
    assert!(config.llm_api_key.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_is_production() {
    let mut config = Config::default();
    assert!(!config.is_production());

    config.environment = "production".to_string();
    assert!(config.is_production());

    config.environment = "Production".to_string();
    assert!(!config.is_production());
}

#[test]
fn test_log_filter_uses_level() {
    let config = Config {
        log_level: "debug".to_string(),
        ..Config::default()
    };
    assert_eq!(config.log_filter(), "dstl_chat=debug,tower_http=debug");
}

#[test]
fn test_load_from_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
server_port = 9100
llm_model = "mistral:7b"
llm_api_key = "secret"
seed_on_startup = false
"#,
    );

    let config = Config::load_from(Some(&path)).unwrap();

    assert_eq!(config.server_port, 9100);
    assert_eq!(config.llm_model, "mistral:7b");
    assert_eq!(config.llm_api_key.as_deref(), Some("secret"));
    assert!(!config.seed_on_startup);
    // Untouched keys keep their defaults
    assert_eq!(config.max_connections, 10);
}

#[test]
fn test_load_rejects_privileged_port() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "server_port = 80\n");

    let result = Config::load_from(Some(&path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_rejects_invalid_llm_url() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "llm_base_url = \"not a url\"\n");

    let result = Config::load_from(Some(&path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_requires_explicit_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");

    let result = Config::load_from(Some(&missing));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}
