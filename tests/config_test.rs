//! Tests for config loading from files and the environment

use std::io::Write;
use std::time::Duration;

use crossforge::config::Config;
use serial_test::serial;
use tempfile::NamedTempFile;

const ENV_KEYS: &[&str] = &[
    "SERVER_PORT",
    "YOUTUBE_API_KEY",
    "YOUTUBE_CHANNEL_ID",
    "FETCH_INTERVAL_MINUTES",
    "LLM_MODEL",
    "CROSSFORGE_LOG_FORMAT",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_example_config_parses() {
    let config = Config::from_file(std::path::Path::new("config.example.toml")).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.scheduler.max_items_per_fetch, 50);
}

#[test]
#[serial]
fn test_env_overrides_defaults() {
    clear_env();
    std::env::set_var("YOUTUBE_API_KEY", "key-123");
    std::env::set_var("YOUTUBE_CHANNEL_ID", "UC42");
    std::env::set_var("FETCH_INTERVAL_MINUTES", "15");
    std::env::set_var("LLM_MODEL", "mistral");

    let config = Config::from_env().unwrap();
    clear_env();

    assert!(config.youtube.is_configured());
    assert_eq!(config.fetch_interval(), Duration::from_secs(900));
    assert_eq!(config.llm.model, "mistral");
    assert!(!config.x.is_configured());
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let file = write_config(
        r#"
        [server]
        port = 9000

        [scheduler]
        fetch_interval_minutes = 30
        "#,
    );
    std::env::set_var("SERVER_PORT", "9100");

    let config = Config::load(Some(file.path())).unwrap();
    clear_env();

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.fetch_interval(), Duration::from_secs(1800));
}

#[test]
#[serial]
fn test_invalid_env_number_is_error() {
    clear_env();
    std::env::set_var("FETCH_INTERVAL_MINUTES", "soon");

    let result = Config::from_env();
    clear_env();

    let err = result.unwrap_err().to_string();
    assert!(err.contains("FETCH_INTERVAL_MINUTES"));
}

#[test]
#[serial]
fn test_load_rejects_invalid_values() {
    clear_env();
    let file = write_config(
        r#"
        [logging]
        format = "yaml"
        "#,
    );
    assert!(Config::load(Some(file.path())).is_err());

    std::env::set_var("CROSSFORGE_LOG_FORMAT", "json");
    let config = Config::load(Some(file.path()));
    clear_env();
    assert_eq!(config.unwrap().logging.format, "json");
}

#[test]
fn test_missing_file_is_error() {
    let err = Config::from_file(std::path::Path::new("/nonexistent/crossforge.toml"))
        .unwrap_err()
        .to_string();
    assert!(err.contains("Failed to read config file"));
}
