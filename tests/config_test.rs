//! Integration tests for configuration loading

use berlbus_cleaning::infra::Config;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_config_from_file() {
    let temp_file = write_config(
        r#"
[bus]
id = "berlbus-07"

[countdown]
tick_interval_ms = 250

[outcome]
seed = 42

[logging]
file = "/tmp/berlbus-test.log"
json = true
"#,
    );

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.bus_id(), "berlbus-07");
    assert_eq!(config.tick_interval_ms(), 250);
    assert_eq!(config.tick_interval(), Duration::from_millis(250));
    assert_eq!(config.outcome_seed(), Some(42));
    assert_eq!(config.log_file(), "/tmp/berlbus-test.log");
    assert!(config.log_json());
    assert_eq!(config.config_file(), temp_file.path().display().to_string());
}

#[test]
fn test_partial_config_uses_defaults() {
    let temp_file = write_config("[bus]\nid = \"depot-bus\"\n");

    let config = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.bus_id(), "depot-bus");
    assert_eq!(config.tick_interval_ms(), 1000);
    assert_eq!(config.outcome_seed(), None);
    assert_eq!(config.log_file(), "berlbus-cleaning.log");
}

#[test]
fn test_zero_tick_interval_rejected() {
    let temp_file = write_config("[countdown]\ntick_interval_ms = 0\n");

    let err = Config::from_file(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("tick_interval_ms"));
}

#[test]
fn test_invalid_toml_rejected() {
    let temp_file = write_config("[countdown\ntick_interval_ms = 5\n");
    assert!(Config::from_file(temp_file.path()).is_err());
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.bus_id(), "berlbus");
    assert_eq!(config.tick_interval_ms(), 1000);
    assert_eq!(config.config_file(), "default");
}

#[test]
fn test_config_file_env_var() {
    let temp_file = write_config("[bus]\nid = \"env-bus\"\n");
    std::env::set_var("CONFIG_FILE", temp_file.path());

    let config = Config::load(None);
    assert_eq!(config.bus_id(), "env-bus");
    assert_eq!(config.config_file(), temp_file.path().display().to_string());

    // an explicit --config path still wins over the environment
    let config = Config::load(Some("/nonexistent/config.toml"));
    assert_eq!(config.bus_id(), "berlbus");

    std::env::remove_var("CONFIG_FILE");
}
