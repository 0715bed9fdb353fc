//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use anyhow::{ensure, Context};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct BusConfig {
    /// Bus label attached to every session (e.g. "berlbus-01")
    #[serde(default = "default_bus_id")]
    pub id: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self { id: default_bus_id() }
    }
}

fn default_bus_id() -> String {
    "berlbus".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountdownConfig {
    /// Countdown period in milliseconds (one simulated second)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self { tick_interval_ms: default_tick_interval_ms() }
    }
}

fn default_tick_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutcomeConfig {
    /// Fixed RNG seed for reproducible reports; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log file used by the terminal front end
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Emit JSON lines instead of plain text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { file: default_log_file(), json: false }
    }
}

fn default_log_file() -> String {
    "berlbus-cleaning.log".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub outcome: OutcomeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    bus_id: String,
    tick_interval_ms: u64,
    outcome_seed: Option<u64>,
    log_file: String,
    log_json: bool,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus_id: default_bus_id(),
            tick_interval_ms: default_tick_interval_ms(),
            outcome_seed: None,
            log_file: default_log_file(),
            log_json: false,
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Determine config file path: explicit `--config` value, then the
    /// CONFIG_FILE environment variable, then config/dev.toml
    pub fn resolve_config_path(cli_path: Option<&str>) -> String {
        if let Some(path) = cli_path {
            return path.to_string();
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        ensure!(
            toml_config.countdown.tick_interval_ms > 0,
            "countdown.tick_interval_ms must be greater than zero in {}",
            path.display()
        );

        Ok(Self {
            bus_id: toml_config.bus.id,
            tick_interval_ms: toml_config.countdown.tick_interval_ms,
            outcome_seed: toml_config.outcome.seed,
            log_file: toml_config.logging.file,
            log_json: toml_config.logging.json,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration from the resolved path - tries TOML file first, falls back to defaults
    pub fn load(cli_path: Option<&str>) -> Self {
        Self::load_from_path(Self::resolve_config_path(cli_path))
    }

    /// Load configuration from a path, falling back to defaults on any error
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn bus_id(&self) -> &str {
        &self.bus_id
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn outcome_seed(&self) -> Option<u64> {
        self.outcome_seed
    }

    pub fn log_file(&self) -> &str {
        &self.log_file
    }

    pub fn log_json(&self) -> bool {
        self.log_json
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Override the countdown period (e.g. a fast simulation)
    pub fn with_tick_interval_ms(mut self, ms: u64) -> anyhow::Result<Self> {
        ensure!(ms > 0, "tick_interval_ms must be greater than zero");
        self.tick_interval_ms = ms;
        Ok(self)
    }

    /// Override the outcome seed
    pub fn with_outcome_seed(mut self, seed: u64) -> Self {
        self.outcome_seed = Some(seed);
        self
    }
}
