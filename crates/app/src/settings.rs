//! Application settings, read from `quaderno.toml` (path overridable via
//! `QUADERNO_CONFIG`) with `QUADERNO_*` environment overrides.
//!
//! See `quaderno.toml` for the configuration.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level for the env filter, e.g. "info" or "debug".
    pub level: String,
}

/// Database target: the literal string `"memory"` or a SQLite file path.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "String")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl From<String> for Database {
    fn from(value: String) -> Self {
        if value == "memory" {
            Self::Memory
        } else {
            Self::Sqlite(value)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Sweep {
    pub enabled: bool,
    pub interval_minutes: u64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub sweep: Option<Sweep>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path =
            std::env::var("QUADERNO_CONFIG").unwrap_or_else(|_| String::from("quaderno"));
        let settings = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix("QUADERNO").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
