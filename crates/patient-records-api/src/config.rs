//! Server configuration.
//!
//! Layered, later sources winning: built-in defaults, an optional
//! `patient-api.toml` in the working directory, then `PATIENT_API_*`
//! environment variables (`__` separates nested keys, e.g.
//! `PATIENT_API_STORE__BACKEND=sqlite`).

use std::net::SocketAddr;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use patient_records_core::StoreConfig;
use serde::Deserialize;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const CONFIG_FILE: &str = "patient-api";
pub const ENV_PREFIX: &str = "PATIENT_API";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_addr: SocketAddr,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
    #[serde(default)]
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load from defaults, config file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Load from defaults overlaid with a TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("bind_addr", DEFAULT_BIND_ADDR)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)
    }
}
