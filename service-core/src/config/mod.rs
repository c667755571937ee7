use crate::error::AppError;
use config::{Config as Cfg, ConfigBuilder, File, builder::DefaultState};
use serde::Deserialize;

/// Settings shared by every service: where to listen and how to log.
///
/// Sources, lowest precedence first: `.env`, an optional `configuration.*`
/// file in the working directory, then `APP__*` environment variables
/// (e.g. `APP__PORT=9000`, `APP__LOG_LEVEL=debug`).
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Self::from_builder(
            Cfg::builder()
                .add_source(File::with_name("configuration").required(false))
                .add_source(config::Environment::with_prefix("APP").separator("__")),
        )
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let config = builder.build()?;
        let config: Self = config.try_deserialize()?;

        // An empty endpoint in the environment means "not configured".
        Ok(Self {
            otlp_endpoint: config.otlp_endpoint.filter(|e| !e.trim().is_empty()),
            ..config
        })
    }
}
