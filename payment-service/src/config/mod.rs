use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_SERVICE_NAME: &str = "payment-service";

#[derive(Deserialize, Clone, Debug)]
pub struct PaymentConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

impl PaymentConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let service_name = env::var("PAYMENT_SERVICE_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());

        Ok(Self {
            common,
            service_name,
        })
    }
}
