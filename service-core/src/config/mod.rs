use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    8001
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Layered load: optional `configuration` file, then `APP__*`, then `AI_PROXY_*`.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .add_source(config::Environment::with_prefix("AI_PROXY").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
