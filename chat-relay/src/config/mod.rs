use reqwest::Url;
use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// text-bison `generate` on the v1beta2 Generative Language API.
pub const DEFAULT_GENAI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta2/models/text-bison:generate";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// `None` keeps the service up but every chat call fails fast.
    pub api_key: Option<Secret<String>>,
    pub base_url: Url,
    pub timeout: Duration,
}

impl GoogleConfig {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("GENAI_URL '{}' is invalid: {}", base_url, e))
        })?;

        if timeout.is_zero() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GENAI_TIMEOUT_SECS must be greater than zero"
            )));
        }

        Ok(Self {
            api_key: api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
                .map(Secret::new),
            base_url,
            timeout,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Upstream URL with the credential appended as the `key` query parameter.
    pub fn endpoint(&self, api_key: &Secret<String>) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("key", api_key.expose_secret());
        url
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let timeout_secs = match env::var("GENAI_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "GENAI_TIMEOUT_SECS '{}' is not a number of seconds: {}",
                    raw,
                    e
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let google = GoogleConfig::new(
            env::var("GOOGLE_API_KEY").ok(),
            &get_env("GENAI_URL", DEFAULT_GENAI_URL),
            Duration::from_secs(timeout_secs),
        )?;

        Ok(RelayConfig { common, google })
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
