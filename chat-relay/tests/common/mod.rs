#![allow(dead_code)]

use chat_relay::config::{GoogleConfig, RelayConfig};
use chat_relay::services::UpstreamClient;
use chat_relay::startup::Application;
use reqwest::Client;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const GENERATE_PATH: &str = "/v1beta2/models/text-bison:generate";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: Client,
}

impl TestApp {
    /// Relay pointed at `upstream`, with a credential and a short timeout.
    pub async fn spawn(upstream: &MockServer) -> Self {
        Self::spawn_with(
            Some(TEST_API_KEY),
            &format!("{}{}", upstream.uri(), GENERATE_PATH),
            Duration::from_secs(2),
        )
        .await
    }

    pub async fn spawn_with(api_key: Option<&str>, base_url: &str, timeout: Duration) -> Self {
        let app = Application::build(test_config(api_key, base_url, timeout))
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    /// Relay with an explicit (possibly absent) outbound client.
    pub async fn spawn_with_client(
        api_key: Option<&str>,
        client: Option<Arc<dyn UpstreamClient>>,
    ) -> Self {
        let config = test_config(
            api_key,
            "http://127.0.0.1:1/unused",
            Duration::from_secs(2),
        );
        let app = Application::build_with_client(config, client)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    async fn start(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the listener by polling the liveness route
        let client = Client::new();
        for _ in 0..50 {
            if client.get(&address).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn post_chat(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/ai/chat", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_raw(&self, body: &'static str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/ai/chat", self.address))
            .header("content-type", "text/plain")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

fn test_config(api_key: Option<&str>, base_url: &str, timeout: Duration) -> RelayConfig {
    RelayConfig {
        common: CoreConfig {
            port: 0,
            log_level: "debug".to_string(),
        },
        google: GoogleConfig::new(api_key.map(str::to_string), base_url, timeout)
            .expect("valid upstream config"),
    }
}
