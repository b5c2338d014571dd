use chat_relay::config::RelayConfig;
use chat_relay::startup::Application;
use service_core::observability::init_tracing;

const SERVICE_NAME: &str = "chat-relay";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = match RelayConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(SERVICE_NAME, "info");
            tracing::error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(format!("Configuration error: {}", e)));
        }
    };

    init_tracing(SERVICE_NAME, &config.common.log_level);

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await
}
