use std::time::Duration;

use anyhow::Context;
use mock_server::ServerConfig;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "mock_server=info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let latency_ms: u64 = match std::env::var("TODO_LATENCY_MS") {
        Ok(v) => v.parse().context("TODO_LATENCY_MS must be a whole number of milliseconds")?,
        Err(_) => 0,
    };
    let config = ServerConfig {
        latency: Duration::from_millis(latency_ms),
        seed: env_flag("TODO_SEED"),
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, latency_ms, seed = config.seed, "listening");
    mock_server::run(listener, config).await?;
    Ok(())
}
