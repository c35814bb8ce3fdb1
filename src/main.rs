//! Process bootstrap: logging, config, browser engine, health endpoint,
//! then the polling loop until ctrl-c.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quotesmith::config::Config;
use quotesmith::dispatch::{self, Dispatcher};
use quotesmith::health;
use quotesmith::render::{ChromiumRenderer, EngineConfig, RenderPipeline};
use quotesmith::state::SessionStore;
use quotesmith::telegram::BotApi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quotesmith=info")),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    // The rendering engine is the one component whose startup failure
    // aborts the process; everything else degrades at runtime.
    let renderer = Arc::new(ChromiumRenderer::new(EngineConfig {
        executable: config.chrome_executable.clone(),
        ..EngineConfig::default()
    }));
    renderer
        .startup()
        .await
        .context("failed to start the rendering engine")?;

    let health_port = config.health_port;
    tokio::spawn(async move {
        if let Err(err) = health::serve(health_port).await {
            warn!(%err, "health endpoint stopped");
        }
    });

    let api = Arc::new(BotApi::new(config.bot_token));
    let pipeline = Arc::new(RenderPipeline::new(renderer.clone())?);
    let sessions = Arc::new(SessionStore::new());
    let dispatcher = Arc::new(Dispatcher::new(
        api.clone(),
        api.clone(),
        pipeline,
        sessions,
    ));

    tokio::select! {
        result = dispatch::run_polling(api, dispatcher) => {
            result.context("polling loop failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    renderer.shutdown().await;
    Ok(())
}
