//! Paging gateway daemon.
//!
//! Loads the gateway model from a JSON file, starts the actor against
//! the simulated tag space and call switch, and logs the event stream
//! until interrupted. Useful for exercising a model file before it is
//! wired to live systems.

use anyhow::{Context, Result};
use page_engine::GatewayConfig;
use page_sim::SimGateway;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "pagegate.json".to_string());
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading gateway model from {path}"))?;
    let config: GatewayConfig =
        serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?;
    info!(
        path,
        elements = config.elements.len(),
        zones = config.zones.len(),
        messages = config.messages.len(),
        "gateway model loaded"
    );

    let gateway = SimGateway::start(&config).context("starting the gateway")?;
    let mut events = gateway.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    let (topic, detail) = event.relay_parts();
                    info!(topic, detail, "gateway event");
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "event stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    gateway.shutdown().await;
    Ok(())
}
