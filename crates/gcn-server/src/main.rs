//! # GCN Server
//!
//! Main entry point for the GCN Kafka admin and circulars server.

#![forbid(unsafe_code)]

use gcn_server::{Server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("GCN server starting...");

    let server = Server::new(config).await?;
    server.run().await
}
