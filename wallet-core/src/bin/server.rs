//! Wallet server binary
//!
//! The chat-bot and HTTP transports are wired up outside this crate; this
//! binary just opens the wallet and keeps it running.

use std::sync::Arc;
use wallet_core::{CachedSettings, Config, StaticSettings, Wallet};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting StarShop wallet server");

    let config = Config::from_env()?;
    let settings = Arc::new(CachedSettings::new(Arc::new(StaticSettings::new())));

    let wallet = Wallet::open(config, settings).await?;
    tracing::info!("Wallet opened successfully");

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down wallet server");
    wallet.shutdown().await?;
    Ok(())
}
