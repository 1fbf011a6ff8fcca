use crate::app_config::AppConfig;
use crate::domain::commands::Command;
use crate::registry::RegistrySnapshot;
use crate::snapshot_listener::snapshot_listener;
use crate::sync_controller::SyncController;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task;
use tracing::info;

mod app_config;
mod discovery;
mod domain;
mod elgato;
mod registry;
mod snapshot_listener;
mod sync_controller;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("💡 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = Arc::new(AppConfig::load());
    info!("✅  Loaded configuration");

    let client = elgato::new_client(&config)?;

    let (command_tx, command_rx) = mpsc::channel::<Command>(config.core().command_buffer_size());
    let (snapshot_tx, snapshot_rx) = watch::channel(RegistrySnapshot::default());

    task::spawn(async move {
        snapshot_listener(snapshot_rx, command_tx).await;
    });
    info!("✅  Initialized snapshot listener");

    let controller = SyncController::new(client, config, command_rx, snapshot_tx);
    info!("💡 {} is up and running", env!("CARGO_PKG_NAME"));

    controller.run().await;

    Ok(())
}
