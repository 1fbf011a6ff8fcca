use crate::domain::commands::Command;
use crate::registry::RegistrySnapshot;
use tokio::sync::mpsc::Sender;
use tokio::sync::watch::Receiver;
use tracing::{info, instrument};

/// Presentation layer boundary: a tray panel adapter consumes read-only
/// registry snapshots here and issues user commands through the sender. Until
/// a panel is attached, every change is logged.
#[instrument(skip_all)]
pub async fn snapshot_listener(mut rx: Receiver<RegistrySnapshot>, _command_tx: Sender<Command>) {
    while rx.changed().await.is_ok() {
        let snapshot: RegistrySnapshot = rx.borrow().clone();
        for device in snapshot.devices.iter() {
            info!(
                device_id = %device.id,
                "💡 '{}' is {} at {}% ({:?})",
                device.name,
                if device.on { "on" } else { "off" },
                device.brightness,
                device.sync_state
            );
        }
    }
}
