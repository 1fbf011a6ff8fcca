use crate::app_config::AppConfig;
use crate::discovery::{self, DiscoveredLight, DiscoveryError};
use crate::domain::commands::Command;
use crate::domain::device::{DeviceId, LightState};
use crate::elgato::{self, DeviceError};
use crate::registry::{Registry, RegistrySnapshot};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, instrument, warn};

/// Result of a spawned network task, reported back to the controller loop.
#[derive(Debug)]
enum SyncOutcome {
    Discovered(Result<Vec<DiscoveredLight>, DiscoveryError>),
    State {
        id: DeviceId,
        seq: u64,
        result: Result<LightState, DeviceError>,
    },
    Name {
        id: DeviceId,
        name: String,
    },
}

/// Owns the registry, the poll cadence and command dispatch. Network calls
/// (discovery, fetches, commands) run in spawned tasks and report back over
/// the outcome channel, so all registry mutation happens serially on the
/// controller loop and per-device updates can never race each other.
pub struct SyncController {
    client: Client,
    config: Arc<AppConfig>,
    registry: Registry,
    command_rx: Receiver<Command>,
    outcome_tx: Sender<SyncOutcome>,
    outcome_rx: Receiver<SyncOutcome>,
    snapshot_tx: watch::Sender<RegistrySnapshot>,
}

impl SyncController {
    pub fn new(client: Client, config: Arc<AppConfig>, command_rx: Receiver<Command>, snapshot_tx: watch::Sender<RegistrySnapshot>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel::<SyncOutcome>(64);

        SyncController {
            client,
            config,
            registry: Registry::new(),
            command_rx,
            outcome_tx,
            outcome_rx,
            snapshot_tx,
        }
    }

    #[instrument(skip(self))]
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.config.core().poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => self.start_cycle(),
                Some(command) = self.command_rx.recv() => self.dispatch(command),
                Some(outcome) = self.outcome_rx.recv() => self.apply_outcome(outcome),
            }
        }
    }

    /// Kicks off a sync cycle: a bounded discovery scan whose result comes
    /// back as an outcome. In-flight fetches from a previous cycle are not
    /// cancelled; the registry's sequence guard sorts out late arrivals.
    fn start_cycle(&self) {
        let service_type = self.config.discovery().service_type().to_string();
        let window = self.config.discovery().browse_window();
        let outcome_tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let result = discovery::discover(&service_type, window).await;
            let _ = outcome_tx.send(SyncOutcome::Discovered(result)).await;
        });
    }

    #[instrument(skip(self))]
    fn dispatch(&mut self, command: Command) {
        match command {
            Command::Refresh => {
                info!("🔄 Refresh requested");
                self.start_cycle();
            }
            Command::SetPower { device_id, on } => self.apply_command(device_id, Some(on), None),
            Command::SetBrightness { device_id, brightness } => self.apply_command(device_id, None, Some(brightness.clamp(1, 100))),
        }
    }

    /// Sends a control request to the addressed device only, independent of
    /// the polling cycle. The registry is untouched until the device confirms.
    fn apply_command(&mut self, id: DeviceId, on: Option<bool>, brightness: Option<u8>) {
        let Some(seq) = self.registry.begin_sync(id) else {
            warn!(device_id = %id, "⚠️ Dropping command for unknown device");
            return;
        };
        self.publish();

        let client = self.client.clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = elgato::apply_state(&client, id.addr(), on, brightness).await;
            let _ = outcome_tx.send(SyncOutcome::State { id, seq, result }).await;
        });
    }

    fn apply_outcome(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Discovered(Ok(discovered)) => {
                if discovered.is_empty() {
                    info!("🔍 No lights found in this scan");
                }
                for id in self.registry.reconcile(&discovered) {
                    self.start_name_fetch(id);
                }
                self.poll_known_devices();
            }
            SyncOutcome::Discovered(Err(e)) => {
                warn!("⚠️ {}, polling known devices only", e);
                self.poll_known_devices();
            }
            SyncOutcome::State { id, seq, result: Ok(state) } => {
                self.registry.update(id, seq, state);
            }
            SyncOutcome::State { id, seq, result: Err(e) } => {
                warn!(device_id = %id, "⚠️ Device did not confirm: {}", e);
                self.registry.mark_unreachable(id, Some(seq));
            }
            SyncOutcome::Name { id, name } => {
                self.registry.set_name(id, name);
            }
        }
        self.publish();
    }

    /// One fetch per known device, concurrently; at home-network scale no
    /// concurrency cap is needed.
    fn poll_known_devices(&mut self) {
        let ids: Vec<DeviceId> = self.registry.list().map(|device| device.id).collect();

        for id in ids {
            let Some(seq) = self.registry.begin_sync(id) else { continue };
            let client = self.client.clone();
            let outcome_tx = self.outcome_tx.clone();
            tokio::spawn(async move {
                let result = elgato::fetch_state(&client, id.addr()).await;
                let _ = outcome_tx.send(SyncOutcome::State { id, seq, result }).await;
            });
        }
    }

    fn start_name_fetch(&self, id: DeviceId) {
        let client = self.client.clone();
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            if let Some(name) = elgato::fetch_display_name(&client, id.addr()).await {
                let _ = outcome_tx.send(SyncOutcome::Name { id, name }).await;
            }
        });
    }

    fn publish(&self) {
        self.snapshot_tx.send(self.registry.snapshot()).unwrap_or_default();
    }
}
