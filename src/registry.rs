use crate::discovery::DiscoveredLight;
use crate::domain::device::{Device, DeviceId, LightState, SyncState};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable view of the registry handed to the presentation layer on every
/// change, sorted by id for stable display.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    pub devices: Arc<Vec<Device>>,
}

/// Last-known state of every discovered light. Owned exclusively by the sync
/// controller; every mutation goes through one of the methods below.
#[derive(Debug, Default)]
pub struct Registry {
    devices: HashMap<DeviceId, Device>,
}

impl Registry {
    pub fn new() -> Self {
        Registry { devices: HashMap::new() }
    }

    /// Merges a fresh scan into the registry. Newly seen devices are inserted
    /// as `Unknown` and returned so the caller can fetch their initial state
    /// right away. Devices absent from the scan are marked unreachable but
    /// retained, so a transiently unresponsive light keeps its place and its
    /// last-known values instead of flickering in and out.
    pub fn reconcile(&mut self, discovered: &[DiscoveredLight]) -> Vec<DeviceId> {
        let mut new_ids = Vec::new();
        let mut seen = HashSet::with_capacity(discovered.len());

        for light in discovered {
            let id = DeviceId::new(light.addr);
            seen.insert(id);
            if !self.devices.contains_key(&id) {
                info!(device_id = %id, "🔆 Discovered light '{}'", light.name);
                self.devices.insert(id, Device::new(id, light.name.clone()));
                new_ids.push(id);
            }
        }

        for device in self.devices.values_mut() {
            if !seen.contains(&device.id) && device.sync_state != SyncState::Unreachable {
                info!(device_id = %device.id, "🔌 Light '{}' dropped out of discovery", device.name);
                device.sync_state = SyncState::Unreachable;
            }
        }

        new_ids
    }

    pub fn get(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(&id)
    }

    pub fn list(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    /// Moves a known device into `Syncing` and allocates the sequence number
    /// tagging the in-flight call. Returns `None` for unknown devices.
    pub fn begin_sync(&mut self, id: DeviceId) -> Option<u64> {
        let device = self.devices.get_mut(&id)?;
        device.next_seq += 1;
        device.sync_state = SyncState::Syncing;
        Some(device.next_seq)
    }

    /// Applies a confirmed state. A sequence number at or below the last
    /// applied one identifies a response that was overtaken by a newer call;
    /// it is discarded so a stale response never clobbers a newer state.
    pub fn update(&mut self, id: DeviceId, seq: u64, state: LightState) {
        let Some(device) = self.devices.get_mut(&id) else {
            warn!(device_id = %id, "⚠️ Dropping state for unknown device");
            return;
        };

        if seq <= device.applied_seq {
            debug!(device_id = %id, seq, applied_seq = device.applied_seq, "Dropping stale response");
            return;
        }

        device.applied_seq = seq;
        device.on = state.on;
        device.brightness = state.brightness;
        device.sync_state = SyncState::Synced;
        device.last_sync = Some(Utc::now());
    }

    /// Marks a device unreachable, leaving its last confirmed values in place
    /// for display continuity. Failed calls pass their sequence number so a
    /// stale failure cannot override a newer applied state; reconciliation
    /// passes `None`.
    pub fn mark_unreachable(&mut self, id: DeviceId, seq: Option<u64>) {
        let Some(device) = self.devices.get_mut(&id) else {
            return;
        };

        if let Some(seq) = seq {
            if seq <= device.applied_seq {
                debug!(device_id = %id, seq, applied_seq = device.applied_seq, "Dropping stale failure");
                return;
            }
            device.applied_seq = seq;
        }

        device.sync_state = SyncState::Unreachable;
    }

    pub fn set_name(&mut self, id: DeviceId, name: String) {
        if let Some(device) = self.devices.get_mut(&id) {
            debug!(device_id = %id, "Renaming '{}' to '{}'", device.name, name);
            device.name = name;
        }
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut devices: Vec<Device> = self.devices.values().cloned().collect();
        devices.sort_by_key(|device| device.id);
        RegistrySnapshot { devices: Arc::new(devices) }
    }
}
