use chrono::{DateTime, Utc};
use std::fmt;
use std::net::SocketAddr;

/// Identifies a light by its resolved network location. Two discovery results
/// pointing at the same address and port are the same device.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct DeviceId(SocketAddr);

impl DeviceId {
    pub fn new(addr: SocketAddr) -> Self {
        DeviceId(addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SyncState {
    /// Discovered but never successfully fetched.
    Unknown,
    /// A fetch or command is in flight.
    Syncing,
    /// The last fetch or command for this device succeeded.
    Synced,
    /// The last fetch or command failed, or the device dropped out of a scan.
    Unreachable,
}

/// A confirmed on/brightness pair as reported by a device. Brightness is
/// always within [1, 100]; out-of-range payloads are rejected at the client.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LightState {
    pub on: bool,
    pub brightness: u8,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub on: bool,
    pub brightness: u8,
    pub sync_state: SyncState,
    pub last_sync: Option<DateTime<Utc>>,
    /// Sequence number handed out to the most recent in-flight call.
    pub(crate) next_seq: u64,
    /// Sequence number of the last applied outcome. Outcomes at or below this
    /// are stale and must be discarded.
    pub(crate) applied_seq: u64,
}

impl Device {
    pub fn new(id: DeviceId, name: String) -> Self {
        Device {
            id,
            name,
            on: false,
            brightness: 1,
            sync_state: SyncState::Unknown,
            last_sync: None,
            next_seq: 0,
            applied_seq: 0,
        }
    }
}
