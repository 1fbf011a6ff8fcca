use crate::domain::device::DeviceId;

/// A requested state change issued by the presentation layer. Transient,
/// applied to the addressed device only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetPower { device_id: DeviceId, on: bool },
    SetBrightness { device_id: DeviceId, brightness: u8 },
    /// Trigger a discovery and poll cycle outside the regular cadence.
    Refresh,
}
