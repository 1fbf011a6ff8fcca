mod client;
mod domain;
mod lights;
mod map_state;
mod settings;

pub use client::{DeviceError, new_client};
pub use lights::{apply_state, fetch_state};
pub use settings::fetch_display_name;
