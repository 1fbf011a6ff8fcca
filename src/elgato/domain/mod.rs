mod lights;
mod settings;

pub use lights::{LightGet, LightPut, LightsGet, LightsPut};
pub use settings::SettingsGet;
