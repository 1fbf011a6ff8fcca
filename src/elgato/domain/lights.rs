use serde::{Deserialize, Serialize};

// API: GET/PUT http://{address}:9123/elgato/lights
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightsGet {
    pub number_of_lights: u32,
    pub lights: Vec<LightGet>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct LightGet {
    pub on: u8,         // 0 or 1
    pub brightness: u8, // 1..=100
    pub temperature: Option<u16>,
}

/// PUT body. Only the supplied fields are serialized; the device merges them
/// into its current state and confirms with the full `LightsGet` shape.
#[derive(Debug, Serialize)]
pub struct LightsPut {
    pub lights: Vec<LightPut>,
}

#[derive(Debug, Serialize)]
pub struct LightPut {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
}
