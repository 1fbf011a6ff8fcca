use serde::Deserialize;

// API: GET http://{address}:9123/elgato/settings and /elgato/accessory-info.
// Both carry a displayName next to fields this system does not use.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsGet {
    pub display_name: Option<String>,
}
