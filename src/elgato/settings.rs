use crate::elgato::client::DeviceError;
use crate::elgato::domain::SettingsGet;
use reqwest::Client;
use std::net::SocketAddr;
use tracing::{debug, instrument};

/// Reads the user-configured display name. Newer firmware exposes it under
/// /elgato/settings, older firmware under /elgato/accessory-info, so both are
/// tried. `None` means the mDNS instance name stays in use.
#[instrument(skip(client))]
pub async fn fetch_display_name(client: &Client, addr: SocketAddr) -> Option<String> {
    for path in ["settings", "accessory-info"] {
        match read_display_name(client, addr, path).await {
            Ok(Some(name)) if !name.is_empty() => return Some(name),
            Ok(_) => {}
            Err(e) => debug!("No display name from /elgato/{}: {}", path, e),
        }
    }

    None
}

async fn read_display_name(client: &Client, addr: SocketAddr, path: &str) -> Result<Option<String>, DeviceError> {
    let response = client
        .get(format!("http://{addr}/elgato/{path}"))
        .send()
        .await
        .map_err(DeviceError::from_transport)?;

    if !response.status().is_success() {
        return Ok(None);
    }

    let settings = response.json::<SettingsGet>().await.map_err(DeviceError::from_transport)?;
    Ok(settings.display_name)
}
