use crate::domain::device::LightState;
use crate::elgato::client::DeviceError;
use crate::elgato::domain::{LightPut, LightsGet, LightsPut};
use crate::elgato::map_state::map_state;
use reqwest::Client;
use std::net::SocketAddr;
use tracing::instrument;

/// Fetches the device's current state. Fails with `Unreachable` when the
/// device does not answer within the client timeout and `MalformedResponse`
/// when it answers with anything but a valid lights payload.
#[instrument(skip(client))]
pub async fn fetch_state(client: &Client, addr: SocketAddr) -> Result<LightState, DeviceError> {
    let response = client
        .get(format!("http://{addr}/elgato/lights"))
        .send()
        .await
        .map_err(DeviceError::from_transport)?;

    if !response.status().is_success() {
        return Err(DeviceError::MalformedResponse(format!("unexpected status {}", response.status())));
    }

    let lights = response.json::<LightsGet>().await.map_err(DeviceError::from_transport)?;
    map_state(&lights)
}

/// Sends a control request carrying only the supplied fields. The device
/// merges them into its current state and the confirmed result is returned;
/// no retry happens here, a failed command surfaces as-is.
#[instrument(skip(client))]
pub async fn apply_state(client: &Client, addr: SocketAddr, on: Option<bool>, brightness: Option<u8>) -> Result<LightState, DeviceError> {
    let request = LightsPut {
        lights: vec![LightPut {
            on: on.map(u8::from),
            brightness,
        }],
    };

    let response = client
        .put(format!("http://{addr}/elgato/lights"))
        .json(&request)
        .send()
        .await
        .map_err(DeviceError::from_transport)?;

    if !response.status().is_success() {
        return Err(DeviceError::MalformedResponse(format!("unexpected status {}", response.status())));
    }

    let lights = response.json::<LightsGet>().await.map_err(DeviceError::from_transport)?;
    map_state(&lights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use crate::elgato::client::new_client;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn addr_of(server: &mockito::Server) -> SocketAddr {
        server.host_with_port().parse().unwrap()
    }

    #[tokio::test]
    async fn fetch_state_returns_the_confirmed_state() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/elgato/lights")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"numberOfLights":1,"lights":[{"on":1,"brightness":50,"temperature":213}]}"#)
            .create_async()
            .await;

        let client = new_client(&AppConfigBuilder::new().build()).unwrap();
        let state = fetch_state(&client, addr_of(&server)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(state, LightState { on: true, brightness: 50 });
    }

    #[tokio::test]
    async fn fetch_state_rejects_an_out_of_range_payload() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/elgato/lights")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"numberOfLights":1,"lights":[{"on":1,"brightness":150,"temperature":213}]}"#)
            .create_async()
            .await;

        let client = new_client(&AppConfigBuilder::new().build()).unwrap();
        let result = fetch_state(&client, addr_of(&server)).await;

        assert!(matches!(result, Err(DeviceError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn fetch_state_rejects_an_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/elgato/lights").with_status(500).create_async().await;

        let client = new_client(&AppConfigBuilder::new().build()).unwrap();
        let result = fetch_state(&client, addr_of(&server)).await;

        assert!(matches!(result, Err(DeviceError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn fetch_state_fails_as_unreachable_when_nothing_answers() {
        let config = AppConfigBuilder::new().request_timeout(Duration::from_millis(250)).build();
        let client = new_client(&config).unwrap();

        // Discard port on localhost, nothing listens there
        let result = fetch_state(&client, "127.0.0.1:9".parse().unwrap()).await;

        assert!(matches!(result, Err(DeviceError::Unreachable(_))));
    }

    #[tokio::test]
    async fn apply_state_sends_only_the_changed_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/elgato/lights")
            .match_body(Matcher::Json(json!({ "lights": [{ "on": 0 }] })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"numberOfLights":1,"lights":[{"on":0,"brightness":50,"temperature":213}]}"#)
            .create_async()
            .await;

        let client = new_client(&AppConfigBuilder::new().build()).unwrap();
        let state = apply_state(&client, addr_of(&server), Some(false), None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(state, LightState { on: false, brightness: 50 });
    }

    #[tokio::test]
    async fn apply_state_returns_the_state_confirmed_by_the_device() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PUT", "/elgato/lights")
            .match_body(Matcher::Json(json!({ "lights": [{ "brightness": 80 }] })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"numberOfLights":1,"lights":[{"on":1,"brightness":80,"temperature":213}]}"#)
            .create_async()
            .await;

        let client = new_client(&AppConfigBuilder::new().build()).unwrap();
        let state = apply_state(&client, addr_of(&server), None, Some(80)).await.unwrap();

        assert_eq!(state, LightState { on: true, brightness: 80 });
    }
}
