use crate::app_config::AppConfig;
use reqwest::Client;
use thiserror::Error;

/// Builds the shared HTTP client used for all device calls. The timeout is
/// the only bounded wait; retrying is the sync controller's responsibility.
pub fn new_client(config: &AppConfig) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(config.device().request_timeout()).build()
}

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("device did not respond: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl DeviceError {
    /// A decode failure means the device answered with an unexpected payload;
    /// everything else (connect, timeout, transport) means it is unreachable.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DeviceError::MalformedResponse(e.to_string())
        } else {
            DeviceError::Unreachable(e)
        }
    }
}
