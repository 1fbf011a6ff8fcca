use config::Config;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    discovery: Discovery,
    device: Device,
}

impl AppConfig {
    pub fn load() -> Self {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn discovery(&self) -> &Discovery {
        &self.discovery
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    command_buffer_size: usize,
    #[serde(with = "humantime_serde")]
    poll_interval: Duration,
}

impl Core {
    pub fn command_buffer_size(&self) -> usize {
        self.command_buffer_size
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

#[derive(Debug, Deserialize)]
pub struct Discovery {
    service_type: String,
    #[serde(with = "humantime_serde")]
    browse_window: Duration,
}

impl Discovery {
    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn browse_window(&self) -> Duration {
        self.browse_window
    }
}

#[derive(Debug, Deserialize)]
pub struct Device {
    #[serde(with = "humantime_serde")]
    request_timeout: Duration,
}

impl Device {
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core {
                    command_buffer_size: 1,
                    poll_interval: Duration::from_secs(10),
                },
                discovery: Discovery {
                    service_type: "_elg._tcp.local.".to_string(),
                    browse_window: Duration::from_millis(100),
                },
                device: Device {
                    request_timeout: Duration::from_secs(2),
                },
            },
        }
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.device.request_timeout = timeout;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
