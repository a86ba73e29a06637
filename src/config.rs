//! Configuration for beanwire
//!
//! Connection settings with sensible defaults.

use std::time::Duration;

use crate::document::Decoder;
use crate::{DEFAULT_HOST, DEFAULT_PORT};

/// Connection configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server host name or address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    /// Bound on establishing the TCP connection (`None` = OS default).
    /// Once connected, all reads and writes block without a timeout.
    pub connect_timeout: Option<Duration>,

    // -------------------------------------------------------------------------
    // Decoding Configuration
    // -------------------------------------------------------------------------
    /// Decoder applied to structured-document replies
    pub decoder: Decoder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: None,
            decoder: Decoder::Auto,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` string for logging
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the structured-document decoder
    pub fn decoder(mut self, decoder: Decoder) -> Self {
        self.config.decoder = decoder;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
