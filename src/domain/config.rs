use crate::domain::error::{TermLinkError, TermLinkResult};
use crate::infrastructure::serial::BaudRate;
use serde::{Deserialize, Serialize};
use std::net::SocketAddrV4;
use std::time::Duration;

/// TermLink defaults file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermLinkConfig {
    /// Session-wide settings
    #[serde(default)]
    pub global: GlobalConfig,
    /// Defaults for the serial backend
    #[serde(default)]
    pub serial: SerialDefaults,
    /// Defaults for the TCP bridge backend
    #[serde(default)]
    pub tcp: TcpDefaults,
}

/// Global configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Log level used when `--debug` is not given
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Character that ends the session
    #[serde(default = "default_escape_char")]
    pub escape_char: String,
    /// Drain period in milliseconds, 0 disables draining
    #[serde(default)]
    pub drain_ms: u32,
}

/// Serial backend defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialDefaults {
    #[serde(default = "default_serial_device")]
    pub device: String,
    #[serde(default = "default_baud")]
    pub baud: String,
    /// Upper bound on a single device read or write
    #[serde(default = "default_serial_timeout")]
    pub timeout_ms: u64,
}

/// TCP bridge backend defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpDefaults {
    #[serde(default = "default_bridge_host")]
    pub host: String,
    #[serde(default = "default_bridge_port")]
    pub port: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_no_delay")]
    pub no_delay: bool,
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_escape_char() -> String {
    "^".to_string()
}

fn default_serial_device() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud() -> String {
    "9600".to_string()
}

fn default_serial_timeout() -> u64 {
    1000
}

fn default_bridge_host() -> String {
    "localhost".to_string()
}

fn default_bridge_port() -> String {
    "8089".to_string()
}

fn default_connect_timeout() -> u64 {
    3000
}

fn default_no_delay() -> bool {
    true
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            escape_char: default_escape_char(),
            drain_ms: 0,
        }
    }
}

impl Default for SerialDefaults {
    fn default() -> Self {
        Self {
            device: default_serial_device(),
            baud: default_baud(),
            timeout_ms: default_serial_timeout(),
        }
    }
}

impl Default for TcpDefaults {
    fn default() -> Self {
        Self {
            host: default_bridge_host(),
            port: default_bridge_port(),
            connect_timeout_ms: default_connect_timeout(),
            no_delay: default_no_delay(),
        }
    }
}

/// Validate an escape character given as text; it must be exactly one byte
pub fn parse_escape_char(value: &str) -> Result<u8, String> {
    match value.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(format!(
            "escape character must be a single character, got \"{}\"",
            value
        )),
    }
}

/// Longest drain period `poll(2)` can wait for in one call
pub const MAX_DRAIN_MS: u32 = i32::MAX as u32;

/// Pre-session drain period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainConfig {
    period_ms: u32,
}

impl DrainConfig {
    pub fn new(period_ms: u32) -> Self {
        Self { period_ms }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.period_ms > 0
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }
}

/// Resolved serial backend parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    pub path: String,
    pub baud: BaudRate,
    pub timeout: Duration,
}

/// Resolved TCP bridge parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    /// Host as the operator wrote it, kept for messages
    pub host: String,
    pub addr: SocketAddrV4,
    pub connect_timeout: Duration,
    pub no_delay: bool,
}

/// Backend selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Serial(SerialSettings),
    Network(NetworkSettings),
}

impl BackendConfig {
    /// Short label used in logs and reports
    pub fn label(&self) -> String {
        match self {
            BackendConfig::Serial(settings) => format!("{} @ {}", settings.path, settings.baud),
            BackendConfig::Network(settings) => {
                format!("{}:{}", settings.host, settings.addr.port())
            }
        }
    }
}

/// Everything a relay session needs, validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub escape: u8,
    pub drain: DrainConfig,
    pub backend: BackendConfig,
}

impl SessionConfig {
    pub fn new(escape: u8, drain: DrainConfig, backend: BackendConfig) -> TermLinkResult<Self> {
        if escape == 0 {
            return Err(TermLinkError::config("escape character must not be NUL"));
        }
        if drain.period_ms() > MAX_DRAIN_MS {
            return Err(TermLinkError::config(format!(
                "drain period {} ms exceeds {} ms",
                drain.period_ms(),
                MAX_DRAIN_MS
            )));
        }

        Ok(Self {
            escape,
            drain,
            backend,
        })
    }
}
