use serde::{Deserialize, Serialize};
use std::time::Duration;

/// BoardCom configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardComConfig {
    /// Global settings
    #[serde(default)]
    pub global: GlobalConfig,
    /// Serial link settings
    #[serde(default)]
    pub serial: SerialConfig,
    /// Console protocol timing
    #[serde(default)]
    pub protocol: ProtocolConfig,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// USB vendor id used to filter console-capable ports
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
}

/// Serial link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Baud rate of the device console
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Per-read timeout in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,
}

/// Console protocol timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Delay after opening the port before prompt detection, in milliseconds
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    /// Delay after the reset pulse before the console token is sent, in milliseconds
    #[serde(default = "default_reset_delay")]
    pub reset_delay_ms: u64,
    /// Wall-clock deadline for prompt detection, in milliseconds
    #[serde(default = "default_prompt_timeout")]
    pub prompt_timeout_ms: u64,
    /// Per-attempt deadline for echo and response, in milliseconds
    #[serde(default = "default_echo_timeout")]
    pub echo_timeout_ms: u64,
    /// Retries after the initial attempt before a command fails permanently
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_vendor_id() -> u16 {
    0x10c4
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_read_timeout() -> u64 {
    100
}

fn default_settle_delay() -> u64 {
    50
}

fn default_reset_delay() -> u64 {
    100
}

fn default_prompt_timeout() -> u64 {
    3000
}

fn default_echo_timeout() -> u64 {
    1000
}

fn default_max_retries() -> u32 {
    10
}

impl Default for BoardComConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            serial: SerialConfig::default(),
            protocol: ProtocolConfig::default(),
        }
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            vendor_id: default_vendor_id(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout(),
        }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay(),
            reset_delay_ms: default_reset_delay(),
            prompt_timeout_ms: default_prompt_timeout(),
            echo_timeout_ms: default_echo_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl SerialConfig {
    /// Per-read timeout as a `Duration`
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
