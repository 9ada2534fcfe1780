//! Counter configuration
//!
//! Board-agnostic settings for the broker link, tick timing, connect retry
//! and sensor sampling. Every field has a default so a partial (or missing)
//! configuration still yields a working counter.

mod parse;

pub use parse::parse_config;

use heapless::String;

use crate::backoff::RetryPolicy;
use crate::channel::Credentials;
use crate::sensor::PulseMode;

/// Maximum broker URI length
pub const MAX_URI_LEN: usize = 128;
/// Maximum username / password length
pub const MAX_SECRET_LEN: usize = 64;
/// Maximum client identifier length
pub const MAX_CLIENT_ID_LEN: usize = 32;

/// Configuration parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Section header is not `[name]`
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String value exceeds its capacity
    StringTooLong,
}

/// Broker connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub uri: String<MAX_URI_LEN>,
    pub username: String<MAX_SECRET_LEN>,
    pub password: String<MAX_SECRET_LEN>,
    pub client_id: String<MAX_CLIENT_ID_LEN>,
    /// Keepalive interval in seconds
    pub keepalive_s: u16,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        let mut client_id = String::new();
        let _ = client_id.push_str("screw-counter");
        Self {
            uri: String::new(),
            username: String::new(),
            password: String::new(),
            client_id,
            keepalive_s: 60,
        }
    }
}

impl BrokerConfig {
    /// Borrow the settings as connect credentials
    pub fn credentials(&self) -> Credentials<'_> {
        Credentials {
            uri: &self.uri,
            username: &self.username,
            password: &self.password,
            client_id: &self.client_id,
            keepalive_s: self.keepalive_s,
        }
    }
}

/// Loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Pause between ticks; 0 polls continuously
    pub tick_ms: u32,
    /// Hold-off after each counted pulse
    pub debounce_ms: u32,
    /// How long a connect waits for the broker's answer
    pub connect_timeout_ms: u32,
}

impl TimingConfig {
    /// Sleep after a tick, or `None` to only yield to the other tasks
    pub fn tick_pause_ms(&self) -> Option<u32> {
        (self.tick_ms > 0).then_some(self.tick_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 0,
            debounce_ms: 500,
            connect_timeout_ms: 5000,
        }
    }
}

/// Complete counter configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CounterConfig {
    pub broker: BrokerConfig,
    pub timing: TimingConfig,
    pub retry: RetryPolicy,
    pub sensor: PulseMode,
}
