//! Embedded configuration loading

use defmt::*;

use screwcount_core::backoff::RetryPolicy;
use screwcount_core::config::{parse_config, CounterConfig};

/// Embedded configuration (compiled into firmware)
/// Edit counter.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../counter.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> CounterConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config: tick {}ms, debounce {}ms, connect timeout {}ms",
                config.timing.tick_ms,
                config.timing.debounce_ms,
                config.timing.connect_timeout_ms
            );
            if let RetryPolicy::Backoff { initial_ms, max_ms } = config.retry {
                info!("Connect backoff {}-{}ms", initial_ms, max_ms);
            }
            info!("Sensor mode: {:?}", config.sensor);
            config
        }
        Err(e) => {
            error!("Embedded counter.toml unusable ({:?}), using defaults", e);
            CounterConfig::default()
        }
    }
}
