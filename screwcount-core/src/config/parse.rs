//! Minimal TOML parser for counter configuration
//!
//! Handles only the subset `counter.toml` uses:
//! - `[section]` headers
//! - `key = value` pairs with string or integer values
//! - Comments (# ...), including trailing ones
//!
//! Unknown sections and keys are skipped.

use heapless::String;

use super::{ConfigError, CounterConfig};
use crate::backoff::RetryPolicy;
use crate::sensor::PulseMode;

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Broker,
    Timing,
    Retry,
    Sensor,
    Unknown,
}

/// Retry keys arrive separately and are combined at the end
#[derive(Default)]
struct RetryDraft {
    backoff: bool,
    initial_ms: Option<u32>,
    max_ms: Option<u32>,
}

impl RetryDraft {
    fn finish(self) -> RetryPolicy {
        if self.backoff {
            RetryPolicy::Backoff {
                initial_ms: self.initial_ms.unwrap_or(1000),
                max_ms: self.max_ms.unwrap_or(30_000),
            }
        } else {
            RetryPolicy::Continuous
        }
    }
}

/// Parse TOML text into a [`CounterConfig`]
pub fn parse_config(input: &str) -> Result<CounterConfig, ConfigError> {
    let mut config = CounterConfig::default();
    let mut retry = RetryDraft::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let Some((key, value)) = parse_key_value(line) else {
            continue;
        };

        match section {
            Section::Broker => match key {
                "uri" => config.broker.uri = parse_bounded(value)?,
                "username" => config.broker.username = parse_bounded(value)?,
                "password" => config.broker.password = parse_bounded(value)?,
                "client_id" => config.broker.client_id = parse_bounded(value)?,
                "keepalive_s" => config.broker.keepalive_s = parse_int(value)?,
                _ => {}
            },
            Section::Timing => match key {
                "tick_ms" => config.timing.tick_ms = parse_int(value)?,
                "debounce_ms" => config.timing.debounce_ms = parse_int(value)?,
                "connect_timeout_ms" => config.timing.connect_timeout_ms = parse_int(value)?,
                _ => {}
            },
            Section::Retry => match key {
                "mode" => retry.backoff = parse_retry_mode(value)?,
                "initial_ms" => retry.initial_ms = Some(parse_int(value)?),
                "max_ms" => retry.max_ms = Some(parse_int(value)?),
                _ => {}
            },
            Section::Sensor => {
                if key == "mode" {
                    config.sensor = parse_pulse_mode(value)?;
                }
            }
            Section::Root | Section::Unknown => {}
        }
    }

    config.retry = retry.finish();
    Ok(config)
}

fn parse_section_header(line: &str) -> Result<Section, ConfigError> {
    let line = strip_comment(line);
    if !line.ends_with(']') || line.len() < 3 {
        return Err(ConfigError::InvalidSection);
    }

    Ok(match line[1..line.len() - 1].trim() {
        "broker" => Section::Broker,
        "timing" => Section::Timing,
        "retry" => Section::Retry,
        "sensor" => Section::Sensor,
        "" => return Err(ConfigError::InvalidSection),
        _ => Section::Unknown,
    })
}

/// Drop a trailing comment unless the `#` sits inside a string
fn strip_comment(value: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;
    for (pos, ch) in value.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '#' if !in_string => return value[..pos].trim(),
            _ => {}
        }
    }
    value
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ConfigError> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ConfigError::InvalidValue)
    }
}

fn parse_bounded<const N: usize>(value: &str) -> Result<String<N>, ConfigError> {
    let mut out = String::new();
    out.push_str(parse_string(value)?)
        .map_err(|_| ConfigError::StringTooLong)?;
    Ok(out)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue)
}

fn parse_retry_mode(value: &str) -> Result<bool, ConfigError> {
    match parse_string(value)? {
        "continuous" => Ok(false),
        "backoff" => Ok(true),
        _ => Err(ConfigError::InvalidValue),
    }
}

fn parse_pulse_mode(value: &str) -> Result<PulseMode, ConfigError> {
    match parse_string(value)? {
        "level" => Ok(PulseMode::Level),
        "edge" => Ok(PulseMode::Edge),
        _ => Err(ConfigError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
# Screw counter station 3
[broker]
uri = "mqtts://broker.example:8883"
username = "oxocard"
password = "p#ss"   # quoted hash stays
client_id = "station-3"
keepalive_s = 30

[timing]
tick_ms = 50
debounce_ms = 250
connect_timeout_ms = 2000

[retry]
mode = "backoff"
initial_ms = 500
max_ms = 8000

[sensor]
mode = "edge"
"#;

    #[test]
    fn test_parse_full() {
        let config = parse_config(FULL).unwrap();

        assert_eq!(config.broker.uri.as_str(), "mqtts://broker.example:8883");
        assert_eq!(config.broker.username.as_str(), "oxocard");
        assert_eq!(config.broker.password.as_str(), "p#ss");
        assert_eq!(config.broker.client_id.as_str(), "station-3");
        assert_eq!(config.broker.keepalive_s, 30);
        assert_eq!(config.timing.tick_ms, 50);
        assert_eq!(config.timing.debounce_ms, 250);
        assert_eq!(config.timing.connect_timeout_ms, 2000);
        assert_eq!(
            config.retry,
            RetryPolicy::Backoff {
                initial_ms: 500,
                max_ms: 8000
            }
        );
        assert_eq!(config.sensor, PulseMode::Edge);
    }

    #[test]
    fn test_hash_in_string_with_trailing_comment() {
        let config = parse_config("[broker]\npassword = \"p#ss\" # note\n").unwrap();
        assert_eq!(config.broker.password.as_str(), "p#ss");

        let config = parse_config("[broker]\nusername = \"a#b\"\n").unwrap();
        assert_eq!(config.broker.username.as_str(), "a#b");
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(parse_config("").unwrap(), CounterConfig::default());
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = parse_config("[timing]\ntick_ms = 20\n").unwrap();
        assert_eq!(config.timing.tick_ms, 20);
        assert_eq!(config.timing.tick_pause_ms(), Some(20));
        assert_eq!(config.timing.debounce_ms, 500);
        assert_eq!(config.retry, RetryPolicy::Continuous);
    }

    #[test]
    fn test_backoff_defaults_bounds() {
        let config = parse_config("[retry]\nmode = \"backoff\"\n").unwrap();
        assert_eq!(
            config.retry,
            RetryPolicy::Backoff {
                initial_ms: 1000,
                max_ms: 30_000
            }
        );
    }

    #[test]
    fn test_unknown_section_and_keys_ignored() {
        let input = "[wifi]\nssid = \"x\"\n[timing]\nfoo = 3\ntick_ms = 10\n";
        let config = parse_config(input).unwrap();
        assert_eq!(config.timing.tick_ms, 10);
    }

    #[test]
    fn test_bad_integer() {
        assert_eq!(
            parse_config("[timing]\ntick_ms = fast\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[broker]\nkeepalive_s = 70000\n"),
            Err(ConfigError::InvalidValue)
        );
    }

    #[test]
    fn test_bad_mode() {
        assert_eq!(
            parse_config("[sensor]\nmode = \"analog\"\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[retry]\nmode = backoff\n"),
            Err(ConfigError::InvalidValue)
        );
    }

    #[test]
    fn test_bad_section_header() {
        assert_eq!(parse_config("[broker\n"), Err(ConfigError::InvalidSection));
        assert_eq!(parse_config("[]\n"), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_string_too_long() {
        let input = "[broker]\nclient_id = \"abcdefghijklmnopqrstuvwxyz0123456789\"\n";
        assert_eq!(parse_config(input), Err(ConfigError::StringTooLong));
    }
}
