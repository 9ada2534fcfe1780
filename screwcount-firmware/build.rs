//! Build script for screwcount-firmware
//!
//! Places memory.x on the linker path and rejects a counter.toml the
//! firmware could not use.

use std::env;
use std::fs;
use std::path::PathBuf;

const CONFIG_FILE: &str = "counter.toml";
const BOX_WIDTH: usize = 66;

fn main() {
    link_memory_map();
    check_counter_config();
}

fn link_memory_map() {
    let out = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out.join("memory.x"), include_bytes!("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    for script in ["--nmagic", "-Tlink.x", "-Tlink-rp.x", "-Tdefmt.x"] {
        println!("cargo:rustc-link-arg-bins={}", script);
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Abort the build with a boxed message
fn fail(title: &str, lines: &[String]) -> ! {
    let rule = "═".repeat(BOX_WIDTH);
    let mut out = format!("\n╔{rule}╗\n║  {:<w$}║\n╠{rule}╣\n", title, w = BOX_WIDTH - 2);
    for line in lines {
        let shown: String = line.chars().take(BOX_WIDTH - 4).collect();
        out.push_str(&format!("║  {:<w$}║\n", shown, w = BOX_WIDTH - 2));
    }
    out.push_str(&format!("╚{rule}╝\n"));
    panic!("{}", out);
}

fn check_counter_config() {
    println!("cargo:rerun-if-changed={}", CONFIG_FILE);

    let text = match fs::read_to_string(CONFIG_FILE) {
        Ok(text) => text,
        Err(e) => fail(
            "ERROR: cannot read counter.toml",
            &[
                format!("{}", e),
                "The firmware embeds counter.toml from the crate directory.".to_string(),
            ],
        ),
    };

    let config: toml::Value = match toml::from_str(&text) {
        Ok(value) => value,
        Err(e) => fail(
            "ERROR: invalid TOML syntax in counter.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_broker(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_retry(&config, &mut errors);
    validate_sensor(&config, &mut errors);

    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(|e| format!("• {}", e)).collect();
        fail("ERROR: invalid configuration in counter.toml", &lines);
    }

    println!("cargo:warning=counter.toml validated successfully");
}

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::value::Table> {
    config.get(name).and_then(|s| s.as_table())
}

/// Check a string key fits its firmware buffer
fn check_string(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    max_len: usize,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::String(s)) if s.len() > max_len => {
            errors.push(format!("[{}] {} longer than {} bytes", section, key, max_len));
        }
        Some(toml::Value::String(_)) => {}
        Some(_) => errors.push(format!("[{}] {} must be a string", section, key)),
    }
}

/// Check an integer key lies in `min..=max`
fn check_int(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn validate_broker(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(broker) = section(config, "broker") else {
        errors.push("Missing [broker] section".to_string());
        return;
    };

    if broker.get("uri").is_none() {
        errors.push("[broker] missing 'uri'".to_string());
    }
    check_string(broker, "broker", "uri", 128, errors);
    check_string(broker, "broker", "username", 64, errors);
    check_string(broker, "broker", "password", 64, errors);
    check_string(broker, "broker", "client_id", 32, errors);
    check_int(broker, "broker", "keepalive_s", 0, u16::MAX as i64, errors);
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(timing) = section(config, "timing") else {
        return;
    };

    check_int(timing, "timing", "tick_ms", 0, 10_000, errors);
    check_int(timing, "timing", "debounce_ms", 0, 10_000, errors);
    check_int(timing, "timing", "connect_timeout_ms", 100, 60_000, errors);
}

fn validate_retry(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(retry) = section(config, "retry") else {
        return;
    };

    if let Some(toml::Value::String(mode)) = retry.get("mode") {
        if !["continuous", "backoff"].contains(&mode.as_str()) {
            errors.push("[retry] mode must be 'continuous' or 'backoff'".to_string());
        }
    }
    check_int(retry, "retry", "initial_ms", 1, u32::MAX as i64, errors);
    check_int(retry, "retry", "max_ms", 1, u32::MAX as i64, errors);
}

fn validate_sensor(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(sensor) = section(config, "sensor") else {
        return;
    };

    if let Some(toml::Value::String(mode)) = sensor.get("mode") {
        if !["level", "edge"].contains(&mode.as_str()) {
            errors.push("[sensor] mode must be 'level' or 'edge'".to_string());
        }
    }
}
