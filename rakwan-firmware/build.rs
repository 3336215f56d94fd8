//! Build script for rakwan-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates radio.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sections the firmware understands
const SECTIONS: &[&str] = &["uart", "radio", "driver", "lorawan"];

/// Regions accepted by `AT+BAND`
const REGIONS: &[&str] = &[
    "EU433", "CN470", "RU864", "IN865", "EU868", "US915", "AU915", "KR920", "AS923", "AS923-1",
    "AS923-2", "AS923-3", "AS923-4", "LA915",
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate radio.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=radio.toml");

    let config_path = Path::new("radio.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: radio.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a radio.toml configuration file.          ║\n\
            ║  Please create one in the rakwan-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read radio.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in radio.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_radio(&config, &mut errors);
    validate_lorawan(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid radio.toml                                       ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=radio.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reject sections the firmware parser would refuse
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };

    for (name, value) in table {
        if !SECTIONS.contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

/// Check the radio wiring
fn validate_radio(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(radio) = config.get("radio").and_then(|r| r.as_table()) else {
        return;
    };

    let mut pins = Vec::new();
    for key in ["tx_pin", "rx_pin", "reset_pin"] {
        match radio.get(key) {
            Some(toml::Value::String(pin)) => match parse_pin(pin) {
                Some(n) => pins.push((key, n)),
                None => errors.push(format!("[radio] {} '{}' is not gpio0-gpio29", key, pin)),
            },
            Some(_) => errors.push(format!("[radio] {} must be a string like \"gpio0\"", key)),
            None => {}
        }
    }

    for (i, (key, pin)) in pins.iter().enumerate() {
        if pins[..i].iter().any(|(_, other)| other == pin) {
            errors.push(format!("[radio] {} reuses gpio{}", key, pin));
        }
    }
}

/// Check credentials, region and uplink settings
fn validate_lorawan(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(lorawan) = config.get("lorawan").and_then(|l| l.as_table()) else {
        return;
    };

    for (key, digits) in [("dev_eui", 16), ("app_eui", 16), ("join_eui", 16), ("app_key", 32)] {
        if let Some(value) = lorawan.get(key) {
            let valid = value
                .as_str()
                .map(|s| s.len() == digits && s.chars().all(|c| c.is_ascii_hexdigit()))
                .unwrap_or(false);
            if !valid {
                errors.push(format!("[lorawan] {} must be {} hex digits", key, digits));
            }
        }
    }

    for key in ["region", "band"] {
        if let Some(value) = lorawan.get(key) {
            let known = value
                .as_str()
                .map(|s| REGIONS.iter().any(|r| r.eq_ignore_ascii_case(s)))
                .unwrap_or(false);
            if !known {
                errors.push(format!("[lorawan] {} must be one of {}", key, REGIONS.join(", ")));
            }
        }
    }

    if let Some(toml::Value::Integer(port)) = lorawan.get("port") {
        if !(1..=223).contains(port) {
            errors.push("[lorawan] port must be 1-223".to_string());
        }
    }

    if let Some(toml::Value::Integer(attempts)) = lorawan.get("join_attempts") {
        if !(1..=255).contains(attempts) {
            errors.push("[lorawan] join_attempts must be 1-255".to_string());
        }
    }
}

/// Parse "gpioNN" into a pin number
fn parse_pin(value: &str) -> Option<u8> {
    let n: u8 = value.strip_prefix("gpio")?.parse().ok()?;
    (n <= 29).then_some(n)
}
