//! Build script for movement-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates watch.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Print a boxed diagnostic and abort the build
fn fail(title: &str, lines: &[String]) -> ! {
    let mut message = String::from("\n");
    message.push_str("╔══════════════════════════════════════════════════════════════════╗\n");
    message.push_str(&format!("║  ERROR: {:<57}║\n", title));
    message.push_str("╠══════════════════════════════════════════════════════════════════╣\n");
    for line in lines {
        message.push_str(&format!("║  {:<64}║\n", line));
    }
    message.push_str("╚══════════════════════════════════════════════════════════════════╝\n");
    panic!("{}", message);
}

/// Validate watch.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=watch.toml");

    let config_path = Path::new("watch.toml");
    if !config_path.exists() {
        fail(
            "watch.toml not found!",
            &[
                "The firmware embeds watch.toml as its default configuration.".into(),
                "Please create one in the movement-firmware directory.".into(),
            ],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read watch.toml", &[e.to_string()]),
    };

    let config: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
            fail("Invalid TOML syntax in watch.toml", &lines);
        }
    };

    let mut errors = Vec::new();
    for (name, value) in &config {
        match (name.as_str(), value) {
            ("settings", toml::Value::Table(t)) => validate_settings(t, &mut errors),
            ("faces", toml::Value::Table(t)) => {
                check_keys("faces", t, &["secondary"], &mut errors);
                check_int(t, "faces.secondary", "secondary", 1, 15, &mut errors);
            }
            ("power", toml::Value::Table(t)) => {
                check_keys("power", t, &["backup_after_minutes"], &mut errors);
                check_int(t, "power.backup_after_minutes", "backup_after_minutes", 0, 65535, &mut errors);
            }
            ("location", toml::Value::Table(t)) => {
                check_keys("location", t, &["latitude", "longitude"], &mut errors);
                check_int(t, "location.latitude", "latitude", -9000, 9000, &mut errors);
                check_int(t, "location.longitude", "longitude", -18000, 18000, &mut errors);
            }
            (other, _) => errors.push(format!("unknown section [{}]", other)),
        }
    }

    if !errors.is_empty() {
        fail("watch.toml failed validation", &errors);
    }

    println!("cargo:warning=watch.toml validated successfully");
}

fn validate_settings(t: &toml::Table, errors: &mut Vec<String>) {
    check_keys(
        "settings",
        t,
        &[
            "clock_mode",
            "button_sound",
            "button_volume",
            "imperial_units",
            "timeout",
            "low_energy",
            "led_duration",
            "led_red",
            "led_green",
            "led_blue",
            "time_zone",
        ],
        errors,
    );
    check_choice(t, "clock_mode", &["12h", "24h", "024h"], errors);
    check_choice(t, "button_volume", &["soft", "loud"], errors);
    for key in ["button_sound", "imperial_units"] {
        if let Some(value) = t.get(key) {
            if !value.is_bool() {
                errors.push(format!("settings.{} must be true or false", key));
            }
        }
    }
    check_int(t, "settings.timeout", "timeout", 0, 3, errors);
    check_int(t, "settings.low_energy", "low_energy", 0, 7, errors);
    check_int(t, "settings.led_duration", "led_duration", 0, 7, errors);
    for key in ["led_red", "led_green", "led_blue"] {
        check_int(t, &format!("settings.{}", key), key, 0, 15, errors);
    }
    check_int(t, "settings.time_zone", "time_zone", 0, 63, errors);
}

fn check_keys(section: &str, t: &toml::Table, known: &[&str], errors: &mut Vec<String>) {
    for key in t.keys() {
        if !known.contains(&key.as_str()) {
            errors.push(format!("unknown key {}.{}", section, key));
        }
    }
}

fn check_int(t: &toml::Table, label: &str, key: &str, min: i64, max: i64, errors: &mut Vec<String>) {
    match t.get(key) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(v)) => {
            errors.push(format!("{} = {} is outside {}..={}", label, v, min, max));
        }
        Some(_) => errors.push(format!("{} must be an integer", label)),
    }
}

fn check_choice(t: &toml::Table, key: &str, choices: &[&str], errors: &mut Vec<String>) {
    match t.get(key) {
        None => {}
        Some(toml::Value::String(s)) if choices.contains(&s.as_str()) => {}
        Some(_) => errors.push(format!("settings.{} must be one of {:?}", key, choices)),
    }
}
