//! Minimal TOML reader for `watch.toml`
//!
//! Handles only the subset the watch configuration needs. It does NOT
//! support the full TOML spec.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` pairs with string, integer and boolean values
//! - Comments (`# ...`), whole-line or trailing
//!
//! Not supported: arrays, inline tables, multi-line strings, dotted keys.

use super::{PowerConfig, WatchConfig};
use crate::buzzer::Volume;
use crate::services::location::{MAX_LATITUDE, MAX_LONGITUDE};
use crate::services::settings::LedColor;
use crate::services::{ClockMode, Location, UnitPreference};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    InvalidKey,
    /// Value has the wrong type or spelling
    InvalidValue,
    /// Number outside the allowed range
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Settings,
    Faces,
    Power,
    Location,
}

/// Parse `watch.toml` text; keys that are absent keep their defaults
pub fn parse_config(input: &str) -> Result<WatchConfig, ParseError> {
    let mut config = WatchConfig::new();
    let mut section = Section::Root;
    let mut latitude: Option<i16> = None;
    let mut longitude: Option<i16> = None;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        match section {
            Section::Root => return Err(ParseError::InvalidKey),
            Section::Settings => apply_setting(&mut config, key, value)?,
            Section::Faces => match key {
                "secondary" => config.secondary_face = Some(parse_ranged(value, 1, 15)? as u8),
                _ => return Err(ParseError::InvalidKey),
            },
            Section::Power => match key {
                "backup_after_minutes" => {
                    config.power = PowerConfig {
                        backup_after_minutes: parse_ranged(value, 0, i64::from(u16::MAX))? as u16,
                    }
                }
                _ => return Err(ParseError::InvalidKey),
            },
            Section::Location => match key {
                "latitude" => {
                    let max = i64::from(MAX_LATITUDE);
                    latitude = Some(parse_ranged(value, -max, max)? as i16);
                }
                "longitude" => {
                    let max = i64::from(MAX_LONGITUDE);
                    longitude = Some(parse_ranged(value, -max, max)? as i16);
                }
                _ => return Err(ParseError::InvalidKey),
            },
        }
    }

    if latitude.is_some() || longitude.is_some() {
        config.location = Some(Location::new(
            latitude.unwrap_or(0),
            longitude.unwrap_or(0),
        ));
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "settings" => Ok(Section::Settings),
        "faces" => Ok(Section::Faces),
        "power" => Ok(Section::Power),
        "location" => Ok(Section::Location),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_setting(config: &mut WatchConfig, key: &str, value: &str) -> Result<(), ParseError> {
    let settings = &mut config.settings;
    match key {
        "clock_mode" => {
            let mode = match parse_string(value)? {
                "12h" => ClockMode::Hour12,
                "24h" => ClockMode::Hour24,
                "024h" => ClockMode::Hour024,
                _ => return Err(ParseError::InvalidValue),
            };
            settings.set_clock_mode(mode);
        }
        "button_sound" => settings.set_button_sound(parse_bool(value)?),
        "button_volume" => {
            let volume = match parse_string(value)? {
                "soft" => Volume::Soft,
                "loud" => Volume::Loud,
                _ => return Err(ParseError::InvalidValue),
            };
            settings.set_button_volume(volume);
        }
        "imperial_units" => {
            let units = if parse_bool(value)? {
                UnitPreference::Imperial
            } else {
                UnitPreference::Metric
            };
            settings.set_units(units);
        }
        "timeout" => settings.set_timeout_interval(parse_ranged(value, 0, 3)? as u8),
        "low_energy" => settings.set_low_energy_interval(parse_ranged(value, 0, 7)? as u8),
        "led_duration" => settings.set_led_duration(parse_ranged(value, 0, 7)? as u8),
        "led_red" | "led_green" | "led_blue" => {
            let level = parse_ranged(value, 0, 15)? as u8;
            let mut color: LedColor = settings.led_color();
            match key {
                "led_red" => color.red = level,
                "led_green" => color.green = level,
                _ => color.blue = level,
            }
            settings.set_led_color(color);
        }
        "time_zone" => settings.set_time_zone(parse_ranged(value, 0, 63)? as u8),
        _ => return Err(ParseError::InvalidKey),
    }
    Ok(())
}

/// Split `key = value`, dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = if let Some(hash_pos) = value.find('#') {
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Strip quotes from a string value; bare words are accepted too
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else if value.contains('"') {
        Err(ParseError::InvalidValue)
    } else {
        Ok(value)
    }
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_ranged(value: &str, min: i64, max: i64) -> Result<i64, ParseError> {
    let n: i64 = value.parse().map_err(|_| ParseError::InvalidValue)?;
    if n < min || n > max {
        return Err(ParseError::OutOfRange);
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Factory defaults
[settings]
clock_mode = "024h"
button_sound = false   # quiet by default
button_volume = "soft"
imperial_units = true
timeout = 1
low_energy = 3
led_duration = 0
led_red = 15
led_green = 4
led_blue = 0
time_zone = 12

[faces]
secondary = 5

[power]
backup_after_minutes = 120

[location]
latitude = 4071
longitude = -7401
"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).unwrap();
        let s = config.settings;
        assert_eq!(s.clock_mode(), ClockMode::Hour024);
        assert!(!s.button_sound());
        assert_eq!(s.button_volume(), Volume::Soft);
        assert_eq!(s.units(), UnitPreference::Imperial);
        assert_eq!(s.timeout_interval(), 1);
        assert_eq!(s.low_energy_interval(), 3);
        assert_eq!(s.led_duration(), 0);
        assert_eq!(
            s.led_color(),
            LedColor {
                red: 15,
                green: 4,
                blue: 0
            }
        );
        assert_eq!(s.time_zone(), 12);
        assert_eq!(config.secondary_face, Some(5));
        assert_eq!(config.power.backup_after_minutes, 120);
        assert_eq!(config.location, Some(Location::new(4071, -7401)));
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("# nothing\n\n").unwrap(), WatchConfig::default());
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_config("[display]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[settings]\nbrightness = 3"), Err(ParseError::InvalidKey));
        assert_eq!(parse_config("[settings]\ntimeout = 4"), Err(ParseError::OutOfRange));
        assert_eq!(parse_config("[settings]\nbutton_sound = yes"), Err(ParseError::InvalidValue));
        assert_eq!(parse_config("[settings]\nclock_mode = \"36h\""), Err(ParseError::InvalidValue));
        assert_eq!(parse_config("timeout = 1"), Err(ParseError::InvalidKey));
        assert_eq!(parse_config("[location]\nlatitude = 9001"), Err(ParseError::OutOfRange));
    }

    #[test]
    fn test_key_value_comment_inside_string() {
        assert_eq!(parse_key_value(r##"name = "a#b""##), Some(("name", r##""a#b""##)));
        assert_eq!(parse_key_value("x = 1 # one"), Some(("x", "1")));
        assert_eq!(parse_key_value("x ="), None);
    }
}
