//! Watch-wide preferences
//!
//! The settings live in a single 32-bit word so they fit one backup
//! register and survive backup sleep:
//!
//! | bits  | field          |
//! |-------|----------------|
//! | 0-1   | version        |
//! | 2     | button sound   |
//! | 3-4   | timeout index  |
//! | 5-7   | low-energy idx |
//! | 8-10  | LED duration   |
//! | 11-14 | LED red        |
//! | 15-18 | LED green      |
//! | 19-22 | LED blue       |
//! | 23-28 | time zone      |
//! | 29    | 24 hour clock  |
//! | 30    | imperial units |
//! | 31    | loud buttons   |
//!
//! The word has no room for the leading-zero clock variant, so that flag
//! travels next to it in [`SettingsRecord`].

use super::{ClockMode, UnitPreference};
use crate::buzzer::Volume;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Layout version written into the low two bits
pub const SETTINGS_VERSION: u8 = 0;

/// LED duration value that disables the LED
pub const LED_DISABLED: u8 = 7;

const VERSION: (u32, u32) = (0, 2);
const BUTTON_SOUND: (u32, u32) = (2, 1);
const TIMEOUT: (u32, u32) = (3, 2);
const LOW_ENERGY: (u32, u32) = (5, 3);
const LED_DURATION: (u32, u32) = (8, 3);
const RED: (u32, u32) = (11, 4);
const GREEN: (u32, u32) = (15, 4);
const BLUE: (u32, u32) = (19, 4);
const TIME_ZONE: (u32, u32) = (23, 6);
const CLOCK_24H: (u32, u32) = (29, 1);
const IMPERIAL: (u32, u32) = (30, 1);
const BUTTON_VOLUME: (u32, u32) = (31, 1);

/// Backlight color, 4 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl LedColor {
    /// Expand each 4-bit channel to 8 bits
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let expand = |c: u8| (c & 0x0F) | (c & 0x0F) << 4;
        (expand(self.red), expand(self.green), expand(self.blue))
    }
}

/// Packed watch settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    reg: u32,
    leading_zero: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            reg: 0,
            leading_zero: false,
        };
        settings.put(VERSION, u32::from(SETTINGS_VERSION));
        settings.set_button_sound(true);
        settings.set_timeout_interval(0);
        settings.set_low_energy_interval(2);
        settings.set_led_duration(1);
        settings.set_led_color(LedColor {
            red: 0,
            green: 15,
            blue: 0,
        });
        settings
    }
}

impl Settings {
    /// Rebuild settings from the backup register word
    pub fn from_reg(reg: u32) -> Self {
        Self {
            reg,
            leading_zero: false,
        }
    }

    /// The backup register word
    pub fn reg(&self) -> u32 {
        self.reg
    }

    fn get(&self, (shift, width): (u32, u32)) -> u32 {
        (self.reg >> shift) & ((1 << width) - 1)
    }

    fn put(&mut self, (shift, width): (u32, u32), value: u32) {
        let mask = ((1u32 << width) - 1) << shift;
        self.reg = (self.reg & !mask) | ((value << shift) & mask);
    }

    pub fn version(&self) -> u8 {
        self.get(VERSION) as u8
    }

    pub fn button_sound(&self) -> bool {
        self.get(BUTTON_SOUND) != 0
    }

    pub fn set_button_sound(&mut self, on: bool) {
        self.put(BUTTON_SOUND, u32::from(on));
    }

    /// Index into the inactivity timeout table (0..=3)
    pub fn timeout_interval(&self) -> u8 {
        self.get(TIMEOUT) as u8
    }

    pub fn set_timeout_interval(&mut self, index: u8) {
        self.put(TIMEOUT, u32::from(index));
    }

    /// Index into the low-energy deadline table (0..=7, 0 = never)
    pub fn low_energy_interval(&self) -> u8 {
        self.get(LOW_ENERGY) as u8
    }

    pub fn set_low_energy_interval(&mut self, index: u8) {
        self.put(LOW_ENERGY, u32::from(index));
    }

    /// LED on-time: 0 = brief flash, 1..=6 = (2n-1) seconds, 7 = disabled
    pub fn led_duration(&self) -> u8 {
        self.get(LED_DURATION) as u8
    }

    pub fn set_led_duration(&mut self, duration: u8) {
        self.put(LED_DURATION, u32::from(duration));
    }

    pub fn led_color(&self) -> LedColor {
        LedColor {
            red: self.get(RED) as u8,
            green: self.get(GREEN) as u8,
            blue: self.get(BLUE) as u8,
        }
    }

    pub fn set_led_color(&mut self, color: LedColor) {
        self.put(RED, u32::from(color.red));
        self.put(GREEN, u32::from(color.green));
        self.put(BLUE, u32::from(color.blue));
    }

    pub fn time_zone(&self) -> u8 {
        self.get(TIME_ZONE) as u8
    }

    pub fn set_time_zone(&mut self, zone: u8) {
        self.put(TIME_ZONE, u32::from(zone));
    }

    pub fn clock_mode(&self) -> ClockMode {
        match (self.get(CLOCK_24H) != 0, self.leading_zero) {
            (false, _) => ClockMode::Hour12,
            (true, false) => ClockMode::Hour24,
            (true, true) => ClockMode::Hour024,
        }
    }

    pub fn set_clock_mode(&mut self, mode: ClockMode) {
        self.put(CLOCK_24H, u32::from(mode.is_24h()));
        self.leading_zero = mode == ClockMode::Hour024;
    }

    pub fn units(&self) -> UnitPreference {
        if self.get(IMPERIAL) != 0 {
            UnitPreference::Imperial
        } else {
            UnitPreference::Metric
        }
    }

    pub fn set_units(&mut self, units: UnitPreference) {
        self.put(IMPERIAL, u32::from(units == UnitPreference::Imperial));
    }

    pub fn button_volume(&self) -> Volume {
        if self.get(BUTTON_VOLUME) != 0 {
            Volume::Loud
        } else {
            Volume::Soft
        }
    }

    pub fn set_button_volume(&mut self, volume: Volume) {
        self.put(BUTTON_VOLUME, u32::from(volume == Volume::Loud));
    }

    /// Persistable form
    pub fn to_record(&self) -> SettingsRecord {
        SettingsRecord {
            version: SETTINGS_VERSION,
            reg: self.reg,
            leading_zero: self.leading_zero,
        }
    }
}

/// Settings as stored in flash
///
/// Serialized with postcard under the settings storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SettingsRecord {
    pub version: u8,
    pub reg: u32,
    pub leading_zero: bool,
}

/// Largest encoded [`SettingsRecord`]
pub const SETTINGS_RECORD_MAX_SIZE: usize = 8;

impl SettingsRecord {
    /// Restore settings, or `None` if the record was written by another layout
    pub fn into_settings(self) -> Option<Settings> {
        if self.version != SETTINGS_VERSION {
            return None;
        }
        let settings = Settings {
            reg: self.reg,
            leading_zero: self.leading_zero,
        };
        (settings.version() == SETTINGS_VERSION).then_some(settings)
    }

    /// Encode with postcard
    #[cfg(feature = "serde")]
    pub fn encode<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], postcard::Error> {
        postcard::to_slice(self, buffer)
    }

    /// Decode with postcard
    #[cfg(feature = "serde")]
    pub fn decode(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.button_sound());
        assert_eq!(s.timeout_interval(), 0);
        assert_eq!(s.low_energy_interval(), 2);
        assert_eq!(s.led_duration(), 1);
        assert_eq!(s.led_color().to_rgb8(), (0, 0xFF, 0));
        assert_eq!(s.clock_mode(), ClockMode::Hour12);
        assert_eq!(s.version(), SETTINGS_VERSION);
    }

    #[test]
    fn test_fields_do_not_overlap() {
        let mut s = Settings::from_reg(0);
        s.set_time_zone(0x3F);
        assert_eq!(s.reg(), 0x3F << 23);
        s.set_led_color(LedColor {
            red: 0xF,
            green: 0,
            blue: 0xF,
        });
        assert_eq!(s.time_zone(), 0x3F);
        assert_eq!(s.led_color().green, 0);
        s.set_button_volume(Volume::Loud);
        assert_eq!(s.reg() >> 31, 1);
        s.set_led_duration(9);
        assert_eq!(s.led_duration(), 1);
    }

    #[test]
    fn test_clock_mode_leading_zero_kept_out_of_word() {
        let mut s = Settings::default();
        s.set_clock_mode(ClockMode::Hour024);
        assert_eq!(s.clock_mode(), ClockMode::Hour024);
        assert_eq!(Settings::from_reg(s.reg()).clock_mode(), ClockMode::Hour24);
        assert_eq!(s.to_record().into_settings(), Some(s));
    }

    #[test]
    fn test_record_version_mismatch() {
        let mut record = Settings::default().to_record();
        record.version = 3;
        assert_eq!(record.into_settings(), None);
    }

    #[test]
    fn test_color_expansion() {
        let color = LedColor {
            red: 0x3,
            green: 0xA,
            blue: 0,
        };
        assert_eq!(color.to_rgb8(), (0x33, 0xAA, 0x00));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_record() {
        let mut s = Settings::default();
        s.set_clock_mode(ClockMode::Hour024);
        let mut buf = [0u8; SETTINGS_RECORD_MAX_SIZE];
        let len = s.to_record().encode(&mut buf).unwrap().len();
        let decoded = SettingsRecord::decode(&buf[..len]).unwrap();
        assert_eq!(decoded.into_settings(), Some(s));
    }
}
