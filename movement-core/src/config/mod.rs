//! Watch configuration
//!
//! Defaults ship as `watch.toml` inside the firmware image; a copy in
//! flash overrides them. Both go through [`parse_config`].

pub mod parser;

pub use parser::{parse_config, ParseError};

use crate::services::{Location, Settings};

/// `[power]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerConfig {
    /// Minutes in low-energy mode before backup sleep (0 = never)
    pub backup_after_minutes: u16,
}

/// Everything `watch.toml` can set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchConfig {
    /// `[settings]`
    pub settings: Settings,
    /// `[faces] secondary`: first face of the secondary set
    pub secondary_face: Option<u8>,
    /// `[power]`
    pub power: PowerConfig,
    /// `[location]`: used when no location file exists
    pub location: Option<Location>,
}

impl WatchConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
