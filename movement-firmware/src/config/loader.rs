//! Configuration persistence
//!
//! Loads the watch configuration from flash storage.
//! Falls back to embedded defaults if flash is empty.

use core::str;
use defmt::*;

use movement_core::config::{parse_config, ParseError, WatchConfig};
use movement_core::persistence::MAX_RECORD_SIZE;
use movement_core::services::settings::{Settings, SettingsRecord, SETTINGS_RECORD_MAX_SIZE};
use movement_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey, MAX_VALUE_SIZE};
// Import the FlashStorage trait to bring methods into scope
use movement_hal_rp2040::FlashStorageTrait;

use crate::files;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// TOML parsing failed
    Parse(ParseError),
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// Deserialization failed
    Deserialize,
    /// Settings record written by another layout
    VersionMismatch,
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::Parse(e)
    }
}

/// Configuration persistence manager
///
/// Handles loading everything the watch keeps in flash at boot.
pub struct ConfigPersistence<'d> {
    storage: FlashStorage<'d>,
}

impl<'d> ConfigPersistence<'d> {
    /// Create a new config persistence manager
    pub fn new(storage: FlashStorage<'d>) -> Self {
        Self { storage }
    }

    /// Consume this persistence manager and return the underlying storage
    ///
    /// The storage task takes it over once boot is done.
    pub fn into_storage(self) -> FlashStorage<'d> {
        self.storage
    }

    /// Load `watch.toml` from flash
    pub async fn load(&mut self) -> Result<WatchConfig, ConfigError> {
        info!("Loading configuration from flash...");

        let mut buffer = [0u8; MAX_VALUE_SIZE];
        let len = self.storage.read(&StorageKey::ConfigToml, &mut buffer).await?;
        debug!("Read {} bytes of TOML from flash", len);

        let toml_str = str::from_utf8(&buffer[..len]).map_err(|_| ConfigError::InvalidUtf8)?;
        let config = parse_config(toml_str)?;

        log_config_summary(&config);
        Ok(config)
    }

    /// Load the settings last changed on the watch
    pub async fn load_settings(&mut self) -> Result<Settings, ConfigError> {
        let mut buffer = [0u8; SETTINGS_RECORD_MAX_SIZE];
        let len = self.storage.read(&StorageKey::Settings, &mut buffer).await?;

        let record = SettingsRecord::decode(&buffer[..len]).map_err(|_| ConfigError::Deserialize)?;
        match record.into_settings() {
            Some(settings) => Ok(settings),
            None => {
                warn!("Settings record version {} not understood", record.version);
                Err(ConfigError::VersionMismatch)
            }
        }
    }

    /// Copy every face file into the shared file store
    ///
    /// Returns how many files were loaded.
    pub async fn load_files(&mut self) -> usize {
        let mut loaded = 0;
        for name in self.storage.directory().await {
            let key = StorageKey::File(name.clone());
            let mut buffer = [0u8; MAX_RECORD_SIZE];
            match self.storage.read(&key, &mut buffer).await {
                Ok(len) => match files::preload(&name, &buffer[..len]) {
                    Ok(()) => loaded += 1,
                    Err(e) => warn!("Skipping file {}: {:?}", name.as_str(), e),
                },
                // Removed since it was listed
                Err(FlashError::NotFound) => {}
                Err(e) => warn!("Failed to read {}: {:?}", name.as_str(), e),
            }
        }
        loaded
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &WatchConfig) {
    info!("Configuration loaded successfully");
    debug!("  settings reg {:#x}", config.settings.reg());
    debug!("  secondary face {:?}", config.secondary_face);
    debug!("  backup after {} min", config.power.backup_after_minutes);
}
