//! Configuration loading
//!
//! Loads `watch.toml` from flash or the embedded defaults, the settings
//! record kept by the watch, and the face files.

pub mod loader;

pub use loader::{ConfigError, ConfigPersistence};
