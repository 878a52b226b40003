//! RP2040-specific HAL for the watch firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `movement-hal` traits:
//!
//! - GPIO wrappers for the LCD controller lines and the buttons
//! - PWM channels for the piezo buzzer and the LED
//! - Flash storage driver (implements `movement_hal::FlashStorage`)

#![no_std]

pub mod flash;
pub mod gpio;
pub mod pwm;

// Re-export shared traits from movement-hal for convenience
pub use movement_hal::{FlashStorage as FlashStorageTrait, OutputPin, PwmOutput, StorageKey};
