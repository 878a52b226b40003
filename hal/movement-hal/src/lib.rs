//! Movement Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by chip-specific HALs. The watch runtime itself never touches these
//! traits directly; the firmware binary wires the chip HAL into the
//! runtime's own seams (frame buffer, buzzer output, LED output, files).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  movement-firmware (embassy tasks)      │
//! └─────────────────────────────────────────┘
//!          │                     │
//!          ▼                     ▼
//! ┌─────────────────┐   ┌─────────────────┐
//! │  movement-core  │   │  movement-hal   │
//! │  (runtime)      │   │  (this crate)   │
//! └─────────────────┘   └─────────────────┘
//!                                │
//!                                ▼
//!                       ┌─────────────────┐
//!                       │ movement-hal-   │
//!                       │     rp2040      │
//!                       └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`pwm::PwmOutput`] - Piezo buzzer and LED channels
//! - [`flash::FlashStorage`] - Persistent key-value storage
//!
//! Plus one driver that only needs the GPIO traits:
//!
//! - [`segment::Ht1621`] - Bit-banged segment LCD controller

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;
pub mod pwm;
pub mod segment;

// Re-export key traits at crate root for convenience
pub use flash::{FileName, FlashError, FlashStorage, StorageKey};
pub use gpio::{InputPin, OutputPin};
pub use pwm::PwmOutput;
pub use segment::{Frame, Ht1621};
