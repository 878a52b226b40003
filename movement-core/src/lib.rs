//! Board-agnostic face-dispatch runtime for the watch firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Face contract, lifecycle state machine and registry
//! - Event model, button event synthesis and tick scheduling
//! - Segment display frame buffer for both LCD variants
//! - Buzzer note sequencer and signal tunes
//! - Shared services (settings, location, PIN lock, timezone)
//! - Power state management and per-minute background advisory
//! - Persistence shim over a small file store
//! - Configuration types and the `watch.toml` parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buttons;
pub mod buzzer;
pub mod config;
pub mod datetime;
pub mod display;
pub mod event;
pub mod face;
pub mod movement;
pub mod persistence;
pub mod power;
pub mod registry;
pub mod runtime;
pub mod scheduler;
pub mod services;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use datetime::DateTime;
pub use event::{Event, EventKind};
pub use face::{Advisory, WatchFace};
pub use movement::Movement;
pub use registry::FaceRegistry;
pub use runtime::Runtime;
