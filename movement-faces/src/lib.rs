//! Watch faces for the Movement runtime
//!
//! Each face is a plain struct implementing [`movement_core::WatchFace`].
//! Faces keep their own state, draw through the shared
//! [`movement_core::Movement`] context and never touch hardware.
//!
//! | Face | Kind |
//! |------|------|
//! | [`ClockFace`] | Time and date with hourly chime |
//! | [`CoinFlipFace`] | Heads or tails |
//! | [`ProbabilityFace`] | Dice roller |
//! | [`WordleFace`] | Five-letter word game |
//! | [`DeadlineFace`] | Countdown to up to four deadlines |
//! | [`DaysSinceFace`] | Days since (or until) an anchor date |
//! | [`PinFace`] | PIN lock menu and digit entry |
//! | [`SetLocationFace`] | Latitude/longitude editor |
//! | [`SchoolFace`] | Class schedule countdown |

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod coin_flip;
pub mod days_since;
pub mod deadline;
pub mod pin;
pub mod probability;
pub mod school;
pub mod set_location;
pub mod wordle;

pub use clock::ClockFace;
pub use coin_flip::CoinFlipFace;
pub use days_since::DaysSinceFace;
pub use deadline::DeadlineFace;
pub use pin::PinFace;
pub use probability::ProbabilityFace;
pub use school::SchoolFace;
pub use set_location::SetLocationFace;
pub use wordle::WordleFace;

use core::fmt::{Arguments, Write};
use heapless::String;

/// Format into a fixed-capacity string, truncating on overflow
pub(crate) fn format<const N: usize>(args: Arguments<'_>) -> String<N> {
    let mut out = String::new();
    let _ = out.write_fmt(args);
    out
}
