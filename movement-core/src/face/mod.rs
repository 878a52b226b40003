//! Watch face contract
//!
//! A face is a self-contained UI mode. The runtime drives every face
//! through the same five entry points and hands each of them the shared
//! [`Movement`] context; faces never reach for globals.

pub mod lifecycle;

pub use lifecycle::{FaceState, LifecycleEvent};

use crate::event::Event;
use crate::movement::Movement;

/// Per-minute answer from [`WatchFace::advise`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Advisory {
    /// Deliver `BACKGROUND_TASK` to this face during the current minute
    pub wants_background_task: bool,
    /// Keep the watch out of backup sleep for this minute
    pub deep_sleep_override: bool,
}

impl Advisory {
    /// Nothing requested
    pub const NONE: Advisory = Advisory {
        wants_background_task: false,
        deep_sleep_override: false,
    };

    /// Ask for a background task this minute
    pub const fn background_task() -> Self {
        Advisory {
            wants_background_task: true,
            deep_sleep_override: false,
        }
    }

    /// Combine two advisories
    pub fn merge(self, other: Advisory) -> Self {
        Advisory {
            wants_background_task: self.wants_background_task || other.wants_background_task,
            deep_sleep_override: self.deep_sleep_override || other.deep_sleep_override,
        }
    }
}

/// A watch face
///
/// `setup` runs once at boot for every registered face before any face
/// is activated. Afterwards the runtime alternates `activate` and `resign`
/// as the user navigates, and feeds events to the active face through
/// `handle`. A face that is not active only ever sees `BACKGROUND_TASK`.
pub trait WatchFace {
    /// One-time initialization; `face_index` is the face's registry slot
    fn setup(&mut self, face_index: u8, movement: &mut Movement<'_>);

    /// The face is about to become visible
    fn activate(&mut self, movement: &mut Movement<'_>);

    /// Handle one event
    ///
    /// Returns true when the watch may enter standby once idle, false to
    /// keep the CPU running. Events the face does not consume should go to
    /// [`Movement::default_loop_handler`].
    fn handle(&mut self, event: Event, movement: &mut Movement<'_>) -> bool;

    /// The face is being replaced by another one
    fn resign(&mut self, movement: &mut Movement<'_>);

    /// Once-per-minute background advisory
    fn advise(&self, _movement: &Movement<'_>) -> Advisory {
        Advisory::NONE
    }

    /// Short name for logs
    fn name(&self) -> &'static str {
        "face"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_merge() {
        let a = Advisory::background_task();
        let b = Advisory {
            wants_background_task: false,
            deep_sleep_override: true,
        };
        let merged = a.merge(b);
        assert!(merged.wants_background_task);
        assert!(merged.deep_sleep_override);
        assert_eq!(Advisory::NONE.merge(Advisory::NONE), Advisory::default());
    }
}
