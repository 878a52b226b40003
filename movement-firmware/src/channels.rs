//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! The runtime task is the only consumer of input; everything it decides
//! flows back out through signals.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use movement_core::event::Button;
use movement_core::services::settings::SettingsRecord;
use movement_core::DateTime;

/// Channel capacity for debounced button edges
const BUTTON_CHANNEL_SIZE: usize = 8;

/// Fast ticks allowed to queue up behind a busy runtime pass
const FAST_TICK_CHANNEL_SIZE: usize = 4;

/// One debounced button edge
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEdge {
    pub button: Button,
    pub pressed: bool,
}

/// How often the tick task should read the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickMode {
    /// Ticks per second while active
    Hz(u8),
    /// Once per minute, on the minute (low energy)
    Minute,
}

/// Debounced edges from the button tasks
pub static BUTTON_EDGES: Channel<CriticalSectionRawMutex, ButtonEdge, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// 128 Hz ticks from the fast tick task
pub static FAST_TICKS: Channel<CriticalSectionRawMutex, (), FAST_TICK_CHANNEL_SIZE> = Channel::new();

/// Clock reading from the tick task (latest wins)
pub static RTC_TICK: Signal<CriticalSectionRawMutex, DateTime> = Signal::new();

/// Tick rate requested by the runtime
pub static TICK_MODE: Signal<CriticalSectionRawMutex, TickMode> = Signal::new();

/// Start (true) or stop (false) the fast tick
pub static FAST_TICK_ENABLE: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Face files changed and should reach flash
pub static FLUSH_FILES: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Settings changed on the watch
pub static SAVE_SETTINGS: Signal<CriticalSectionRawMutex, SettingsRecord> = Signal::new();
