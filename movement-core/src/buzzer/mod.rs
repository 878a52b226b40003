//! Piezo buzzer: note table, sequencer and built-in tunes

pub mod notes;
pub mod sequencer;
pub mod tunes;

pub use notes::Note;
pub use sequencer::{
    BuzzerOutput, EndCallback, GlobalHooks, PlaybackEnd, RawSource, RawStep, Sequencer, Volume,
    TICK_HZ,
};
pub use tunes::{TuneMode, SIGNAL_TUNES};
