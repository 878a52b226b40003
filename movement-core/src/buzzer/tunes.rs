//! Built-in signal tunes
//!
//! Each tune is a zero-terminated sequence as understood by
//! [`Sequencer`](super::Sequencer). The chime, alarm and timer signals
//! each play one tune from [`SIGNAL_TUNES`], selectable per [`TuneMode`].

use super::notes::Note::{self, *};

const fn n(note: Note) -> i8 {
    note.code()
}

const REST: i8 = n(Rest);

/// What a signal is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TuneMode {
    /// Hourly chime, played once
    Chime,
    /// Alarm going off
    Alarm,
    /// Countdown reached zero
    Timer,
}

impl TuneMode {
    /// All modes, in settings order
    pub const ALL: [TuneMode; 3] = [TuneMode::Chime, TuneMode::Alarm, TuneMode::Timer];

    /// Sequencer ticks to keep repeating the tune (0 = play once)
    pub fn repeat_ticks(self) -> u32 {
        match self {
            TuneMode::Chime => 0,
            TuneMode::Alarm => 60 * super::TICK_HZ,
            TuneMode::Timer => 15 * super::TICK_HZ,
        }
    }

    /// Silent ticks between repetitions
    pub fn interval_ticks(self) -> u16 {
        32
    }

    /// Tune selected when nothing else was configured
    pub fn default_tune(self) -> usize {
        match self {
            TuneMode::Chime => 0,
            TuneMode::Alarm | TuneMode::Timer => 1,
        }
    }
}

pub static DEFAULT: [i8; 7] = [
    n(C8), 5,
    REST, 6,
    n(C8), 5,
    0,
];

pub static ALARM: [i8; 15] = [
    n(C8), 2,
    REST, 2,
    n(C8), 2,
    REST, 2,
    n(C8), 2,
    REST, 2,
    n(C8), 2,
    0,
];

pub static BEEP: [i8; 3] = [
    n(C8), 32,
    0,
];

pub static ZELDA_SECRET: [i8; 17] = [
    n(G5), 8,
    n(Fs5), 8,
    n(Ds5), 8,
    n(A4), 8,
    n(Gs4), 8,
    n(E5), 8,
    n(Gs5), 8,
    n(C6), 20,
    0,
];

pub static MARIO_THEME: [i8; 27] = [
    n(E6), 7,
    REST, 2,
    n(E6), 7,
    REST, 10,
    n(E6), 7,
    REST, 11,
    n(C6), 7,
    REST, 1,
    n(E6), 7,
    REST, 10,
    n(G6), 8,
    REST, 30,
    n(G5), 8,
    0,
];

pub static MGS_CODEC: [i8; 43] = [
    n(Gs5), 1,
    n(C6), 1,
    n(Gs5), 1,
    n(C6), 1,
    n(Gs5), 1,
    n(C6), 1,
    n(Gs5), 1,
    n(C6), 1,
    n(Gs5), 1,
    n(C6), 1,
    REST, 6,
    n(Gs5), 1,
    n(C6), 1,
    n(Gs5), 1,
    n(C6), 1,
    n(Gs5), 1,
    n(C6), 1,
    n(Gs5), 1,
    n(C6), 1,
    n(Gs5), 1,
    n(C6), 1,
    0,
];

pub static KIM_POSSIBLE: [i8; 21] = [
    n(G7), 6,
    n(G4), 2,
    REST, 5,
    n(G7), 6,
    n(G4), 2,
    REST, 5,
    n(As7), 6,
    REST, 2,
    n(G7), 6,
    n(G4), 2,
    0,
];

pub static POWER_RANGERS: [i8; 23] = [
    n(D8), 6,
    REST, 8,
    n(D8), 6,
    REST, 8,
    n(C8), 6,
    REST, 2,
    n(D8), 6,
    REST, 8,
    n(F8), 6,
    REST, 8,
    n(D8), 6,
    0,
];

pub static LAYLA: [i8; 27] = [
    n(A6), 5,
    REST, 1,
    n(C7), 5,
    REST, 1,
    n(D7), 5,
    REST, 1,
    n(F7), 5,
    REST, 1,
    n(D7), 5,
    REST, 1,
    n(C7), 5,
    REST, 1,
    n(D7), 20,
    0,
];

pub static HARRY_POTTER_SHORT: [i8; 31] = [
    n(B5), 12,
    REST, 1,
    n(E6), 12,
    REST, 1,
    n(G6), 6,
    REST, 1,
    n(Fs6), 6,
    REST, 1,
    n(E6), 16,
    REST, 1,
    n(B6), 8,
    REST, 1,
    n(A6), 24,
    REST, 1,
    n(Fs6), 24,
    0,
];

pub static HARRY_POTTER_LONG: [i8; 55] = [
    n(B5), 12,
    REST, 1,
    n(E6), 12,
    REST, 1,
    n(G6), 6,
    REST, 1,
    n(Fs6), 6,
    REST, 1,
    n(E6), 16,
    REST, 1,
    n(B6), 8,
    REST, 1,
    n(A6), 24,
    REST, 1,
    n(Fs6), 24,
    REST, 1,
    n(E6), 12,
    REST, 1,
    n(G6), 6,
    REST, 1,
    n(Fs6), 6,
    REST, 1,
    n(Ds6), 16,
    REST, 1,
    n(F6), 8,
    REST, 1,
    n(B5), 24,
    0,
];

pub static JURASSIC_PARK: [i8; 39] = [
    n(B5), 7,
    REST, 7,
    n(As5), 7,
    REST, 7,
    n(B5), 13,
    REST, 13,
    n(Fs5), 13,
    REST, 13,
    n(E5), 13,
    REST, 13,
    n(B5), 7,
    REST, 7,
    n(As5), 7,
    REST, 7,
    n(B5), 13,
    REST, 13,
    n(Fs5), 13,
    REST, 13,
    n(E5), 13,
    0,
];

pub static EVANGELION: [i8; 47] = [
    n(C5), 13,
    REST, 13,
    n(Ds5), 13,
    REST, 13,
    n(F5), 13,
    REST, 7,
    n(Ds5), 13,
    REST, 7,
    n(F5), 7,
    REST, 7,
    n(F5), 7,
    REST, 7,
    n(F5), 7,
    REST, 7,
    n(As5), 7,
    REST, 7,
    n(Gs5), 7,
    REST, 7,
    n(G5), 3,
    REST, 3,
    n(F5), 7,
    REST, 7,
    n(G5), 13,
    0,
];

/// Selectable tunes, in menu order
pub static SIGNAL_TUNES: [&[i8]; 13] = [
    &DEFAULT,
    &ALARM,
    &BEEP,
    &ZELDA_SECRET,
    &MARIO_THEME,
    &MGS_CODEC,
    &KIM_POSSIBLE,
    &POWER_RANGERS,
    &LAYLA,
    &HARRY_POTTER_SHORT,
    &HARRY_POTTER_LONG,
    &JURASSIC_PARK,
    &EVANGELION,
];

/// Look up a tune by menu index, falling back to the default chime
pub fn tune(index: usize) -> &'static [i8] {
    SIGNAL_TUNES.get(index).copied().unwrap_or(&DEFAULT)
}
