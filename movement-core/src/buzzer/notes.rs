//! Equal-temperament note table
//!
//! Notes are numbered from A1 (55 Hz) upward in semitones; the number is
//! what note sequences store. Periods are the PWM period in microseconds,
//! `round(1_000_000 / f)`.

/// A playable note, or a rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Note {
    /// 55.00 Hz
    A1,
    /// 58.27 Hz
    As1,
    /// 61.74 Hz
    B1,
    /// 65.41 Hz
    C2,
    /// 69.30 Hz
    Cs2,
    /// 73.42 Hz
    D2,
    /// 77.78 Hz
    Ds2,
    /// 82.41 Hz
    E2,
    /// 87.31 Hz
    F2,
    /// 92.50 Hz
    Fs2,
    /// 98.00 Hz
    G2,
    /// 103.83 Hz
    Gs2,
    /// 110.00 Hz
    A2,
    /// 116.54 Hz
    As2,
    /// 123.47 Hz
    B2,
    /// 130.81 Hz
    C3,
    /// 138.59 Hz
    Cs3,
    /// 146.83 Hz
    D3,
    /// 155.56 Hz
    Ds3,
    /// 164.81 Hz
    E3,
    /// 174.61 Hz
    F3,
    /// 185.00 Hz
    Fs3,
    /// 196.00 Hz
    G3,
    /// 207.65 Hz
    Gs3,
    /// 220.00 Hz
    A3,
    /// 233.08 Hz
    As3,
    /// 246.94 Hz
    B3,
    /// 261.63 Hz
    C4,
    /// 277.18 Hz
    Cs4,
    /// 293.66 Hz
    D4,
    /// 311.13 Hz
    Ds4,
    /// 329.63 Hz
    E4,
    /// 349.23 Hz
    F4,
    /// 369.99 Hz
    Fs4,
    /// 392.00 Hz
    G4,
    /// 415.30 Hz
    Gs4,
    /// 440.00 Hz
    A4,
    /// 466.16 Hz
    As4,
    /// 493.88 Hz
    B4,
    /// 523.25 Hz
    C5,
    /// 554.37 Hz
    Cs5,
    /// 587.33 Hz
    D5,
    /// 622.25 Hz
    Ds5,
    /// 659.26 Hz
    E5,
    /// 698.46 Hz
    F5,
    /// 739.99 Hz
    Fs5,
    /// 783.99 Hz
    G5,
    /// 830.61 Hz
    Gs5,
    /// 880.00 Hz
    A5,
    /// 932.33 Hz
    As5,
    /// 987.77 Hz
    B5,
    /// 1046.50 Hz
    C6,
    /// 1108.73 Hz
    Cs6,
    /// 1174.66 Hz
    D6,
    /// 1244.51 Hz
    Ds6,
    /// 1318.51 Hz
    E6,
    /// 1396.91 Hz
    F6,
    /// 1479.98 Hz
    Fs6,
    /// 1567.98 Hz
    G6,
    /// 1661.22 Hz
    Gs6,
    /// 1760.00 Hz
    A6,
    /// 1864.66 Hz
    As6,
    /// 1975.53 Hz
    B6,
    /// 2093.00 Hz
    C7,
    /// 2217.46 Hz
    Cs7,
    /// 2349.32 Hz
    D7,
    /// 2489.02 Hz
    Ds7,
    /// 2637.02 Hz
    E7,
    /// 2793.83 Hz
    F7,
    /// 2959.96 Hz
    Fs7,
    /// 3135.96 Hz
    G7,
    /// 3322.44 Hz
    Gs7,
    /// 3520.00 Hz
    A7,
    /// 3729.31 Hz
    As7,
    /// 3951.07 Hz
    B7,
    /// 4186.01 Hz
    C8,
    /// 4434.92 Hz
    Cs8,
    /// 4698.64 Hz
    D8,
    /// 4978.03 Hz
    Ds8,
    /// 5274.04 Hz
    E8,
    /// 5587.65 Hz
    F8,
    /// 5919.91 Hz
    Fs8,
    /// 6271.93 Hz
    G8,
    /// 6644.88 Hz
    Gs8,
    /// 7040.00 Hz
    A8,
    /// 7458.62 Hz
    As8,
    /// 7902.13 Hz
    B8,
    /// Silence for the step's duration
    Rest,
}

/// Number of sounding notes
pub const NOTE_COUNT: usize = 87;

/// PWM period in microseconds, indexed by note number
pub const NOTE_PERIODS: [u16; NOTE_COUNT] = [
    18182, 17161, 16198, 15289, 14431, 13621, 12856, 12135,
    11454, 10811, 10204, 9631, 9091, 8581, 8099, 7645,
    7215, 6810, 6428, 6067, 5727, 5405, 5102, 4816,
    4545, 4290, 4050, 3822, 3608, 3405, 3214, 3034,
    2863, 2703, 2551, 2408, 2273, 2145, 2025, 1911,
    1804, 1703, 1607, 1517, 1432, 1351, 1276, 1204,
    1136, 1073, 1012, 956, 902, 851, 804, 758,
    716, 676, 638, 602, 568, 536, 506, 478,
    451, 426, 402, 379, 358, 338, 319, 301,
    284, 268, 253, 239, 225, 213, 201, 190,
    179, 169, 159, 150, 142, 134, 127,
];

impl Note {
    /// Note number as stored in a sequence
    pub const fn code(self) -> i8 {
        self as u8 as i8
    }

    /// Look up a note by number; anything outside the table is a rest
    pub fn from_code(code: i8) -> Self {
        match u8::try_from(code) {
            Ok(n) if usize::from(n) < NOTE_COUNT => {
                NOTES[usize::from(n)]
            }
            _ => Note::Rest,
        }
    }

    /// PWM period, or `None` for a rest
    pub fn period_us(self) -> Option<u16> {
        NOTE_PERIODS.get(self as usize).copied()
    }
}

const NOTES: [Note; NOTE_COUNT] = [
    Note::A1, Note::As1, Note::B1, Note::C2, Note::Cs2, Note::D2, Note::Ds2, Note::E2,
    Note::F2, Note::Fs2, Note::G2, Note::Gs2, Note::A2, Note::As2, Note::B2, Note::C3,
    Note::Cs3, Note::D3, Note::Ds3, Note::E3, Note::F3, Note::Fs3, Note::G3, Note::Gs3,
    Note::A3, Note::As3, Note::B3, Note::C4, Note::Cs4, Note::D4, Note::Ds4, Note::E4,
    Note::F4, Note::Fs4, Note::G4, Note::Gs4, Note::A4, Note::As4, Note::B4, Note::C5,
    Note::Cs5, Note::D5, Note::Ds5, Note::E5, Note::F5, Note::Fs5, Note::G5, Note::Gs5,
    Note::A5, Note::As5, Note::B5, Note::C6, Note::Cs6, Note::D6, Note::Ds6, Note::E6,
    Note::F6, Note::Fs6, Note::G6, Note::Gs6, Note::A6, Note::As6, Note::B6, Note::C7,
    Note::Cs7, Note::D7, Note::Ds7, Note::E7, Note::F7, Note::Fs7, Note::G7, Note::Gs7,
    Note::A7, Note::As7, Note::B7, Note::C8, Note::Cs8, Note::D8, Note::Ds8, Note::E8,
    Note::F8, Note::Fs8, Note::G8, Note::Gs8, Note::A8, Note::As8, Note::B8,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_pitches() {
        assert_eq!(Note::A4.period_us(), Some(2273));
        assert_eq!(Note::C8.period_us(), Some(239));
        assert_eq!(Note::A1.period_us(), Some(18182));
        assert_eq!(Note::Rest.period_us(), None);
    }

    #[test]
    fn test_code_round_trip() {
        assert_eq!(Note::Rest.code(), 87);
        assert_eq!(Note::from_code(Note::C7.code()), Note::C7);
        assert_eq!(Note::from_code(87), Note::Rest);
        assert_eq!(Note::from_code(-3), Note::Rest);
        assert_eq!(Note::from_code(120), Note::Rest);
    }

    #[test]
    fn test_periods_descend() {
        assert!(NOTE_PERIODS.windows(2).all(|w| w[0] > w[1]));
    }
}
