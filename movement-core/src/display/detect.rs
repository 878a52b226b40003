//! LCD variant detection
//!
//! The custom glass connects a fourth common line that the classic glass
//! leaves floating. Driving a square wave on that common and sampling a
//! neighbouring segment line shows the waveform coupled through on custom
//! glass and nothing on classic glass. Thresholds were calibrated against
//! production units and may need adjusting for new panels.

use super::LcdVariant;
use crate::traits::{LcdProbe, ProbeSample};

/// Frames sampled during detection
pub const PROBE_FRAMES: u32 = 40_000;

/// Valid frames above this count mean custom glass
pub const CUSTOM_THRESHOLD: u32 = 32_000;

/// Valid frames below this count mean classic glass
pub const CLASSIC_THRESHOLD: u32 = 12_000;

/// Minimum reading on the driven line for a frame to count
const DRIVEN_MIN: u16 = 0x8000;

/// Maximum reading on the quiet line for a frame to count
const QUIET_MAX: u16 = 0x2000;

/// Outcome of a detection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Detection {
    Classic,
    Custom,
    /// Inconclusive; the display behaves as classic
    Unknown,
}

impl Detection {
    /// The variant the display should use
    pub fn variant(self) -> LcdVariant {
        match self {
            Detection::Custom => LcdVariant::Custom,
            Detection::Classic | Detection::Unknown => LcdVariant::Classic,
        }
    }
}

/// Running count of probe frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeTally {
    pub frames: u32,
    pub valid: u32,
}

impl ProbeTally {
    /// Create an empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one sampled frame
    pub fn record(&mut self, sample: ProbeSample) {
        self.frames += 1;
        if sample.driven >= DRIVEN_MIN && sample.quiet <= QUIET_MAX {
            self.valid += 1;
        }
    }

    /// Classify the frames seen so far
    pub fn classify(&self) -> Detection {
        classify(self.valid)
    }
}

/// Classify a count of valid frames out of [`PROBE_FRAMES`]
pub fn classify(valid: u32) -> Detection {
    if valid > CUSTOM_THRESHOLD {
        Detection::Custom
    } else if valid < CLASSIC_THRESHOLD {
        Detection::Classic
    } else {
        Detection::Unknown
    }
}

/// Run the probe waveform and classify the installed glass
pub fn detect_lcd_variant<P: LcdProbe + ?Sized>(probe: &mut P) -> Detection {
    let mut tally = ProbeTally::new();
    probe.begin();
    for _ in 0..PROBE_FRAMES {
        tally.record(probe.sample());
    }
    probe.end();
    tally.classify()
}
