//! LCD variant probe
//!
//! The two supported glass variants are told apart by driving a test
//! waveform on one common line and sampling two other lines. The probe
//! owns the pins and the ADC; the classification lives in
//! [`crate::display::detect`].

/// One sampled frame of the probe waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeSample {
    /// Reading on the line expected to follow the driven common
    pub driven: u16,
    /// Reading on the line expected to stay quiet
    pub quiet: u16,
}

/// Hardware access needed to classify the LCD
pub trait LcdProbe {
    /// Start driving the test waveform
    fn begin(&mut self);

    /// Sample both sense lines for one frame
    fn sample(&mut self) -> ProbeSample;

    /// Release the pins back to the LCD controller
    fn end(&mut self);
}
