//! PWM output abstractions
//!
//! The piezo buzzer and each LED color channel are driven by a PWM slice.
//! The buzzer changes its period per note; the LED keeps a fixed period and
//! only changes duty.

/// A PWM output channel
pub trait PwmOutput {
    /// Set the waveform period in microseconds
    fn set_period_us(&mut self, period_us: u32);

    /// Set the duty cycle as a fraction of 255
    fn set_duty(&mut self, duty: u8);

    /// Start driving the output
    fn enable(&mut self);

    /// Stop driving the output (line held low)
    fn disable(&mut self);
}
