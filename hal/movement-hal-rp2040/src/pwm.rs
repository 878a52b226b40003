//! PWM channels for the piezo buzzer and the LED
//!
//! The slice clock is divided down to 1 MHz so that the counter period is
//! directly in microseconds.

use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use fixed::types::U12F4;

/// System clock divider giving a 1 µs counter tick at 125 MHz
const DIVIDER: u8 = 125;

/// Longest period the 16-bit counter holds
pub const MAX_PERIOD_US: u32 = u16::MAX as u32 + 1;

/// LED period (1 kHz, well above flicker)
pub const LED_PERIOD_US: u32 = 1_000;

/// Which output of the slice drives the pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Output {
    A,
    B,
}

/// One PWM output
pub struct PwmChannel<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
    output: Output,
    duty: u8,
    enabled: bool,
}

impl<'d> PwmChannel<'d> {
    /// Wrap a slice; the output starts disabled
    pub fn new(mut pwm: Pwm<'d>, output: Output, period_us: u32) -> Self {
        let mut config = PwmConfig::default();
        config.divider = U12F4::from_num(DIVIDER);
        config.top = top_for(period_us);
        config.compare_a = 0;
        config.compare_b = 0;
        pwm.set_config(&config);
        Self {
            pwm,
            config,
            output,
            duty: 0,
            enabled: false,
        }
    }

    fn apply(&mut self) {
        let compare = if self.enabled {
            (u32::from(self.config.top) + 1) * u32::from(self.duty) / 255
        } else {
            0
        };
        let compare = compare.min(u32::from(u16::MAX)) as u16;
        match self.output {
            Output::A => self.config.compare_a = compare,
            Output::B => self.config.compare_b = compare,
        }
        self.pwm.set_config(&self.config);
    }
}

/// Counter top for a period, clamped to what the counter holds
fn top_for(period_us: u32) -> u16 {
    (period_us.clamp(2, MAX_PERIOD_US) - 1) as u16
}

impl movement_hal::PwmOutput for PwmChannel<'_> {
    fn set_period_us(&mut self, period_us: u32) {
        self.config.top = top_for(period_us);
        self.apply();
    }

    fn set_duty(&mut self, duty: u8) {
        self.duty = duty;
        self.apply();
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.apply();
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.apply();
    }
}
