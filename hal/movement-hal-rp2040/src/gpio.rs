//! GPIO wrappers
//!
//! The LCD controller lines are plain push-pull outputs. The three watch
//! buttons are active-high inputs with pull-downs; [`Button`] debounces
//! their edges.

use embassy_rp::gpio::{Input, Level, Output};
use embassy_time::{Duration, Instant, Timer};

/// Settle time before an edge is trusted
pub const DEBOUNCE: Duration = Duration::from_millis(10);

/// Push-pull output line
pub struct OutputLine<'d> {
    pin: Output<'d>,
}

impl<'d> OutputLine<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl movement_hal::OutputPin for OutputLine<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn set_state(&mut self, high: bool) {
        self.pin.set_level(if high { Level::High } else { Level::Low });
    }
}

/// Debounced watch button
pub struct Button<'d> {
    pin: Input<'d>,
    pressed: bool,
}

impl<'d> Button<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        let pressed = pin.is_high();
        Self { pin, pressed }
    }

    /// Last debounced state
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Wait for the next debounced edge
    ///
    /// Returns the new state and when the edge first appeared. Bounces
    /// that settle back to the old state are swallowed.
    pub async fn next_edge(&mut self) -> (bool, Instant) {
        loop {
            self.pin.wait_for_any_edge().await;
            let at = Instant::now();
            Timer::after(DEBOUNCE).await;
            let level = self.pin.is_high();
            if level != self.pressed {
                self.pressed = level;
                return (level, at);
            }
        }
    }
}

impl movement_hal::InputPin for Button<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
