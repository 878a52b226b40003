//! Button event synthesis
//!
//! Turns debounced press/release edges and the 128 Hz fast tick into the
//! per-button event stream faces see. Every physical press produces
//! exactly one of:
//!
//! ```text
//! DOWN ──────────────────────────────▶ UP
//! DOWN ──(held 65 ticks)──▶ LONG_PRESS ──▶ LONG_UP
//! ```

use heapless::Vec;

use crate::event::{Button, EventKind};

/// Fast tick rate used for press timing
pub const FAST_TICK_HZ: u32 = 128;

/// A press held longer than this many fast ticks is a long press
pub const LONG_PRESS_TICKS: u16 = 64;

/// The fast tick gives up after this many ticks without going idle
pub const FAST_TICK_LIMIT: u16 = 128 * 20;

/// Press state of one button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    #[default]
    Released,
    /// Held since the given fast tick
    Pressed { since: u16 },
    /// Held past the long-press threshold
    LongPressed,
}

impl ButtonState {
    /// Check if the button is currently held
    pub fn is_held(&self) -> bool {
        !matches!(self, ButtonState::Released)
    }
}

/// Per-button press tracker
#[derive(Debug, Clone, Default)]
pub struct ButtonSynthesizer {
    fast_ticks: u16,
    states: [ButtonState; 3],
}

impl ButtonSynthesizer {
    /// Create a tracker with every button released
    pub fn new() -> Self {
        Self::default()
    }

    /// Fast ticks counted since the fast tick was last started
    pub fn fast_ticks(&self) -> u16 {
        self.fast_ticks
    }

    /// Restart the fast tick counter
    ///
    /// Ignored while a button is held, since press times are relative to it.
    pub fn restart_clock(&mut self) {
        if !self.any_held() {
            self.fast_ticks = 0;
        }
    }

    /// State of one button
    pub fn state(&self, button: Button) -> ButtonState {
        self.states[button.index()]
    }

    /// Check if `button` is held
    pub fn is_held(&self, button: Button) -> bool {
        self.state(button).is_held()
    }

    /// Check if any button is held
    pub fn any_held(&self) -> bool {
        self.states.iter().any(ButtonState::is_held)
    }

    /// Feed a debounced edge; duplicate edges are dropped
    pub fn edge(&mut self, button: Button, pressed: bool) -> Option<EventKind> {
        let state = &mut self.states[button.index()];
        match (*state, pressed) {
            (ButtonState::Released, true) => {
                *state = ButtonState::Pressed {
                    since: self.fast_ticks,
                };
                Some(EventKind::down(button))
            }
            (ButtonState::Pressed { .. }, false) => {
                *state = ButtonState::Released;
                Some(EventKind::up(button))
            }
            (ButtonState::LongPressed, false) => {
                *state = ButtonState::Released;
                Some(EventKind::long_up(button))
            }
            _ => None,
        }
    }

    /// Advance the fast tick and report long presses that just matured
    pub fn tick(&mut self) -> Vec<EventKind, 3> {
        self.fast_ticks = self.fast_ticks.wrapping_add(1);
        let mut events = Vec::new();
        for button in Button::ALL {
            let state = &mut self.states[button.index()];
            if let ButtonState::Pressed { since } = *state {
                if self.fast_ticks.wrapping_sub(since) > LONG_PRESS_TICKS {
                    *state = ButtonState::LongPressed;
                    let _ = events.push(EventKind::long_press(button));
                }
            }
        }
        events
    }
}
