//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by chip-specific HALs.

/// Digital output pin
///
/// Used for the segment LCD controller's chip-select, write-clock and
/// data lines.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Digital input pin
///
/// Used for the three watch buttons.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        level: bool,
        writes: u8,
    }

    impl OutputPin for Recorder {
        fn set_high(&mut self) {
            self.level = true;
            self.writes += 1;
        }

        fn set_low(&mut self) {
            self.level = false;
            self.writes += 1;
        }
    }

    impl InputPin for Recorder {
        fn is_high(&self) -> bool {
            self.level
        }
    }

    #[test]
    fn test_set_state_dispatches() {
        let mut pin = Recorder { level: false, writes: 0 };
        pin.set_state(true);
        assert!(pin.is_high());
        pin.set_state(false);
        assert!(pin.is_low());
        assert_eq!(pin.writes, 2);
    }
}
