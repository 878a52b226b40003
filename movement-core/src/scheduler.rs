//! Tick scheduling and inactivity countdowns
//!
//! The RTC delivers ticks at the frequency the active face requested.
//! Once per RTC second the inactivity countdowns run down: the shorter one
//! produces a single `TIMEOUT` hint, the longer one moves the watch into
//! low-energy mode.

use crate::datetime::DateTime;

/// Inactivity timeout choices in seconds, indexed by the `timeout` setting
pub const TIMEOUT_DEADLINES: [u32; 4] = [30, 120, 300, 1800];

/// Low-energy deadlines in seconds, indexed by the `low_energy` setting
///
/// Index 0 means "never".
pub const LOW_ENERGY_DEADLINES: [u32; 8] = [0, 600, 3600, 7200, 21_600, 43_200, 86_400, 604_800];

/// Highest tick frequency a face may request
pub const MAX_TICK_HZ: u8 = 64;

/// Reserved for the fast tick
const FAST_TICK_HZ: u8 = 128;

/// Seconds-based countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Countdown {
    /// Not counting (expired and consumed, or never armed)
    Disarmed,
    /// Seconds remaining; zero means due
    Running(u32),
}

impl Countdown {
    /// Arm with `seconds`, or disarm when `seconds` is zero and `zero_disarms`
    fn arm(seconds: u32, zero_disarms: bool) -> Self {
        if seconds == 0 && zero_disarms {
            Countdown::Disarmed
        } else {
            Countdown::Running(seconds)
        }
    }

    fn tick(&mut self) {
        if let Countdown::Running(n) = self {
            *n = n.saturating_sub(1);
        }
    }

    /// Check if the countdown reached zero and has not been consumed
    pub fn is_due(&self) -> bool {
        *self == Countdown::Running(0)
    }

    /// Consume a due countdown
    fn take(&mut self) -> bool {
        let due = self.is_due();
        if due {
            *self = Countdown::Disarmed;
        }
        due
    }
}

/// Tick frequency, sub-second phase and inactivity countdowns
#[derive(Debug, Clone)]
pub struct TickScheduler {
    frequency: u8,
    subsecond: u8,
    last_second: Option<u8>,
    timeout_interval: u8,
    low_energy_interval: u8,
    timeout: Countdown,
    low_energy: Countdown,
}

impl TickScheduler {
    /// Create a scheduler at 1 Hz with both countdowns armed
    pub fn new(timeout_interval: u8, low_energy_interval: u8) -> Self {
        let mut scheduler = Self {
            frequency: 1,
            subsecond: 0,
            last_second: None,
            timeout_interval,
            low_energy_interval,
            timeout: Countdown::Disarmed,
            low_energy: Countdown::Disarmed,
        };
        scheduler.reset_inactivity();
        scheduler
    }

    /// Ticks per second currently delivered
    pub fn frequency(&self) -> u8 {
        self.frequency
    }

    /// Tick index within the current second
    pub fn subsecond(&self) -> u8 {
        self.subsecond
    }

    /// Change the tick rate
    ///
    /// 128 Hz is reserved and ignored. Zero and non-powers of two fall back
    /// to 1 Hz; rates above 64 Hz are clamped. Returns the rate in effect.
    pub fn request_frequency(&mut self, hz: u8) -> u8 {
        if hz == FAST_TICK_HZ {
            return self.frequency;
        }
        let hz = if hz == 0 || !hz.is_power_of_two() {
            1
        } else {
            hz.min(MAX_TICK_HZ)
        };
        self.frequency = hz;
        self.subsecond = 0;
        hz
    }

    /// Change the inactivity settings and re-arm the countdowns
    pub fn set_intervals(&mut self, timeout_interval: u8, low_energy_interval: u8) {
        self.timeout_interval = timeout_interval;
        self.low_energy_interval = low_energy_interval;
        self.reset_inactivity();
    }

    /// Re-arm both countdowns after user activity
    pub fn reset_inactivity(&mut self) {
        let timeout = TIMEOUT_DEADLINES[usize::from(self.timeout_interval) % TIMEOUT_DEADLINES.len()];
        let low_energy =
            LOW_ENERGY_DEADLINES[usize::from(self.low_energy_interval) % LOW_ENERGY_DEADLINES.len()];
        self.timeout = Countdown::arm(timeout, false);
        self.low_energy = Countdown::arm(low_energy, true);
    }

    /// Enter low energy on the next pass
    pub fn request_sleep(&mut self) {
        self.low_energy = Countdown::Running(0);
    }

    /// Account for one RTC tick; returns true when a new second started
    pub fn on_tick(&mut self, now: &DateTime) -> bool {
        if self.last_second == Some(now.second) {
            self.subsecond = self.subsecond.wrapping_add(1);
            return false;
        }
        self.last_second = Some(now.second);
        self.subsecond = 0;
        self.timeout.tick();
        self.low_energy.tick();
        true
    }

    /// Inactivity timeout state
    pub fn timeout(&self) -> Countdown {
        self.timeout
    }

    /// Low-energy countdown state
    pub fn low_energy(&self) -> Countdown {
        self.low_energy
    }

    /// Consume an expired inactivity timeout
    pub fn take_timeout(&mut self) -> bool {
        self.timeout.take()
    }

    /// Consume an expired low-energy countdown
    pub fn take_low_energy(&mut self) -> bool {
        self.low_energy.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(second: u8) -> DateTime {
        DateTime::new(2024, 1, 1, 0, 0, second)
    }

    fn run_seconds(s: &mut TickScheduler, seconds: u32) {
        for i in 0..seconds {
            s.on_tick(&at((i % 60) as u8));
        }
    }

    #[test]
    fn test_frequency_rules() {
        let mut s = TickScheduler::new(0, 0);
        assert_eq!(s.request_frequency(4), 4);
        assert_eq!(s.request_frequency(128), 4);
        assert_eq!(s.frequency(), 4);
        assert_eq!(s.request_frequency(0), 1);
        assert_eq!(s.request_frequency(6), 1);
        assert_eq!(s.request_frequency(64), 64);
    }

    #[test]
    fn test_subsecond_counts_within_second() {
        let mut s = TickScheduler::new(0, 0);
        s.request_frequency(4);
        assert!(s.on_tick(&at(10)));
        assert!(!s.on_tick(&at(10)));
        assert!(!s.on_tick(&at(10)));
        assert_eq!(s.subsecond(), 2);
        assert!(s.on_tick(&at(11)));
        assert_eq!(s.subsecond(), 0);
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut s = TickScheduler::new(0, 0);
        run_seconds(&mut s, 29);
        assert!(!s.take_timeout());
        s.on_tick(&at(29));
        assert!(s.take_timeout());
        assert!(!s.take_timeout());
    }

    #[test]
    fn test_low_energy_never() {
        let mut s = TickScheduler::new(0, 0);
        assert_eq!(s.low_energy(), Countdown::Disarmed);
        run_seconds(&mut s, 2000);
        assert!(!s.take_low_energy());
    }

    #[test]
    fn test_low_energy_after_deadline() {
        let mut s = TickScheduler::new(0, 1);
        for i in 0..600u32 {
            s.on_tick(&DateTime::new(2024, 1, 1, 0, (i / 60) as u8, (i % 60) as u8));
        }
        assert!(s.take_low_energy());
        s.reset_inactivity();
        assert_eq!(s.low_energy(), Countdown::Running(600));
    }

    #[test]
    fn test_request_sleep() {
        let mut s = TickScheduler::new(0, 0);
        s.request_sleep();
        assert!(s.take_low_energy());
    }

    proptest! {
        #[test]
        fn test_request_frequency_idempotent(hz in any::<u8>(), start in any::<u8>()) {
            let mut once = TickScheduler::new(0, 0);
            once.request_frequency(start);
            let mut twice = once.clone();
            once.request_frequency(hz);
            twice.request_frequency(hz);
            twice.request_frequency(hz);
            prop_assert_eq!(once.frequency(), twice.frequency());
            prop_assert_eq!(once.subsecond(), twice.subsecond());
        }
    }
}
