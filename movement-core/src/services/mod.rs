//! Process-wide services shared by faces
//!
//! All services live inside [`Movement`](crate::Movement) and are only
//! touched from the dispatcher, so none of them needs locking.

pub mod location;
pub mod pin;
pub mod settings;
pub mod timezone;

pub use location::Location;
pub use pin::{Pin, PinService};
pub use settings::{Settings, SettingsRecord};
pub use timezone::TimezoneCache;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How clock faces render hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockMode {
    #[default]
    Hour12,
    Hour24,
    /// 24 hour with a leading zero
    Hour024,
}

impl ClockMode {
    /// Check if hours run 0..23
    pub fn is_24h(self) -> bool {
        !matches!(self, ClockMode::Hour12)
    }

    /// Next mode in settings order
    pub fn next(self) -> Self {
        match self {
            ClockMode::Hour12 => ClockMode::Hour24,
            ClockMode::Hour24 => ClockMode::Hour024,
            ClockMode::Hour024 => ClockMode::Hour12,
        }
    }
}

/// Metric or imperial readouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

impl UnitPreference {
    /// The other unit system
    pub fn toggled(self) -> Self {
        match self {
            UnitPreference::Metric => UnitPreference::Imperial,
            UnitPreference::Imperial => UnitPreference::Metric,
        }
    }
}

/// "Some alarm is armed" flag
///
/// Faces raise it when their data says an alarm is coming up. Clock faces
/// mirror it on the Signal indicator and the power manager refuses backup
/// sleep while it is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmGate {
    enabled: bool,
}

impl AlarmGate {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Index of the first register faces may claim
pub const FIRST_CLAIMABLE_REGISTER: u8 = 4;

/// Number of backup registers
pub const BACKUP_REGISTER_COUNT: usize = 8;

/// Battery-backed scratch registers
///
/// Register 0 holds the settings record; registers 4..=7 are handed out
/// to faces on request.
#[derive(Debug, Clone)]
pub struct BackupRegisters {
    values: [u32; BACKUP_REGISTER_COUNT],
    next_free: u8,
}

impl Default for BackupRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl BackupRegisters {
    pub fn new() -> Self {
        Self {
            values: [0; BACKUP_REGISTER_COUNT],
            next_free: FIRST_CLAIMABLE_REGISTER,
        }
    }

    /// Claim a register for a face; returns 0 when none is left
    pub fn claim(&mut self) -> u8 {
        if usize::from(self.next_free) >= BACKUP_REGISTER_COUNT {
            return 0;
        }
        let register = self.next_free;
        self.next_free += 1;
        register
    }

    /// Read a register (out-of-range reads give 0)
    pub fn read(&self, register: u8) -> u32 {
        self.values.get(usize::from(register)).copied().unwrap_or(0)
    }

    /// Write a register (out-of-range writes are dropped)
    pub fn write(&mut self, register: u8, value: u32) {
        if let Some(slot) = self.values.get_mut(usize::from(register)) {
            *slot = value;
        }
    }
}
