//! Power state management
//!
//! ```text
//!            inactivity            backup allowed
//!  Active ──────────────▶ LowEnergy ──────────────▶ BackupSleep
//!    ▲                        │                          │
//!    └──────── wake ──────────┴────────── wake ──────────┘
//! ```
//!
//! Low energy keeps the display content and only wakes once a minute.
//! Backup sleep is deeper and is only entered when nothing would be lost
//! by it.

/// Power states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    #[default]
    Active,
    LowEnergy,
    BackupSleep,
}

/// Inputs to the power state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerEvent {
    /// Low-energy countdown expired
    Inactivity,
    /// Button edge, RTC alarm, tap or IR edge
    Wake,
    /// Every precondition for backup sleep holds
    BackupAllowed,
}

impl PowerState {
    /// Check if the display and CPU run at full rate
    pub fn is_active(&self) -> bool {
        matches!(self, PowerState::Active)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: PowerEvent) -> Self {
        use PowerEvent::*;
        use PowerState::*;

        match (self, event) {
            (Active, Inactivity) => LowEnergy,
            (LowEnergy, BackupAllowed) => BackupSleep,
            (LowEnergy | BackupSleep, Wake) => Active,
            _ => self,
        }
    }
}

/// Snapshot of everything that can veto backup sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SleepConditions {
    /// The face's last `loop` returned true
    pub face_can_sleep: bool,
    /// An alarm is armed
    pub alarm_armed: bool,
    /// An advisory asked to stay out of backup sleep this minute
    pub deep_sleep_override: bool,
    /// The buzzer is playing
    pub buzzer_active: bool,
    /// The LED is forced on
    pub led_forced: bool,
}

impl SleepConditions {
    /// Check if none of the conditions vetoes backup sleep
    pub fn permit_backup(&self) -> bool {
        self.face_can_sleep
            && !self.alarm_armed
            && !self.deep_sleep_override
            && !self.buzzer_active
            && !self.led_forced
    }
}

/// Tracks the power state and time spent in low energy
#[derive(Debug, Clone)]
pub struct PowerManager {
    state: PowerState,
    backup_after_minutes: u16,
    low_energy_minutes: u16,
}

impl Default for PowerManager {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PowerManager {
    /// Create a manager; `backup_after_minutes == 0` disables backup sleep
    pub fn new(backup_after_minutes: u16) -> Self {
        Self {
            state: PowerState::Active,
            backup_after_minutes,
            low_energy_minutes: 0,
        }
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    pub fn set_backup_after_minutes(&mut self, minutes: u16) {
        self.backup_after_minutes = minutes;
    }

    fn apply(&mut self, event: PowerEvent) -> bool {
        let next = self.state.transition(event);
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Enter low energy; returns true if the state changed
    pub fn enter_low_energy(&mut self) -> bool {
        let changed = self.apply(PowerEvent::Inactivity);
        if changed {
            self.low_energy_minutes = 0;
        }
        changed
    }

    /// Return to active; returns true if the state changed
    pub fn wake(&mut self) -> bool {
        self.apply(PowerEvent::Wake)
    }

    /// Count one minute spent in low energy
    pub fn minute_elapsed(&mut self) {
        if self.state == PowerState::LowEnergy {
            self.low_energy_minutes = self.low_energy_minutes.saturating_add(1);
        }
    }

    /// Enter backup sleep if it is due and nothing vetoes it
    pub fn evaluate(&mut self, conditions: &SleepConditions) -> bool {
        if self.backup_after_minutes == 0
            || self.state != PowerState::LowEnergy
            || self.low_energy_minutes < self.backup_after_minutes
            || !conditions.permit_backup()
        {
            return false;
        }
        self.apply(PowerEvent::BackupAllowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> SleepConditions {
        SleepConditions {
            face_can_sleep: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_transitions() {
        assert_eq!(
            PowerState::Active.transition(PowerEvent::Inactivity),
            PowerState::LowEnergy
        );
        assert_eq!(
            PowerState::Active.transition(PowerEvent::BackupAllowed),
            PowerState::Active
        );
        assert_eq!(
            PowerState::BackupSleep.transition(PowerEvent::Wake),
            PowerState::Active
        );
    }

    #[test]
    fn test_backup_sleep_after_minutes() {
        let mut pm = PowerManager::new(2);
        assert!(pm.enter_low_energy());
        pm.minute_elapsed();
        assert!(!pm.evaluate(&idle()));
        pm.minute_elapsed();
        assert!(pm.evaluate(&idle()));
        assert_eq!(pm.state(), PowerState::BackupSleep);
        assert!(pm.wake());
        assert!(pm.state().is_active());
    }

    #[test]
    fn test_backup_sleep_disabled() {
        let mut pm = PowerManager::new(0);
        pm.enter_low_energy();
        for _ in 0..100 {
            pm.minute_elapsed();
        }
        assert!(!pm.evaluate(&idle()));
    }

    #[test]
    fn test_each_condition_vetoes() {
        let vetoes = [
            SleepConditions {
                face_can_sleep: false,
                ..Default::default()
            },
            SleepConditions {
                alarm_armed: true,
                ..idle()
            },
            SleepConditions {
                deep_sleep_override: true,
                ..idle()
            },
            SleepConditions {
                buzzer_active: true,
                ..idle()
            },
            SleepConditions {
                led_forced: true,
                ..idle()
            },
        ];
        for conditions in vetoes {
            let mut pm = PowerManager::new(1);
            pm.enter_low_energy();
            pm.minute_elapsed();
            assert!(!pm.evaluate(&conditions));
        }
    }
}
