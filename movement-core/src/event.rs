//! Events delivered to the active face

/// One of the three physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Light,
    Mode,
    Alarm,
}

impl Button {
    /// All buttons, in their index order
    pub const ALL: [Button; 3] = [Button::Light, Button::Mode, Button::Alarm];

    /// Index of this button in [`Button::ALL`]
    pub fn index(self) -> usize {
        match self {
            Button::Light => 0,
            Button::Mode => 1,
            Button::Alarm => 2,
        }
    }
}

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// No-op, used by host and emulator builds
    None,
    /// The face just became active
    Activate,
    /// Periodic tick at the requested frequency
    Tick,
    /// Once-a-minute refresh while in low-energy mode
    LowEnergyUpdate,
    /// Background work the face asked for
    BackgroundTask,
    /// No button activity for the inactivity window
    Timeout,

    // Light button
    LightButtonDown,
    LightButtonUp,
    LightLongPress,
    LightLongUp,

    // Mode button
    ModeButtonDown,
    ModeButtonUp,
    ModeLongPress,
    ModeLongUp,

    // Alarm button
    AlarmButtonDown,
    AlarmButtonUp,
    AlarmLongPress,
    AlarmLongUp,

    // Accelerometer
    SingleTap,
    DoubleTap,
}

impl EventKind {
    /// Press edge for `button`
    pub fn down(button: Button) -> Self {
        match button {
            Button::Light => EventKind::LightButtonDown,
            Button::Mode => EventKind::ModeButtonDown,
            Button::Alarm => EventKind::AlarmButtonDown,
        }
    }

    /// Short release for `button`
    pub fn up(button: Button) -> Self {
        match button {
            Button::Light => EventKind::LightButtonUp,
            Button::Mode => EventKind::ModeButtonUp,
            Button::Alarm => EventKind::AlarmButtonUp,
        }
    }

    /// Long-press threshold reached for `button`
    pub fn long_press(button: Button) -> Self {
        match button {
            Button::Light => EventKind::LightLongPress,
            Button::Mode => EventKind::ModeLongPress,
            Button::Alarm => EventKind::AlarmLongPress,
        }
    }

    /// Release after a long press for `button`
    pub fn long_up(button: Button) -> Self {
        match button {
            Button::Light => EventKind::LightLongUp,
            Button::Mode => EventKind::ModeLongUp,
            Button::Alarm => EventKind::AlarmLongUp,
        }
    }

    /// The button this event belongs to, if any
    pub fn button(&self) -> Option<Button> {
        match self {
            EventKind::LightButtonDown
            | EventKind::LightButtonUp
            | EventKind::LightLongPress
            | EventKind::LightLongUp => Some(Button::Light),
            EventKind::ModeButtonDown
            | EventKind::ModeButtonUp
            | EventKind::ModeLongPress
            | EventKind::ModeLongUp => Some(Button::Mode),
            EventKind::AlarmButtonDown
            | EventKind::AlarmButtonUp
            | EventKind::AlarmLongPress
            | EventKind::AlarmLongUp => Some(Button::Alarm),
            _ => None,
        }
    }

    /// Check if this event comes from a button
    pub fn is_button_event(&self) -> bool {
        self.button().is_some()
    }

    /// Check if this event is a press edge
    pub fn is_button_down(&self) -> bool {
        matches!(
            self,
            EventKind::LightButtonDown | EventKind::ModeButtonDown | EventKind::AlarmButtonDown
        )
    }

    /// Check if this event ends a press (short or long)
    pub fn is_release(&self) -> bool {
        matches!(
            self,
            EventKind::LightButtonUp
                | EventKind::ModeButtonUp
                | EventKind::AlarmButtonUp
                | EventKind::LightLongUp
                | EventKind::ModeLongUp
                | EventKind::AlarmLongUp
        )
    }

    /// Check if this event comes from the tick scheduler
    pub fn is_scheduler_event(&self) -> bool {
        matches!(
            self,
            EventKind::Tick | EventKind::LowEnergyUpdate | EventKind::Timeout
        )
    }

    /// Check if this event comes from the accelerometer
    pub fn is_tap(&self) -> bool {
        matches!(self, EventKind::SingleTap | EventKind::DoubleTap)
    }
}

/// An event record as delivered to a face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event {
    pub kind: EventKind,
    /// Sub-second tick counter when the event was synthesized
    pub subsecond: u8,
}

impl Event {
    /// Create an event
    pub const fn new(kind: EventKind, subsecond: u8) -> Self {
        Self { kind, subsecond }
    }
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Self::new(kind, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_constructors_round_trip() {
        for button in Button::ALL {
            assert_eq!(EventKind::down(button).button(), Some(button));
            assert_eq!(EventKind::up(button).button(), Some(button));
            assert_eq!(EventKind::long_press(button).button(), Some(button));
            assert_eq!(EventKind::long_up(button).button(), Some(button));
        }
        assert_eq!(EventKind::Tick.button(), None);
        assert_eq!(EventKind::None.button(), None);
    }

    #[test]
    fn test_button_events() {
        assert!(EventKind::ModeButtonUp.is_button_event());
        assert!(EventKind::AlarmButtonDown.is_button_down());
        assert!(EventKind::LightLongUp.is_release());
        assert!(!EventKind::LightLongPress.is_release());
        assert!(!EventKind::Tick.is_button_event());
    }

    #[test]
    fn test_scheduler_events() {
        assert!(EventKind::Tick.is_scheduler_event());
        assert!(EventKind::Timeout.is_scheduler_event());
        assert!(!EventKind::Activate.is_scheduler_event());
    }

    #[test]
    fn test_tap_events() {
        assert!(EventKind::DoubleTap.is_tap());
        assert!(!EventKind::AlarmButtonUp.is_tap());
    }
}
