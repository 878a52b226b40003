//! Per-face lifecycle state machine
//!
//! ```text
//!          setup              activate             resign
//! Uninit ─────────▶ Dormant ───────────▶ Active ──────────▶ Dormant
//! ```
//!
//! Transitions not shown leave the state unchanged; the registry uses
//! that to ignore duplicate `setup` calls and `resign` of dormant faces.

/// Lifecycle state of one face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaceState {
    /// `setup` has not run
    #[default]
    Uninit,
    /// Set up, not visible
    Dormant,
    /// Receiving events
    Active,
}

/// Lifecycle calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleEvent {
    Setup,
    Activate,
    Resign,
}

impl FaceState {
    /// Check if the face has been set up
    pub fn is_initialized(&self) -> bool {
        !matches!(self, FaceState::Uninit)
    }

    /// Check if the face is the visible one
    pub fn is_active(&self) -> bool {
        matches!(self, FaceState::Active)
    }

    /// Check if `event` is accepted in this state
    pub fn accepts(self, event: LifecycleEvent) -> bool {
        self.transition(event) != self
    }

    /// Process a lifecycle call and return the next state
    pub fn transition(self, event: LifecycleEvent) -> Self {
        use FaceState::*;
        use LifecycleEvent::*;

        match (self, event) {
            (Uninit, Setup) => Dormant,
            (Dormant, Activate) => Active,
            (Active, Resign) => Dormant,
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = FaceState::Uninit
            .transition(LifecycleEvent::Setup)
            .transition(LifecycleEvent::Activate);
        assert_eq!(state, FaceState::Active);
        assert_eq!(state.transition(LifecycleEvent::Resign), FaceState::Dormant);
    }

    #[test]
    fn test_setup_only_once() {
        let state = FaceState::Dormant;
        assert!(!state.accepts(LifecycleEvent::Setup));
        assert!(!FaceState::Active.accepts(LifecycleEvent::Setup));
    }

    #[test]
    fn test_cannot_activate_before_setup() {
        assert_eq!(
            FaceState::Uninit.transition(LifecycleEvent::Activate),
            FaceState::Uninit
        );
    }

    #[test]
    fn test_resign_requires_active() {
        assert!(!FaceState::Dormant.accepts(LifecycleEvent::Resign));
        assert!(FaceState::Active.accepts(LifecycleEvent::Resign));
    }
}
