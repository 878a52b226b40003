//! Face registry and lifecycle dispatch
//!
//! The registry owns the ordered list of faces and the lifecycle state of
//! each. All calls into a face go through here so the lifecycle rules hold
//! no matter what the runtime asks for: `setup` at most once per face, at
//! most one face active, and `resign` of the outgoing face before
//! `activate` of the incoming one.

use heapless::Vec;

use crate::event::Event;
use crate::face::{Advisory, FaceState, LifecycleEvent, WatchFace};
use crate::movement::Movement;

/// Maximum number of faces in one build
pub const MAX_FACES: usize = 16;

/// Registry construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// No room for another face
    Full,
    /// The runtime needs at least one face
    Empty,
    /// The secondary set must start after face 0 and inside the registry
    InvalidSecondary,
}

/// Face after `current` in a registry of `count` faces
pub fn next_index(current: u8, count: u8, secondary: Option<u8>) -> u8 {
    let limit = match secondary {
        Some(start) if current < start => u16::from(start),
        _ => u16::from(count.max(1)),
    };
    ((u16::from(current) + 1) % limit) as u8
}

/// Ordered list of faces and their lifecycle states
pub struct FaceRegistry<'a> {
    faces: Vec<&'a mut dyn WatchFace, MAX_FACES>,
    states: [FaceState; MAX_FACES],
    secondary: Option<u8>,
}

impl<'a> Default for FaceRegistry<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FaceRegistry<'a> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            faces: Vec::new(),
            states: [FaceState::Uninit; MAX_FACES],
            secondary: None,
        }
    }

    /// Append a face, returning its index
    pub fn register(&mut self, face: &'a mut dyn WatchFace) -> Result<u8, RegistryError> {
        let index = self.faces.len() as u8;
        self.faces.push(face).map_err(|_| RegistryError::Full)?;
        Ok(index)
    }

    /// Mark `index` as the first face of the secondary set
    pub fn set_secondary(&mut self, index: Option<u8>) -> Result<(), RegistryError> {
        if let Some(i) = index {
            if i == 0 || usize::from(i) >= self.faces.len() {
                return Err(RegistryError::InvalidSecondary);
            }
        }
        self.secondary = index;
        Ok(())
    }

    /// First face of the secondary set
    pub fn secondary(&self) -> Option<u8> {
        self.secondary
    }

    /// Number of registered faces
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Check if no face is registered
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Lifecycle state of a face
    pub fn state(&self, index: u8) -> Option<FaceState> {
        if usize::from(index) < self.faces.len() {
            Some(self.states[usize::from(index)])
        } else {
            None
        }
    }

    /// Index of the active face
    pub fn active(&self) -> Option<u8> {
        self.states[..self.faces.len()]
            .iter()
            .position(FaceState::is_active)
            .map(|i| i as u8)
    }

    /// Log name of a face
    pub fn name(&self, index: u8) -> &'static str {
        self.faces
            .get(usize::from(index))
            .map(|face| face.name())
            .unwrap_or("?")
    }

    /// Face that follows `current` when the user presses MODE
    ///
    /// With a secondary set, faces before it cycle among themselves and
    /// the secondary set wraps back to face 0.
    pub fn next_face(&self, current: u8) -> u8 {
        next_index(current, self.faces.len() as u8, self.secondary)
    }

    fn advance(&mut self, index: u8, event: LifecycleEvent) -> bool {
        let slot = &mut self.states[usize::from(index)];
        let next = slot.transition(event);
        let changed = next != *slot;
        *slot = next;
        changed
    }

    /// Run `setup` on every face that has not been set up, in order
    pub fn setup_all(&mut self, movement: &mut Movement<'_>) {
        for index in 0..self.faces.len() as u8 {
            if self.advance(index, LifecycleEvent::Setup) {
                movement.serving_face = index;
                self.faces[usize::from(index)].setup(index, movement);
            }
        }
        movement.serving_face = movement.current_face;
    }

    /// Make `index` the active face, resigning whichever face was active
    pub fn activate(&mut self, index: u8, movement: &mut Movement<'_>) -> bool {
        if usize::from(index) >= self.faces.len() {
            return false;
        }
        if let Some(active) = self.active() {
            if active == index {
                return true;
            }
            self.resign(active, movement);
        }
        if !self.advance(index, LifecycleEvent::Activate) {
            return false;
        }
        movement.serving_face = index;
        self.faces[usize::from(index)].activate(movement);
        movement.serving_face = movement.current_face;
        true
    }

    /// Resign `index` if it is active
    pub fn resign(&mut self, index: u8, movement: &mut Movement<'_>) {
        if usize::from(index) >= self.faces.len() {
            return;
        }
        if self.advance(index, LifecycleEvent::Resign) {
            movement.serving_face = index;
            self.faces[usize::from(index)].resign(movement);
            movement.serving_face = movement.current_face;
        }
    }

    /// Deliver an event to a face
    ///
    /// A face that never completed `setup` is skipped and reported as
    /// ready to sleep.
    pub fn deliver(&mut self, index: u8, event: Event, movement: &mut Movement<'_>) -> bool {
        let Some(face) = self.faces.get_mut(usize::from(index)) else {
            return true;
        };
        if !self.states[usize::from(index)].is_initialized() {
            return true;
        }
        movement.serving_face = index;
        let can_sleep = face.handle(event, movement);
        movement.serving_face = movement.current_face;
        can_sleep
    }

    /// Ask one face for its per-minute advisory
    pub fn advise(&self, index: u8, movement: &Movement<'_>) -> Advisory {
        match self.faces.get(usize::from(index)) {
            Some(face) if self.states[usize::from(index)].is_initialized() => face.advise(movement),
            _ => Advisory::NONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, RecordingFace, TestBench};

    #[test]
    fn test_register_limits() {
        let mut faces: [RecordingFace; MAX_FACES + 1] = core::array::from_fn(|_| RecordingFace::new());
        let mut registry = FaceRegistry::new();
        let (last, rest) = faces.split_last_mut().unwrap();
        for (i, face) in rest.iter_mut().enumerate() {
            assert_eq!(registry.register(face), Ok(i as u8));
        }
        assert_eq!(registry.register(last), Err(RegistryError::Full));
    }

    #[test]
    fn test_secondary_validation() {
        let mut a = RecordingFace::new();
        let mut b = RecordingFace::new();
        let mut registry = FaceRegistry::new();
        registry.register(&mut a).unwrap();
        registry.register(&mut b).unwrap();
        assert_eq!(registry.set_secondary(Some(0)), Err(RegistryError::InvalidSecondary));
        assert_eq!(registry.set_secondary(Some(2)), Err(RegistryError::InvalidSecondary));
        assert_eq!(registry.set_secondary(Some(1)), Ok(()));
    }

    #[test]
    fn test_next_face_wraps_within_set() {
        let mut faces: [RecordingFace; 5] = core::array::from_fn(|_| RecordingFace::new());
        let mut registry = FaceRegistry::new();
        for face in faces.iter_mut() {
            registry.register(face).unwrap();
        }
        assert_eq!(registry.next_face(4), 0);
        registry.set_secondary(Some(3)).unwrap();
        assert_eq!(registry.next_face(0), 1);
        assert_eq!(registry.next_face(2), 0);
        assert_eq!(registry.next_face(3), 4);
        assert_eq!(registry.next_face(4), 0);
    }

    #[test]
    fn test_single_face_wraps_to_itself() {
        let mut face = RecordingFace::new();
        let mut registry = FaceRegistry::new();
        registry.register(&mut face).unwrap();
        assert_eq!(registry.next_face(0), 0);
    }

    #[test]
    fn test_activate_resigns_previous() {
        let mut bench = TestBench::new();
        let mut a = RecordingFace::new();
        let mut b = RecordingFace::new();
        {
            let mut movement = bench.movement();
            let mut registry = FaceRegistry::new();
            registry.register(&mut a).unwrap();
            registry.register(&mut b).unwrap();
            registry.setup_all(&mut movement);
            assert!(registry.activate(0, &mut movement));
            assert!(registry.activate(1, &mut movement));
            assert_eq!(registry.active(), Some(1));
            assert_eq!(registry.state(0), Some(FaceState::Dormant));
        }
        assert_eq!(a.calls(), &[Call::Setup(0), Call::Activate, Call::Resign]);
        assert_eq!(b.calls(), &[Call::Setup(1), Call::Activate]);
    }

    #[test]
    fn test_setup_runs_once() {
        let mut bench = TestBench::new();
        let mut a = RecordingFace::new();
        {
            let mut movement = bench.movement();
            let mut registry = FaceRegistry::new();
            registry.register(&mut a).unwrap();
            registry.setup_all(&mut movement);
            registry.setup_all(&mut movement);
        }
        assert_eq!(a.calls(), &[Call::Setup(0)]);
    }

    #[test]
    fn test_uninitialized_face_is_skipped() {
        let mut bench = TestBench::new();
        let mut a = RecordingFace::new();
        {
            let mut movement = bench.movement();
            let mut registry = FaceRegistry::new();
            registry.register(&mut a).unwrap();
            assert!(!registry.activate(0, &mut movement));
            assert!(registry.deliver(0, Event::from(crate::EventKind::Tick), &mut movement));
            assert_eq!(registry.advise(0, &movement), Advisory::NONE);
        }
        assert!(a.calls().is_empty());
    }
}
