//! Test doubles for host tests
//!
//! Enabled for this crate's own tests and, through the `mock` feature,
//! for crates that implement faces.

use heapless::Vec;

use crate::display::LcdVariant;
use crate::event::{Event, EventKind};
use crate::face::{Advisory, WatchFace};
use crate::movement::Movement;
use crate::persistence::CachedFs;
use crate::services::Settings;
use crate::traits::{FixedZones, Filesystem, FsError, LcdProbe, ProbeSample, RandomSource, ZoneTable};

/// Zones used by tests: UTC, a half-hour offset and a negative offset
pub const TEST_ZONES: FixedZones =
    FixedZones::new(&[("UTC", 0), ("IST", 330), ("EST", -300), ("CET", 60)]);

/// In-memory file store that counts writes
#[derive(Debug, Default)]
pub struct MemFs {
    inner: CachedFs,
    writes: u32,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl Filesystem for MemFs {
    fn exists(&self, name: &str) -> bool {
        self.inner.exists(name)
    }

    fn read(&self, name: &str, buffer: &mut [u8]) -> Result<usize, FsError> {
        self.inner.read(name, buffer)
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), FsError> {
        self.inner.write(name, data)?;
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), FsError> {
        self.inner.remove(name)
    }

    fn size(&self, name: &str) -> Option<usize> {
        self.inner.size(name)
    }

    fn free_space(&self) -> usize {
        self.inner.free_space()
    }
}

/// Random source that replays a fixed list of values
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    values: Vec<u32, 16>,
    next: usize,
}

impl ScriptedRng {
    /// Cycle through `values`; an empty list always yields 0
    pub fn new(values: &[u32]) -> Self {
        let mut script = Vec::new();
        for &v in values.iter().take(16) {
            let _ = script.push(v);
        }
        Self {
            values: script,
            next: 0,
        }
    }
}

impl RandomSource for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

/// LCD probe that answers with a valid frame for the first `valid` samples
#[derive(Debug, Clone, Default)]
pub struct ScriptedProbe {
    valid: u32,
    taken: u32,
    pub began: bool,
    pub ended: bool,
}

impl ScriptedProbe {
    pub fn new(valid: u32) -> Self {
        Self {
            valid,
            ..Self::default()
        }
    }

    /// Samples taken so far
    pub fn taken(&self) -> u32 {
        self.taken
    }
}

impl LcdProbe for ScriptedProbe {
    fn begin(&mut self) {
        self.began = true;
    }

    fn sample(&mut self) -> ProbeSample {
        self.taken += 1;
        if self.taken <= self.valid {
            ProbeSample {
                driven: 0xF000,
                quiet: 0x0100,
            }
        } else {
            ProbeSample::default()
        }
    }

    fn end(&mut self) {
        self.ended = true;
    }
}

/// Lifecycle call seen by a [`RecordingFace`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Setup(u8),
    Activate,
    Resign,
    Event(EventKind),
}

/// Hook run by a [`RecordingFace`] for every event it handles
pub type FaceAction = fn(&Event, &mut Movement<'_>);

/// Face that records every call it receives
pub struct RecordingFace {
    calls: Vec<Call, 64>,
    /// Value returned from `handle`
    pub can_sleep: bool,
    /// Value returned from `advise`
    pub advisory: Advisory,
    /// Fall through to the default handler for unhandled events
    pub use_default: bool,
    /// Extra behavior on every event
    pub action: Option<FaceAction>,
}

impl Default for RecordingFace {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingFace {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            can_sleep: true,
            advisory: Advisory::NONE,
            use_default: true,
            action: None,
        }
    }

    /// Every call so far, oldest first
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Events only, oldest first
    pub fn events(&self) -> Vec<EventKind, 64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Event(kind) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    /// Number of times `kind` was delivered
    pub fn count(&self, kind: EventKind) -> usize {
        self.calls.iter().filter(|c| **c == Call::Event(kind)).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: Call) {
        // Oldest entries go first when the log is full
        if self.calls.is_full() {
            self.calls.remove(0);
        }
        let _ = self.calls.push(call);
    }
}

impl WatchFace for RecordingFace {
    fn setup(&mut self, face_index: u8, _movement: &mut Movement<'_>) {
        self.record(Call::Setup(face_index));
    }

    fn activate(&mut self, _movement: &mut Movement<'_>) {
        self.record(Call::Activate);
    }

    fn handle(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        self.record(Call::Event(event.kind));
        if let Some(action) = self.action {
            action(&event, movement);
        }
        if self.use_default {
            movement.default_loop_handler(event);
        }
        self.can_sleep
    }

    fn resign(&mut self, _movement: &mut Movement<'_>) {
        self.record(Call::Resign);
    }

    fn advise(&self, _movement: &Movement<'_>) -> Advisory {
        self.advisory
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Owns the collaborators a [`Movement`] borrows
pub struct TestBench {
    pub fs: MemFs,
    pub rng: ScriptedRng,
    pub settings: Settings,
    pub variant: LcdVariant,
    zones: &'static dyn ZoneTable,
}

impl Default for TestBench {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBench {
    /// Bench with UTC only
    pub fn new() -> Self {
        Self::with_zones(&crate::traits::zone::UTC_ONLY)
    }

    pub fn with_zones(zones: &'static dyn ZoneTable) -> Self {
        Self {
            fs: MemFs::new(),
            rng: ScriptedRng::new(&[7, 1, 4, 2, 8, 5, 7]),
            settings: Settings::default(),
            variant: LcdVariant::Classic,
            zones,
        }
    }

    /// Fresh context over this bench's file store
    pub fn movement(&mut self) -> Movement<'_> {
        Movement::new(self.variant, self.settings, &mut self.fs, &mut self.rng, self.zones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_rng_cycles() {
        let mut rng = ScriptedRng::new(&[3, 9]);
        assert_eq!(rng.next_u32(), 3);
        assert_eq!(rng.next_u32(), 9);
        assert_eq!(rng.next_u32(), 3);
        assert_eq!(ScriptedRng::new(&[]).next_u32(), 0);
    }

    #[test]
    fn test_scripted_probe_drives_detection() {
        use crate::display::detect::PROBE_FRAMES;
        use crate::display::{detect_lcd_variant, Detection};
        let mut probe = ScriptedProbe::new(u32::MAX);
        assert_eq!(detect_lcd_variant(&mut probe), Detection::Custom);
        assert!(probe.began && probe.ended);
        assert_eq!(probe.taken(), PROBE_FRAMES);
    }

    #[test]
    fn test_mem_fs_counts_writes() {
        let mut fs = MemFs::new();
        fs.write("a", &[1, 2]).unwrap();
        fs.write("a", &[3]).unwrap();
        assert_eq!(fs.writes(), 2);
        let mut buf = [0u8; 4];
        assert_eq!(fs.read("a", &mut buf), Ok(1));
        assert_eq!(buf[0], 3);
    }
}
