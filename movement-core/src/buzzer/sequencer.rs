//! 64 Hz note sequencer
//!
//! A sequence is a run of `(note, duration_ticks)` byte pairs terminated
//! by a zero. A negative note `-k` followed by a non-zero count `n` is a
//! repeat marker: the preceding `k` pairs are replayed `n` more times.
//!
//! ```text
//! [C8, 5, REST, 6, C8, 5, 0]          two chirps
//! [C8, 2, REST, 2, -1, 3, C8, 2, 0]   four chirps
//! ```
//!
//! The sequencer only computes what the piezo should do on each step. The
//! firmware calls [`Sequencer::tick`] at 64 Hz and applies
//! [`Sequencer::output`] to the PWM.

use heapless::Vec;

use super::notes::Note;

/// Sequencer step rate
pub const TICK_HZ: u32 = 64;

/// Longest sequence that can be played from a temporary buffer
pub const MAX_INLINE_SEQUENCE: usize = 24;

/// Milliseconds per sequencer tick, as used by [`Sequencer::play_note`]
const MS_PER_TICK: u16 = 15;

/// Buzzer loudness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Volume {
    Soft,
    #[default]
    Loud,
}

impl Volume {
    /// PWM duty cycle in percent
    pub fn duty_percent(self) -> u8 {
        match self {
            Volume::Soft => 5,
            Volume::Loud => 25,
        }
    }
}

/// How a playback ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackEnd {
    /// Reached the end of the sequence
    Finished,
    /// Replaced by another playback or stopped
    Aborted,
}

/// Completion callback, invoked exactly once per playback
pub type EndCallback = fn(PlaybackEnd);

/// One step produced by a raw source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawStep {
    /// PWM period in microseconds; 0 rests
    pub period_us: u16,
    /// Length in sequencer ticks; 0 ends playback
    pub duration_ticks: u16,
}

/// Generator of raw steps
///
/// `step` is called with the step index and the caller's `context`;
/// `None` ends playback.
#[derive(Debug, Clone, Copy)]
pub struct RawSource {
    pub step: fn(u16, u32) -> Option<RawStep>,
    pub context: u32,
}

impl RawSource {
    pub const fn new(step: fn(u16, u32) -> Option<RawStep>, context: u32) -> Self {
        Self { step, context }
    }

    fn next(&self, position: u16) -> Option<RawStep> {
        (self.step)(position, self.context)
    }
}

/// What the piezo should be doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerOutput {
    #[default]
    Silent,
    Tone { period_us: u16, duty_percent: u8 },
}

/// Activity hooks
///
/// `start` fires once when a playback begins and `stop` once when it ends.
/// The hooks run inside [`Sequencer`] calls and must not call back into
/// the sequencer; they are not re-entrant.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalHooks {
    pub start: Option<fn()>,
    pub stop: Option<fn()>,
}

#[derive(Debug, Clone)]
enum Source {
    Idle,
    Static(&'static [i8]),
    Inline(Vec<i8, MAX_INLINE_SEQUENCE>),
    Raw(RawSource),
}

impl Source {
    fn at(&self, index: u16) -> i8 {
        let index = usize::from(index);
        match self {
            Source::Static(seq) => seq.get(index).copied().unwrap_or(0),
            Source::Inline(seq) => seq.get(index).copied().unwrap_or(0),
            _ => 0,
        }
    }
}

/// Restart a finished playback for a while
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Looping {
    /// Ticks of looping left
    remaining: u32,
    /// Silent ticks between repetitions
    interval: u16,
    /// Silent ticks left before the next repetition
    gap: u16,
}

/// Single-voice note sequencer
#[derive(Debug, Clone)]
pub struct Sequencer {
    source: Source,
    position: u16,
    tone_ticks: u16,
    repeat_counter: i16,
    volume: Volume,
    on_end: Option<EndCallback>,
    output: BuzzerOutput,
    hooks: GlobalHooks,
    looping: Option<Looping>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    /// Create an idle sequencer
    pub const fn new() -> Self {
        Self {
            source: Source::Idle,
            position: 0,
            tone_ticks: 0,
            repeat_counter: -1,
            volume: Volume::Loud,
            on_end: None,
            output: BuzzerOutput::Silent,
            hooks: GlobalHooks {
                start: None,
                stop: None,
            },
            looping: None,
        }
    }

    /// Register the start/stop activity hooks
    pub fn set_global_hooks(&mut self, hooks: GlobalHooks) {
        self.hooks = hooks;
    }

    /// Check if a playback is in progress
    pub fn is_active(&self) -> bool {
        !matches!(self.source, Source::Idle)
    }

    /// What the piezo should be doing right now
    pub fn output(&self) -> BuzzerOutput {
        self.output
    }

    fn begin(&mut self, source: Source, volume: Volume, on_end: Option<EndCallback>) {
        self.abort();
        self.source = source;
        self.volume = volume;
        self.on_end = on_end;
        self.position = 0;
        self.tone_ticks = 0;
        self.repeat_counter = -1;
        self.output = BuzzerOutput::Silent;
        if let Some(start) = self.hooks.start {
            start();
        }
    }

    /// Play a static sequence
    pub fn play_sequence(
        &mut self,
        sequence: &'static [i8],
        volume: Volume,
        on_end: Option<EndCallback>,
    ) {
        self.begin(Source::Static(sequence), volume, on_end);
    }

    /// Play a sequence from a temporary buffer
    ///
    /// Sequences longer than [`MAX_INLINE_SEQUENCE`] are cut short.
    pub fn play_inline(&mut self, sequence: &[i8], volume: Volume, on_end: Option<EndCallback>) {
        let mut buf = Vec::new();
        for step in sequence.iter().take(MAX_INLINE_SEQUENCE - 1) {
            let _ = buf.push(*step);
        }
        let _ = buf.push(0);
        self.begin(Source::Inline(buf), volume, on_end);
    }

    /// Play a single note for roughly `duration_ms`
    pub fn play_note(&mut self, note: Note, duration_ms: u16, volume: Volume) {
        let ticks = (duration_ms / MS_PER_TICK).min(127) as i8;
        self.play_inline(&[note.code(), ticks], volume, None);
    }

    /// Play steps generated on the fly
    pub fn play_raw(&mut self, source: RawSource, volume: Volume, on_end: Option<EndCallback>) {
        self.begin(Source::Raw(source), volume, on_end);
    }

    /// Keep restarting the current playback for `duration_ticks`, pausing
    /// `interval_ticks` between repetitions
    pub fn loop_for(&mut self, duration_ticks: u32, interval_ticks: u16) {
        if self.is_active() {
            self.looping = Some(Looping {
                remaining: duration_ticks,
                interval: interval_ticks,
                gap: 0,
            });
        }
    }

    /// Stop the current playback, reporting it as aborted
    pub fn abort(&mut self) {
        self.looping = None;
        self.end(PlaybackEnd::Aborted);
    }

    fn end(&mut self, how: PlaybackEnd) {
        self.output = BuzzerOutput::Silent;
        if !self.is_active() {
            return;
        }
        self.source = Source::Idle;
        if let Some(stop) = self.hooks.stop {
            stop();
        }
        if let Some(callback) = self.on_end.take() {
            callback(how);
        }
    }

    fn sound(&mut self, period_us: Option<u16>) {
        self.output = match period_us {
            Some(period_us) if period_us > 0 => BuzzerOutput::Tone {
                period_us,
                duty_percent: self.volume.duty_percent(),
            },
            _ => BuzzerOutput::Silent,
        };
    }

    /// Advance by one 64 Hz step
    pub fn tick(&mut self) {
        if let Some(looping) = self.looping.as_mut() {
            looping.remaining = looping.remaining.saturating_sub(1);
            if looping.gap > 0 {
                looping.gap -= 1;
                if looping.gap == 0 {
                    self.position = 0;
                    self.tone_ticks = 0;
                    self.repeat_counter = -1;
                } else {
                    return;
                }
            }
        }

        if !self.is_active() {
            return;
        }
        if self.tone_ticks > 0 {
            self.tone_ticks -= 1;
            return;
        }

        match self.source {
            Source::Idle => {}
            Source::Raw(source) => match source.next(self.position) {
                Some(step) if step.duration_ticks > 0 => {
                    self.sound(Some(step.period_us));
                    self.tone_ticks = step.duration_ticks - 1;
                    self.position = self.position.wrapping_add(1);
                }
                _ => self.finish(),
            },
            Source::Static(_) | Source::Inline(_) => self.step_sequence(),
        }
    }

    fn step_sequence(&mut self) {
        let marker = self.source.at(self.position);
        let count = self.source.at(self.position + 1);
        if marker < 0 && count != 0 {
            if self.repeat_counter == -1 {
                self.repeat_counter = i16::from(count);
            } else {
                self.repeat_counter -= 1;
            }
            if self.repeat_counter > 0 {
                let back = u16::from(marker.unsigned_abs()) * 2;
                self.position = self.position.saturating_sub(back);
            } else {
                self.position += 2;
                self.repeat_counter = -1;
            }
        }

        let note = self.source.at(self.position);
        let duration = self.source.at(self.position + 1);
        if note != 0 && duration > 0 {
            self.sound(Note::from_code(note).period_us());
            self.tone_ticks = duration as u16 - 1;
            self.position += 2;
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        match self.looping {
            Some(mut looping) if looping.remaining > u32::from(looping.interval) => {
                self.output = BuzzerOutput::Silent;
                looping.gap = looping.interval.max(1);
                self.looping = Some(looping);
            }
            _ => {
                self.looping = None;
                self.end(PlaybackEnd::Finished);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    /// Collect the output for each of `ticks` steps
    fn run(seq: &mut Sequencer, ticks: usize) -> heapless::Vec<BuzzerOutput, 256> {
        let mut out = heapless::Vec::new();
        for _ in 0..ticks {
            seq.tick();
            let _ = out.push(seq.output());
        }
        out
    }

    fn tones(outputs: &[BuzzerOutput]) -> usize {
        outputs
            .windows(2)
            .filter(|w| w[0] == BuzzerOutput::Silent && w[1] != BuzzerOutput::Silent)
            .count()
            + usize::from(outputs.first().is_some_and(|o| *o != BuzzerOutput::Silent))
    }

    const C8: i8 = Note::C8.code();
    const REST: i8 = Note::Rest.code();

    static TWO_CHIRPS: [i8; 7] = [C8, 5, REST, 6, C8, 5, 0];
    static REPEATED: [i8; 7] = [C8, 1, REST, 1, -2, 2, 0];

    #[test]
    fn test_durations_in_ticks() {
        let mut seq = Sequencer::new();
        seq.play_sequence(&TWO_CHIRPS, Volume::Loud, None);
        let out = run(&mut seq, 20);
        assert!(out[..5].iter().all(|o| matches!(o, BuzzerOutput::Tone { duty_percent: 25, .. })));
        assert!(out[5..11].iter().all(|o| *o == BuzzerOutput::Silent));
        assert!(out[11..16].iter().all(|o| *o != BuzzerOutput::Silent));
        assert!(!seq.is_active());
    }

    #[test]
    fn test_repeat_marker() {
        let mut seq = Sequencer::new();
        seq.play_sequence(&REPEATED, Volume::Soft, None);
        let out = run(&mut seq, 20);
        // initial pass plus two replays
        assert_eq!(tones(&out), 3);
        assert!(!seq.is_active());
    }

    #[test]
    fn test_unknown_note_rests() {
        let mut seq = Sequencer::new();
        seq.play_inline(&[100, 3], Volume::Loud, None);
        seq.tick();
        assert!(seq.is_active());
        assert_eq!(seq.output(), BuzzerOutput::Silent);
    }

    #[test]
    fn test_zero_duration_ends() {
        let mut seq = Sequencer::new();
        seq.play_inline(&[C8, 0], Volume::Loud, None);
        seq.tick();
        assert!(!seq.is_active());
    }

    #[test]
    fn test_play_note_ticks() {
        let mut seq = Sequencer::new();
        seq.play_note(Note::C7, 50, Volume::Soft);
        let out = run(&mut seq, 5);
        assert_eq!(
            out[0],
            BuzzerOutput::Tone {
                period_us: 478,
                duty_percent: 5
            }
        );
        assert_eq!(out[2], out[0]);
        assert_eq!(out[3], BuzzerOutput::Silent);
    }

    static FINISHED: AtomicU32 = AtomicU32::new(0);
    static ABORTED: AtomicU32 = AtomicU32::new(0);

    fn count_end(how: PlaybackEnd) {
        match how {
            PlaybackEnd::Finished => FINISHED.fetch_add(1, Ordering::SeqCst),
            PlaybackEnd::Aborted => ABORTED.fetch_add(1, Ordering::SeqCst),
        };
    }

    #[test]
    fn test_new_playback_aborts_old_exactly_once() {
        let mut seq = Sequencer::new();
        seq.play_sequence(&TWO_CHIRPS, Volume::Loud, Some(count_end));
        seq.tick();
        seq.play_sequence(&TWO_CHIRPS, Volume::Loud, Some(count_end));
        assert_eq!(ABORTED.load(Ordering::SeqCst), 1);
        run(&mut seq, 40);
        assert_eq!(FINISHED.load(Ordering::SeqCst), 1);
        seq.abort();
        assert_eq!(ABORTED.load(Ordering::SeqCst), 1);
    }

    /// Three rising steps starting at `base` microseconds
    fn ramp(position: u16, base: u32) -> Option<RawStep> {
        (position < 3).then(|| RawStep {
            period_us: base as u16 + position * 100,
            duration_ticks: 2,
        })
    }

    #[test]
    fn test_raw_source() {
        let mut seq = Sequencer::new();
        seq.play_raw(RawSource::new(ramp, 1000), Volume::Loud, None);
        let out = run(&mut seq, 8);
        assert_eq!(
            out[0],
            BuzzerOutput::Tone {
                period_us: 1000,
                duty_percent: 25
            }
        );
        assert_eq!(
            out[4],
            BuzzerOutput::Tone {
                period_us: 1200,
                duty_percent: 25
            }
        );
        assert!(!seq.is_active());

        seq.play_raw(RawSource::new(ramp, 2000), Volume::Soft, None);
        let out = run(&mut seq, 3);
        assert!(matches!(out[2], BuzzerOutput::Tone { period_us: 2100, .. }));
    }

    static STARTS: AtomicU32 = AtomicU32::new(0);
    static STOPS: AtomicU32 = AtomicU32::new(0);

    fn on_start() {
        STARTS.fetch_add(1, Ordering::SeqCst);
    }

    fn on_stop() {
        STOPS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_global_hooks_pair_up() {
        let mut seq = Sequencer::new();
        seq.set_global_hooks(GlobalHooks {
            start: Some(on_start),
            stop: Some(on_stop),
        });
        seq.play_sequence(&TWO_CHIRPS, Volume::Loud, None);
        seq.play_sequence(&TWO_CHIRPS, Volume::Loud, None);
        run(&mut seq, 40);
        assert_eq!(STARTS.load(Ordering::SeqCst), 2);
        assert_eq!(STOPS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_loop_for_repeats_with_gap() {
        let mut seq = Sequencer::new();
        seq.play_inline(&[C8, 2], Volume::Loud, None);
        seq.loop_for(40, 8);
        let out = run(&mut seq, 60);
        assert!(tones(&out) >= 3);
        assert!(!seq.is_active());
    }
}
