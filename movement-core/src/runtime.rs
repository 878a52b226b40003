//! Face dispatcher
//!
//! The runtime turns hardware inputs (RTC ticks, the 128 Hz fast tick,
//! button edges, accelerometer taps) into face events and drives the
//! power state machine. The firmware owns the interrupts and calls in:
//!
//! ```text
//! rtc_tick ─┐
//! fast_tick ┼──▶ event queue ──▶ run() ──▶ active face
//! button ───┘                      │
//!                                  └──▶ background tasks, sleep decision
//! ```
//!
//! Every call into a face goes through [`FaceRegistry`], so lifecycle
//! ordering holds regardless of what faces request.

use heapless::Deque;

use crate::buttons::{ButtonSynthesizer, FAST_TICK_LIMIT};
use crate::buzzer::{BuzzerOutput, Note, Volume};
use crate::datetime::{DateTime, FIRST_BOOT_DATE};
use crate::event::{Button, Event, EventKind};
use crate::movement::{AlarmBeeps, LedState, Movement};
use crate::power::{PowerState, SleepConditions};
use crate::registry::{FaceRegistry, RegistryError};

/// Events waiting for delivery
pub const QUEUE_DEPTH: usize = 8;

/// Face changes handled in one pass before the rest is left for the next
const MAX_FACE_CHANGES_PER_PASS: usize = 4;

/// Fast-tick phase at which an alarm round starts
const ALARM_PHASE: u16 = 127;

/// Length of the button sound in milliseconds
const BUTTON_SOUND_MS: u16 = 50;

/// Top-level dispatcher
pub struct Runtime<'a> {
    registry: FaceRegistry<'a>,
    movement: Movement<'a>,
    buttons: ButtonSynthesizer,
    queue: Deque<Event, QUEUE_DEPTH>,
    fast_tick: bool,
    last_time: DateTime,
    minute_pending: bool,
    /// Faces that already got `BACKGROUND_TASK` this minute
    served: u16,
    sleep_override: bool,
    can_sleep: bool,
}

impl<'a> Runtime<'a> {
    /// Take ownership of the registry and the shared context
    pub fn new(registry: FaceRegistry<'a>, mut movement: Movement<'a>) -> Result<Self, RegistryError> {
        if registry.is_empty() {
            return Err(RegistryError::Empty);
        }
        movement.face_count = registry.len() as u8;
        movement.secondary = registry.secondary();
        Ok(Self {
            registry,
            movement,
            buttons: ButtonSynthesizer::new(),
            queue: Deque::new(),
            fast_tick: false,
            last_time: FIRST_BOOT_DATE,
            minute_pending: false,
            served: 0,
            sleep_override: false,
            can_sleep: true,
        })
    }

    /// Set up every face and activate face 0
    ///
    /// `now` is the RTC reading; an unset clock is initialized to
    /// [`FIRST_BOOT_DATE`].
    pub fn boot(&mut self, now: DateTime) {
        if now.is_unset() || !now.is_valid() {
            self.movement.set_utc_date_time(FIRST_BOOT_DATE);
        } else {
            self.movement.observe_time(now);
            self.movement.refresh_timezone();
        }
        self.last_time = self.movement.utc_date_time();
        self.movement.request_tick_frequency(1);
        self.registry.setup_all(&mut self.movement);
        let current = self.movement.current_face;
        self.registry.activate(current, &mut self.movement);
        self.push(EventKind::Activate);
    }

    pub fn movement(&self) -> &Movement<'a> {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut Movement<'a> {
        &mut self.movement
    }

    pub fn registry(&self) -> &FaceRegistry<'a> {
        &self.registry
    }

    /// Ticks per second the RTC should deliver
    pub fn tick_frequency(&self) -> u8 {
        self.movement.tick_frequency()
    }

    pub fn power_state(&self) -> PowerState {
        self.movement.power_state()
    }

    /// Check if the 128 Hz fast tick should be running
    pub fn fast_tick_enabled(&self) -> bool {
        self.fast_tick
    }

    /// Clock write the RTC driver still has to perform
    pub fn take_rtc_update(&mut self) -> Option<DateTime> {
        self.movement.take_rtc_update()
    }

    pub fn led_rgb(&self) -> (u8, u8, u8) {
        self.movement.led_rgb()
    }

    pub fn buzzer_output(&self) -> BuzzerOutput {
        self.movement.buzzer.output()
    }

    /// Advance the buzzer sequencer by one 64 Hz step
    pub fn buzzer_tick(&mut self) {
        self.movement.buzzer.tick();
    }

    /// Check if [`Self::run`] has work to do
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
            || self.movement.pending_face.is_some()
            || self.movement.wake_requested
            || self.minute_pending
            || self.movement.scheduler.low_energy().is_due()
    }

    /// Result of the last [`Self::run`]
    pub fn can_sleep(&self) -> bool {
        self.can_sleep
    }

    fn push(&mut self, kind: EventKind) {
        let event = Event::new(kind, self.movement.subsecond());
        // A full queue drops the newest event
        let _ = self.queue.push_back(event);
    }

    fn start_fast_tick(&mut self) {
        if !self.fast_tick {
            self.buttons.restart_clock();
        }
        self.fast_tick = true;
    }

    /// Return to active mode, replaying `ACTIVATE` to the current face
    pub fn wake(&mut self) {
        self.movement.wake_requested = false;
        self.movement.scheduler.reset_inactivity();
        if self.movement.power.wake() {
            self.movement.display.stop_sleep_animation();
            self.push(EventKind::Activate);
        }
    }

    /// Feed a debounced button edge
    pub fn button_edge(&mut self, button: Button, pressed: bool) {
        self.movement.scheduler.reset_inactivity();
        self.movement.alarm_beeps = None;
        if pressed {
            self.start_fast_tick();
        }
        let Some(kind) = self.buttons.edge(button, pressed) else {
            return;
        };
        if !pressed && self.movement.led == LedState::Timed(1) {
            self.movement.led = LedState::Timed(0);
        }
        if !self.movement.power.state().is_active() {
            self.wake();
        }
        self.push(kind);
    }

    /// Deliver a non-button input such as an accelerometer tap
    pub fn post(&mut self, kind: EventKind) {
        if !self.movement.power.state().is_active() {
            self.wake();
        }
        self.push(kind);
    }

    /// One 128 Hz fast tick
    pub fn fast_tick(&mut self) {
        if !self.fast_tick {
            return;
        }
        for kind in self.buttons.tick() {
            self.push(kind);
        }

        if let LedState::Timed(n) = self.movement.led {
            self.movement.led = LedState::Timed(n.saturating_sub(1));
        }

        if let Some(beeps) = self.movement.alarm_beeps {
            if (beeps.ticks + 80) % 128 == ALARM_PHASE {
                self.play_alarm_round(beeps.note);
            }
            self.movement.alarm_beeps = beeps
                .ticks
                .checked_sub(1)
                .map(|ticks| AlarmBeeps { ticks, ..beeps });
        }

        let needed = matches!(self.movement.led, LedState::Timed(n) if n > 0)
            || self.movement.alarm_beeps.is_some()
            || self.buttons.any_held();
        if !needed || self.buttons.fast_ticks() >= FAST_TICK_LIMIT {
            self.fast_tick = false;
        }
    }

    fn play_alarm_round(&mut self, note: Note) {
        let n = note.code();
        let rest = Note::Rest.code();
        let round = [n, 3, rest, 3, n, 3, rest, 3, n, 3, rest, 3, n, 5];
        self.movement.buzzer.play_inline(&round, Volume::Loud, None);
    }

    /// One RTC tick at the current tick frequency (or once a minute in
    /// low energy)
    pub fn rtc_tick(&mut self, now: DateTime) {
        self.movement.observe_time(now);
        self.movement.scheduler.on_tick(&now);
        let new_minute = !self.last_time.same_minute(&now);
        self.last_time = now;
        if new_minute {
            self.minute_pending = true;
            self.served = 0;
            self.sleep_override = false;
        }
        if self.movement.power.state().is_active() {
            self.push(EventKind::Tick);
        } else if new_minute {
            self.push(EventKind::LowEnergyUpdate);
        }
    }

    /// Process everything pending; returns true when the CPU may sleep
    pub fn run(&mut self) -> bool {
        if core::mem::take(&mut self.movement.wants_fast_tick) {
            self.start_fast_tick();
        }
        if self.movement.wake_requested {
            self.wake();
        }
        if self.movement.power.state().is_active() && self.movement.scheduler.take_low_energy() {
            self.enter_low_energy();
        }

        let mut can_sleep = true;
        for _ in 0..MAX_FACE_CHANGES_PER_PASS {
            self.apply_face_change();
            while let Some(event) = self.queue.pop_front() {
                can_sleep &= self.dispatch(event);
                if self.movement.pending_face.is_some() {
                    break;
                }
            }
            if self.movement.pending_face.is_none() {
                break;
            }
        }
        self.update_led();

        if self.movement.current_face != 0 && self.movement.scheduler.take_timeout() {
            let event = Event::new(EventKind::Timeout, self.movement.subsecond());
            can_sleep &= self.dispatch(event);
        }

        if core::mem::take(&mut self.minute_pending) {
            self.minute_pass();
        }

        let conditions = SleepConditions {
            face_can_sleep: can_sleep,
            alarm_armed: self.movement.alarm_enabled(),
            deep_sleep_override: self.sleep_override,
            buzzer_active: self.movement.buzzer.is_active(),
            led_forced: self.movement.led == LedState::Forced,
        };
        if self.movement.power.evaluate(&conditions) {
            self.movement.display.clear();
        }

        if core::mem::take(&mut self.movement.wants_fast_tick) {
            self.start_fast_tick();
        }
        self.can_sleep = can_sleep
            && !self.movement.led.is_on()
            && self.movement.pending_face.is_none()
            && self.queue.is_empty();
        self.can_sleep
    }

    fn enter_low_energy(&mut self) {
        if !self.movement.power.enter_low_energy() {
            return;
        }
        self.movement.force_led_off();
        self.movement.alarm_beeps = None;
        self.fast_tick = false;
        self.push(EventKind::LowEnergyUpdate);
    }

    fn apply_face_change(&mut self) {
        let Some(target) = self.movement.pending_face.take() else {
            return;
        };
        if self.movement.button_sound() {
            let note = if target == 0 { Note::C8 } else { Note::C7 };
            let volume = self.movement.settings().button_volume();
            self.movement.buzzer.play_note(note, BUTTON_SOUND_MS, volume);
        }
        let old = self.movement.current_face;
        self.registry.resign(old, &mut self.movement);
        self.movement.display.clear();
        self.movement.display.stop_blink();
        self.movement.display.stop_sleep_animation();
        self.movement.request_tick_frequency(1);
        self.movement.current_face = target;
        self.movement.serving_face = target;
        self.registry.activate(target, &mut self.movement);
        let event = Event::new(EventKind::Activate, self.movement.subsecond());
        if self.queue.push_front(event).is_err() {
            // Make room: the incoming face must see ACTIVATE first
            self.queue.pop_back();
            let _ = self.queue.push_front(event);
        }
    }

    fn update_led(&mut self) {
        if self.movement.led == LedState::Timed(0) && !self.buttons.is_held(Button::Light) {
            self.movement.force_led_off();
        }
    }

    fn dispatch(&mut self, event: Event) -> bool {
        if matches!(event.kind, EventKind::Tick | EventKind::LowEnergyUpdate) {
            self.run_scheduled_tasks();
        }
        if event.kind.is_button_down() && matches!(self.movement.led, LedState::Timed(_)) {
            self.movement.illuminate_led();
        }
        let current = self.movement.current_face;
        self.registry.deliver(current, event, &mut self.movement)
    }

    fn serve(&mut self, face: u8) -> bool {
        let bit = 1u16 << face;
        if self.served & bit != 0 {
            return false;
        }
        self.served |= bit;
        let event = Event::new(EventKind::BackgroundTask, self.movement.subsecond());
        self.registry.deliver(face, event, &mut self.movement);
        true
    }

    fn run_scheduled_tasks(&mut self) {
        let now = self.movement.utc_date_time();
        let mut remaining = false;
        for face in 0..self.movement.face_count {
            match self.movement.scheduled_task(face) {
                Some(at) if at <= now => {
                    // Already served this minute: leave it for the next one
                    if self.served & (1u16 << face) == 0 {
                        self.movement.cancel_background_task_for_face(face);
                        self.serve(face);
                    } else {
                        remaining = true;
                    }
                }
                Some(_) => remaining = true,
                None => {}
            }
        }
        if remaining {
            self.movement.scheduler.reset_inactivity();
        }
    }

    fn minute_pass(&mut self) {
        self.movement.refresh_timezone_if_stale();
        self.movement.power.minute_elapsed();
        self.movement.pin.minute_elapsed();

        let mut sleep_override = false;
        for face in 0..self.movement.face_count {
            let advisory = self.registry.advise(face, &self.movement);
            sleep_override |= advisory.deep_sleep_override;
            if advisory.wants_background_task {
                self.serve(face);
            }
        }
        self.sleep_override = sleep_override;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::FaceState;
    use crate::mock::{Call, RecordingFace, TestBench};
    use crate::Advisory;
    use proptest::prelude::*;

    const T0: DateTime = DateTime::new(2024, 6, 1, 12, 0, 0);

    fn bench_run(
        bench: &mut TestBench,
        faces: &mut [RecordingFace],
        secondary: Option<u8>,
        f: impl FnOnce(&mut Runtime<'_>),
    ) {
        let mut registry = FaceRegistry::new();
        for face in faces.iter_mut() {
            registry.register(face).unwrap();
        }
        registry.set_secondary(secondary).unwrap();
        let mut rt = Runtime::new(registry, bench.movement()).unwrap();
        rt.boot(T0);
        rt.run();
        f(&mut rt);
    }

    fn press(rt: &mut Runtime<'_>, button: Button) {
        rt.button_edge(button, true);
        rt.run();
        rt.button_edge(button, false);
        rt.run();
    }

    fn seconds(rt: &mut Runtime<'_>, from: DateTime, count: i64) -> DateTime {
        let mut now = from;
        for _ in 0..count {
            now = now.add_seconds(1);
            rt.rtc_tick(now);
            rt.run();
        }
        now
    }

    fn faces<const N: usize>() -> [RecordingFace; N] {
        core::array::from_fn(|_| RecordingFace::new())
    }

    #[test]
    fn test_empty_registry_rejected() {
        let mut bench = TestBench::new();
        let registry = FaceRegistry::new();
        assert_eq!(
            Runtime::new(registry, bench.movement()).err(),
            Some(RegistryError::Empty)
        );
    }

    #[test]
    fn test_boot_sets_up_all_then_activates_first() {
        let mut bench = TestBench::new();
        let mut faces = faces::<3>();
        bench_run(&mut bench, &mut faces, None, |rt| {
            assert_eq!(rt.registry().active(), Some(0));
            assert_eq!(rt.registry().state(2), Some(FaceState::Dormant));
            assert_eq!(rt.movement().utc_date_time(), T0);
        });
        assert_eq!(
            faces[0].calls(),
            &[Call::Setup(0), Call::Activate, Call::Event(EventKind::Activate)]
        );
        assert_eq!(faces[1].calls(), &[Call::Setup(1)]);
        assert_eq!(faces[2].calls(), &[Call::Setup(2)]);
    }

    #[test]
    fn test_unset_clock_gets_first_boot_date() {
        let mut bench = TestBench::new();
        let mut face = RecordingFace::new();
        let mut registry = FaceRegistry::new();
        registry.register(&mut face).unwrap();
        let mut rt = Runtime::new(registry, bench.movement()).unwrap();
        rt.boot(DateTime::default());
        assert_eq!(rt.movement().utc_date_time(), FIRST_BOOT_DATE);
        assert_eq!(rt.take_rtc_update(), Some(FIRST_BOOT_DATE));
    }

    #[test]
    fn test_mode_press_moves_to_next_face() {
        let mut bench = TestBench::new();
        let mut faces = faces::<2>();
        bench_run(&mut bench, &mut faces, None, |rt| {
            press(rt, Button::Mode);
            assert_eq!(rt.movement().current_face(), 1);
            assert_eq!(rt.registry().active(), Some(1));
            press(rt, Button::Mode);
            assert_eq!(rt.movement().current_face(), 0);
        });
        assert_eq!(
            faces[1].calls(),
            &[
                Call::Setup(1),
                Call::Activate,
                Call::Event(EventKind::Activate),
                Call::Event(EventKind::ModeButtonDown),
                Call::Event(EventKind::ModeButtonUp),
                Call::Resign,
            ]
        );
        // Exactly one face active at each point: resign came before activate
        let calls = faces[0].calls();
        assert_eq!(calls.iter().filter(|c| **c == Call::Activate).count(), 2);
        assert_eq!(calls.iter().filter(|c| **c == Call::Resign).count(), 1);
    }

    #[test]
    fn test_long_press_goes_to_secondary_and_back() {
        let mut bench = TestBench::new();
        let mut faces = faces::<4>();
        bench_run(&mut bench, &mut faces, Some(2), |rt| {
            rt.button_edge(Button::Mode, true);
            for _ in 0..70 {
                rt.fast_tick();
            }
            rt.run();
            rt.button_edge(Button::Mode, false);
            rt.run();
            assert_eq!(rt.movement().current_face(), 2);

            rt.button_edge(Button::Mode, true);
            for _ in 0..70 {
                rt.fast_tick();
            }
            rt.run();
            assert_eq!(rt.movement().current_face(), 0);
        });
        assert_eq!(faces[2].count(EventKind::ModeLongUp), 1);
        assert_eq!(faces[0].count(EventKind::ModeLongPress), 1);
    }

    #[test]
    fn test_timeout_never_sent_to_first_face() {
        let mut bench = TestBench::new();
        let mut faces = faces::<2>();
        bench_run(&mut bench, &mut faces, None, |rt| {
            let now = seconds(rt, T0, 40);
            press(rt, Button::Mode);
            seconds(rt, now, 40);
        });
        assert_eq!(faces[0].count(EventKind::Timeout), 0);
        assert_eq!(faces[1].count(EventKind::Timeout), 1);
    }

    #[test]
    fn test_low_energy_entry_and_wake() {
        let mut bench = TestBench::new();
        let mut faces = faces::<2>();
        bench_run(&mut bench, &mut faces, None, |rt| {
            rt.movement_mut().request_sleep();
            rt.run();
            assert_eq!(rt.power_state(), PowerState::LowEnergy);

            // Sub-minute ticks produce nothing in low energy
            rt.rtc_tick(T0.add_seconds(30));
            rt.run();
            rt.rtc_tick(T0.add_seconds(60));
            rt.run();

            rt.button_edge(Button::Alarm, true);
            rt.run();
            assert_eq!(rt.power_state(), PowerState::Active);
        });
        let events = faces[0].events();
        assert_eq!(
            &events[1..],
            &[
                EventKind::LowEnergyUpdate,
                EventKind::LowEnergyUpdate,
                EventKind::Activate,
                EventKind::AlarmButtonDown,
            ]
        );
    }

    #[test]
    fn test_backup_sleep_vetoed_by_alarm() {
        for alarm in [false, true] {
            let mut bench = TestBench::new();
            let mut faces = faces::<1>();
            bench_run(&mut bench, &mut faces, None, |rt| {
                rt.movement_mut().power.set_backup_after_minutes(1);
                rt.movement_mut().set_alarm_enabled(alarm);
                rt.movement_mut().request_sleep();
                rt.run();
                rt.rtc_tick(T0.add_seconds(60));
                rt.run();
                let expected = if alarm {
                    PowerState::LowEnergy
                } else {
                    PowerState::BackupSleep
                };
                assert_eq!(rt.power_state(), expected);
            });
        }
    }

    #[test]
    fn test_pin_redirects_protected_face() {
        let mut bench = TestBench::new();
        let mut faces = faces::<3>();
        bench_run(&mut bench, &mut faces, None, |rt| {
            let m = rt.movement_mut();
            m.pin.enable(2);
            m.pin.protect(1);
            press(rt, Button::Mode);
            assert_eq!(rt.movement().current_face(), 2);
            assert_eq!(rt.movement().pin.requesting_face(), Some(1));
        });
        assert!(!faces[1].calls().contains(&Call::Activate));
    }

    #[test]
    fn test_light_button_lights_then_expires() {
        let mut bench = TestBench::new();
        let mut faces = faces::<1>();
        bench_run(&mut bench, &mut faces, None, |rt| {
            press(rt, Button::Light);
            assert!(rt.movement().led().is_on());
            assert_ne!(rt.led_rgb(), (0, 0, 0));
            assert!(rt.fast_tick_enabled());
            // Default duration is 1 s
            for _ in 0..128 {
                rt.fast_tick();
            }
            rt.run();
            assert!(!rt.movement().led().is_on());
            assert!(!rt.fast_tick_enabled());
        });
    }

    #[test]
    fn test_alarm_beeps_stop_on_button() {
        let mut bench = TestBench::new();
        let mut faces = faces::<1>();
        bench_run(&mut bench, &mut faces, None, |rt| {
            rt.movement_mut().play_alarm_beeps(3, Note::C8);
            rt.run();
            assert!(rt.fast_tick_enabled());
            for _ in 0..10 {
                rt.fast_tick();
            }
            assert!(rt.movement().buzzer.is_active());
            rt.button_edge(Button::Alarm, true);
            assert!(!rt.movement().alarm_beeping());
        });
    }

    #[test]
    fn test_alarm_beep_rounds() {
        let mut bench = TestBench::new();
        let mut faces = faces::<1>();
        bench_run(&mut bench, &mut faces, None, |rt| {
            rt.movement_mut().play_alarm_beeps(2, Note::C8);
            rt.run();
            let mut starts = 0;
            let mut was_active = false;
            for _ in 0..400 {
                rt.fast_tick();
                let active = rt.movement().buzzer.is_active();
                if active && !was_active {
                    starts += 1;
                }
                was_active = active;
                rt.buzzer_tick();
                rt.buzzer_tick();
            }
            assert_eq!(starts, 2);
            assert!(!rt.movement().alarm_beeping());
        });
    }

    #[test]
    fn test_scheduled_task_fires_once() {
        let mut bench = TestBench::new();
        let mut faces = faces::<2>();
        bench_run(&mut bench, &mut faces, None, |rt| {
            rt.movement_mut()
                .schedule_background_task_for_face(1, T0.add_seconds(90));
            seconds(rt, T0, 200);
            assert_eq!(rt.movement().scheduled_task(1), None);
        });
        assert_eq!(faces[1].count(EventKind::BackgroundTask), 1);
        assert_eq!(faces[0].count(EventKind::BackgroundTask), 0);
    }

    #[test]
    fn test_advisory_deep_sleep_override() {
        let mut bench = TestBench::new();
        let mut faces = faces::<1>();
        faces[0].advisory = Advisory {
            wants_background_task: false,
            deep_sleep_override: true,
        };
        bench_run(&mut bench, &mut faces, None, |rt| {
            rt.movement_mut().power.set_backup_after_minutes(1);
            rt.movement_mut().request_sleep();
            rt.run();
            rt.rtc_tick(T0.add_seconds(60));
            rt.run();
            assert_eq!(rt.power_state(), PowerState::LowEnergy);
        });
    }

    proptest! {
        #[test]
        fn test_background_task_at_most_once_per_minute(
            steps in proptest::collection::vec(1i64..40, 1..60),
            schedule_at in 1i64..600,
        ) {
            let mut bench = TestBench::new();
            let mut faces = faces::<3>();
            faces[1].advisory = Advisory::background_task();
            let mut minutes = 1usize;
            bench_run(&mut bench, &mut faces, None, |rt| {
                rt.movement_mut()
                    .schedule_background_task_for_face(1, T0.add_seconds(schedule_at));
                let mut now = T0;
                for step in &steps {
                    let next = now.add_seconds(*step);
                    if !next.same_minute(&now) {
                        minutes += 1;
                    }
                    now = next;
                    rt.rtc_tick(now);
                    rt.run();
                }
            });
            prop_assert!(faces[1].count(EventKind::BackgroundTask) <= minutes);
            prop_assert_eq!(faces[2].count(EventKind::BackgroundTask), 0);
        }
    }
}
