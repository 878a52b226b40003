//! Shared runtime context handed to every face
//!
//! `Movement` bundles the display, the buzzer and the process-wide
//! services. Faces receive it by mutable reference in every lifecycle
//! call; requests that need the dispatcher (changing faces, entering low
//! energy) are recorded here and carried out by [`Runtime`] on its next
//! pass.
//!
//! [`Runtime`]: crate::runtime::Runtime

use crate::buzzer::{tunes, Note, Sequencer, TuneMode, Volume};
use crate::config::WatchConfig;
use crate::datetime::{DateTime, FIRST_BOOT_DATE};
use crate::display::{Display, LcdVariant};
use crate::event::{Event, EventKind};
use crate::persistence::{self, PersistError};
use crate::power::{PowerManager, PowerState};
use crate::registry::{next_index, MAX_FACES};
use crate::scheduler::TickScheduler;
use crate::services::location::LOCATION_FILE;
use crate::services::{
    AlarmGate, BackupRegisters, ClockMode, Location, PinService, Settings, TimezoneCache,
    UnitPreference,
};
use crate::traits::{Filesystem, RandomSource, ZoneTable};

/// LED duration setting that keeps the LED dark
const LED_DISABLED: u8 = crate::services::settings::LED_DISABLED;

/// Fast ticks per LED duration step
const LED_TICKS_PER_SECOND: u16 = 128;

/// Most alarm rounds a single request can ask for
pub const MAX_ALARM_ROUNDS: u8 = 20;

/// Backlight state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    #[default]
    Off,
    /// Lit for the given number of fast ticks
    Timed(u16),
    /// Lit until explicitly turned off
    Forced,
}

impl LedState {
    pub fn is_on(&self) -> bool {
        !matches!(self, LedState::Off)
    }
}

/// Pending alarm beeps, counted in fast ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AlarmBeeps {
    pub(crate) ticks: u16,
    pub(crate) note: Note,
}

/// Shared runtime context
pub struct Movement<'a> {
    /// Segment display frame buffer
    pub display: Display,
    /// Piezo sequencer
    pub buzzer: Sequencer,
    /// PIN lock
    pub pin: PinService,

    pub(crate) scheduler: TickScheduler,
    pub(crate) power: PowerManager,
    pub(crate) current_face: u8,
    pub(crate) serving_face: u8,
    pub(crate) face_count: u8,
    pub(crate) secondary: Option<u8>,
    pub(crate) pending_face: Option<u8>,
    pub(crate) scheduled: [Option<DateTime>; MAX_FACES],
    pub(crate) led: LedState,
    pub(crate) alarm_beeps: Option<AlarmBeeps>,
    pub(crate) wants_fast_tick: bool,
    pub(crate) wake_requested: bool,

    settings: Settings,
    settings_dirty: bool,
    location: Location,
    timezone: TimezoneCache,
    alarm: AlarmGate,
    backup: BackupRegisters,
    led_rgb: (u8, u8, u8),
    utc_now: DateTime,
    rtc_update: Option<DateTime>,

    fs: &'a mut dyn Filesystem,
    rng: &'a mut dyn RandomSource,
    zones: &'a dyn ZoneTable,
}

impl<'a> Movement<'a> {
    /// Create the context
    ///
    /// The stored location is read from `fs` right away.
    pub fn new(
        variant: LcdVariant,
        settings: Settings,
        fs: &'a mut dyn Filesystem,
        rng: &'a mut dyn RandomSource,
        zones: &'a dyn ZoneTable,
    ) -> Self {
        let location: Location = persistence::load(&*fs, LOCATION_FILE);
        let mut backup = BackupRegisters::new();
        backup.write(0, settings.reg());
        Self {
            display: Display::new(variant),
            buzzer: Sequencer::new(),
            pin: PinService::new(),
            scheduler: TickScheduler::new(settings.timeout_interval(), settings.low_energy_interval()),
            power: PowerManager::new(0),
            current_face: 0,
            serving_face: 0,
            face_count: 1,
            secondary: None,
            pending_face: None,
            scheduled: [None; MAX_FACES],
            led: LedState::Off,
            alarm_beeps: None,
            wants_fast_tick: false,
            wake_requested: false,
            settings,
            settings_dirty: false,
            location,
            timezone: TimezoneCache::new(),
            alarm: AlarmGate::default(),
            backup,
            led_rgb: (0, 0, 0),
            utc_now: FIRST_BOOT_DATE,
            rtc_update: None,
            fs,
            rng,
            zones,
        }
    }

    /// Apply a parsed `watch.toml`
    ///
    /// The configured location only fills in when none is stored.
    pub fn apply_config(&mut self, config: &WatchConfig) {
        self.set_settings(config.settings);
        self.settings_dirty = false;
        self.power.set_backup_after_minutes(config.power.backup_after_minutes);
        if let Some(location) = config.location {
            if !self.location.is_set() {
                self.location = location;
            }
        }
    }

    // --- Navigation -------------------------------------------------------

    /// Index of the face currently on screen
    pub fn current_face(&self) -> u8 {
        self.current_face
    }

    /// Index of the face whose method is running
    pub fn face_index(&self) -> u8 {
        self.serving_face
    }

    /// Number of registered faces
    pub fn face_count(&self) -> u8 {
        self.face_count
    }

    /// First face of the secondary set
    pub fn secondary_face(&self) -> Option<u8> {
        self.secondary
    }

    /// Switch to another face on the next dispatcher pass
    ///
    /// Protected faces are swapped for the PIN face while locked.
    pub fn move_to_face(&mut self, index: u8) {
        if index >= self.face_count {
            return;
        }
        self.pending_face = Some(self.pin.redirect(index));
    }

    /// Advance to the next face in the current set
    pub fn move_to_next_face(&mut self) {
        let next = next_index(self.current_face, self.face_count, self.secondary);
        self.move_to_face(next);
    }

    /// Check if a face change is waiting for the dispatcher
    pub fn face_change_pending(&self) -> bool {
        self.pending_face.is_some()
    }

    /// Behavior for events a face does not handle itself
    pub fn default_loop_handler(&mut self, event: Event) -> bool {
        match event.kind {
            EventKind::ModeButtonUp => self.move_to_next_face(),
            EventKind::LightButtonDown => self.illuminate_led(),
            EventKind::LightButtonUp => {
                if self.settings.led_duration() == 0 {
                    self.force_led_off();
                }
            }
            EventKind::ModeLongPress => match self.secondary {
                Some(secondary) if self.current_face == 0 => self.move_to_face(secondary),
                _ => self.move_to_face(0),
            },
            _ => {}
        }
        true
    }

    // --- Ticks and power --------------------------------------------------

    /// Ask for `hz` ticks per second; returns the rate in effect
    pub fn request_tick_frequency(&mut self, hz: u8) -> u8 {
        self.scheduler.request_frequency(hz)
    }

    pub fn tick_frequency(&self) -> u8 {
        self.scheduler.frequency()
    }

    /// Tick index within the current second
    pub fn subsecond(&self) -> u8 {
        self.scheduler.subsecond()
    }

    /// Enter low energy on the next pass
    pub fn request_sleep(&mut self) {
        self.scheduler.request_sleep();
    }

    /// Leave low energy and restart the inactivity countdowns
    pub fn request_wake(&mut self) {
        self.wake_requested = true;
        self.scheduler.reset_inactivity();
    }

    pub fn power_state(&self) -> PowerState {
        self.power.state()
    }

    pub fn is_low_energy(&self) -> bool {
        !self.power.state().is_active()
    }

    // --- Background tasks ------------------------------------------------

    /// Schedule `BACKGROUND_TASK` for the calling face at `utc`
    pub fn schedule_background_task(&mut self, utc: DateTime) {
        self.schedule_background_task_for_face(self.serving_face, utc);
    }

    /// Schedule `BACKGROUND_TASK` for `face` at `utc`
    ///
    /// Times that are not in the future are ignored.
    pub fn schedule_background_task_for_face(&mut self, face: u8, utc: DateTime) {
        if utc <= self.utc_now {
            return;
        }
        if let Some(slot) = self.scheduled.get_mut(usize::from(face)) {
            *slot = Some(utc);
        }
    }

    pub fn cancel_background_task(&mut self) {
        self.cancel_background_task_for_face(self.serving_face);
    }

    pub fn cancel_background_task_for_face(&mut self, face: u8) {
        if let Some(slot) = self.scheduled.get_mut(usize::from(face)) {
            *slot = None;
        }
    }

    /// Time of the task scheduled for `face`
    pub fn scheduled_task(&self, face: u8) -> Option<DateTime> {
        self.scheduled.get(usize::from(face)).copied().flatten()
    }

    // --- LED --------------------------------------------------------------

    /// Light the LED in the configured color for the configured time
    pub fn illuminate_led(&mut self) {
        let duration = self.settings.led_duration();
        if duration == LED_DISABLED {
            return;
        }
        self.led_rgb = self.settings.led_color().to_rgb8();
        let ticks = if duration == 0 {
            1
        } else {
            (u16::from(duration) * 2 - 1) * LED_TICKS_PER_SECOND
        };
        self.led = LedState::Timed(ticks);
        self.wants_fast_tick = true;
    }

    /// Keep the LED on in an arbitrary color until [`Self::force_led_off`]
    pub fn force_led_on(&mut self, red: u8, green: u8, blue: u8) {
        self.led_rgb = (red, green, blue);
        self.led = LedState::Forced;
    }

    pub fn force_led_off(&mut self) {
        self.led_rgb = (0, 0, 0);
        self.led = LedState::Off;
    }

    pub fn led(&self) -> LedState {
        self.led
    }

    /// Current LED drive levels
    pub fn led_rgb(&self) -> (u8, u8, u8) {
        if self.led.is_on() {
            self.led_rgb
        } else {
            (0, 0, 0)
        }
    }

    // --- Buzzer -----------------------------------------------------------

    /// Play the default chime
    pub fn play_signal(&mut self) {
        self.buzzer.play_sequence(&tunes::DEFAULT, Volume::Loud, None);
    }

    /// Play one of the built-in tunes for `mode`
    pub fn play_tune(&mut self, mode: TuneMode, index: usize) {
        self.buzzer.play_sequence(tunes::tune(index), Volume::Loud, None);
        let repeat = mode.repeat_ticks();
        if repeat > 0 {
            self.buzzer.loop_for(repeat, mode.interval_ticks());
        }
    }

    /// Short confirmation beep
    pub fn play_beep(&mut self) {
        self.buzzer.play_note(Note::C7, 50, Volume::Loud);
    }

    /// Five rounds of alarm beeps on C8
    pub fn play_alarm(&mut self) {
        self.play_alarm_beeps(5, Note::C8);
    }

    /// Beep `rounds` times (clamped to 1..=20), once per second
    ///
    /// Any button press silences the remaining rounds.
    pub fn play_alarm_beeps(&mut self, rounds: u8, note: Note) {
        let rounds = rounds.clamp(1, MAX_ALARM_ROUNDS);
        self.request_wake();
        self.alarm_beeps = Some(AlarmBeeps {
            ticks: 128 * u16::from(rounds) - 75,
            note,
        });
        self.wants_fast_tick = true;
    }

    /// Check if alarm beeps are still pending
    pub fn alarm_beeping(&self) -> bool {
        self.alarm_beeps.is_some()
    }

    // --- Settings ---------------------------------------------------------

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace all settings and re-arm the inactivity countdowns
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.settings_dirty = true;
        self.backup.write(0, settings.reg());
        self.scheduler
            .set_intervals(settings.timeout_interval(), settings.low_energy_interval());
        self.timezone.refresh(self.zones, &self.utc_now);
    }

    fn update_settings(&mut self, f: impl FnOnce(&mut Settings)) {
        let mut settings = self.settings;
        f(&mut settings);
        self.set_settings(settings);
    }

    /// Check and clear the "settings changed" flag
    pub fn take_settings_dirty(&mut self) -> bool {
        core::mem::take(&mut self.settings_dirty)
    }

    pub fn clock_mode(&self) -> ClockMode {
        self.settings.clock_mode()
    }

    pub fn set_clock_mode(&mut self, mode: ClockMode) {
        self.update_settings(|s| s.set_clock_mode(mode));
    }

    pub fn units(&self) -> UnitPreference {
        self.settings.units()
    }

    pub fn toggle_units(&mut self) {
        let units = self.settings.units().toggled();
        self.update_settings(|s| s.set_units(units));
    }

    pub fn button_sound(&self) -> bool {
        self.settings.button_sound()
    }

    // --- Services ---------------------------------------------------------

    pub fn alarm_enabled(&self) -> bool {
        self.alarm.is_enabled()
    }

    pub fn set_alarm_enabled(&mut self, enabled: bool) {
        self.alarm.set_enabled(enabled);
    }

    /// Claim a backup register (4..=7), or 0 when all are taken
    pub fn claim_backup_register(&mut self) -> u8 {
        self.backup.claim()
    }

    pub fn backup_register(&self, register: u8) -> u32 {
        self.backup.read(register)
    }

    pub fn set_backup_register(&mut self, register: u8, value: u32) {
        if register != 0 {
            self.backup.write(register, value);
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Store a new location
    pub fn set_location(&mut self, location: Location) -> Result<(), PersistError> {
        persistence::store(&mut *self.fs, LOCATION_FILE, &location)?;
        self.location = location;
        Ok(())
    }

    /// File store shared by all faces
    pub fn fs(&mut self) -> &mut dyn Filesystem {
        &mut *self.fs
    }

    /// Read-only view of the file store
    pub fn fs_ref(&self) -> &dyn Filesystem {
        &*self.fs
    }

    /// Entropy source
    pub fn rng(&mut self) -> &mut dyn RandomSource {
        &mut *self.rng
    }

    // --- Time -------------------------------------------------------------

    pub fn zones(&self) -> &dyn ZoneTable {
        self.zones
    }

    pub fn time_zone(&self) -> u8 {
        self.settings.time_zone()
    }

    pub fn set_time_zone(&mut self, zone: u8) {
        self.update_settings(|s| s.set_time_zone(zone));
    }

    /// Offset of the selected zone in seconds
    pub fn timezone_offset_seconds(&self) -> i32 {
        self.timezone.offset_seconds(self.settings.time_zone())
    }

    pub fn utc_date_time(&self) -> DateTime {
        self.utc_now
    }

    /// Wall-clock time in the selected zone
    pub fn local_date_time(&self) -> DateTime {
        self.utc_now
            .add_seconds(i64::from(self.timezone_offset_seconds()))
    }

    /// Wall-clock time in any zone of the table
    pub fn date_time_in_zone(&self, zone: u8) -> DateTime {
        self.utc_now
            .add_seconds(i64::from(self.timezone.offset_seconds(zone)))
    }

    /// Set the clock from a wall-clock time in the selected zone
    pub fn set_local_date_time(&mut self, local: DateTime) {
        let utc = local.add_seconds(-i64::from(self.timezone_offset_seconds()));
        self.set_utc_date_time(utc);
    }

    /// Set the clock in UTC
    pub fn set_utc_date_time(&mut self, utc: DateTime) {
        self.utc_now = utc;
        self.rtc_update = Some(utc);
        self.timezone.refresh(self.zones, &utc);
    }

    /// Clock write the RTC driver still has to perform
    pub fn take_rtc_update(&mut self) -> Option<DateTime> {
        self.rtc_update.take()
    }

    pub(crate) fn observe_time(&mut self, utc: DateTime) {
        self.utc_now = utc;
    }

    pub(crate) fn refresh_timezone_if_stale(&mut self) {
        self.timezone.refresh_if_stale(self.zones, &self.utc_now);
    }

    pub(crate) fn refresh_timezone(&mut self) {
        self.timezone.refresh(self.zones, &self.utc_now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::TestBench;
    use crate::services::settings::LedColor;

    #[test]
    fn test_default_handler_navigation() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        m.face_count = 4;
        m.default_loop_handler(EventKind::ModeButtonUp.into());
        assert_eq!(m.pending_face, Some(1));

        m.current_face = 3;
        m.default_loop_handler(EventKind::ModeButtonUp.into());
        assert_eq!(m.pending_face, Some(0));

        m.secondary = Some(2);
        m.current_face = 0;
        m.default_loop_handler(EventKind::ModeLongPress.into());
        assert_eq!(m.pending_face, Some(2));
        m.current_face = 1;
        m.default_loop_handler(EventKind::ModeLongPress.into());
        assert_eq!(m.pending_face, Some(0));
    }

    #[test]
    fn test_move_to_face_out_of_range_ignored() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        m.face_count = 2;
        m.move_to_face(5);
        assert!(!m.face_change_pending());
    }

    #[test]
    fn test_illuminate_led_durations() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        let mut s = *m.settings();
        s.set_led_color(LedColor {
            red: 0xF,
            green: 0x1,
            blue: 0,
        });
        s.set_led_duration(0);
        m.set_settings(s);
        m.illuminate_led();
        assert_eq!(m.led(), LedState::Timed(1));
        assert_eq!(m.led_rgb(), (0xFF, 0x11, 0));

        s.set_led_duration(3);
        m.set_settings(s);
        m.illuminate_led();
        assert_eq!(m.led(), LedState::Timed(5 * 128));

        m.force_led_off();
        s.set_led_duration(LED_DISABLED);
        m.set_settings(s);
        m.illuminate_led();
        assert_eq!(m.led(), LedState::Off);
    }

    #[test]
    fn test_light_up_turns_off_brief_flash() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        let mut s = *m.settings();
        s.set_led_duration(0);
        m.set_settings(s);
        m.default_loop_handler(EventKind::LightButtonDown.into());
        assert!(m.led().is_on());
        m.default_loop_handler(EventKind::LightButtonUp.into());
        assert_eq!(m.led(), LedState::Off);
    }

    #[test]
    fn test_forced_led() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        m.force_led_on(1, 2, 3);
        assert_eq!(m.led(), LedState::Forced);
        assert_eq!(m.led_rgb(), (1, 2, 3));
        m.force_led_off();
        assert_eq!(m.led_rgb(), (0, 0, 0));
    }

    #[test]
    fn test_alarm_beeps_clamped() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        m.play_alarm_beeps(0, Note::C8);
        assert_eq!(m.alarm_beeps.map(|b| b.ticks), Some(128 - 75));
        m.play_alarm_beeps(200, Note::A4);
        assert_eq!(m.alarm_beeps.map(|b| b.ticks), Some(128 * 20 - 75));
        assert!(m.wake_requested);
    }

    #[test]
    fn test_schedule_requires_future() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        let now = DateTime::new(2024, 5, 1, 12, 0, 0);
        m.observe_time(now);
        m.schedule_background_task_for_face(1, now);
        assert_eq!(m.scheduled_task(1), None);
        let later = DateTime::new(2024, 5, 1, 12, 5, 0);
        m.schedule_background_task_for_face(1, later);
        assert_eq!(m.scheduled_task(1), Some(later));
        m.cancel_background_task_for_face(1);
        assert_eq!(m.scheduled_task(1), None);
    }

    #[test]
    fn test_local_time_round_trip() {
        let mut bench = TestBench::with_zones(&crate::mock::TEST_ZONES);
        let mut m = bench.movement();
        m.set_time_zone(1);
        let local = DateTime::new(2024, 7, 4, 9, 30, 0);
        m.set_local_date_time(local);
        assert_eq!(m.local_date_time(), local);
        assert_eq!(m.take_rtc_update(), Some(DateTime::new(2024, 7, 4, 4, 0, 0)));
        assert_eq!(m.take_rtc_update(), None);
    }

    #[test]
    fn test_location_persisted() {
        let mut bench = TestBench::new();
        {
            let mut m = bench.movement();
            assert!(!m.location().is_set());
            m.set_location(Location::new(4071, -7401)).unwrap();
        }
        let m = bench.movement();
        assert_eq!(m.location(), Location::new(4071, -7401));
    }

    #[test]
    fn test_backup_register_zero_reserved() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        let reg0 = m.backup_register(0);
        m.set_backup_register(0, 42);
        assert_eq!(m.backup_register(0), reg0);
        let r = m.claim_backup_register();
        m.set_backup_register(r, 42);
        assert_eq!(m.backup_register(r), 42);
    }
}
