//! Countdown to up to four deadlines
//!
//! Running mode shows the time left until the selected deadline:
//! `YYMMYR`, `MMDDMO`, `DDHHdY` or `HHMMSS` depending on how far away it
//! is, `OVER` for a day after it passes. ALARM selects the next deadline,
//! hold LIGHT to toggle its alarm (Bell), hold ALARM to edit it.
//!
//! Settings mode pages through year, month, day, hour and minute. LIGHT
//! moves to the next page, ALARM increments (hold to run), hold LIGHT to
//! reset the deadline to the start of tomorrow, MODE returns.

use movement_core::buzzer::Note;
use movement_core::datetime::{days_in_month, DateTime};
use movement_core::display::{Indicator, Position};
use movement_core::{Advisory, Event, EventKind, Movement, WatchFace};

use crate::format;

/// Number of deadline slots
pub const DEADLINE_COUNT: usize = 4;

const SETTINGS_TITLES: [&str; 5] = ["Year ", "Month", "Day  ", "Hour ", "Minut"];
const SETTINGS_FALLBACK_TITLES: [&str; 5] = ["YR", "MO", "DA", "HR", "M1"];

const SETTINGS_HZ: u8 = 4;
const QUICK_CYCLE_HZ: u8 = 8;

/// Years reachable from the current one in settings mode
const YEAR_SPAN: u16 = 10;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Beep {
    Button,
    Enable,
    Disable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Running,
    Settings,
}

/// Deadline face
#[derive(Debug, Clone)]
pub struct DeadlineFace {
    /// Local wall-clock seconds per slot, 0 when unset
    deadlines: [i64; DEADLINE_COUNT],
    current: usize,
    alarm_enabled: bool,
    mode: Mode,
    page: usize,
    quick_cycle: bool,
    face_index: u8,
}

impl Default for DeadlineFace {
    fn default() -> Self {
        Self::new()
    }
}

fn beep(movement: &mut Movement<'_>, kind: Beep) {
    if !movement.button_sound() {
        return;
    }
    let volume = movement.settings().button_volume();
    let sequence: &[i8] = match kind {
        Beep::Button => &[Note::C7.code(), 4],
        Beep::Enable => &[Note::G7.code(), 4, Note::Rest.code(), 6, Note::C8.code(), 6],
        Beep::Disable => &[Note::C8.code(), 4, Note::Rest.code(), 6, Note::G7.code(), 6],
    };
    movement.buzzer.play_inline(sequence, volume, None);
}

/// Time left from `now` to `deadline`, as `[years, months, days, hours, minutes, seconds]`
///
/// `deadline` must not be earlier than `now`.
pub fn time_remaining(deadline: &DateTime, now: &DateTime) -> [i16; 6] {
    let mut units = [
        deadline.year as i16 - now.year as i16,
        i16::from(deadline.month) - i16::from(now.month),
        i16::from(deadline.day) - i16::from(now.day),
        i16::from(deadline.hour) - i16::from(now.hour),
        i16::from(deadline.minute) - i16::from(now.minute),
        i16::from(deadline.second) - i16::from(now.second),
    ];
    for (i, range) in [(5, 60), (4, 60), (3, 24)] {
        if units[i] < 0 {
            units[i] += range;
            units[i - 1] -= 1;
        }
    }
    // Borrow whole months, walking back from the deadline's month
    let (mut month, mut year) = (deadline.month, deadline.year);
    while units[2] < 0 {
        (month, year) = if month == 1 { (12, year - 1) } else { (month - 1, year) };
        units[2] += i16::from(days_in_month(month, year));
        units[1] -= 1;
    }
    if units[1] < 0 {
        units[1] += 12;
        units[0] -= 1;
    }
    units
}

fn format_remaining(units: &[i16; 6]) -> heapless::String<8> {
    let [years, months, days, hours, minutes, seconds] = *units;
    if years > 0 {
        format(format_args!("{:02}{:02}YR", years % 100, months % 12))
    } else if months > 0 {
        format(format_args!("{:02}{:02}MO", months % 100, days % 32))
    } else if days > 0 {
        format(format_args!("{:02}{:02}dY", days % 32, hours % 24))
    } else {
        format(format_args!("{:02}{:02}{:02}", hours % 24, minutes % 60, seconds % 60))
    }
}

impl DeadlineFace {
    pub fn new() -> Self {
        Self {
            deadlines: [0; DEADLINE_COUNT],
            current: 0,
            alarm_enabled: false,
            mode: Mode::Running,
            page: 0,
            quick_cycle: false,
            face_index: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn alarm_enabled(&self) -> bool {
        self.alarm_enabled
    }

    /// Local date-time of a deadline slot, `None` when unset
    pub fn deadline(&self, index: usize) -> Option<DateTime> {
        match self.deadlines.get(index) {
            Some(0) | None => None,
            Some(ts) => Some(DateTime::from_unix(*ts, 0)),
        }
    }

    /// Set a deadline slot to a local date-time
    pub fn set_deadline(&mut self, index: usize, local: DateTime) {
        if let Some(slot) = self.deadlines.get_mut(index) {
            *slot = local.to_unix(0);
        }
    }

    fn now_ts(movement: &Movement<'_>) -> i64 {
        movement.local_date_time().to_unix(0)
    }

    /// Slot of the nearest deadline that has not passed yet (0 if none)
    fn closest(&self, now_ts: i64) -> usize {
        let mut min_ts = i64::MAX;
        let mut min_index = 0;
        for (i, ts) in self.deadlines.iter().enumerate() {
            if *ts < now_ts || *ts > min_ts {
                continue;
            }
            min_ts = *ts;
            min_index = i;
        }
        min_index
    }

    fn reset_deadline(&mut self, movement: &Movement<'_>) {
        let mut today = movement.local_date_time();
        today.hour = 0;
        today.minute = 0;
        today.second = 0;
        self.deadlines[self.current] = today.to_unix(0) + SECONDS_PER_DAY;
    }

    fn increment(&mut self, movement: &Movement<'_>) {
        let mut date = DateTime::from_unix(self.deadlines[self.current], 0);
        match self.page {
            0 => {
                let first = movement.local_date_time().year;
                date.year = if date.year < first || date.year + 1 >= first + YEAR_SPAN {
                    first
                } else {
                    date.year + 1
                };
            }
            1 => date.month = date.month % 12 + 1,
            2 => {
                date.day += 1;
                if date.day > days_in_month(date.month, date.year) {
                    date.day = 1;
                }
            }
            3 => date.hour = (date.hour + 1) % 24,
            _ => date.minute = (date.minute + 1) % 60,
        }
        date.day = date.day.min(days_in_month(date.month, date.year));
        self.deadlines[self.current] = date.to_unix(0);
    }

    fn enter_running(&mut self, movement: &mut Movement<'_>) {
        self.mode = Mode::Running;
        self.quick_cycle = false;
        let display = &mut movement.display;
        display.clear_indicator(Indicator::H24);
        display.clear_indicator(Indicator::Pm);
        display.set_indicator(Indicator::Colon);
        movement.request_tick_frequency(1);
    }

    fn enter_settings(&mut self, movement: &mut Movement<'_>) {
        self.mode = Mode::Settings;
        self.page = 0;
        if self.deadlines[self.current] == 0 {
            self.reset_deadline(movement);
        }
        movement.request_tick_frequency(SETTINGS_HZ);
    }

    fn background_alarm(&self, movement: &mut Movement<'_>) {
        movement.play_alarm();
        movement.move_to_face(self.face_index);
    }

    fn draw_running(&self, movement: &mut Movement<'_>) {
        let now = movement.local_date_time();
        let now_ts = now.to_unix(0);
        let deadline_ts = self.deadlines[self.current];
        let display = &mut movement.display;

        display.text_with_fallback(Position::TopLeft, "DUE", "DL");
        display.text(Position::TopRight, &format::<2>(format_args!("{:2}", self.current + 1)));
        display.indicate(Indicator::Bell, self.alarm_enabled);

        if deadline_ts < now_ts {
            let text = if deadline_ts + SECONDS_PER_DAY > now_ts { "OVER  " } else { "----  " };
            display.text(Position::Bottom, text);
            return;
        }
        let deadline = DateTime::from_unix(deadline_ts, 0);
        let units = time_remaining(&deadline, &now);
        display.text(Position::Bottom, &format_remaining(&units));
    }

    fn draw_settings(&self, movement: &mut Movement<'_>, subsecond: u8) {
        let date = DateTime::from_unix(self.deadlines[self.current], 0);
        let mode = movement.clock_mode();
        let display = &mut movement.display;
        display.text_with_fallback(Position::Top, SETTINGS_TITLES[self.page], SETTINGS_FALLBACK_TITLES[self.page]);

        let mut text: [u8; 6] = if self.page > 2 {
            display.set_indicator(Indicator::Colon);
            display.indicate(Indicator::H24, mode.is_24h());
            display.indicate(Indicator::Pm, !mode.is_24h() && date.is_pm());
            let hour = if mode.is_24h() { date.hour } else { date.hour_12() };
            bytes(format::<6>(format_args!("{:2}{:02}  ", hour, date.minute)))
        } else {
            display.clear_indicator(Indicator::Colon);
            display.clear_indicator(Indicator::H24);
            display.clear_indicator(Indicator::Pm);
            bytes(format::<6>(format_args!("{:2}{:02}{:02}", date.year % 100, date.month, date.day)))
        };

        if subsecond % 2 == 1 {
            let field = match self.page {
                0 | 3 => 0..2,
                1 | 4 => 2..4,
                _ => 4..6,
            };
            text[field].fill(b' ');
        }
        if let Ok(text) = core::str::from_utf8(&text) {
            display.text(Position::Bottom, text);
        }
    }

    fn handle_running(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        match event.kind {
            EventKind::Activate | EventKind::Tick | EventKind::LowEnergyUpdate => self.draw_running(movement),
            EventKind::AlarmButtonUp => {
                beep(movement, Beep::Button);
                self.current = (self.current + 1) % DEADLINE_COUNT;
                self.draw_running(movement);
            }
            EventKind::AlarmLongPress => {
                beep(movement, Beep::Enable);
                self.enter_settings(movement);
                self.draw_settings(movement, event.subsecond);
            }
            EventKind::LightButtonDown => {}
            EventKind::LightLongPress => {
                beep(movement, Beep::Button);
                self.alarm_enabled = !self.alarm_enabled;
                self.draw_running(movement);
            }
            EventKind::Timeout => movement.move_to_face(0),
            EventKind::BackgroundTask => self.background_alarm(movement),
            _ => return movement.default_loop_handler(event),
        }
        true
    }

    fn handle_settings(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        match event.kind {
            EventKind::Tick => {
                if self.quick_cycle {
                    self.increment(movement);
                }
            }
            EventKind::AlarmLongPress => {
                self.quick_cycle = true;
                movement.request_tick_frequency(QUICK_CYCLE_HZ);
            }
            EventKind::AlarmLongUp => {
                self.quick_cycle = false;
                movement.request_tick_frequency(SETTINGS_HZ);
            }
            EventKind::LightLongPress => {
                beep(movement, Beep::Button);
                self.reset_deadline(movement);
            }
            EventKind::LightButtonDown => {}
            EventKind::LightButtonUp => self.page = (self.page + 1) % SETTINGS_TITLES.len(),
            EventKind::AlarmButtonUp => self.increment(movement),
            EventKind::Timeout => {
                beep(movement, Beep::Button);
                self.enter_running(movement);
                movement.move_to_face(0);
                return true;
            }
            EventKind::ModeButtonUp => {
                beep(movement, Beep::Disable);
                self.enter_running(movement);
                self.draw_running(movement);
                return true;
            }
            EventKind::BackgroundTask => {
                self.background_alarm(movement);
                return true;
            }
            EventKind::Activate | EventKind::LowEnergyUpdate => {}
            _ => return movement.default_loop_handler(event),
        }
        self.draw_settings(movement, event.subsecond);
        true
    }
}

fn bytes(text: heapless::String<6>) -> [u8; 6] {
    let mut out = [b' '; 6];
    for (o, b) in out.iter_mut().zip(text.as_bytes()) {
        *o = *b;
    }
    out
}

impl WatchFace for DeadlineFace {
    fn setup(&mut self, face_index: u8, _movement: &mut Movement<'_>) {
        self.face_index = face_index;
    }

    fn activate(&mut self, movement: &mut Movement<'_>) {
        self.enter_running(movement);
        self.current = self.closest(Self::now_ts(movement));
    }

    fn handle(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        match self.mode {
            Mode::Running => self.handle_running(event, movement),
            Mode::Settings => self.handle_settings(event, movement),
        }
    }

    fn resign(&mut self, _movement: &mut Movement<'_>) {}

    fn advise(&self, movement: &Movement<'_>) -> Advisory {
        if !self.alarm_enabled {
            return Advisory::NONE;
        }
        let now_ts = Self::now_ts(movement);
        let next = self.deadlines[self.closest(now_ts)];
        if next >= now_ts && next < now_ts + 60 {
            Advisory::background_task()
        } else {
            Advisory::NONE
        }
    }

    fn name(&self) -> &'static str {
        "deadline"
    }
}
