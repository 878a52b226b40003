//! Days since (or until) an anchor date
//!
//! Shows the number of days between today and the anchor. ALARM briefly
//! shows the anchor itself and whether it lies behind or ahead. Hold
//! ALARM to edit year, month and day; LIGHT steps through them and saves.
//!
//! Several instances can be registered; each keeps its own file.

use movement_core::datetime::{days_in_month, DateTime};
use movement_core::display::Position;
use movement_core::persistence::{self, Record};
use movement_core::{Event, EventKind, Movement, WatchFace};

use crate::format;

pub const MIN_YEAR: u16 = 1900;
pub const MAX_YEAR: u16 = 2080;

const DEFAULT_ANCHOR: SinceDate = SinceDate {
    year: 1959,
    month: 1,
    day: 1,
};

const SETTINGS_HZ: u8 = 4;
const QUICK_CYCLE_HZ: u8 = 8;

/// Ticks the anchor date stays up after ALARM
const DATE_TICKS: u8 = 2;

/// Anchor date, packed as year:12 month:4 day:5 in a little-endian word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SinceDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl SinceDate {
    fn julian_day(&self) -> i32 {
        DateTime::new(self.year, self.month, self.day, 0, 0, 0).julian_day()
    }
}

impl Record for SinceDate {
    const SIZE: usize = 4;

    fn to_bytes(&self, out: &mut [u8]) {
        let reg = u32::from(self.year & 0x0FFF) | u32::from(self.month & 0x0F) << 12 | u32::from(self.day & 0x1F) << 16;
        out[..4].copy_from_slice(&reg.to_le_bytes());
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        let reg = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Self {
            year: (reg & 0x0FFF) as u16,
            month: (reg >> 12 & 0x0F) as u8,
            day: (reg >> 16 & 0x1F) as u8,
        }
    }

    fn clamp(&mut self) {
        self.year = self.year.clamp(MIN_YEAR, MAX_YEAR);
        self.month = self.month.clamp(1, 12);
        self.day = self.day.clamp(1, days_in_month(self.month, self.year));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    Display,
    Year,
    Month,
    Day,
    /// Anchor date shown for a couple of ticks
    Date,
}

/// Days-since face
#[derive(Debug, Clone)]
pub struct DaysSinceFace {
    instance: u8,
    anchor: SinceDate,
    page: Page,
    quick_cycle: bool,
    changed: bool,
    ticks: u8,
}

impl DaysSinceFace {
    /// Create instance number `instance`, which picks the file it uses
    pub fn new(instance: u8) -> Self {
        Self {
            instance,
            anchor: DEFAULT_ANCHOR,
            page: Page::Display,
            quick_cycle: false,
            changed: false,
            ticks: 0,
        }
    }

    pub fn anchor(&self) -> SinceDate {
        self.anchor
    }

    pub fn page(&self) -> Page {
        self.page
    }

    fn file_name(&self) -> heapless::String<12> {
        format(format_args!("since{:03}.u32", self.instance))
    }

    fn persist(&mut self, movement: &mut Movement<'_>) {
        let name = self.file_name();
        let stored: SinceDate = persistence::load(movement.fs_ref(), &name);
        if movement.fs_ref().exists(&name) && stored == self.anchor {
            self.changed = false;
            return;
        }
        if persistence::store(movement.fs(), &name, &self.anchor).is_ok() {
            self.changed = false;
        }
    }

    fn day_delta(&self, movement: &Movement<'_>) -> i32 {
        let today = movement.local_date_time();
        DateTime::new(today.year, today.month, today.day, 0, 0, 0).julian_day() - self.anchor.julian_day()
    }

    fn draw_count(&self, movement: &mut Movement<'_>) {
        let days = self.day_delta(movement).unsigned_abs();
        let display = &mut movement.display;
        display.text_with_fallback(Position::TopLeft, "DAY", "DA");
        display.text(Position::TopRight, "  ");
        display.text(Position::Bottom, &format::<6>(format_args!("{:6}", days)));
    }

    fn draw_page(&self, movement: &mut Movement<'_>, subsecond: u8) {
        let (title, fallback, value): (&str, &str, heapless::String<6>) = match self.page {
            Page::Year => ("Year ", "YR", format(format_args!("{:4}  ", self.anchor.year))),
            Page::Month => ("Month", "MO", format(format_args!("{:2}    ", self.anchor.month))),
            Page::Day => ("Day  ", "DA", format(format_args!("  {:2}  ", self.anchor.day))),
            Page::Display | Page::Date => return,
        };
        let display = &mut movement.display;
        display.text_with_fallback(Position::Top, title, fallback);
        if subsecond % 2 == 1 {
            display.text(Position::Bottom, &value);
        } else {
            display.text(Position::Bottom, "      ");
        }
    }

    fn draw_date(&self, movement: &mut Movement<'_>) {
        let ahead = self.day_delta(movement) < 0;
        let display = &mut movement.display;
        display.text_with_fallback(Position::Top, if ahead { "Until" } else { "SINCE" }, "DA");
        let a = &self.anchor;
        display.text(
            Position::Bottom,
            &format::<6>(format_args!("{:02}{:02}{:02}", a.year % 100, a.month, a.day)),
        );
    }

    fn increment(&mut self) {
        self.changed = true;
        let a = &mut self.anchor;
        match self.page {
            Page::Year => a.year = if a.year >= MAX_YEAR { MIN_YEAR } else { a.year + 1 },
            Page::Month => a.month = a.month % 12 + 1,
            Page::Day => a.day = a.day % days_in_month(a.month, a.year) + 1,
            Page::Display | Page::Date => {}
        }
        a.day = a.day.min(days_in_month(a.month, a.year));
    }

    fn abort_quick_cycle(&mut self, movement: &mut Movement<'_>) {
        if self.quick_cycle {
            self.quick_cycle = false;
            movement.request_tick_frequency(SETTINGS_HZ);
        }
    }

    fn is_setting(&self) -> bool {
        matches!(self.page, Page::Year | Page::Month | Page::Day)
    }
}

impl WatchFace for DaysSinceFace {
    fn setup(&mut self, _face_index: u8, movement: &mut Movement<'_>) {
        let name = self.file_name();
        if movement.fs_ref().exists(&name) {
            self.anchor = persistence::load(movement.fs_ref(), &name);
        }
    }

    fn activate(&mut self, _movement: &mut Movement<'_>) {
        self.page = Page::Display;
        self.quick_cycle = false;
        self.ticks = 0;
    }

    fn handle(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        match event.kind {
            EventKind::Activate => self.draw_count(movement),
            EventKind::Tick | EventKind::LowEnergyUpdate => {
                if self.quick_cycle {
                    self.increment();
                }
                match self.page {
                    Page::Display => {
                        let now = movement.local_date_time();
                        if now.hour == 0 && now.minute == 0 && now.second == 0 {
                            self.draw_count(movement);
                        }
                    }
                    Page::Date if self.ticks > 0 => self.ticks -= 1,
                    Page::Date => {
                        self.page = Page::Display;
                        self.draw_count(movement);
                    }
                    _ => self.draw_page(movement, event.subsecond),
                }
            }
            EventKind::LightButtonDown => {
                if !self.is_setting() {
                    movement.illuminate_led();
                }
            }
            EventKind::LightButtonUp => {
                self.page = match self.page {
                    Page::Year => Page::Month,
                    Page::Month => Page::Day,
                    Page::Day => {
                        movement.request_tick_frequency(1);
                        self.persist(movement);
                        self.draw_count(movement);
                        Page::Display
                    }
                    page => page,
                };
            }
            EventKind::AlarmButtonUp => {
                if self.is_setting() {
                    self.abort_quick_cycle(movement);
                    self.increment();
                } else if self.page == Page::Display {
                    self.draw_date(movement);
                    self.page = Page::Date;
                    self.ticks = DATE_TICKS;
                }
            }
            EventKind::AlarmLongPress => {
                if self.page == Page::Display {
                    self.page = Page::Year;
                    movement.request_tick_frequency(SETTINGS_HZ);
                } else if self.is_setting() {
                    self.quick_cycle = true;
                    movement.request_tick_frequency(QUICK_CYCLE_HZ);
                }
            }
            EventKind::AlarmLongUp => self.abort_quick_cycle(movement),
            EventKind::Timeout => {
                self.abort_quick_cycle(movement);
                if self.page != Page::Display {
                    movement.move_to_face(0);
                }
            }
            _ => return movement.default_loop_handler(event),
        }
        true
    }

    fn resign(&mut self, movement: &mut Movement<'_>) {
        if self.changed {
            self.persist(movement);
        }
    }

    fn name(&self) -> &'static str {
        "days_since"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{send, start, ticks};
    use movement_core::mock::TestBench;
    use movement_core::traits::Filesystem;

    const TODAY: DateTime = DateTime::new(2024, 6, 1, 9, 30, 0);

    fn tick(face: &mut DaysSinceFace, m: &mut Movement<'_>, subsecond: u8) {
        face.handle(Event::new(EventKind::Tick, subsecond), m);
    }

    #[test]
    fn test_packed_layout() {
        let mut out = [0u8; 4];
        SinceDate { year: 2024, month: 6, day: 1 }.to_bytes(&mut out);
        assert_eq!(u32::from_le_bytes(out), 2024 | 6 << 12 | 1 << 16);
        let mut back = SinceDate::from_bytes(&out);
        back.clamp();
        assert_eq!(back, SinceDate { year: 2024, month: 6, day: 1 });
    }

    #[test]
    fn test_default_anchor_counts_days() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        m.set_local_date_time(DateTime::new(1959, 2, 1, 12, 0, 0));
        let mut face = DaysSinceFace::new(0);
        start(&mut face, 0, &mut m);
        assert_eq!(face.anchor(), DEFAULT_ANCHOR);
        assert_eq!(m.display.text_at(Position::TopLeft).as_str(), "DA");
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "    31");
    }

    #[test]
    fn test_since_and_until_labels() {
        let mut bench = TestBench::new();
        bench.variant = movement_core::display::LcdVariant::Custom;
        let mut m = bench.movement();
        m.set_local_date_time(TODAY);
        let mut face = DaysSinceFace::new(0);
        face.anchor = SinceDate { year: 2024, month: 6, day: 1 };
        start(&mut face, 0, &mut m);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "     0");
        send(&mut face, &mut m, EventKind::AlarmButtonUp);
        assert_eq!(m.display.text_at(Position::Top).as_str(), "SINCE");
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "240601");

        face.anchor = SinceDate { year: 2024, month: 6, day: 2 };
        ticks(&mut face, &mut m, usize::from(DATE_TICKS) + 1);
        assert_eq!(face.page(), Page::Display);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "     1");
        send(&mut face, &mut m, EventKind::AlarmButtonUp);
        assert_eq!(m.display.text_at(Position::Top).as_str(), "Until");
    }

    #[test]
    fn test_edit_and_persist() {
        let mut bench = TestBench::new();
        {
            let mut m = bench.movement();
            m.set_local_date_time(TODAY);
            let mut face = DaysSinceFace::new(2);
            start(&mut face, 0, &mut m);
            send(&mut face, &mut m, EventKind::AlarmLongPress);
            assert_eq!(face.page(), Page::Year);
            assert_eq!(m.tick_frequency(), SETTINGS_HZ);
            tick(&mut face, &mut m, 1);
            assert_eq!(m.display.text_at(Position::Bottom).as_str(), "1959  ");
            tick(&mut face, &mut m, 0);
            assert_eq!(m.display.text_at(Position::Bottom).as_str(), "      ");

            send(&mut face, &mut m, EventKind::AlarmButtonUp);
            send(&mut face, &mut m, EventKind::LightButtonUp);
            send(&mut face, &mut m, EventKind::AlarmButtonUp);
            send(&mut face, &mut m, EventKind::LightButtonUp);
            send(&mut face, &mut m, EventKind::LightButtonUp);
            assert_eq!(face.page(), Page::Display);
            assert_eq!(m.tick_frequency(), 1);
            assert_eq!(face.anchor(), SinceDate { year: 1960, month: 2, day: 1 });
        }
        assert!(bench.fs.exists("since002.u32"));

        let mut m = bench.movement();
        let mut face = DaysSinceFace::new(2);
        face.setup(0, &mut m);
        assert_eq!(face.anchor(), SinceDate { year: 1960, month: 2, day: 1 });
    }

    #[test]
    fn test_year_wraps_and_day_clamps() {
        let mut face = DaysSinceFace::new(0);
        face.anchor = SinceDate { year: MAX_YEAR, month: 2, day: 29 };
        face.page = Page::Year;
        face.increment();
        // 1900 is not a leap year
        assert_eq!(face.anchor(), SinceDate { year: MIN_YEAR, month: 2, day: 28 });
    }

    #[test]
    fn test_timeout_in_settings_goes_home_and_resign_saves() {
        let mut bench = TestBench::new();
        {
            let mut m = bench.movement();
            let mut face = DaysSinceFace::new(0);
            start(&mut face, 0, &mut m);
            send(&mut face, &mut m, EventKind::AlarmLongPress);
            send(&mut face, &mut m, EventKind::AlarmButtonUp);
            send(&mut face, &mut m, EventKind::Timeout);
            assert!(m.face_change_pending());
            face.resign(&mut m);
        }
        assert!(bench.fs.exists("since000.u32"));
    }
}
