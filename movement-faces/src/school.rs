//! Class schedule countdown
//!
//! Holds up to twelve schedule slots, each a labelled period with a start
//! and end time of day. During a period the face counts down to its end;
//! between periods it counts down to the next start under a `BRK` label.
//! Once the day's periods are over it shows a splash and, after a minute
//! of that, returns to the first face.
//!
//! ALARM cycles through the start and end times of the active slots,
//! holding ALARM toggles the half-time chime and holding LIGHT opens the
//! slot editor. Edited slots are written to `scfaceNN.001`.

use movement_core::buzzer::Note;
use movement_core::datetime::{DateTime, WEEKDAY_LONG, WEEKDAY_SHORT};
use movement_core::display::{Indicator, Position};
use movement_core::persistence::{self, Record};
use movement_core::{Event, EventKind, Movement, WatchFace};

use crate::format;

pub const SLOT_LIMIT: usize = 12;
const GLANCE_TICKS: u8 = 3;
const IDLE_TICKS: u8 = 60;
const SETTINGS_HZ: u8 = 4;
const LOW_ENERGY_PERIOD_MS: u32 = 1000;

/// One labelled period of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot {
    pub main_label: [u8; 3],
    pub sub_label: [u8; 2],
    pub start_hour: u8,
    pub start_minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
    pub active: bool,
}

impl Slot {
    pub const EMPTY: Slot = Slot::new(*b"   ", *b"  ", 0, 0, 0, 0, false);

    pub const fn new(
        main_label: [u8; 3],
        sub_label: [u8; 2],
        start_hour: u8,
        start_minute: u8,
        end_hour: u8,
        end_minute: u8,
        active: bool,
    ) -> Self {
        Self {
            main_label,
            sub_label,
            start_hour,
            start_minute,
            end_hour,
            end_minute,
            active,
        }
    }

    pub fn start_seconds(&self) -> u32 {
        u32::from(self.start_hour) * 3600 + u32::from(self.start_minute) * 60
    }

    pub fn end_seconds(&self) -> u32 {
        u32::from(self.end_hour) * 3600 + u32::from(self.end_minute) * 60
    }

    /// Active with a start strictly before its end
    pub fn is_valid(&self) -> bool {
        self.active && self.start_seconds() < self.end_seconds()
    }

    pub fn label(&self) -> &str {
        core::str::from_utf8(&self.main_label).unwrap_or("   ")
    }

    /// Two-character label for the classic glass
    pub fn classic_label(&self) -> &str {
        core::str::from_utf8(&self.main_label[..2]).unwrap_or("  ")
    }

    pub fn sub_label(&self) -> &str {
        core::str::from_utf8(&self.sub_label).unwrap_or("  ")
    }
}

impl Record for Slot {
    const SIZE: usize = 10;

    fn to_bytes(&self, out: &mut [u8]) {
        out[..3].copy_from_slice(&self.main_label);
        out[3..5].copy_from_slice(&self.sub_label);
        out[5] = self.start_hour;
        out[6] = self.start_minute;
        out[7] = self.end_hour;
        out[8] = self.end_minute;
        out[9] = u8::from(self.active);
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        let mut main_label = [0u8; 3];
        let mut sub_label = [0u8; 2];
        main_label.copy_from_slice(&bytes[..3]);
        sub_label.copy_from_slice(&bytes[3..5]);
        Self::new(main_label, sub_label, bytes[5], bytes[6], bytes[7], bytes[8], bytes[9] != 0)
    }

    fn clamp(&mut self) {
        if self.start_hour > 23 {
            self.start_hour = 0;
        }
        if self.start_minute > 59 {
            self.start_minute = 0;
        }
        if self.end_hour > 23 {
            self.end_hour = 0;
        }
        if self.end_minute > 59 {
            self.end_minute = 0;
        }
        if self.end_seconds() < self.start_seconds() {
            self.end_hour = self.start_hour;
            self.end_minute = self.start_minute;
        }
        for c in self.main_label.iter_mut().chain(self.sub_label.iter_mut()) {
            if !(0x20..=0x7E).contains(c) {
                *c = b' ';
            }
        }
    }
}

const DEFAULT_SLOTS: [Slot; 5] = [
    Slot::new(*b"CLS", *b" 1", 9, 20, 10, 50, true),
    Slot::new(*b"CLS", *b" 2", 11, 0, 12, 30, true),
    Slot::new(*b"CLS", *b" 3", 13, 20, 14, 50, true),
    Slot::new(*b"CLS", *b" 4", 15, 0, 16, 30, true),
    Slot::new(*b"FIN", *b"  ", 16, 30, 18, 0, false),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Normal,
    Glance,
    Setting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Page {
    StartHour,
    StartMinute,
    EndHour,
    EndMinute,
    Active,
}

impl Page {
    fn next(self) -> Option<Page> {
        match self {
            Page::StartHour => Some(Page::StartMinute),
            Page::StartMinute => Some(Page::EndHour),
            Page::EndHour => Some(Page::EndMinute),
            Page::EndMinute => Some(Page::Active),
            Page::Active => None,
        }
    }
}

/// School schedule face
#[derive(Debug, Clone)]
pub struct SchoolFace {
    slots: [Slot; SLOT_LIMIT],
    /// Bit per slot edited since the last write
    dirty: u16,
    mode: Mode,
    page: Page,
    cursor: usize,
    /// Glance shows the end time rather than the start
    showing_end: bool,
    glance_ticks: u8,
    idle_ticks: u8,
    half_time_alarm: bool,
}

impl Default for SchoolFace {
    fn default() -> Self {
        Self::new()
    }
}

impl SchoolFace {
    pub fn new() -> Self {
        let mut slots = [Slot::EMPTY; SLOT_LIMIT];
        slots[..DEFAULT_SLOTS.len()].copy_from_slice(&DEFAULT_SLOTS);
        Self {
            slots,
            dirty: 0,
            mode: Mode::Normal,
            page: Page::StartHour,
            cursor: 0,
            showing_end: false,
            glance_ticks: 0,
            idle_ticks: 0,
            half_time_alarm: false,
        }
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn set_slot(&mut self, index: usize, slot: Slot) {
        if let Some(s) = self.slots.get_mut(index) {
            *s = slot;
            self.dirty |= 1 << index;
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn half_time_alarm(&self) -> bool {
        self.half_time_alarm
    }

    fn file_name(index: usize) -> heapless::String<12> {
        format(format_args!("scface{:02}.001", index))
    }

    fn persist(&mut self, movement: &mut Movement<'_>) {
        for (i, slot) in self.slots.iter().enumerate() {
            if self.dirty & (1 << i) == 0 {
                continue;
            }
            // A failed write keeps the bit so the next pass retries
            if persistence::store(movement.fs(), &Self::file_name(i), slot).is_ok() {
                self.dirty &= !(1 << i);
            }
        }
    }

    /// Slot whose period contains `now`, by second of day
    pub fn current_slot(&self, now: u32) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.active && s.start_seconds() < now && now < s.end_seconds())
    }

    /// Earliest slot still to start today, if any period remains
    pub fn next_slot(&self, now: u32) -> Option<usize> {
        let last_end = self.slots.iter().filter(|s| s.is_valid()).map(Slot::end_seconds).max()?;
        if now > last_end {
            return None;
        }
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_valid() && now < s.start_seconds())
            .min_by_key(|(_, s)| s.start_seconds())
            .map(|(i, _)| i)
    }

    fn next_active_after(&self, index: usize) -> Option<usize> {
        (1..=SLOT_LIMIT)
            .map(|step| (index + step) % SLOT_LIMIT)
            .find(|&i| self.slots[i].active)
    }

    fn second_of_day(now: &DateTime) -> u32 {
        u32::from(now.hour) * 3600 + u32::from(now.minute) * 60 + u32::from(now.second)
    }

    fn draw_splash(movement: &mut Movement<'_>) {
        let display = &mut movement.display;
        display.clear_indicator(Indicator::Colon);
        display.text_with_fallback(Position::TopLeft, "SCL", "SC");
        display.text(Position::TopRight, "  ");
        display.text(Position::Bottom, "------");
    }

    fn draw_countdown(movement: &mut Movement<'_>, labels: (&str, &str, &str), remaining: u32, low_energy: bool) {
        let display = &mut movement.display;
        display.set_indicator(Indicator::Colon);
        if low_energy && !display.sleep_animation_is_running() {
            display.start_sleep_animation(LOW_ENERGY_PERIOD_MS);
        }
        let (custom, classic, sub) = labels;
        display.text_with_fallback(Position::TopLeft, custom, classic);
        display.text(Position::TopRight, sub);
        display.text(Position::Hours, &format::<2>(format_args!("{:02}", remaining / 3600)));
        display.text(Position::Minutes, &format::<2>(format_args!("{:02}", remaining / 60 % 60)));
        if low_energy {
            display.text(Position::Seconds, "  ");
        } else {
            display.text(Position::Seconds, &format::<2>(format_args!("{:02}", remaining % 60)));
        }
    }

    fn update(&mut self, movement: &mut Movement<'_>, low_energy: bool) {
        let now = Self::second_of_day(&movement.local_date_time());
        movement.display.clear_indicator(Indicator::Pm);
        movement.display.indicate(Indicator::Bell, self.half_time_alarm);

        if let Some(i) = self.current_slot(now) {
            self.idle_ticks = 0;
            let slot = self.slots[i];
            let remaining = slot.end_seconds() - now;
            Self::draw_countdown(
                movement,
                (slot.label(), slot.classic_label(), slot.sub_label()),
                remaining,
                low_energy,
            );
            if self.half_time_alarm && remaining == (slot.end_seconds() - slot.start_seconds()) / 2 {
                movement.play_alarm_beeps(1, Note::G7);
            }
        } else if let Some(i) = self.next_slot(now) {
            let remaining = self.slots[i].start_seconds() - now;
            Self::draw_countdown(movement, ("BRK", "BK", "  "), remaining, low_energy);
        } else {
            self.idle_ticks = self.idle_ticks.saturating_add(1);
            if self.idle_ticks > IDLE_TICKS {
                movement.move_to_face(0);
                return;
            }
            if movement.display.sleep_animation_is_running() {
                movement.display.stop_sleep_animation();
            }
            Self::draw_splash(movement);
        }
    }

    fn draw_slot_time(&self, movement: &mut Movement<'_>, end: bool, blank: Option<core::ops::Range<usize>>) {
        let slot = &self.slots[self.cursor];
        let (hour, minute, tag) = if end {
            (slot.end_hour, slot.end_minute, "En")
        } else {
            (slot.start_hour, slot.start_minute, "St")
        };
        let mut text = format::<6>(format_args!("{:02}{:02}{}", hour, minute, tag));
        if let Some(range) = blank {
            text = text
                .chars()
                .enumerate()
                .map(|(i, c)| if range.contains(&i) { ' ' } else { c })
                .collect();
        }
        let display = &mut movement.display;
        display.set_indicator(Indicator::Colon);
        display.text_with_fallback(Position::TopLeft, slot.label(), slot.classic_label());
        display.text(Position::TopRight, slot.sub_label());
        display.text(Position::Bottom, &text);
    }

    fn draw_clock(movement: &mut Movement<'_>) {
        let now = movement.local_date_time();
        let mode = movement.clock_mode();
        let hour = if mode.is_24h() { now.hour } else { now.hour_12() };
        let weekday = usize::from(now.weekday());
        let display = &mut movement.display;
        display.set_indicator(Indicator::Colon);
        display.indicate(Indicator::Pm, !mode.is_24h() && now.is_pm());
        display.text_with_fallback(Position::TopLeft, WEEKDAY_LONG[weekday], WEEKDAY_SHORT[weekday]);
        display.text(Position::TopRight, &format::<2>(format_args!("{:2}", now.day)));
        display.text(
            Position::Bottom,
            &format::<6>(format_args!("{:2}{:02}{:02}", hour, now.minute, now.second)),
        );
    }

    fn draw_setting(&self, movement: &mut Movement<'_>, subsecond: u8) {
        let blink = subsecond % 2 == 1;
        match self.page {
            Page::StartHour | Page::EndHour => {
                self.draw_slot_time(movement, self.page == Page::EndHour, blink.then_some(0..2))
            }
            Page::StartMinute | Page::EndMinute => {
                self.draw_slot_time(movement, self.page == Page::EndMinute, blink.then_some(2..4))
            }
            Page::Active => {
                let slot = &self.slots[self.cursor];
                let display = &mut movement.display;
                display.clear_indicator(Indicator::Colon);
                display.text_with_fallback(Position::TopLeft, slot.label(), slot.classic_label());
                display.text(Position::TopRight, slot.sub_label());
                let state = if blink {
                    "      "
                } else if slot.active {
                    " on   "
                } else {
                    " off  "
                };
                display.text(Position::Bottom, state);
            }
        }
    }

    fn glance(&mut self, movement: &mut Movement<'_>) {
        if self.mode == Mode::Glance {
            if self.showing_end {
                match self.next_active_after(self.cursor) {
                    Some(i) => self.cursor = i,
                    None => return,
                }
            }
            self.showing_end = !self.showing_end;
        } else {
            let now = Self::second_of_day(&movement.local_date_time());
            let first = self
                .current_slot(now)
                .or_else(|| self.next_slot(now))
                .or_else(|| self.slots.iter().position(|s| s.active));
            let Some(first) = first else {
                return;
            };
            self.cursor = first;
            self.showing_end = false;
            self.mode = Mode::Glance;
        }
        self.glance_ticks = GLANCE_TICKS;
        movement.display.clear_indicator(Indicator::Bell);
        self.draw_slot_time(movement, self.showing_end, None);
    }

    fn enter_settings(&mut self, movement: &mut Movement<'_>) {
        if self.mode == Mode::Normal {
            let now = Self::second_of_day(&movement.local_date_time());
            self.cursor = self.current_slot(now).or_else(|| self.next_slot(now)).unwrap_or(0);
        }
        self.mode = Mode::Setting;
        self.page = Page::StartHour;
        movement.display.clear_indicator(Indicator::Bell);
        movement.request_tick_frequency(SETTINGS_HZ);
        self.draw_setting(movement, 0);
    }

    fn leave_settings(&mut self, movement: &mut Movement<'_>) {
        for slot in self.slots.iter_mut() {
            slot.clamp();
        }
        self.persist(movement);
        self.mode = Mode::Normal;
        movement.request_tick_frequency(1);
        self.update(movement, false);
    }

    fn increment(&mut self) {
        let slot = &mut self.slots[self.cursor];
        match self.page {
            Page::StartHour => slot.start_hour = (slot.start_hour + 1) % 24,
            Page::StartMinute => slot.start_minute = (slot.start_minute + 1) % 60,
            Page::EndHour => slot.end_hour = (slot.end_hour + 1) % 24,
            Page::EndMinute => slot.end_minute = (slot.end_minute + 1) % 60,
            Page::Active => slot.active = !slot.active,
        }
        self.dirty |= 1 << self.cursor;
    }

    fn handle_setting(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        match event.kind {
            EventKind::Tick => self.draw_setting(movement, event.subsecond),
            EventKind::AlarmButtonUp => {
                self.increment();
                self.draw_setting(movement, event.subsecond);
            }
            EventKind::LightButtonUp => {
                match self.page.next() {
                    Some(page) => self.page = page,
                    None => {
                        self.cursor = (self.cursor + 1) % SLOT_LIMIT;
                        self.page = Page::StartHour;
                    }
                }
                self.draw_setting(movement, event.subsecond);
            }
            EventKind::ModeButtonUp | EventKind::LightLongPress | EventKind::Timeout => {
                self.leave_settings(movement)
            }
            EventKind::LightButtonDown => {}
            _ => return movement.default_loop_handler(event),
        }
        true
    }
}

impl WatchFace for SchoolFace {
    fn setup(&mut self, _face_index: u8, movement: &mut Movement<'_>) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let name = Self::file_name(i);
            if movement.fs_ref().exists(&name) {
                *slot = persistence::load(movement.fs_ref(), &name);
            }
        }
    }

    fn activate(&mut self, movement: &mut Movement<'_>) {
        if movement.display.sleep_animation_is_running() {
            movement.display.stop_sleep_animation();
        }
        self.mode = Mode::Normal;
        self.cursor = 0;
        self.idle_ticks = 0;
        self.glance_ticks = 0;
    }

    fn handle(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        if self.mode == Mode::Setting {
            return self.handle_setting(event, movement);
        }
        match event.kind {
            EventKind::Activate => Self::draw_splash(movement),
            EventKind::Tick if self.mode == Mode::Glance => {
                self.glance_ticks = self.glance_ticks.saturating_sub(1);
                if self.glance_ticks == 0 {
                    self.mode = Mode::Normal;
                    self.update(movement, false);
                }
            }
            EventKind::Tick => self.update(movement, false),
            EventKind::LowEnergyUpdate => {
                self.mode = Mode::Normal;
                self.update(movement, true);
            }
            EventKind::AlarmButtonUp => self.glance(movement),
            EventKind::AlarmLongPress => {
                self.half_time_alarm = !self.half_time_alarm;
                movement.display.indicate(Indicator::Bell, self.half_time_alarm);
            }
            EventKind::LightLongPress => self.enter_settings(movement),
            EventKind::AlarmButtonDown => {}
            EventKind::Timeout => {
                let now = Self::second_of_day(&movement.local_date_time());
                if self.current_slot(now).is_none() && self.next_slot(now).is_none() {
                    movement.move_to_face(0);
                }
            }
            EventKind::ModeButtonUp if self.mode == Mode::Glance => {
                self.mode = Mode::Normal;
                movement.move_to_next_face();
            }
            _ => return movement.default_loop_handler(event),
        }
        true
    }

    fn resign(&mut self, movement: &mut Movement<'_>) {
        self.persist(movement);
        if self.mode == Mode::Setting {
            movement.request_tick_frequency(1);
        }
        self.mode = Mode::Normal;
    }

    fn name(&self) -> &'static str {
        "school"
    }
}
