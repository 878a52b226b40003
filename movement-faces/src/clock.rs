//! Time and date
//!
//! Top row: weekday and day of month. Bottom row: hours, minutes and
//! seconds in the user's clock mode. Only the digits that changed since
//! the last tick are redrawn. In low-energy mode the seconds are dropped
//! and the sleep animation runs.
//!
//! Hold ALARM to toggle the hourly chime (Bell indicator).

use movement_core::datetime::{DateTime, WEEKDAY_LONG, WEEKDAY_SHORT};
use movement_core::display::{Indicator, Position};
use movement_core::services::ClockMode;
use movement_core::{Advisory, Event, EventKind, Movement, WatchFace};

use crate::format;

/// Sleep animation and colon blink period in low-energy mode
const LOW_ENERGY_PERIOD_MS: u32 = 500;

/// Clock face
#[derive(Debug, Clone, Default)]
pub struct ClockFace {
    /// Local time drawn last; `None` forces a full redraw
    previous: Option<DateTime>,
    signal_enabled: bool,
}

impl ClockFace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the hourly chime is on
    pub fn signal_enabled(&self) -> bool {
        self.signal_enabled
    }

    fn hour_text(mode: ClockMode, now: &DateTime) -> heapless::String<4> {
        match mode {
            ClockMode::Hour12 => format(format_args!("{:2}", now.hour_12())),
            ClockMode::Hour24 => format(format_args!("{:2}", now.hour)),
            ClockMode::Hour024 => format(format_args!("{:02}", now.hour)),
        }
    }

    fn indicators(&self, movement: &mut Movement<'_>, now: &DateTime) {
        let mode = movement.clock_mode();
        let alarm = movement.alarm_enabled();
        let display = &mut movement.display;
        display.indicate(Indicator::Signal, alarm);
        display.indicate(Indicator::Bell, self.signal_enabled);
        display.indicate(Indicator::H24, mode.is_24h());
        display.indicate(Indicator::Pm, !mode.is_24h() && now.is_pm());
        display.set_indicator(Indicator::Colon);
    }

    fn draw(&mut self, movement: &mut Movement<'_>, low_energy: bool) {
        let now = movement.local_date_time();
        self.indicators(movement, &now);
        let hours = Self::hour_text(movement.clock_mode(), &now);
        let display = &mut movement.display;

        if low_energy {
            if !display.sleep_animation_is_running() {
                display.start_sleep_animation(LOW_ENERGY_PERIOD_MS);
                display.start_indicator_blink_if_possible(Indicator::Colon, LOW_ENERGY_PERIOD_MS);
            }
            let day = format::<4>(format_args!("{:2}", now.day));
            let bottom = format::<8>(format_args!("{}{:02}  ", hours, now.minute));
            display.text(Position::TopRight, &day);
            display.text(Position::Bottom, &bottom);
            self.previous = None;
            return;
        }

        match self.previous {
            Some(prev) if prev.same_minute(&now) => {
                display.text(Position::Seconds, &format::<2>(format_args!("{:02}", now.second)));
            }
            Some(prev) if prev.hour == now.hour && prev.same_day(&now) => {
                display.text(Position::Minutes, &format::<2>(format_args!("{:02}", now.minute)));
                display.text(Position::Seconds, &format::<2>(format_args!("{:02}", now.second)));
            }
            _ => {
                let weekday = usize::from(now.weekday());
                display.text_with_fallback(Position::TopLeft, WEEKDAY_LONG[weekday], WEEKDAY_SHORT[weekday]);
                let day = format::<4>(format_args!("{:2}", now.day));
                let bottom = format::<8>(format_args!("{}{:02}{:02}", hours, now.minute, now.second));
                display.text(Position::TopRight, &day);
                display.text(Position::Bottom, &bottom);
            }
        }
        self.previous = Some(now);
    }
}

impl WatchFace for ClockFace {
    fn setup(&mut self, _face_index: u8, _movement: &mut Movement<'_>) {}

    fn activate(&mut self, movement: &mut Movement<'_>) {
        movement.display.stop_sleep_animation();
        movement.display.stop_blink();
        self.previous = None;
    }

    fn handle(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        match event.kind {
            EventKind::Activate | EventKind::Tick => self.draw(movement, false),
            EventKind::LowEnergyUpdate => self.draw(movement, true),
            EventKind::AlarmLongPress => {
                self.signal_enabled = !self.signal_enabled;
                movement.display.indicate(Indicator::Bell, self.signal_enabled);
            }
            EventKind::BackgroundTask => movement.play_signal(),
            _ => return movement.default_loop_handler(event),
        }
        true
    }

    fn resign(&mut self, _movement: &mut Movement<'_>) {}

    fn advise(&self, movement: &Movement<'_>) -> Advisory {
        if self.signal_enabled && movement.local_date_time().minute == 0 {
            Advisory::background_task()
        } else {
            Advisory::NONE
        }
    }

    fn name(&self) -> &'static str {
        "clock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{send, start};
    use movement_core::event::Button;
    use movement_core::mock::TestBench;
    use movement_core::{FaceRegistry, Runtime};

    const NOON: DateTime = DateTime::new(2024, 6, 1, 12, 0, 0);

    #[test]
    fn test_full_draw_in_12h() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        m.set_utc_date_time(DateTime::new(2024, 6, 1, 15, 4, 5));
        let mut face = ClockFace::new();
        start(&mut face, 0, &mut m);
        assert_eq!(m.display.text_at(Position::TopLeft).as_str(), "SA");
        assert_eq!(m.display.text_at(Position::TopRight).as_str(), " 1");
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " 30405");
        assert!(m.display.is_indicator_set(Indicator::Pm));
        assert!(!m.display.is_indicator_set(Indicator::H24));
        assert!(m.display.is_indicator_set(Indicator::Colon));
    }

    #[test]
    fn test_leading_zero_24h() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        m.set_clock_mode(ClockMode::Hour024);
        m.set_utc_date_time(DateTime::new(2024, 6, 1, 7, 4, 5));
        let mut face = ClockFace::new();
        start(&mut face, 0, &mut m);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "070405");
        assert!(m.display.is_indicator_set(Indicator::H24));
        assert!(!m.display.is_indicator_set(Indicator::Pm));
    }

    #[test]
    fn test_low_energy_drops_seconds() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        m.set_utc_date_time(DateTime::new(2024, 6, 1, 9, 41, 0));
        let mut face = ClockFace::new();
        start(&mut face, 0, &mut m);
        send(&mut face, &mut m, EventKind::LowEnergyUpdate);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " 941  ");
        assert!(m.display.sleep_animation_is_running());
        face.activate(&mut m);
        assert!(!m.display.sleep_animation_is_running());
    }

    #[test]
    fn test_chime_toggle_and_advisory() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        m.set_utc_date_time(DateTime::new(2024, 6, 1, 10, 0, 30));
        let mut face = ClockFace::new();
        start(&mut face, 0, &mut m);
        assert_eq!(face.advise(&m), Advisory::NONE);
        send(&mut face, &mut m, EventKind::AlarmLongPress);
        assert!(face.signal_enabled());
        assert!(m.display.is_indicator_set(Indicator::Bell));
        assert!(face.advise(&m).wants_background_task);
        m.set_utc_date_time(DateTime::new(2024, 6, 1, 10, 1, 0));
        assert_eq!(face.advise(&m), Advisory::NONE);
        send(&mut face, &mut m, EventKind::BackgroundTask);
        assert!(m.buzzer.is_active());
    }

    #[test]
    fn test_single_clock_boots_and_wraps() {
        let mut bench = TestBench::new();
        let mut face = ClockFace::new();
        let mut registry = FaceRegistry::new();
        registry.register(&mut face).unwrap();
        let mut rt = Runtime::new(registry, bench.movement()).unwrap();
        rt.boot(NOON);
        rt.run();
        assert_eq!(rt.movement().display.text_at(Position::Bottom).as_str(), "120000");

        let now = NOON.add_seconds(1);
        rt.rtc_tick(now);
        rt.run();
        assert_eq!(rt.movement().display.text_at(Position::Bottom).as_str(), "120001");

        rt.button_edge(Button::Mode, true);
        rt.run();
        rt.button_edge(Button::Mode, false);
        rt.run();
        assert_eq!(rt.movement().current_face(), 0);
        assert_eq!(rt.registry().active(), Some(0));
        assert_eq!(rt.movement().display.text_at(Position::Bottom).as_str(), "120001");
    }
}
