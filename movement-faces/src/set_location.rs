//! Latitude/longitude editor
//!
//! Edits the wearer location one digit at a time, latitude first. The
//! sign is the first field (`-+` or `--` top right). ALARM bumps the
//! blinking field, LIGHT moves to the next one; after the last longitude
//! digit the face saves and moves on. Hold ALARM to leave without saving.

use movement_core::display::{Indicator, Position};
use movement_core::services::location::{Location, MAX_LATITUDE, MAX_LONGITUDE};
use movement_core::{Event, EventKind, Movement, WatchFace};

use crate::format;

const TICK_HZ: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Latitude,
    Longitude,
}

impl Field {
    /// Magnitude digits, two of them after the decimal point
    fn digits(self) -> u8 {
        match self {
            Field::Latitude => 4,
            Field::Longitude => 5,
        }
    }

    fn max(self) -> i16 {
        match self {
            Field::Latitude => MAX_LATITUDE,
            Field::Longitude => MAX_LONGITUDE,
        }
    }
}

/// Location editor face
#[derive(Debug, Clone)]
pub struct SetLocationFace {
    working: Location,
    field: Field,
    /// 0 is the sign, then digits from the most significant
    active_digit: u8,
    negative: bool,
    changed: bool,
}

impl Default for SetLocationFace {
    fn default() -> Self {
        Self::new()
    }
}

impl SetLocationFace {
    pub fn new() -> Self {
        Self {
            working: Location::default(),
            field: Field::Latitude,
            active_digit: 0,
            negative: false,
            changed: false,
        }
    }

    /// Location as currently edited
    pub fn working(&self) -> Location {
        self.working
    }

    pub fn field(&self) -> Field {
        self.field
    }

    fn value_mut(&mut self) -> &mut i16 {
        match self.field {
            Field::Latitude => &mut self.working.latitude,
            Field::Longitude => &mut self.working.longitude,
        }
    }

    fn advance_digit(&mut self) {
        self.changed = true;
        let field = self.field;
        let digit = self.active_digit;
        if digit == 0 {
            self.negative = !self.negative;
            let negative = self.negative;
            let value = self.value_mut();
            *value = if negative { -value.abs() } else { value.abs() };
            return;
        }

        let negative = self.negative;
        let value = self.value_mut();
        let divisor = 10i32.pow(u32::from(field.digits() - digit));
        let mut magnitude = i32::from(value.unsigned_abs());
        let old = magnitude / divisor % 10;
        magnitude += ((old + 1) % 10 - old) * divisor;
        if magnitude > i32::from(field.max()) {
            magnitude = 0;
        }
        let magnitude = magnitude as i16;
        *value = if negative { -magnitude } else { magnitude };
    }

    fn next_digit(&mut self, movement: &mut Movement<'_>) {
        self.active_digit += 1;
        if self.active_digit <= self.field.digits() {
            return;
        }
        self.active_digit = 0;
        match self.field {
            Field::Latitude => {
                self.field = Field::Longitude;
                self.negative = self.working.longitude < 0;
            }
            Field::Longitude => movement.move_to_next_face(),
        }
    }

    fn draw(&self, movement: &mut Movement<'_>, subsecond: u8) {
        let display = &mut movement.display;
        display.clear();
        let mut text: heapless::String<8> = match self.field {
            Field::Latitude => {
                display.text_with_fallback(Position::Top, "LAT", "Lat");
                display.set_indicator(Indicator::Colon);
                let lat = self.working.latitude.unsigned_abs();
                format(format_args!("{:02}{:02}", lat / 100, lat % 100))
            }
            Field::Longitude => {
                display.text_with_fallback(Position::Top, "LON", "Lon");
                let lon = self.working.longitude.unsigned_abs();
                format(format_args!("{:03}.{:02}", lon / 100, lon % 100))
            }
        };
        display.text(Position::TopRight, if self.negative { "--" } else { "-+" });

        if subsecond % 2 == 1 {
            if self.active_digit == 0 {
                display.text(Position::TopRight, "  ");
            } else {
                let mut pos = usize::from(self.active_digit - 1);
                if self.field == Field::Longitude && pos >= 3 {
                    pos += 1;
                }
                text = text
                    .chars()
                    .enumerate()
                    .map(|(i, c)| if i == pos { ' ' } else { c })
                    .collect();
            }
        }
        display.text(Position::Bottom, &text);
    }
}

impl WatchFace for SetLocationFace {
    fn setup(&mut self, _face_index: u8, _movement: &mut Movement<'_>) {}

    fn activate(&mut self, movement: &mut Movement<'_>) {
        *self = Self::new();
        self.working = movement.location();
        self.negative = self.working.latitude < 0;
        movement.request_tick_frequency(TICK_HZ);
    }

    fn handle(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        match event.kind {
            EventKind::Tick => self.draw(movement, event.subsecond),
            EventKind::AlarmButtonUp => {
                self.advance_digit();
                self.draw(movement, event.subsecond);
            }
            EventKind::LightButtonUp => {
                self.next_digit(movement);
                self.draw(movement, event.subsecond);
            }
            EventKind::AlarmLongPress | EventKind::Timeout => {
                self.changed = false;
                movement.move_to_next_face();
            }
            _ => return movement.default_loop_handler(event),
        }
        true
    }

    fn resign(&mut self, movement: &mut Movement<'_>) {
        let Location { latitude, longitude } = self.working;
        if self.changed && latitude.abs() <= MAX_LATITUDE && longitude.abs() <= MAX_LONGITUDE {
            // A refused write leaves the old location in place
            let _ = movement.set_location(self.working);
        }
        self.changed = false;
        movement.request_tick_frequency(1);
    }

    fn name(&self) -> &'static str {
        "set_location"
    }
}
