//! PIN lock menu and digit entry
//!
//! Registering this face turns the PIN lock on. The menu (LIGHT to page,
//! ALARM to pick) offers unlock or lock, changing the PIN and choosing the
//! auto-lock delay. When another face was redirected here, the face opens
//! straight on the unlock prompt and goes there once the PIN matches.
//!
//! A digit is entered with one press of any button:
//!
//! | Button | Short | Long |
//! |--------|-------|------|
//! | MODE   | 0     | 1    |
//! | LIGHT  | 2     | 3    |
//! | ALARM  | 4     | 5    |

use movement_core::display::Position;
use movement_core::event::Button;
use movement_core::persistence;
use movement_core::services::pin::{Pin, EMPTY_DIGIT, LOCK_TIMEOUTS, PIN_DIGITS, PIN_FILE};
use movement_core::{Event, EventKind, Movement, WatchFace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Menu,
    Entering,
    Validating,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuPage {
    Unlock,
    Change,
    Timeout,
}

/// What the digits being entered are for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reason {
    Unlock,
    Old,
    New,
    Confirm,
}

/// PIN face
#[derive(Debug, Clone)]
pub struct PinFace {
    status: Status,
    menu_page: MenuPage,
    reason: Reason,
    timeout_page: usize,
    digit_index: usize,
    scratch: Pin,
    current: Pin,
    new_pin: Pin,
    new_pin_confirm: Pin,
    animation_tick: u8,
    validating: bool,
    success: bool,
    /// Button whose press is filling the current digit
    active_button: Option<Button>,
}

impl Default for PinFace {
    fn default() -> Self {
        Self::new()
    }
}

impl PinFace {
    pub fn new() -> Self {
        Self {
            status: Status::Menu,
            menu_page: MenuPage::Unlock,
            reason: Reason::Unlock,
            timeout_page: 1,
            digit_index: 0,
            scratch: Pin::EMPTY,
            current: Pin::EMPTY,
            new_pin: Pin::EMPTY,
            new_pin_confirm: Pin::EMPTY,
            animation_tick: 0,
            validating: false,
            success: false,
            active_button: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }

    fn reset(&mut self) {
        let timeout_page = self.timeout_page;
        *self = Self::new();
        self.timeout_page = timeout_page;
    }

    fn restart_entry(&mut self, status: Status) {
        self.status = status;
        self.digit_index = 0;
        self.animation_tick = 0;
    }

    /// MODE release: back to the face the user was heading for, if any
    fn leave(&self, event: Event, movement: &mut Movement<'_>) {
        match (event.kind, movement.pin.requesting_face()) {
            (EventKind::ModeButtonUp, Some(face)) => movement.move_to_face(face),
            _ => {
                movement.default_loop_handler(event);
            }
        }
    }

    fn menu(&mut self, event: Event, movement: &mut Movement<'_>) {
        match event.kind {
            EventKind::LightButtonDown => {
                self.menu_page = match self.menu_page {
                    MenuPage::Unlock => MenuPage::Change,
                    MenuPage::Change => MenuPage::Timeout,
                    MenuPage::Timeout => MenuPage::Unlock,
                }
            }
            EventKind::AlarmButtonDown => match self.menu_page {
                MenuPage::Unlock if movement.pin.is_locked() => {
                    self.status = Status::Entering;
                    self.reason = Reason::Unlock;
                }
                MenuPage::Unlock => movement.pin.lock(),
                MenuPage::Change => {
                    self.status = Status::Entering;
                    self.reason = Reason::Old;
                }
                MenuPage::Timeout => self.status = Status::Timeout,
            },
            _ => self.leave(event, movement),
        }
    }

    fn advance_digit(&mut self) {
        self.digit_index += 1;
        if self.digit_index < PIN_DIGITS {
            return;
        }
        self.digit_index = 0;
        self.animation_tick = 0;
        let entered = core::mem::replace(&mut self.scratch, Pin::EMPTY);
        match self.reason {
            Reason::Unlock | Reason::Old => {
                self.current = entered;
                self.status = Status::Validating;
                self.validating = true;
            }
            Reason::New => {
                self.new_pin = entered;
                self.reason = Reason::Confirm;
            }
            Reason::Confirm => {
                self.new_pin_confirm = entered;
                self.status = Status::Validating;
                self.validating = true;
            }
        }
    }

    fn entering(&mut self, event: Event, movement: &mut Movement<'_>) {
        let (button, digit) = match event.kind {
            EventKind::Tick => {
                self.animation_tick = self.animation_tick.saturating_add(1);
                return;
            }
            EventKind::ModeButtonDown | EventKind::ModeLongPress => (Button::Mode, 0),
            EventKind::LightButtonDown | EventKind::LightLongPress => (Button::Light, 2),
            EventKind::AlarmButtonDown | EventKind::AlarmLongPress => (Button::Alarm, 4),
            EventKind::ModeButtonUp | EventKind::ModeLongUp => return self.release(Button::Mode),
            EventKind::LightButtonUp | EventKind::LightLongUp => return self.release(Button::Light),
            EventKind::AlarmButtonUp | EventKind::AlarmLongUp => return self.release(Button::Alarm),
            _ => return self.leave(event, movement),
        };
        let long = matches!(
            event.kind,
            EventKind::ModeLongPress | EventKind::LightLongPress | EventKind::AlarmLongPress
        );
        match self.active_button {
            None if !long => {
                self.active_button = Some(button);
                self.scratch.set_digit(self.digit_index, digit);
            }
            Some(active) if long && active == button => {
                self.scratch.set_digit(self.digit_index, digit + 1);
            }
            _ => {}
        }
    }

    fn release(&mut self, button: Button) {
        if self.active_button == Some(button) {
            self.active_button = None;
            self.advance_digit();
        }
    }

    fn validate(&mut self, movement: &mut Movement<'_>) {
        self.validating = false;
        self.success = match self.reason {
            Reason::Unlock => movement.pin.unlock(self.current),
            Reason::Old => movement.pin.verify(self.current),
            Reason::Confirm => {
                self.new_pin == self.new_pin_confirm && movement.pin.set_pin(self.current, self.new_pin)
            }
            Reason::New => false,
        };
        if self.success && self.reason == Reason::Confirm {
            // The lock itself already holds the new PIN; the file catches up on retry
            let _ = persistence::store(movement.fs(), PIN_FILE, &self.new_pin);
        }
    }

    fn conclude(&mut self, movement: &mut Movement<'_>) {
        match (self.reason, self.success) {
            (Reason::Unlock, true) => match movement.pin.requesting_face() {
                Some(face) => movement.move_to_face(face),
                None => self.restart_entry(Status::Menu),
            },
            (Reason::Old, true) => {
                self.restart_entry(Status::Entering);
                self.reason = Reason::New;
            }
            (Reason::Confirm, true) => self.restart_entry(Status::Menu),
            (Reason::Confirm, false) => self.reason = Reason::New,
            _ => {}
        }
    }

    fn validating(&mut self, event: Event, movement: &mut Movement<'_>) {
        match event.kind {
            EventKind::Tick => {
                self.animation_tick = self.animation_tick.saturating_add(1);
                match self.animation_tick {
                    1 => self.validate(movement),
                    2 => self.conclude(movement),
                    _ => {}
                }
            }
            EventKind::AlarmButtonDown if !self.validating && !self.success => {
                self.restart_entry(Status::Entering);
            }
            EventKind::LightButtonDown if !self.validating && !self.success => {
                self.restart_entry(Status::Menu);
            }
            EventKind::AlarmButtonDown | EventKind::LightButtonDown => {}
            _ if !self.validating => self.leave(event, movement),
            _ => {}
        }
    }

    fn timeout(&mut self, event: Event, movement: &mut Movement<'_>) {
        match event.kind {
            EventKind::LightButtonDown => self.timeout_page = (self.timeout_page + 1) % LOCK_TIMEOUTS.len(),
            EventKind::AlarmButtonDown => {
                movement.pin.set_lock_timeout(LOCK_TIMEOUTS[self.timeout_page]);
                self.status = Status::Menu;
            }
            _ => self.leave(event, movement),
        }
    }

    fn draw_digits(&self, movement: &mut Movement<'_>) {
        for i in 0..PIN_DIGITS {
            let ch = match self.scratch.digit(i) {
                EMPTY_DIGIT => '-',
                d => char::from(b'0' + d % 10),
            };
            movement.display.character(ch, 4 + i as u8);
        }
    }

    fn draw(&self, movement: &mut Movement<'_>) {
        let locked = movement.pin.is_locked();
        movement.display.clear();
        movement.display.text_with_fallback(Position::Top, "Pin", "Pn");
        let (custom, classic) = match self.status {
            Status::Menu => match self.menu_page {
                MenuPage::Unlock if locked => ("Unlock", " Unloc"),
                MenuPage::Unlock => ("Lock", " LOCK"),
                MenuPage::Change => ("Change", "Edit"),
                MenuPage::Timeout => ("TiMER", " TIMER"),
            },
            Status::Entering if self.reason == Reason::Unlock || self.animation_tick >= 2 => {
                return self.draw_digits(movement);
            }
            Status::Entering => match self.reason {
                Reason::Old => ("Old PN", " Old"),
                Reason::New => ("New PN", " New"),
                _ => ("CONFRM", " Conf"),
            },
            Status::Validating if self.validating => ("testin", " test "),
            Status::Validating if self.success => ("SUCCES", "SUCCES"),
            Status::Validating => ("ERROR", " ERROR"),
            Status::Timeout => {
                let text = match LOCK_TIMEOUTS[self.timeout_page] {
                    1 => "1  min",
                    5 => "5  min",
                    10 => "10 min",
                    _ => "60 min",
                };
                (text, text)
            }
        };
        movement.display.text_with_fallback(Position::Bottom, custom, classic);
    }
}

impl WatchFace for PinFace {
    fn setup(&mut self, face_index: u8, movement: &mut Movement<'_>) {
        movement.pin.enable(face_index);
        if movement.fs_ref().exists(PIN_FILE) {
            let pin: Pin = persistence::load(movement.fs_ref(), PIN_FILE);
            movement.pin.restore_pin(pin);
        }
        let timeout = movement.pin.lock_timeout();
        self.timeout_page = LOCK_TIMEOUTS.iter().position(|&t| t == timeout).unwrap_or(1);
    }

    fn activate(&mut self, movement: &mut Movement<'_>) {
        self.reset();
        if movement.pin.requesting_face().is_some() {
            self.status = Status::Entering;
            self.reason = Reason::Unlock;
        }
    }

    fn handle(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        match self.status {
            Status::Menu => self.menu(event, movement),
            Status::Entering => self.entering(event, movement),
            Status::Validating => self.validating(event, movement),
            Status::Timeout => self.timeout(event, movement),
        }
        self.draw(movement);
        true
    }

    fn resign(&mut self, movement: &mut Movement<'_>) {
        movement.pin.set_requesting_face(None);
    }

    fn name(&self) -> &'static str {
        "pin"
    }
}
