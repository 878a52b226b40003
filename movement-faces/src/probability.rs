//! Dice roller
//!
//! LIGHT (or a single tap) cycles through d2, d4, d6, d8, d10, d12, d20
//! and d100. ALARM rolls: four animation frames at 8 Hz, then the result.
//! A d2 roll reads as heads or tails.

use movement_core::display::{LcdVariant, Position};
use movement_core::{Event, EventKind, Movement, WatchFace};

use crate::format;

/// Available dice, in cycling order
pub const DICE_TYPES: [u8; 8] = [2, 4, 6, 8, 10, 12, 20, 100];

const DEFAULT_DICE_SIDES: u8 = 2;
const ANIMATION_HZ: u8 = 8;

/// The last frame lights nothing and ends the roll
const CLASSIC_FRAMES: [&[(u8, u8)]; 4] = [&[(1, 4), (1, 6)], &[(2, 4), (0, 6)], &[(2, 5), (0, 5)], &[]];
const CUSTOM_FRAMES: [&[(u8, u8)]; 4] = [&[(2, 6), (2, 7)], &[(3, 6), (0, 7)], &[(3, 7), (0, 6)], &[]];

/// Dice roller face
#[derive(Debug, Clone)]
pub struct ProbabilityFace {
    dice_sides: u8,
    /// 0 until the first roll
    rolled_value: u8,
    /// Next animation frame while rolling
    rolling: Option<u8>,
}

impl Default for ProbabilityFace {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbabilityFace {
    pub fn new() -> Self {
        Self {
            dice_sides: DEFAULT_DICE_SIDES,
            rolled_value: 0,
            rolling: None,
        }
    }

    pub fn dice_sides(&self) -> u8 {
        self.dice_sides
    }

    pub fn rolled_value(&self) -> u8 {
        self.rolled_value
    }

    pub fn is_rolling(&self) -> bool {
        self.rolling.is_some()
    }

    fn cycle_dice(&mut self) {
        let index = DICE_TYPES.iter().position(|&d| d == self.dice_sides).unwrap_or(0);
        self.dice_sides = DICE_TYPES[(index + 1) % DICE_TYPES.len()];
        self.rolled_value = 0;
    }

    fn draw(&self, movement: &mut Movement<'_>) {
        let display = &mut movement.display;
        if self.dice_sides == 100 {
            display.text_with_fallback(Position::TopRight, "00", " C");
        } else {
            display.text(Position::TopRight, &format::<2>(format_args!("{:2}", self.dice_sides)));
        }

        match (self.rolled_value, self.dice_sides) {
            (0, _) => display.text(Position::Bottom, "----  "),
            (1, 2) => display.text(Position::Bottom, "HEAdS "),
            (_, 2) => display.text(Position::Bottom, "TAiLS "),
            (100, _) => display.text(Position::Bottom, " 100"),
            (value, _) => display.text(Position::Bottom, &format::<4>(format_args!("{:4}", value))),
        }
    }

    fn roll(&mut self, movement: &mut Movement<'_>) {
        self.rolled_value = movement.rng().below(u32::from(self.dice_sides)) as u8 + 1;
        self.rolling = Some(0);
        movement.request_tick_frequency(ANIMATION_HZ);
    }

    fn animate(&mut self, frame: u8, movement: &mut Movement<'_>) {
        let frames = match movement.display.variant() {
            LcdVariant::Classic => &CLASSIC_FRAMES,
            LcdVariant::Custom => &CUSTOM_FRAMES,
        };
        let display = &mut movement.display;
        if frame == 0 {
            display.text(Position::Hours, "  ");
            display.text(Position::Minutes, "  ");
            display.text(Position::Seconds, "  ");
        } else {
            for (com, seg) in frames[usize::from(frame - 1)].iter() {
                display.clear_pixel(*com, *seg);
            }
        }
        for (com, seg) in frames[usize::from(frame)].iter() {
            display.set_pixel(*com, *seg);
        }

        let next = frame + 1;
        if usize::from(next) >= frames.len() {
            self.rolling = None;
            movement.request_tick_frequency(1);
            self.draw(movement);
        } else {
            self.rolling = Some(next);
        }
    }
}

impl WatchFace for ProbabilityFace {
    fn setup(&mut self, _face_index: u8, _movement: &mut Movement<'_>) {}

    fn activate(&mut self, movement: &mut Movement<'_>) {
        self.dice_sides = DEFAULT_DICE_SIDES;
        self.rolled_value = 0;
        self.rolling = None;
        movement.display.text_with_fallback(Position::Top, "Prb", "PR");
        movement.request_tick_frequency(1);
    }

    fn handle(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        if self.rolling.is_some() && event.kind != EventKind::Tick {
            return true;
        }
        match event.kind {
            EventKind::Activate => self.draw(movement),
            EventKind::Tick => {
                if let Some(frame) = self.rolling {
                    self.animate(frame, movement);
                }
            }
            EventKind::LightButtonUp | EventKind::SingleTap => {
                self.cycle_dice();
                self.draw(movement);
            }
            EventKind::AlarmButtonUp => self.roll(movement),
            EventKind::LowEnergyUpdate => movement.display.text(Position::Bottom, "SLEEP "),
            _ => return movement.default_loop_handler(event),
        }
        true
    }

    fn resign(&mut self, movement: &mut Movement<'_>) {
        if self.rolling.take().is_some() {
            movement.request_tick_frequency(1);
        }
    }

    fn name(&self) -> &'static str {
        "probability"
    }
}
