//! Heads or tails
//!
//! LIGHT or ALARM flips the coin: a short spinning animation at 8 Hz,
//! then the result. After 15 idle seconds the splash comes back.

use movement_core::display::{LcdVariant, Position};
use movement_core::{Event, EventKind, Movement, WatchFace};

/// Idle ticks before the splash returns
pub const IDLE_TICKS: u8 = 15;

const ANIMATION_HZ: u8 = 8;

/// Full passes over the frame table per flip
const ANIMATION_LOOPS: u8 = 2;

const CLASSIC_FRAMES: [&[(u8, u8)]; 3] = [&[(0, 3), (0, 6)], &[(1, 3), (1, 5)], &[(2, 2), (2, 4)]];

const CUSTOM_FRAMES: [&[(u8, u8)]; 3] = [
    &[(2, 22), (2, 15), (1, 2), (1, 4)],
    &[(0, 16), (0, 15), (0, 1), (0, 3)],
    &[(3, 16), (3, 14), (3, 1), (3, 3)],
];

const FRAME_COUNT: u8 = 3 * ANIMATION_LOOPS;

/// Coin flip face
#[derive(Debug, Clone, Default)]
pub struct CoinFlipFace {
    /// Next animation frame while a flip is running
    flipping: Option<u8>,
    is_start_face: bool,
    idle_ticks: u8,
    heads: Option<bool>,
}

impl CoinFlipFace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of the last flip, `None` before the first one
    pub fn last_result(&self) -> Option<bool> {
        self.heads
    }

    fn draw_start_face(&mut self, movement: &mut Movement<'_>) {
        let display = &mut movement.display;
        display.clear();
        display.text_with_fallback(Position::Bottom, "Flip", " Flip");
        self.is_start_face = true;
        self.idle_ticks = 0;
    }

    fn start_flip(&mut self, movement: &mut Movement<'_>) {
        self.flipping = Some(0);
        self.is_start_face = false;
        self.idle_ticks = 0;
        movement.request_tick_frequency(ANIMATION_HZ);
    }

    fn animate(&mut self, frame: u8, movement: &mut Movement<'_>) {
        if frame >= FRAME_COUNT {
            self.flipping = None;
            movement.request_tick_frequency(1);
            let heads = movement.rng().below(2) == 1;
            self.heads = Some(heads);
            let display = &mut movement.display;
            display.clear();
            if heads {
                display.text(Position::Bottom, "Heads");
            } else {
                display.text_with_fallback(Position::Bottom, "Tails", " Tails");
            }
            return;
        }
        let frames = match movement.display.variant() {
            LcdVariant::Classic => &CLASSIC_FRAMES,
            LcdVariant::Custom => &CUSTOM_FRAMES,
        };
        movement.display.clear();
        for (com, seg) in frames[usize::from(frame % 3)].iter() {
            movement.display.set_pixel(*com, *seg);
        }
        self.flipping = Some(frame + 1);
    }
}

impl WatchFace for CoinFlipFace {
    fn setup(&mut self, _face_index: u8, _movement: &mut Movement<'_>) {}

    fn activate(&mut self, _movement: &mut Movement<'_>) {
        self.flipping = None;
    }

    fn handle(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        match event.kind {
            EventKind::Activate => self.draw_start_face(movement),
            EventKind::Tick => match self.flipping {
                Some(frame) => self.animate(frame, movement),
                None if !self.is_start_face => {
                    self.idle_ticks = self.idle_ticks.saturating_add(1);
                    if self.idle_ticks >= IDLE_TICKS {
                        self.draw_start_face(movement);
                    }
                }
                None => self.idle_ticks = 0,
            },
            EventKind::LightButtonUp | EventKind::AlarmButtonUp => {
                if self.flipping.is_none() {
                    self.start_flip(movement);
                }
            }
            EventKind::Timeout => {
                self.draw_start_face(movement);
                movement.move_to_face(0);
            }
            EventKind::LowEnergyUpdate => {}
            _ => return movement.default_loop_handler(event),
        }
        true
    }

    fn resign(&mut self, movement: &mut Movement<'_>) {
        if self.flipping.take().is_some() {
            movement.request_tick_frequency(1);
        }
    }

    fn name(&self) -> &'static str {
        "coin_flip"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{send, start, ticks};
    use movement_core::mock::{ScriptedRng, TestBench};

    fn flip(face: &mut CoinFlipFace, m: &mut Movement<'_>) {
        send(face, m, EventKind::AlarmButtonUp);
        assert_eq!(m.tick_frequency(), ANIMATION_HZ);
        ticks(face, m, usize::from(FRAME_COUNT) + 1);
        assert_eq!(m.tick_frequency(), 1);
    }

    #[test]
    fn test_splash_on_activate() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        let mut face = CoinFlipFace::new();
        start(&mut face, 0, &mut m);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " Flip ");
    }

    #[test]
    fn test_idle_then_flip_then_splash() {
        let mut bench = TestBench::new();
        bench.rng = ScriptedRng::new(&[1, 0]);
        let mut m = bench.movement();
        let mut face = CoinFlipFace::new();
        start(&mut face, 0, &mut m);
        ticks(&mut face, &mut m, 30);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " Flip ");

        flip(&mut face, &mut m);
        assert_eq!(face.last_result(), Some(true));
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "Heads ");

        flip(&mut face, &mut m);
        assert_eq!(face.last_result(), Some(false));
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " Tails");

        ticks(&mut face, &mut m, usize::from(IDLE_TICKS) - 1);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " Tails");
        ticks(&mut face, &mut m, 1);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " Flip ");
    }

    #[test]
    fn test_custom_glass_texts() {
        let mut bench = TestBench::new();
        bench.variant = LcdVariant::Custom;
        bench.rng = ScriptedRng::new(&[0]);
        let mut m = bench.movement();
        let mut face = CoinFlipFace::new();
        start(&mut face, 0, &mut m);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "Flip  ");
        flip(&mut face, &mut m);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "Tails ");
    }

    #[test]
    fn test_animation_lights_frame_pixels() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        let mut face = CoinFlipFace::new();
        start(&mut face, 0, &mut m);
        send(&mut face, &mut m, EventKind::LightButtonUp);
        ticks(&mut face, &mut m, 1);
        assert!(m.display.pixel(0, 3));
        assert!(m.display.pixel(0, 6));
        ticks(&mut face, &mut m, 1);
        assert!(!m.display.pixel(0, 3));
        assert!(m.display.pixel(1, 5));
    }

    #[test]
    fn test_timeout_goes_home() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        let mut face = CoinFlipFace::new();
        start(&mut face, 0, &mut m);
        send(&mut face, &mut m, EventKind::Timeout);
        assert!(m.face_change_pending());
    }
}
