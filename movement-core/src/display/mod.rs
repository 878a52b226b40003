//! Segment display surface
//!
//! Faces draw into a frame buffer of `com x seg` bits through a
//! position-oriented text API. The firmware pushes the buffer to the LCD
//! controller after every runtime pass and emulates blinking and the
//! sleep animation from the state recorded here.
//!
//! Two glass variants exist. The classic glass has three commons and ten
//! digit slots; the custom glass has four commons and eleven slots, with
//! the third top-left character wired as slot 10.

pub mod detect;
mod font;

use core::fmt::Write;

use heapless::String;

pub use detect::{classify, detect_lcd_variant, Detection, ProbeTally};

/// Number of common lines in the frame buffer
pub const COM_COUNT: usize = 4;

/// Highest segment line any variant uses
pub const MAX_SEG: u8 = 23;

/// Digit slots on the larger glass
pub const SLOT_COUNT: usize = 11;

/// Physical LCD variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdVariant {
    /// Original three-common glass
    Classic,
    /// Extended four-common glass
    Custom,
}

/// Logical text region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Position {
    /// Weekday / mode label (two characters, three on custom)
    TopLeft,
    /// Day-of-month digits
    TopRight,
    /// Top-left and top-right as one label
    Top,
    /// Bottom row, first two digits
    Hours,
    /// Bottom row, middle two digits
    Minutes,
    /// Bottom row, last two digits
    Seconds,
    /// The six-character main line
    Bottom,
    /// Every slot, top row first
    Full,
}

/// Single-segment icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    Signal,
    Bell,
    Pm,
    H24,
    Lap,
    Arrows,
    Sleep,
    Colon,
}

impl Indicator {
    /// All indicators
    pub const ALL: [Indicator; 8] = [
        Indicator::Signal,
        Indicator::Bell,
        Indicator::Pm,
        Indicator::H24,
        Indicator::Lap,
        Indicator::Arrows,
        Indicator::Sleep,
        Indicator::Colon,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Hardware blink request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Blink {
    Off,
    Character { ch: u8, duration_ms: u32 },
    Indicator { indicator: Indicator, duration_ms: u32 },
}

/// Sleep animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SleepAnimation {
    pub period_ms: u32,
    frame: u8,
}

/// Slot holding the blinking character
const BLINK_POSITION: u8 = 7;
/// Slot the classic sleep animation runs through
const ANIMATION_POSITION: u8 = 8;
/// Classic pixels the circular shift walks between
const CLASSIC_ANIMATION_PIXELS: [(u8, u8); 2] = [(1, 2), (1, 3)];
/// Classic slot 7 segment B cannot blink with the rest of the slot
const CLASSIC_UNBLINKABLE: (u8, u8) = (2, 10);
/// Custom decimal point between the minutes and seconds digits
const CUSTOM_DECIMAL: (u8, u8) = (0, 14);
/// Custom leading "1" in front of the bottom row
const CUSTOM_LEADING_ONE: (u8, u8) = (0, 22);

const CUSTOM_TOP_LEFT: &[u8] = &[0, 1, 10];
const CUSTOM_TOP: &[u8] = &[0, 1, 10, 2, 3];
const CUSTOM_FULL: &[u8] = &[0, 1, 10, 2, 3, 4, 5, 6, 7, 8, 9];
const CLASSIC_TOP_LEFT: &[u8] = &[0, 1];
const CLASSIC_TOP: &[u8] = &[0, 1, 2, 3];
const CLASSIC_FULL: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
const TOP_RIGHT: &[u8] = &[2, 3];
const HOURS: &[u8] = &[4, 5];
const MINUTES: &[u8] = &[6, 7];
const SECONDS: &[u8] = &[8, 9];
const BOTTOM: &[u8] = &[4, 5, 6, 7, 8, 9];

/// The display frame buffer and its animation state
#[derive(Debug, Clone)]
pub struct Display {
    variant: LcdVariant,
    frame: [u32; COM_COUNT],
    indicators: u8,
    /// Last character drawn into each slot
    chars: [u8; SLOT_COUNT],
    blink: Blink,
    animation: Option<SleepAnimation>,
    dirty: bool,
}

impl Display {
    /// Create a blank display for `variant`
    pub fn new(variant: LcdVariant) -> Self {
        Self {
            variant,
            frame: [0; COM_COUNT],
            indicators: 0,
            chars: [b' '; SLOT_COUNT],
            blink: Blink::Off,
            animation: None,
            dirty: true,
        }
    }

    /// The installed glass
    pub fn variant(&self) -> LcdVariant {
        self.variant
    }

    /// Shorthand for `variant() == LcdVariant::Custom`
    pub fn is_custom(&self) -> bool {
        self.variant == LcdVariant::Custom
    }

    /// Raw frame, one segment bitmask per common
    pub fn frame(&self) -> &[u32; COM_COUNT] {
        &self.frame
    }

    /// Frame as it should appear during the given blink phase
    pub fn rendered(&self, blink_visible: bool) -> [u32; COM_COUNT] {
        if blink_visible {
            return self.frame;
        }
        let mask = self.blink_mask();
        let mut out = self.frame;
        for (row, m) in out.iter_mut().zip(mask.iter()) {
            *row &= !m;
        }
        out
    }

    /// Return and clear the "needs flushing" flag
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// Turn one segment on
    ///
    /// Addresses outside the frame are ignored.
    pub fn set_pixel(&mut self, com: u8, seg: u8) {
        if usize::from(com) < COM_COUNT && seg <= MAX_SEG {
            self.frame[usize::from(com)] |= 1 << seg;
            self.dirty = true;
        }
    }

    /// Turn one segment off
    pub fn clear_pixel(&mut self, com: u8, seg: u8) {
        if usize::from(com) < COM_COUNT && seg <= MAX_SEG {
            self.frame[usize::from(com)] &= !(1 << seg);
            self.dirty = true;
        }
    }

    /// Read one segment
    pub fn pixel(&self, com: u8, seg: u8) -> bool {
        usize::from(com) < COM_COUNT && seg <= MAX_SEG && self.frame[usize::from(com)] & (1 << seg) != 0
    }

    /// Blank every segment and indicator
    pub fn clear(&mut self) {
        self.frame = [0; COM_COUNT];
        self.indicators = 0;
        self.chars = [b' '; SLOT_COUNT];
        self.dirty = true;
    }

    /// Characters last drawn into a region, as text
    ///
    /// Segments set directly with [`Self::set_pixel`] are not reflected.
    pub fn text_at(&self, position: Position) -> String<SLOT_COUNT> {
        let mut out = String::new();
        for slot in self.slots(position) {
            let _ = out.push(char::from(self.chars[usize::from(*slot)]));
        }
        out
    }

    /// Draw one character into digit slot `position` (0-10)
    ///
    /// Slots the variant lacks are ignored.
    pub fn character(&mut self, ch: char, position: u8) {
        let ch = if ch.is_ascii() { ch as u8 } else { b' ' };
        let Some(mapping) = font::digit(self.variant, position) else {
            return;
        };
        self.chars[usize::from(position)] = ch;
        let ch = font::remap(self.variant, ch, position);

        let extras = match self.variant {
            LcdVariant::Classic => font::classic_extras(ch, position),
            LcdVariant::Custom => (None, None),
        };
        if let Some(addr) = extras.0 {
            self.clear_pixel(addr.com, addr.seg);
        }

        let mut bits = font::glyph(self.variant, ch);
        for segment in mapping.iter() {
            if let Some(addr) = segment {
                if bits & 1 != 0 {
                    self.set_pixel(addr.com, addr.seg);
                } else {
                    self.clear_pixel(addr.com, addr.seg);
                }
            }
            bits >>= 1;
        }

        if let Some(addr) = extras.1 {
            self.set_pixel(addr.com, addr.seg);
        }
    }

    fn slots(&self, position: Position) -> &'static [u8] {
        let custom = self.is_custom();
        match position {
            Position::TopLeft if custom => CUSTOM_TOP_LEFT,
            Position::TopLeft => CLASSIC_TOP_LEFT,
            Position::Top if custom => CUSTOM_TOP,
            Position::Top => CLASSIC_TOP,
            Position::Full if custom => CUSTOM_FULL,
            Position::Full => CLASSIC_FULL,
            Position::TopRight => TOP_RIGHT,
            Position::Hours => HOURS,
            Position::Minutes => MINUTES,
            Position::Seconds => SECONDS,
            Position::Bottom => BOTTOM,
        }
    }

    /// Write `text` into a region; characters past the region are dropped
    pub fn text(&mut self, position: Position, text: &str) {
        let slots = self.slots(position);
        if self.is_custom() && slots.contains(&4) {
            self.clear_pixel(CUSTOM_LEADING_ONE.0, CUSTOM_LEADING_ONE.1);
        }
        for (slot, ch) in slots.iter().zip(text.chars()) {
            self.character(ch, *slot);
        }
    }

    /// Write `primary` on the custom glass and `fallback` on the classic one
    pub fn text_with_fallback(&mut self, position: Position, primary: &str, fallback: &str) {
        let text = if self.is_custom() { primary } else { fallback };
        self.text(position, text);
    }

    fn indicator_pixel(&self, indicator: Indicator) -> Option<(u8, u8)> {
        match self.variant {
            LcdVariant::Custom => Some(match indicator {
                Indicator::Signal => (0, 21),
                Indicator::Bell => (1, 21),
                Indicator::Pm => (3, 21),
                Indicator::H24 => (2, 21),
                Indicator::Lap => (1, 0),
                Indicator::Arrows => (2, 0),
                Indicator::Sleep => (3, 0),
                Indicator::Colon => (0, 0),
            }),
            LcdVariant::Classic => match indicator {
                Indicator::Signal => Some((0, 17)),
                Indicator::Bell => Some((0, 16)),
                Indicator::Pm => Some((2, 17)),
                Indicator::H24 => Some((2, 16)),
                // Arrows shares the lap segment on the classic glass
                Indicator::Lap | Indicator::Arrows => Some((1, 10)),
                Indicator::Colon => Some((1, 16)),
                Indicator::Sleep => None,
            },
        }
    }

    /// Light an indicator (silently ignored if the glass lacks it)
    pub fn set_indicator(&mut self, indicator: Indicator) {
        self.indicators |= indicator.bit();
        if let Some((com, seg)) = self.indicator_pixel(indicator) {
            self.set_pixel(com, seg);
        }
    }

    /// Clear an indicator
    pub fn clear_indicator(&mut self, indicator: Indicator) {
        self.indicators &= !indicator.bit();
        if let Some((com, seg)) = self.indicator_pixel(indicator) {
            self.clear_pixel(com, seg);
        }
    }

    /// Set or clear an indicator
    pub fn indicate(&mut self, indicator: Indicator, on: bool) {
        if on {
            self.set_indicator(indicator);
        } else {
            self.clear_indicator(indicator);
        }
    }

    /// Clear every indicator except the colon
    pub fn clear_all_indicators(&mut self) {
        for indicator in Indicator::ALL {
            if indicator != Indicator::Colon {
                self.clear_indicator(indicator);
            }
        }
    }

    /// Whether an indicator was last set
    pub fn is_indicator_set(&self, indicator: Indicator) -> bool {
        self.indicators & indicator.bit() != 0
    }

    /// Light the decimal point (custom glass only)
    pub fn set_decimal_if_available(&mut self) {
        if self.is_custom() {
            self.set_pixel(CUSTOM_DECIMAL.0, CUSTOM_DECIMAL.1);
        }
    }

    /// Clear the decimal point (custom glass only)
    pub fn clear_decimal_if_available(&mut self) {
        if self.is_custom() {
            self.clear_pixel(CUSTOM_DECIMAL.0, CUSTOM_DECIMAL.1);
        }
    }

    /// Show a number with two decimals in the bottom row, followed by `units`
    ///
    /// Values below -99.99 show "Undflo" and above 199.99 show "Ovrflo".
    /// The format is chosen by magnitude:
    ///
    /// | range              | text (custom)            | text (classic)        |
    /// |--------------------|--------------------------|-----------------------|
    /// | 0 to 99.99         | `ii.ff` + units          | `iiff` + units        |
    /// | 100 to 199.99      | leading 1, `ii.ff`       | `iii` right-aligned   |
    /// | -9.99 to -0.01     | `-i.ff` + units          | `-iff` + units        |
    /// | -99.99 to -10      | integer, right-aligned   | integer, right-aligned|
    pub fn float_with_best_effort(&mut self, value: f32, units: &str) {
        let mut buf: String<12> = String::new();

        let hundredths = if value.is_nan() {
            i32::MAX
        } else if value >= 0.0 {
            (value * 100.0 + 0.5) as i32
        } else {
            (value * 100.0 - 0.5) as i32
        };
        let units = units.get(..units.len().min(2)).unwrap_or("");

        if hundredths > 19_999 {
            self.clear_decimal_if_available();
            self.text(Position::Bottom, "Ovrflo");
            return;
        }
        if hundredths < -9_999 {
            self.clear_decimal_if_available();
            self.text(Position::Bottom, "Undflo");
            return;
        }

        let magnitude = hundredths.unsigned_abs();
        let whole = magnitude / 100;
        let frac = magnitude % 100;
        let mut leading_one = false;
        let decimal = match hundredths {
            0..=9_999 => {
                let _ = write!(buf, "{:2}{:02}{}", whole, frac, units);
                true
            }
            10_000.. => {
                if self.is_custom() {
                    let _ = write!(buf, "{:02}{:02}{}", whole - 100, frac, units);
                    leading_one = true;
                    true
                } else {
                    let _ = write!(buf, "{:4}{}", whole, units);
                    false
                }
            }
            -999..=-1 => {
                let _ = write!(buf, "-{:1}{:02}{}", whole, frac, units);
                true
            }
            _ => {
                let _ = write!(buf, "{:4}{}", -(whole as i32), units);
                false
            }
        };

        self.text(Position::Bottom, &buf);
        if decimal {
            self.set_decimal_if_available();
        } else {
            self.clear_decimal_if_available();
        }
        if leading_one {
            self.set_pixel(CUSTOM_LEADING_ONE.0, CUSTOM_LEADING_ONE.1);
        }
    }

    /// Start the low-energy "tick" animation
    ///
    /// The classic glass walks a lit segment through slot 8; the custom
    /// glass only lights the sleep indicator.
    pub fn start_sleep_animation(&mut self, period_ms: u32) {
        match self.variant {
            LcdVariant::Classic => {
                self.character(' ', ANIMATION_POSITION);
                let (com, seg) = CLASSIC_ANIMATION_PIXELS[0];
                self.set_pixel(com, seg);
            }
            LcdVariant::Custom => self.set_indicator(Indicator::Sleep),
        }
        self.animation = Some(SleepAnimation { period_ms, frame: 0 });
    }

    /// Stop the sleep animation
    pub fn stop_sleep_animation(&mut self) {
        if self.animation.take().is_none() {
            return;
        }
        match self.variant {
            LcdVariant::Classic => self.character(' ', ANIMATION_POSITION),
            LcdVariant::Custom => self.clear_indicator(Indicator::Sleep),
        }
    }

    /// Whether the sleep animation is running
    pub fn sleep_animation_is_running(&self) -> bool {
        self.animation.is_some()
    }

    /// Current sleep animation, if any
    pub fn sleep_animation(&self) -> Option<SleepAnimation> {
        self.animation
    }

    /// Advance the sleep animation by one frame (classic circular shift)
    pub fn advance_animation(&mut self) {
        let Some(mut animation) = self.animation else {
            return;
        };
        if self.variant == LcdVariant::Classic {
            let len = CLASSIC_ANIMATION_PIXELS.len() as u8;
            let (com, seg) = CLASSIC_ANIMATION_PIXELS[usize::from(animation.frame)];
            self.clear_pixel(com, seg);
            animation.frame = (animation.frame + 1) % len;
            let (com, seg) = CLASSIC_ANIMATION_PIXELS[usize::from(animation.frame)];
            self.set_pixel(com, seg);
        }
        self.animation = Some(animation);
    }

    /// Show `ch` in slot 7 and blink it
    pub fn start_character_blink(&mut self, ch: char, duration_ms: u32) {
        self.character(ch, BLINK_POSITION);
        if self.variant == LcdVariant::Classic {
            self.clear_pixel(CLASSIC_UNBLINKABLE.0, CLASSIC_UNBLINKABLE.1);
        }
        let ch = if ch.is_ascii() { ch as u8 } else { b' ' };
        self.blink = Blink::Character { ch, duration_ms };
        self.dirty = true;
    }

    /// Blink an indicator if its segment sits on a blinkable line
    ///
    /// Only segment lines 0 and 1 can blink. Returns whether blinking
    /// started.
    pub fn start_indicator_blink_if_possible(&mut self, indicator: Indicator, duration_ms: u32) -> bool {
        match self.indicator_pixel(indicator) {
            Some((com, seg)) if seg <= 1 => {
                self.set_pixel(com, seg);
                self.indicators |= indicator.bit();
                self.blink = Blink::Indicator {
                    indicator,
                    duration_ms,
                };
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Stop any blink
    pub fn stop_blink(&mut self) {
        if self.blink != Blink::Off {
            self.blink = Blink::Off;
            self.dirty = true;
        }
    }

    /// Current blink request
    pub fn blink(&self) -> Blink {
        self.blink
    }

    /// Segments that go dark during the off phase of the blink
    pub fn blink_mask(&self) -> [u32; COM_COUNT] {
        let mut mask = [0u32; COM_COUNT];
        match self.blink {
            Blink::Off => {}
            Blink::Character { .. } => match self.variant {
                LcdVariant::Classic => {
                    for row in mask.iter_mut().take(3) {
                        *row = 0b11;
                    }
                }
                LcdVariant::Custom => {
                    if let Some(mapping) = font::digit(self.variant, BLINK_POSITION) {
                        for addr in mapping.iter().flatten() {
                            mask[usize::from(addr.com)] |= 1 << addr.seg;
                        }
                    }
                }
            },
            Blink::Indicator { indicator, .. } => {
                if let Some((com, seg)) = self.indicator_pixel(indicator) {
                    mask[usize::from(com)] |= 1 << seg;
                }
            }
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn custom() -> Display {
        Display::new(LcdVariant::Custom)
    }

    fn classic() -> Display {
        Display::new(LcdVariant::Classic)
    }

    /// Whether slot `position` shows exactly what drawing `ch` there produces
    fn shows(display: &Display, ch: char, position: u8) -> bool {
        let Some(mapping) = font::digit(display.variant, position) else {
            return false;
        };
        let mut reference = Display::new(display.variant);
        reference.character(ch, position);
        mapping
            .iter()
            .flatten()
            .all(|a| display.pixel(a.com, a.seg) == reference.pixel(a.com, a.seg))
    }

    #[test]
    fn test_character_sets_segments() {
        let mut d = custom();
        d.character('8', 4);
        // '8' lights A-G
        assert!(d.pixel(3, 16));
        assert!(d.pixel(2, 22));
        d.character(' ', 4);
        assert!(!d.pixel(3, 16));
    }

    #[test]
    fn test_text_positions() {
        let mut d = custom();
        d.text(Position::Bottom, "123456");
        assert!(shows(&d, '1', 4));
        assert!(shows(&d, '6', 9));
        d.text(Position::TopRight, "20");
        assert!(shows(&d, '2', 2));
        assert!(shows(&d, '0', 3));
    }

    #[test]
    fn test_custom_top_uses_slot_ten() {
        let mut d = custom();
        d.text(Position::Top, "CLOCK");
        assert!(shows(&d, 'O', 10));
        assert!(shows(&d, 'C', 2));
    }

    #[test]
    fn test_text_truncates() {
        let mut d = classic();
        d.text(Position::TopRight, "12345");
        let before = *d.frame();
        d.text(Position::Bottom, "      ");
        // Bottom slots are untouched by the overlong TopRight write
        assert_eq!(before, *d.frame());
    }

    #[test]
    fn test_fallback_by_variant() {
        let mut a = custom();
        a.text_with_fallback(Position::TopLeft, "WO", "WD");
        assert!(shows(&a, 'O', 1));
        let mut b = classic();
        b.text_with_fallback(Position::TopLeft, "WO", "WD");
        assert!(shows(&b, 'D', 1));
    }

    #[test]
    fn test_invalid_slot_ignored() {
        let mut d = classic();
        d.character('8', 10);
        assert_eq!(*d.frame(), [0; COM_COUNT]);
        d.set_pixel(7, 3);
        d.set_pixel(0, 40);
        assert_eq!(*d.frame(), [0; COM_COUNT]);
    }

    #[test]
    fn test_classic_descender_and_ninth_segment() {
        let mut d = classic();
        d.character('T', 1);
        assert!(d.pixel(1, 12));
        d.character('D', 0);
        assert!(d.pixel(0, 15));
        d.character('A', 0);
        assert!(!d.pixel(0, 15));
    }

    #[test]
    fn test_classic_sleep_indicator_degrades() {
        let mut d = classic();
        d.set_indicator(Indicator::Sleep);
        assert_eq!(*d.frame(), [0; COM_COUNT]);
        assert!(d.is_indicator_set(Indicator::Sleep));
    }

    #[test]
    fn test_float_formats() {
        let mut d = custom();
        d.float_with_best_effort(23.456, "#C");
        assert!(shows(&d, '2', 4));
        assert!(shows(&d, '3', 5));
        assert!(shows(&d, '4', 6));
        assert!(shows(&d, '6', 7));
        assert!(d.pixel(CUSTOM_DECIMAL.0, CUSTOM_DECIMAL.1));

        d.float_with_best_effort(150.0, " V");
        assert!(d.pixel(CUSTOM_LEADING_ONE.0, CUSTOM_LEADING_ONE.1));
        assert!(shows(&d, '5', 4));

        d.float_with_best_effort(-5.5, "#C");
        assert!(shows(&d, '-', 4));
        assert!(!d.pixel(CUSTOM_LEADING_ONE.0, CUSTOM_LEADING_ONE.1));

        d.float_with_best_effort(-42.0, "#C");
        assert!(!d.pixel(CUSTOM_DECIMAL.0, CUSTOM_DECIMAL.1));
        assert!(shows(&d, '-', 5));
    }

    #[test]
    fn test_float_overflow_markers() {
        let mut d = custom();
        d.float_with_best_effort(200.0, "");
        assert!(shows(&d, 'O', 4));
        d.float_with_best_effort(-100.0, "");
        assert!(shows(&d, 'U', 4));
        d.float_with_best_effort(f32::NAN, "");
        assert!(shows(&d, 'O', 4));
    }

    #[test]
    fn test_sleep_animation_classic_walks() {
        let mut d = classic();
        d.start_sleep_animation(1000);
        assert!(d.sleep_animation_is_running());
        assert!(d.pixel(1, 2));
        d.advance_animation();
        assert!(!d.pixel(1, 2));
        assert!(d.pixel(1, 3));
        d.stop_sleep_animation();
        assert!(!d.sleep_animation_is_running());
        assert!(!d.pixel(1, 3));
    }

    #[test]
    fn test_sleep_animation_custom_uses_indicator() {
        let mut d = custom();
        d.start_sleep_animation(500);
        assert!(d.is_indicator_set(Indicator::Sleep));
        d.stop_sleep_animation();
        assert!(!d.is_indicator_set(Indicator::Sleep));
    }

    #[test]
    fn test_character_blink_mask() {
        let mut d = classic();
        d.start_character_blink('A', 500);
        assert!(!d.pixel(2, 10));
        let hidden = d.rendered(false);
        for row in hidden.iter().take(3) {
            assert_eq!(row & 0b11, 0);
        }
        assert_eq!(d.rendered(true), *d.frame());
        d.stop_blink();
        assert_eq!(d.blink(), Blink::Off);
    }

    #[test]
    fn test_indicator_blink_if_possible() {
        let mut d = custom();
        assert!(d.start_indicator_blink_if_possible(Indicator::Lap, 1000));
        assert!(!d.start_indicator_blink_if_possible(Indicator::Bell, 1000));
        let mut c = classic();
        assert!(!c.start_indicator_blink_if_possible(Indicator::Lap, 1000));
    }

    #[test]
    fn test_take_dirty() {
        let mut d = custom();
        assert!(d.take_dirty());
        assert!(!d.take_dirty());
        d.set_indicator(Indicator::Bell);
        assert!(d.take_dirty());
    }

    #[test]
    fn test_text_at_reads_back() {
        let mut d = custom();
        d.text(Position::Top, "WEd 4");
        d.text(Position::Bottom, "  1234");
        assert_eq!(d.text_at(Position::TopLeft).as_str(), "WEd");
        assert_eq!(d.text_at(Position::TopRight).as_str(), " 4");
        assert_eq!(d.text_at(Position::Minutes).as_str(), "12");
        d.clear();
        assert_eq!(d.text_at(Position::Bottom).as_str(), "      ");
    }

    fn indicator_strategy() -> impl Strategy<Value = Indicator> {
        (0usize..8).prop_map(|i| Indicator::ALL[i])
    }

    proptest! {
        #[test]
        fn test_indicator_set_clear_restores_pixels(
            ind in indicator_strategy(),
            custom_glass in any::<bool>(),
            text in "[ -~]{0,10}",
        ) {
            let mut d = Display::new(if custom_glass { LcdVariant::Custom } else { LcdVariant::Classic });
            d.text(Position::Full, &text);
            d.clear_indicator(ind);
            let before = *d.frame();
            d.set_indicator(ind);
            d.clear_indicator(ind);
            prop_assert_eq!(before, *d.frame());
        }

        #[test]
        fn test_float_monotonic_below_hundred(
            a in 0u32..10_000,
            b in 0u32..10_000,
            custom_glass in any::<bool>(),
        ) {
            let variant = if custom_glass { LcdVariant::Custom } else { LcdVariant::Classic };
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let low = float_digits(variant, lo);
            let high = float_digits(variant, hi);
            prop_assert!(low.as_str() <= high.as_str(), "{} -> {:?}, {} -> {:?}", lo, low, hi, high);
            prop_assert_eq!(low.trim_start().parse::<u32>().ok(), Some(lo));
        }
    }

    /// First four bottom-row characters after formatting `hundredths / 100`
    fn float_digits(variant: LcdVariant, hundredths: u32) -> String<4> {
        let mut d = Display::new(variant);
        d.float_with_best_effort(hundredths as f32 / 100.0, "");
        d.text_at(Position::Bottom).chars().take(4).collect()
    }

    #[test]
    fn test_float_range_boundaries() {
        for variant in [LcdVariant::Classic, LcdVariant::Custom] {
            let mut d = Display::new(variant);
            d.float_with_best_effort(199.99, "");
            assert_ne!(d.text_at(Position::Bottom).as_str(), "Ovrflo");
            d.float_with_best_effort(200.0, "");
            assert_eq!(d.text_at(Position::Bottom).as_str(), "Ovrflo");
            d.float_with_best_effort(-99.99, "");
            assert_ne!(d.text_at(Position::Bottom).as_str(), "Undflo");
            assert!(d.text_at(Position::Bottom).starts_with(" -99"));
            d.float_with_best_effort(-100.0, "");
            assert_eq!(d.text_at(Position::Bottom).as_str(), "Undflo");
        }
    }
}
