//! Segment fonts and digit wiring for both LCD variants
//!
//! Each glyph is an 8-bit pattern, bit 0 = segment A through bit 7 =
//! segment H, indexed from ASCII space (0x20) to tilde (0x7E). Each digit
//! slot lists the (com, seg) address of its segments A-H; slots whose
//! glyph cell lacks a segment carry [`NONE`]. These tables are the panel
//! wiring and must stay byte-for-byte.

use super::LcdVariant;

/// Address of one LCD segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SegmentAddress {
    pub com: u8,
    pub seg: u8,
}

/// Segments A-H of one digit slot
pub(crate) type DigitMapping = [Option<SegmentAddress>; 8];

const NONE: Option<SegmentAddress> = None;

const fn seg(com: u8, seg: u8) -> Option<SegmentAddress> {
    Some(SegmentAddress { com, seg })
}

/// First printable character in the font
pub(crate) const FIRST_GLYPH: u8 = 0x20;
/// Last printable character in the font
pub(crate) const LAST_GLYPH: u8 = 0x7E;

pub(crate) const CUSTOM_CHARSET: [u8; 95] = [
    0b00000000, // space
    0b00111100, // !
    0b00100010, // "
    0b01100011, // #
    0b11101101, // $
    0b00000000, // %
    0b01000100, // &
    0b00100000, // '
    0b00111001, // (
    0b00001111, // )
    0b11000000, // *
    0b01110000, // +
    0b00000100, // ,
    0b01000000, // -
    0b00001000, // .
    0b00010010, // /
    0b00111111, // 0
    0b00000110, // 1
    0b01011011, // 2
    0b01001111, // 3
    0b01100110, // 4
    0b01101101, // 5
    0b01111101, // 6
    0b00000111, // 7
    0b01111111, // 8
    0b01101111, // 9
    0b00000000, // :
    0b00000000, // ;
    0b01011000, // <
    0b01001000, // =
    0b01001100, // >
    0b01010011, // ?
    0b11111111, // @
    0b01110111, // A
    0b11001111, // B
    0b00111001, // C
    0b10001111, // D
    0b01111001, // E
    0b01110001, // F
    0b00111101, // G
    0b01110110, // H
    0b10001001, // I
    0b00011110, // J
    0b01110101, // K
    0b00111000, // L
    0b10110111, // M
    0b00110111, // N
    0b00111111, // O
    0b01110011, // P
    0b01100111, // Q
    0b11000111, // R
    0b01101101, // S
    0b10000001, // T
    0b00111110, // U
    0b00111110, // V
    0b10111110, // W
    0b11110110, // X
    0b01101110, // Y
    0b00011011, // Z
    0b00111001, // [
    0b00100100, // \
    0b00001111, // ]
    0b00100011, // ^
    0b00001000, // _
    0b00000010, // `
    0b01011111, // a
    0b01111100, // b
    0b01011000, // c
    0b01011110, // d
    0b01111011, // e
    0b01110001, // f
    0b01101111, // g
    0b01110100, // h
    0b00010000, // i
    0b00001110, // j
    0b01110101, // k
    0b00110000, // l
    0b10110111, // m
    0b01010100, // n
    0b01011100, // o
    0b01110011, // p
    0b01100111, // q
    0b01010000, // r
    0b01101101, // s
    0b01111000, // t
    0b00011100, // u
    0b00011100, // v
    0b10111110, // w
    0b01111110, // x
    0b01101110, // y
    0b00011011, // z
    0b00010110, // {
    0b00110110, // |
    0b00110100, // }
    0b00000001, // ~
];

pub(crate) const CLASSIC_CHARSET: [u8; 95] = [
    0b00000000, // space
    0b01100000, // !
    0b00100010, // "
    0b01100011, // #
    0b00101101, // $
    0b00000000, // %
    0b01000100, // &
    0b00100000, // '
    0b00111001, // (
    0b00001111, // )
    0b11000000, // *
    0b01110000, // +
    0b00000100, // ,
    0b01000000, // -
    0b01000000, // .
    0b00010010, // /
    0b00111111, // 0
    0b00000110, // 1
    0b01011011, // 2
    0b01001111, // 3
    0b01100110, // 4
    0b01101101, // 5
    0b01111101, // 6
    0b00000111, // 7
    0b01111111, // 8
    0b01101111, // 9
    0b00000000, // :
    0b00000000, // ;
    0b01011000, // <
    0b01001000, // =
    0b01001100, // >
    0b01010011, // ?
    0b11111111, // @
    0b01110111, // A
    0b01111111, // B
    0b00111001, // C
    0b00111111, // D
    0b01111001, // E
    0b01110001, // F
    0b00111101, // G
    0b01110110, // H
    0b10001001, // I
    0b00001110, // J
    0b01110101, // K
    0b00111000, // L
    0b10110111, // M
    0b00110111, // N
    0b00111111, // O
    0b01110011, // P
    0b01100111, // Q
    0b11110111, // R
    0b01101101, // S
    0b10000001, // T
    0b00111110, // U
    0b00111110, // V
    0b10111110, // W
    0b01111110, // X
    0b01101110, // Y
    0b00011011, // Z
    0b00111001, // [
    0b00100100, // \
    0b00001111, // ]
    0b00100011, // ^
    0b00001000, // _
    0b00000010, // `
    0b01011111, // a
    0b01111100, // b
    0b01011000, // c
    0b01011110, // d
    0b01111011, // e
    0b01110001, // f
    0b01101111, // g
    0b01110100, // h
    0b00010000, // i
    0b01000010, // j
    0b01110101, // k
    0b00110000, // l
    0b10110111, // m
    0b01010100, // n
    0b01011100, // o
    0b01110011, // p
    0b01100111, // q
    0b01010000, // r
    0b01101101, // s
    0b01111000, // t
    0b01100010, // u
    0b00011100, // v
    0b10111110, // w
    0b01111110, // x
    0b01101110, // y
    0b00011011, // z
    0b00010110, // {
    0b00110110, // |
    0b00110100, // }
    0b00000001, // ~
];

pub(crate) const CUSTOM_DIGITS: [DigitMapping; 11] = [
    [seg(0, 19), seg(2, 19), seg(3, 19), seg(3, 20), seg(2, 20), seg(0, 20), seg(1, 20), seg(1, 19)],
    [seg(0, 17), seg(2, 17), seg(3, 17), seg(3, 18), seg(2, 18), seg(0, 18), seg(1, 18), seg(1, 17)],
    [seg(0, 11), seg(0, 10), seg(2, 10), seg(3, 11), seg(2, 11), seg(1, 11), seg(1, 10), NONE],
    [seg(0, 9), seg(0, 8), seg(2, 8), seg(3, 9), seg(2, 9), seg(1, 9), seg(1, 8), NONE],
    [seg(3, 16), seg(2, 16), seg(1, 16), seg(0, 16), seg(1, 22), seg(3, 22), seg(2, 22), NONE],
    [seg(3, 14), seg(2, 14), seg(1, 14), seg(0, 15), seg(1, 15), seg(3, 15), seg(2, 15), NONE],
    [seg(3, 1), seg(2, 2), seg(0, 2), seg(0, 1), seg(1, 1), seg(2, 1), seg(1, 2), NONE],
    [seg(3, 3), seg(2, 4), seg(0, 4), seg(0, 3), seg(1, 3), seg(2, 3), seg(1, 4), NONE],
    [seg(3, 10), seg(3, 8), seg(0, 5), seg(1, 5), seg(3, 4), seg(3, 2), seg(2, 5), seg(3, 5)],
    [seg(3, 6), seg(3, 7), seg(2, 7), seg(0, 7), seg(0, 6), seg(2, 6), seg(1, 6), seg(1, 7)],
    [seg(0, 12), seg(2, 12), seg(3, 12), seg(3, 13), seg(2, 13), seg(0, 13), seg(1, 13), seg(1, 12)],
];

pub(crate) const CLASSIC_DIGITS: [DigitMapping; 10] = [
    [seg(0, 13), seg(1, 13), seg(2, 13), seg(2, 15), seg(2, 14), seg(0, 14), seg(1, 15), seg(1, 14)],
    [seg(0, 11), seg(1, 11), seg(1, 11), seg(2, 11), seg(1, 12), seg(1, 12), seg(2, 12), seg(0, 12)],
    [seg(1, 9), seg(0, 9), seg(2, 9), seg(1, 9), seg(0, 10), NONE, seg(1, 9), NONE],
    [seg(0, 7), seg(1, 7), seg(2, 7), seg(2, 6), seg(2, 8), seg(0, 8), seg(1, 8), NONE],
    [seg(1, 18), seg(2, 19), seg(0, 19), seg(1, 18), seg(0, 18), seg(2, 18), seg(1, 19), NONE],
    [seg(2, 20), seg(2, 21), seg(1, 21), seg(0, 21), seg(0, 20), seg(1, 17), seg(1, 20), NONE],
    [seg(0, 22), seg(2, 23), seg(0, 23), seg(0, 22), seg(1, 22), seg(2, 22), seg(1, 23), NONE],
    [seg(2, 1), seg(2, 10), seg(0, 1), seg(0, 0), seg(1, 0), seg(2, 0), seg(1, 1), NONE],
    [seg(2, 2), seg(2, 3), seg(0, 4), seg(0, 3), seg(0, 2), seg(1, 2), seg(1, 3), NONE],
    [seg(2, 4), seg(2, 5), seg(1, 6), seg(0, 6), seg(0, 5), seg(1, 4), seg(1, 5), NONE],
];

/// Segment pattern for `ch`; characters outside the font are blank
pub(crate) fn glyph(variant: LcdVariant, ch: u8) -> u8 {
    if !(FIRST_GLYPH..=LAST_GLYPH).contains(&ch) {
        return 0;
    }
    let index = usize::from(ch - FIRST_GLYPH);
    match variant {
        LcdVariant::Custom => CUSTOM_CHARSET[index],
        LcdVariant::Classic => CLASSIC_CHARSET[index],
    }
}

/// Wiring of digit slot `position`, if the variant has it
pub(crate) fn digit(variant: LcdVariant, position: u8) -> Option<&'static DigitMapping> {
    match variant {
        LcdVariant::Custom => CUSTOM_DIGITS.get(usize::from(position)),
        LcdVariant::Classic => CLASSIC_DIGITS.get(usize::from(position)),
    }
}

/// Substitute a glyph the slot can actually form
///
/// Several slots share or lack segments, so some characters are swapped
/// for a look-alike depending on where they land.
pub(crate) fn remap(variant: LcdVariant, ch: u8, position: u8) -> u8 {
    match variant {
        LcdVariant::Custom => remap_custom(ch, position),
        LcdVariant::Classic => remap_classic(ch, position),
    }
}

fn remap_custom(ch: u8, position: u8) -> u8 {
    match (ch, position) {
        (b'R', 2..=7) => b'r',
        (b'T', 2..=7) => b't',
        _ => ch,
    }
}

fn remap_classic(mut ch: u8, position: u8) -> u8 {
    if position == 4 || position == 6 {
        ch = match ch {
            b'7' => b'&',
            b'A' => b'a',
            b'o' => b'O',
            b'L' => b'!',
            b'M' | b'm' | b'N' => b'n',
            b'c' => b'C',
            b'J' => b'j',
            b'v' | b'V' | b'U' | b'W' | b'w' => b'u',
            other => other,
        };
    } else {
        ch = match ch {
            b'u' => b'v',
            b'j' => b'J',
            other => other,
        };
    }
    if position > 1 && ch == b'T' {
        ch = b't';
    }
    if position == 1 {
        ch = match ch {
            b'a' => b'A',
            b'o' => b'O',
            b'i' => b'l',
            b'n' => b'N',
            b'r' => b'R',
            b'd' => b'D',
            b'v' | b'V' | b'u' => b'U',
            b'b' => b'B',
            b'c' => b'C',
            other => other,
        };
    } else if ch == b'R' {
        ch = b'r';
    }
    if position != 0 && ch == b'I' {
        ch = b'l';
    }
    ch
}

/// Extra pixels the classic glass needs for some glyphs
///
/// Returns `(pixel to clear before drawing, pixel to set after drawing)`.
pub(crate) fn classic_extras(ch: u8, position: u8) -> (Option<SegmentAddress>, Option<SegmentAddress>) {
    let clear = if position == 0 {
        seg(0, 15)
    } else {
        None
    };
    let set = match (ch, position) {
        (b'T', 1) => seg(1, 12),
        (b'B' | b'D' | b'@', 0) => seg(0, 15),
        (b'B' | b'D' | b'@', 1) => seg(0, 12),
        _ => None,
    };
    (clear, set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fonts_cover_printable_ascii() {
        assert_eq!(CUSTOM_CHARSET.len(), usize::from(LAST_GLYPH - FIRST_GLYPH + 1));
        assert_eq!(CLASSIC_CHARSET.len(), CUSTOM_CHARSET.len());
    }

    #[test]
    fn test_variant_glyph_differences() {
        assert_eq!(glyph(LcdVariant::Custom, b'B'), 0b11001111);
        assert_eq!(glyph(LcdVariant::Classic, b'B'), 0b01111111);
        assert_eq!(glyph(LcdVariant::Custom, b'u'), 0b00011100);
        assert_eq!(glyph(LcdVariant::Classic, b'u'), 0b01100010);
    }

    #[test]
    fn test_out_of_font_is_blank() {
        assert_eq!(glyph(LcdVariant::Custom, 0x7F), 0);
        assert_eq!(glyph(LcdVariant::Classic, b'\n'), 0);
    }

    #[test]
    fn test_digit_counts() {
        assert!(digit(LcdVariant::Custom, 10).is_some());
        assert!(digit(LcdVariant::Classic, 10).is_none());
    }

    #[test]
    fn test_classic_remaps() {
        assert_eq!(remap(LcdVariant::Classic, b'R', 5), b'r');
        assert_eq!(remap(LcdVariant::Classic, b'R', 1), b'R');
        assert_eq!(remap(LcdVariant::Classic, b'I', 0), b'I');
        assert_eq!(remap(LcdVariant::Classic, b'I', 3), b'l');
        assert_eq!(remap(LcdVariant::Classic, b'T', 1), b'T');
        assert_eq!(remap(LcdVariant::Classic, b'T', 2), b't');
        assert_eq!(remap(LcdVariant::Classic, b'7', 4), b'&');
        assert_eq!(remap(LcdVariant::Classic, b'M', 6), b'n');
        assert_eq!(remap(LcdVariant::Classic, b'u', 5), b'v');
        assert_eq!(remap(LcdVariant::Classic, b'u', 1), b'U');
        assert_eq!(remap(LcdVariant::Classic, b'a', 1), b'A');
    }

    #[test]
    fn test_custom_remaps() {
        assert_eq!(remap(LcdVariant::Custom, b'R', 0), b'R');
        assert_eq!(remap(LcdVariant::Custom, b'R', 4), b'r');
        assert_eq!(remap(LcdVariant::Custom, b'T', 8), b'T');
        assert_eq!(remap(LcdVariant::Custom, b'I', 5), b'I');
    }

    #[test]
    fn test_classic_extras() {
        assert_eq!(classic_extras(b'T', 1).1, seg(1, 12));
        assert_eq!(classic_extras(b'D', 0), (seg(0, 15), seg(0, 15)));
        assert_eq!(classic_extras(b'B', 1).1, seg(0, 12));
        assert_eq!(classic_extras(b'A', 4), (None, None));
    }
}
