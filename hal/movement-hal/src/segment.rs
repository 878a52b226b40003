//! HT1621-style segment LCD controller
//!
//! The controller speaks a three-wire serial protocol: chip select (active
//! low), write clock and data. Data is latched on the rising edge of the
//! write clock. Every transfer starts with a 3-bit mode ID:
//!
//! | ID    | Mode    | Payload |
//! |-------|---------|---------|
//! | `100` | Command | 8-bit command, MSB first, plus one don't-care bit |
//! | `101` | Write   | 6-bit start address, MSB first, then 4-bit nibbles |
//!
//! Each address holds one segment line; the nibble carries the four
//! common lines, COM0 first. Successive nibbles go to successive
//! addresses, so a whole frame is a single transfer.

use embedded_hal::delay::DelayNs;

use crate::gpio::OutputPin;

/// Common (backplane) lines
pub const COMMONS: usize = 4;

/// Segment lines written per frame
pub const SEGMENTS: u8 = 24;

/// One frame: bit `s` of `frame[c]` lights segment `s` on common `c`
pub type Frame = [u32; COMMONS];

/// Half period of the write clock; the controller tops out near 150 kHz
const HALF_CLOCK_NS: u32 = 4_000;

const ID_COMMAND: u8 = 0b100;
const ID_WRITE: u8 = 0b101;

/// Controller commands
pub mod command {
    pub const SYS_DIS: u8 = 0x00;
    pub const SYS_EN: u8 = 0x01;
    pub const LCD_OFF: u8 = 0x02;
    pub const LCD_ON: u8 = 0x03;
    pub const RC_256K: u8 = 0x18;
    /// 1/3 bias, four commons
    pub const BIAS_THIRD_4COM: u8 = 0x29;
}

/// Bit-banged segment LCD controller
pub struct Ht1621<CS, WR, DATA, D> {
    cs: CS,
    wr: WR,
    data: DATA,
    delay: D,
    /// Last frame sent, so unchanged frames are skipped
    shown: Option<Frame>,
}

impl<CS, WR, DATA, D> Ht1621<CS, WR, DATA, D>
where
    CS: OutputPin,
    WR: OutputPin,
    DATA: OutputPin,
    D: DelayNs,
{
    pub fn new(mut cs: CS, mut wr: WR, data: DATA, delay: D) -> Self {
        cs.set_high();
        wr.set_high();
        Self {
            cs,
            wr,
            data,
            delay,
            shown: None,
        }
    }

    /// Start the oscillator and bias generator and turn the glass on
    pub fn init(&mut self) {
        for cmd in [command::SYS_EN, command::RC_256K, command::BIAS_THIRD_4COM, command::LCD_ON] {
            self.command(cmd);
        }
        self.shown = None;
    }

    /// Stop the bias generator and oscillator (backup sleep)
    pub fn power_down(&mut self) {
        self.command(command::LCD_OFF);
        self.command(command::SYS_DIS);
        self.shown = None;
    }

    /// Send one command transfer
    pub fn command(&mut self, cmd: u8) {
        self.select();
        self.send_bits(u32::from(ID_COMMAND), 3);
        self.send_bits(u32::from(cmd) << 1, 9);
        self.deselect();
    }

    /// Push a frame; returns false when it matches what is already shown
    pub fn write_frame(&mut self, frame: &Frame) -> bool {
        if self.shown.as_ref() == Some(frame) {
            return false;
        }
        self.select();
        self.send_bits(u32::from(ID_WRITE), 3);
        self.send_bits(0, 6);
        for seg in 0..SEGMENTS {
            for com in frame.iter() {
                self.send_bit(com >> seg & 1 == 1);
            }
        }
        self.deselect();
        self.shown = Some(*frame);
        true
    }

    /// Release the pins
    pub fn release(self) -> (CS, WR, DATA, D) {
        (self.cs, self.wr, self.data, self.delay)
    }

    fn select(&mut self) {
        self.cs.set_low();
        self.delay.delay_ns(HALF_CLOCK_NS);
    }

    fn deselect(&mut self) {
        self.cs.set_high();
        self.delay.delay_ns(HALF_CLOCK_NS);
    }

    /// Clock out the low `count` bits of `value`, MSB first
    fn send_bits(&mut self, value: u32, count: u8) {
        for i in (0..count).rev() {
            self.send_bit(value >> i & 1 == 1);
        }
    }

    fn send_bit(&mut self, bit: bool) {
        self.wr.set_low();
        self.data.set_state(bit);
        self.delay.delay_ns(HALF_CLOCK_NS);
        self.wr.set_high();
        self.delay.delay_ns(HALF_CLOCK_NS);
    }
}
