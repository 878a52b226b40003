//! PIN lock
//!
//! When a PIN face is registered the service starts out locked. Faces
//! marked as protected cannot be entered while locked: navigation to them
//! is redirected to the PIN face, which remembers where the user was
//! heading and goes there after a successful unlock. Once unlocked, the
//! lock re-engages after a configurable number of minutes.

use crate::persistence::Record;

/// File holding the PIN
pub const PIN_FILE: &str = "pin.u32";

/// Digits per PIN
pub const PIN_DIGITS: usize = 6;

/// Digit value meaning "not entered yet"
pub const EMPTY_DIGIT: u8 = 15;

/// Auto-lock choices in minutes
pub const LOCK_TIMEOUTS: [u8; 4] = [1, 5, 10, 60];

/// Auto-lock used until the user picks one
pub const DEFAULT_LOCK_TIMEOUT: u8 = 5;

/// Six 4-bit digits, digit 0 in the low nibble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(u32);

impl Pin {
    /// A PIN with no digit entered
    pub const EMPTY: Pin = Pin(0x00FF_FFFF);

    pub const fn from_reg(reg: u32) -> Self {
        Pin(reg)
    }

    pub const fn reg(&self) -> u32 {
        self.0
    }

    /// Build a PIN from six digits
    pub fn from_digits(digits: [u8; PIN_DIGITS]) -> Self {
        let mut pin = Pin(0);
        for (i, d) in digits.iter().enumerate() {
            pin.set_digit(i, *d);
        }
        pin
    }

    /// Digit at `index`, [`EMPTY_DIGIT`] when out of range
    pub fn digit(&self, index: usize) -> u8 {
        if index >= PIN_DIGITS {
            return EMPTY_DIGIT;
        }
        ((self.0 >> (index * 4)) & 0x0F) as u8
    }

    pub fn set_digit(&mut self, index: usize, value: u8) {
        if index < PIN_DIGITS {
            let shift = index * 4;
            self.0 = (self.0 & !(0x0F << shift)) | (u32::from(value & 0x0F) << shift);
        }
    }

    /// Check if every digit has been entered
    pub fn is_complete(&self) -> bool {
        (0..PIN_DIGITS).all(|i| self.digit(i) != EMPTY_DIGIT)
    }
}

impl Record for Pin {
    const SIZE: usize = 4;

    fn to_bytes(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.0.to_le_bytes());
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Pin(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn clamp(&mut self) {
        self.0 &= 0x00FF_FFFF;
    }
}

/// Lock state shared between the PIN face and the dispatcher
#[derive(Debug, Clone)]
pub struct PinService {
    enabled: bool,
    locked: bool,
    pin: Pin,
    pin_face: Option<u8>,
    requesting_face: Option<u8>,
    protected: u16,
    lock_timeout: u8,
    unlocked_minutes: u8,
}

impl Default for PinService {
    fn default() -> Self {
        Self::new()
    }
}

impl PinService {
    pub fn new() -> Self {
        Self {
            enabled: false,
            locked: false,
            pin: Pin(0),
            pin_face: None,
            requesting_face: None,
            protected: 0,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            unlocked_minutes: 0,
        }
    }

    /// Turn the lock on with the PIN face at `pin_face`
    ///
    /// The watch starts locked. Calling this again only moves the PIN face.
    pub fn enable(&mut self, pin_face: u8) {
        self.pin_face = Some(pin_face);
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.locked = true;
        self.requesting_face = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_locked(&self) -> bool {
        self.enabled && self.locked
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Unlock if `pin` matches
    pub fn unlock(&mut self, pin: Pin) -> bool {
        if !self.verify(pin) {
            return false;
        }
        self.locked = false;
        self.unlocked_minutes = 0;
        true
    }

    pub fn verify(&self, pin: Pin) -> bool {
        pin == self.pin
    }

    /// Replace the PIN if `old` matches
    pub fn set_pin(&mut self, old: Pin, new: Pin) -> bool {
        if !self.verify(old) {
            return false;
        }
        self.pin = new;
        true
    }

    /// Install a stored PIN at boot
    pub fn restore_pin(&mut self, pin: Pin) {
        self.pin = pin;
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }

    pub fn pin_face(&self) -> Option<u8> {
        self.pin_face
    }

    /// Face the user tried to enter before being sent to the PIN face
    pub fn requesting_face(&self) -> Option<u8> {
        self.requesting_face
    }

    pub fn set_requesting_face(&mut self, face: Option<u8>) {
        self.requesting_face = face;
    }

    /// Require the PIN before entering `face`
    pub fn protect(&mut self, face: u8) {
        if face < 16 {
            self.protected |= 1 << face;
        }
    }

    pub fn is_protected(&self, face: u8) -> bool {
        face < 16 && self.protected & (1 << face) != 0
    }

    /// Where navigation to `target` should actually go
    ///
    /// Records `target` as the requesting face when it gets redirected.
    pub fn redirect(&mut self, target: u8) -> u8 {
        match self.pin_face {
            Some(pin_face) if self.is_locked() && self.is_protected(target) && target != pin_face => {
                self.requesting_face = Some(target);
                pin_face
            }
            _ => target,
        }
    }

    /// Minutes after unlocking before the lock re-engages
    pub fn lock_timeout(&self) -> u8 {
        self.lock_timeout
    }

    pub fn set_lock_timeout(&mut self, minutes: u8) {
        self.lock_timeout = minutes.max(1);
    }

    /// Advance the auto-lock by one minute
    ///
    /// The partial minute between unlocking and the first minute pass does
    /// not count, so a timeout of `n` locks on the `n + 1`th call.
    pub fn minute_elapsed(&mut self) {
        if !self.enabled || self.locked {
            return;
        }
        if self.unlocked_minutes >= self.lock_timeout {
            self.locked = true;
        } else {
            self.unlocked_minutes += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits() {
        let mut pin = Pin::EMPTY;
        assert!(!pin.is_complete());
        assert_eq!(pin.digit(0), EMPTY_DIGIT);
        for i in 0..PIN_DIGITS {
            pin.set_digit(i, i as u8);
        }
        assert!(pin.is_complete());
        assert_eq!(pin, Pin::from_digits([0, 1, 2, 3, 4, 5]));
        assert_eq!(pin.reg(), 0x0054_3210);
        assert_eq!(pin.digit(6), EMPTY_DIGIT);
    }

    #[test]
    fn test_disabled_service_never_locks() {
        let mut service = PinService::new();
        service.protect(2);
        assert!(!service.is_locked());
        assert_eq!(service.redirect(2), 2);
    }

    #[test]
    fn test_unlock_and_change() {
        let mut service = PinService::new();
        service.enable(4);
        assert!(service.is_locked());
        let default_pin = Pin::from_reg(0);
        let wrong = Pin::from_digits([1; 6]);
        assert!(!service.unlock(wrong));
        assert!(service.unlock(default_pin));
        assert!(!service.set_pin(wrong, wrong));
        assert!(service.set_pin(default_pin, wrong));
        assert!(service.verify(wrong));
    }

    #[test]
    fn test_redirect_records_requester() {
        let mut service = PinService::new();
        service.enable(4);
        service.protect(2);
        assert_eq!(service.redirect(1), 1);
        assert_eq!(service.redirect(2), 4);
        assert_eq!(service.requesting_face(), Some(2));
        service.unlock(Pin::from_reg(0));
        assert_eq!(service.redirect(2), 2);
    }

    #[test]
    fn test_auto_lock() {
        let mut service = PinService::new();
        service.enable(0);
        service.set_lock_timeout(1);
        service.unlock(Pin::from_reg(0));
        service.minute_elapsed();
        assert!(!service.is_locked());
        service.minute_elapsed();
        assert!(service.is_locked());

        service.set_lock_timeout(5);
        service.unlock(Pin::from_reg(0));
        for _ in 0..5 {
            service.minute_elapsed();
        }
        assert!(!service.is_locked());
        service.minute_elapsed();
        assert!(service.is_locked());
    }

    #[test]
    fn test_pin_record_clamps_high_byte() {
        let mut pin = Pin::from_bytes(&[0x10, 0x32, 0x54, 0xAB]);
        pin.clamp();
        assert_eq!(pin.reg(), 0x0054_3210);
    }
}
