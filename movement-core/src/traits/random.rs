//! Entropy for games and dice

/// Source of random numbers
pub trait RandomSource {
    /// Next 32 random bits
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `0..bound` (returns 0 when `bound` is 0)
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        // Rejection sampling keeps the distribution flat
        let zone = u32::MAX - (u32::MAX % bound);
        loop {
            let value = self.next_u32();
            if value < zone {
                return value % bound;
            }
        }
    }
}

/// Marsaglia xorshift generator
///
/// Seeded from whatever the firmware can scrape together (uptime counter,
/// button timing); faces only need "unpredictable to a human".
#[derive(Debug, Clone)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Create a generator; a zero seed is replaced since it is a fixed point
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    /// Fold more entropy into the state
    pub fn stir(&mut self, entropy: u32) {
        self.state ^= entropy.rotate_left(13);
        if self.state == 0 {
            self.state = 0x9E37_79B9;
        }
    }
}

impl RandomSource for Xorshift32 {
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_is_replaced() {
        let mut rng = Xorshift32::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_below_stays_in_range() {
        let mut rng = Xorshift32::new(1234);
        for _ in 0..1000 {
            assert!(rng.below(20) < 20);
        }
        assert_eq!(rng.below(0), 0);
        assert_eq!(rng.below(1), 0);
    }

    #[test]
    fn test_stir_changes_sequence() {
        let mut a = Xorshift32::new(42);
        let mut b = Xorshift32::new(42);
        b.stir(0xDEAD_BEEF);
        assert_ne!(a.next_u32(), b.next_u32());
    }
}
