//! Random source for the faces
//!
//! A xorshift generator seeded from the uptime counter at boot. Button
//! tasks fold their edge timestamps into a pool that is stirred in on the
//! next draw.

use portable_atomic::{AtomicU32, Ordering};

use movement_core::traits::{RandomSource, Xorshift32};

static POOL: AtomicU32 = AtomicU32::new(0);

/// Mix an edge timestamp into the pool
pub fn feed(ticks: u64) {
    let folded = (ticks as u32) ^ ((ticks >> 32) as u32);
    // fetch_update never fails with a closure that always returns Some
    let _ = POOL.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |pool| {
        Some(pool.rotate_left(7) ^ folded)
    });
}

pub struct EntropyRng {
    inner: Xorshift32,
}

impl EntropyRng {
    pub fn new(seed: u32) -> Self {
        Self {
            inner: Xorshift32::new(seed),
        }
    }
}

impl RandomSource for EntropyRng {
    fn next_u32(&mut self) -> u32 {
        let pool = POOL.swap(0, Ordering::Relaxed);
        if pool != 0 {
            self.inner.stir(pool);
        }
        self.inner.next_u32()
    }
}
