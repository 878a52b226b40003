//! Software real-time clock
//!
//! Wall time is a UTC base plus the uptime elapsed since the base was set.
//! Until the first set the clock reads as unset, which makes the runtime
//! start from its first-boot date.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Instant};

use movement_core::DateTime;

const MINUTE_MS: i64 = 60_000;

#[derive(Clone, Copy)]
struct Base {
    unix: i64,
    at: Instant,
}

static BASE: Mutex<CriticalSectionRawMutex, Cell<Option<Base>>> = Mutex::new(Cell::new(None));

/// Current UTC time
pub fn now() -> DateTime {
    match BASE.lock(Cell::get) {
        Some(base) => DateTime::from_unix(base.unix + base.at.elapsed().as_secs() as i64, 0),
        None => DateTime::default(),
    }
}

/// Set the clock to `utc`, starting at the top of its second
pub fn set(utc: DateTime) {
    let base = Base {
        unix: utc.to_unix(0),
        at: Instant::now(),
    };
    BASE.lock(|b| b.set(Some(base)));
}

/// When the next wall-clock minute begins
pub fn next_minute() -> Instant {
    let now = Instant::now();
    let Some(base) = BASE.lock(Cell::get) else {
        return now + Duration::from_secs(60);
    };
    let wall_ms = base.unix * 1000 + now.duration_since(base.at).as_millis() as i64;
    let into_minute = wall_ms.rem_euclid(MINUTE_MS);
    now + Duration::from_millis((MINUTE_MS - into_minute) as u64)
}
