//! 128 Hz fast tick
//!
//! Runs only while the runtime asks for it: button hold timing, the LED
//! timer and alarm beeps.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};

use crate::channels::{FAST_TICKS, FAST_TICK_ENABLE};

/// Fast tick rate
pub const FAST_TICK_HZ: u64 = 128;

#[embassy_executor::task]
pub async fn fast_tick_task() {
    info!("Fast tick task started");

    loop {
        while !FAST_TICK_ENABLE.wait().await {}
        trace!("Fast tick on");

        let mut ticker = Ticker::every(Duration::from_hz(FAST_TICK_HZ));
        loop {
            match select(FAST_TICK_ENABLE.wait(), ticker.next()).await {
                Either::First(false) => break,
                Either::First(true) => {}
                // A full queue means the runtime is behind; drop the tick
                Either::Second(()) => {
                    let _ = FAST_TICKS.try_send(());
                }
            }
        }
        trace!("Fast tick off");
    }
}
