//! Tick task for clock updates
//!
//! Reads the clock at the rate the runtime asks for and hands the reading
//! to the runtime task. In low energy it ticks once a minute, on the
//! minute.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker, Timer};

use crate::channels::{TickMode, RTC_TICK, TICK_MODE};
use crate::clock;

fn period(hz: u8) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(hz.max(1)))
}

/// Tick task - signals clock readings at the requested frequency
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started");

    let mut mode = TickMode::Hz(1);
    let mut ticker = Ticker::every(period(1));

    loop {
        let next = async {
            match mode {
                TickMode::Hz(_) => ticker.next().await,
                TickMode::Minute => Timer::at(clock::next_minute()).await,
            }
        };

        let woke = select(TICK_MODE.wait(), next).await;
        match woke {
            Either::First(new_mode) => {
                if new_mode != mode {
                    debug!("Tick mode {:?}", new_mode);
                    mode = new_mode;
                    if let TickMode::Hz(hz) = mode {
                        ticker = Ticker::every(period(hz));
                    }
                }
            }
            Either::Second(()) => RTC_TICK.signal(clock::now()),
        }
    }
}
