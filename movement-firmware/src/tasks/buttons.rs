//! Button tasks
//!
//! One task per button. Debounced edges go to the runtime task; their
//! timestamps also feed the random pool.

use defmt::*;

use movement_core::event::Button;
use movement_hal_rp2040::gpio::Button as ButtonPin;

use crate::channels::{ButtonEdge, BUTTON_EDGES};
use crate::entropy;

#[embassy_executor::task(pool_size = 3)]
pub async fn button_task(mut pin: ButtonPin<'static>, button: Button) {
    info!("Button task started: {:?}", button);

    loop {
        let (pressed, at) = pin.next_edge().await;
        entropy::feed(at.as_ticks());
        trace!("{:?} {}", button, if pressed { "down" } else { "up" });
        BUTTON_EDGES.send(ButtonEdge { button, pressed }).await;
    }
}
