//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod buttons;
pub mod fast_tick;
pub mod runtime;
pub mod storage;
pub mod tick;

pub use buttons::button_task;
pub use fast_tick::fast_tick_task;
pub use runtime::{runtime_task, Outputs};
pub use storage::storage_task;
pub use tick::tick_task;
