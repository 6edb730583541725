//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod bus;
pub mod motion;

pub use bus::bus_task;
pub use motion::{motion_task, WatchSettings};
