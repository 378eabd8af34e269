//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time (monotonic milliseconds)
//! - Input events (intents queued from any thread)

pub mod input;
pub mod time;

pub use input::{Intent, IntentQueue, IntentSender};
pub use time::{Clock, ManualClock, MonotonicClock};
