//! Platform abstraction layer
//!
//! Everything the simulation consumes from the outside world:
//! - Time (monotonic milliseconds for power-up expiry)
//! - Input (terminal keys mapped to per-tick signals)
//! - Event pump (key events interleaved with frame ticks)

pub mod event;
pub mod input;
pub mod time;

pub use event::{Event, EventHandler};
pub use input::{InputState, KeyAction, map_key};
pub use time::{Clock, ManualClock, SystemClock};
