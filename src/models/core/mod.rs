//! Core domain models.
//!
//! - `task`: Unit of work for the fund-flow explorer
//! - `watch`: Watch-list match events

mod task;
mod watch;

pub use task::{ExplorationTask, MAX_DEPTH};
pub use watch::WatchMatch;
