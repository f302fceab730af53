//! Synchronization with the provider session.
//!
//! The watcher polls account, balance and network on an interval and
//! reports changes over a channel.

mod watcher;

pub use watcher::*;
