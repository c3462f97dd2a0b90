//! # Live subscribers: the broadcast fan-out layer.
//!
//! Everything between the event bus and a connected listener:
//!
//! ```text
//!   Bus ──► supervisor listener ──► SubscriberSet::emit(&SignalEvent)
//!                                        ├──► [queue] worker ─► JsonWriter.deliver()
//!                                        ├──► [queue] worker ─► LogWriter.deliver()
//!                                        └──► [queue] worker ─► <your Subscribe impl>
//! ```
//!
//! Subscribers connect and disconnect at runtime; a subscriber whose delivery
//! fails is dropped from the set and publishing continues for the rest.

mod json;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use json::JsonWriter;
pub use set::{SubscriberId, SubscriberSet};
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use self::log::LogWriter;
