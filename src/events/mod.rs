//! Phase events: data model, broadcast bus, and wire formats.
//!
//! ## Contents
//! - [`PhaseKind`], [`SignalEvent`] — one record per phase transition
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//! - [`PhaseLine`], [`SignalUpdate`], [`decode_line`], [`encode_line`] —
//!   the line-delimited stream and the per-subscriber push envelope
//!
//! ## Quick reference
//! - **Publishers**: `IntersectionController` (in-process) and `EventFeed`
//!   (ingesting an external line stream).
//! - **Consumer**: the supervisor's listener, which fans out to the
//!   [`SubscriberSet`](crate::SubscriberSet).

mod bus;
mod event;
mod wire;

pub use bus::Bus;
pub use event::{PhaseKind, SignalEvent};
pub use wire::{decode_line, encode_line, PhaseLine, SignalUpdate};
