//! # Event bus for broadcasting phase transitions.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that lets any
//! number of concurrently running intersection controllers (and event feeds)
//! publish without blocking, while the supervisor's listener fans events out
//! to live subscribers.
//!
//! ```text
//! Publishers (many):                      Consumer:
//!   Controller "1" ──┐
//!   Controller "2" ──┼────► Bus ────► supervisor listener ────► SubscriberSet
//!   EventFeed  "7" ──┘  (broadcast)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks or awaits.
//! - **Bounded capacity**: a single ring buffer stores recent events.
//! - **Lag handling**: slow receivers observe `RecvError::Lagged(n)` and skip
//!   the `n` oldest events.
//! - **No persistence**: events published with no active receiver are dropped.

use tokio::sync::broadcast;

use super::event::SignalEvent;

/// Broadcast channel for [`SignalEvent`]s.
///
/// Cheap to clone (the sender is `Arc`-backed); every controller holds one.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<SignalEvent>,
}

impl Bus {
    /// Creates a new bus with the given ring-buffer capacity (min 1, clamped).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers the event is dropped; this still returns
    /// immediately.
    pub fn publish(&self, ev: SignalEvent) {
        let _ = self.tx.send(ev);
    }

    /// Creates an independent receiver observing events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SignalEvent> {
        self.tx.subscribe()
    }
}
