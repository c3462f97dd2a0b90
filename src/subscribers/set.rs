//! # Live fan-out to a dynamic set of subscribers.
//!
//! [`SubscriberSet`] tracks whoever is currently connected and pushes every
//! published event to each of them, without awaiting anyone:
//!
//! ```text
//! emit(event)
//!     │  (membership snapshot, try_send)
//!     ├──► [queue A] ──► worker A ──► subscriberA.deliver()
//!     ├──► [queue B] ──► worker B ──► subscriberB.deliver()
//!     └──► [queue C] ──► worker C ──► subscriberC.deliver()
//! ```
//!
//! ## Rules
//! - **Dynamic membership**: [`add`](SubscriberSet::add) and
//!   [`remove`](SubscriberSet::remove) may race with `emit`; emit works on a
//!   snapshot, so membership changes mid-publish are tolerated.
//! - **Drop on failure**: a full queue, a closed queue, a `deliver` error, or
//!   a panic inside `deliver` all remove the subscriber. At-most-once, no
//!   retry, no queueing beyond the bounded buffer.
//! - **Non-blocking publisher**: `emit` uses `try_send` and never awaits.
//! - **Per-subscriber FIFO**: each subscriber sees its events in order; no
//!   ordering holds *across* subscribers.
//!
//! The lock around the membership list is a `std::sync::RwLock`; it is never
//! held across an await.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use futures::FutureExt;
use tokio::sync::mpsc;

use crate::events::SignalEvent;
use crate::subscribers::Subscribe;

/// Handle identifying one added subscriber, for [`SubscriberSet::remove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Per-subscriber queue head kept in the membership list.
struct Entry {
    id: u64,
    name: &'static str,
    tx: mpsc::Sender<Arc<SignalEvent>>,
}

/// Dynamic fan-out set for live subscribers.
///
/// Safe to share across every publisher (wrap in `Arc`); the supervisor owns
/// one and bridges the event bus into it.
pub struct SubscriberSet {
    entries: RwLock<Vec<Entry>>,
    next_id: AtomicU64,
}

impl Default for SubscriberSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriberSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Adds a subscriber and spawns its worker task.
    ///
    /// Must be called from within a tokio runtime. The returned id can be
    /// passed to [`remove`](SubscriberSet::remove) on disconnect; a failing
    /// subscriber is removed automatically.
    pub fn add(&self, sub: Arc<dyn Subscribe>) -> SubscriberId {
        let cap = sub.queue_capacity().max(1);
        let name = sub.name();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, mut rx) = mpsc::channel::<Arc<SignalEvent>>(cap);

        tokio::spawn(async move {
            while let Some(ev) = rx.recv().await {
                let fut = sub.deliver(ev.as_ref());
                match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        log::warn!("subscriber {} dropped: {err}", sub.name());
                        break;
                    }
                    Err(_) => {
                        log::warn!("subscriber {} panicked, dropped", sub.name());
                        break;
                    }
                }
            }
            // Dropping rx closes the queue; the next emit prunes the entry.
        });

        self.entries.write().unwrap_or_else(|e| e.into_inner()).push(Entry { id, name, tx });
        SubscriberId(id)
    }

    /// Removes a subscriber explicitly (clean disconnect).
    ///
    /// Returns `true` if it was still tracked. Its worker exits once the
    /// queue drains.
    pub fn remove(&self, id: SubscriberId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|e| e.id != id.0);
        entries.len() != before
    }

    /// Pushes one event to every current subscriber.
    ///
    /// Works on a snapshot of the membership, so concurrent `add`/`remove`
    /// calls are fine. Any subscriber whose queue is full or closed is
    /// removed from the set. With zero subscribers this is a no-op.
    pub fn emit(&self, event: &SignalEvent) {
        let snapshot: Vec<(u64, &'static str, mpsc::Sender<Arc<SignalEvent>>)> = {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            entries
                .iter()
                .map(|e| (e.id, e.name, e.tx.clone()))
                .collect()
        };
        if snapshot.is_empty() {
            return;
        }

        let ev = Arc::new(event.clone());
        let mut dead: Vec<u64> = Vec::new();
        for (id, name, tx) in snapshot {
            match tx.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("subscriber {name} lagging, dropped");
                    dead.push(id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    dead.push(id);
                }
            }
        }

        if !dead.is_empty() {
            let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
            entries.retain(|e| !dead.contains(&e.id));
        }
    }

    /// Number of currently tracked subscribers.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every subscriber; their workers exit once queues drain.
    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
}
