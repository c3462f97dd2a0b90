//! # Core subscriber trait.
//!
//! `Subscribe` is the extension point for live listeners: anything that wants
//! phase updates pushed to it implements this trait and is added to the
//! [`SubscriberSet`](crate::subscribers::SubscriberSet). Each subscriber is
//! driven by a dedicated worker loop fed from a bounded queue, so a slow
//! subscriber never blocks the publisher or its peers.
//!
//! ## Contract
//! - `deliver` returning an error means the subscriber is broken (connection
//!   gone, sink closed); the set **drops it** — at-most-once, no retry.
//! - Implementations declare their queue depth via
//!   [`Subscribe::queue_capacity`]; a subscriber that cannot keep up overflows
//!   its queue and is likewise dropped.

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::events::SignalEvent;

/// Contract for live phase-update subscribers.
///
/// Called from a subscriber-dedicated worker task; avoid blocking the runtime
/// (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one phase update pushed to this subscriber.
    ///
    /// An `Err` marks the subscriber broken; the set removes it and it
    /// receives nothing further.
    async fn deliver(&self, event: &SignalEvent) -> Result<(), DeliveryError>;

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Depth of this subscriber's delivery queue.
    ///
    /// Overflowing it counts as a failed delivery: the subscriber is dropped.
    fn queue_capacity(&self) -> usize {
        64
    }
}
