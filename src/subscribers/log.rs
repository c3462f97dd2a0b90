//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints phase transitions to stdout in a human-readable
//! format. Enabled via the `logging` feature; intended for development and
//! examples, not production — implement a custom
//! [`Subscribe`](crate::Subscribe) for structured sinks.
//!
//! ## Output format
//! ```text
//! [green]  signal=3 lane=lane1 vehicles=12 green=30s
//! [yellow] signal=3 lane=lane1 next=lane2 yellow=5s
//! ```

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::events::{PhaseKind, SignalEvent};
use crate::subscribers::Subscribe;

/// Prints each phase transition to stdout.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn deliver(&self, event: &SignalEvent) -> Result<(), DeliveryError> {
        match event.kind {
            PhaseKind::Green => {
                println!(
                    "[green]  signal={} lane={} vehicles={} green={}s",
                    event.intersection,
                    event.current_lane,
                    event.vehicle_count,
                    event.duration_secs
                );
            }
            PhaseKind::Yellow => {
                println!(
                    "[yellow] signal={} lane={} next={} yellow={}s",
                    event.intersection,
                    event.current_lane,
                    event.next_lane.as_deref().unwrap_or("?"),
                    event.duration_secs
                );
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
