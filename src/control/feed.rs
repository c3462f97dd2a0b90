//! # EventFeed: ingesting an out-of-process controller stream.
//!
//! Deployments sometimes run the phase loop in another process (next to the
//! detector) and pipe its line-delimited JSON here. [`EventFeed`] reads such
//! a stream, decodes each line, attaches the feed's signal id, and publishes
//! onto the bus — indistinguishable downstream from an in-process
//! [`IntersectionController`](crate::IntersectionController).
//!
//! Malformed lines are dropped silently; end-of-stream or a read error ends
//! the feed. Cancellable like any other task.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

use crate::events::{decode_line, Bus};

/// Bridges one external phase-line stream into the event bus.
pub struct EventFeed {
    signal_id: Arc<str>,
    bus: Bus,
}

impl EventFeed {
    /// Creates a feed that stamps every decoded line with `signal_id`.
    pub fn new(signal_id: impl Into<Arc<str>>, bus: Bus) -> Self {
        Self {
            signal_id: signal_id.into(),
            bus,
        }
    }

    /// Reads lines until end-of-stream, read error, or cancellation.
    pub async fn run<R>(self, reader: R, token: CancellationToken)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                next = lines.next_line() => match next {
                    Ok(Some(line)) => {
                        if let Some(phase) = decode_line(&line) {
                            self.bus.publish(phase.into_event(self.signal_id.clone()));
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        log::warn!("feed {}: read failed: {err}", self.signal_id);
                        break;
                    }
                },
            }
        }
    }
}
