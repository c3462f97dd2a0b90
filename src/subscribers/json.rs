//! # NDJSON push-writer subscriber.
//!
//! [`JsonWriter`] renders every event as a `signal_update` envelope and
//! writes it, newline-terminated, to any [`AsyncWrite`] — a socket half, a
//! pipe, a file. Transport-level framing beyond newlines (websockets etc.)
//! stays outside this crate; hand the writer whatever sink the transport
//! exposes.
//!
//! A write or flush error is reported as a failed delivery, which makes the
//! [`SubscriberSet`](crate::SubscriberSet) drop this subscriber — exactly
//! what should happen to a disconnected client.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::error::DeliveryError;
use crate::events::{SignalEvent, SignalUpdate};
use crate::subscribers::Subscribe;

/// Writes `signal_update` envelopes as NDJSON to an async sink.
pub struct JsonWriter<W> {
    out: Mutex<W>,
}

impl<W> JsonWriter<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Wraps a sink. One envelope per line, flushed per event.
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Consumes the writer and returns the sink (useful in tests).
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> Subscribe for JsonWriter<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn deliver(&self, event: &SignalEvent) -> Result<(), DeliveryError> {
        let mut line = serde_json::to_vec(&SignalUpdate::new(event))
            .map_err(|e| DeliveryError::Rejected { reason: e.to_string() })?;
        line.push(b'\n');

        let mut out = self.out.lock().await;
        out.write_all(&line)
            .await
            .map_err(|_| DeliveryError::Closed)?;
        out.flush().await.map_err(|_| DeliveryError::Closed)
    }

    fn name(&self) -> &'static str {
        "json-writer"
    }
}
