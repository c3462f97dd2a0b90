//! # Vehicle detection capability.
//!
//! The control core never talks to a detection library directly. It receives a
//! [`VehicleCounter`] — an injected capability that maps an opaque lane source
//! reference to a vehicle count. Detection technology (camera feeds, model
//! inference, image files) lives entirely behind this trait.
//!
//! ## Failure contract
//! `count` may fail with a [`DetectError`]. Callers in the control core treat
//! any failure as a count of `0` (degraded, not fatal) — a controller must
//! never stop cycling because detection broke.
//!
//! ## Example
//! ```rust
//! use signalvisor::{CounterFn, CounterRef, DetectError};
//!
//! // A fixed-count fake, handy in tests and demos:
//! let counter: CounterRef = CounterFn::arc(|_source: String| async move {
//!     Ok::<_, DetectError>(7)
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DetectError;

/// Shared handle to a vehicle counter (`Arc<dyn VehicleCounter>`).
pub type CounterRef = Arc<dyn VehicleCounter>;

/// # Opaque vehicle-count collaborator.
///
/// `source` is whatever reference the deployment uses to identify a lane's
/// detector input (an image path, a camera id, a stream key). The core never
/// inspects it.
#[async_trait]
pub trait VehicleCounter: Send + Sync + 'static {
    /// Counts vehicles currently visible on the given lane source.
    ///
    /// Returns the count, or a [`DetectError`] the caller degrades to `0`.
    async fn count(&self, source: &str) -> Result<u32, DetectError>;
}

/// Function-backed counter implementation.
///
/// Wraps a closure that produces a fresh future per query, so implementations
/// own their state per call; share state explicitly via `Arc` inside the
/// closure if needed.
#[derive(Debug)]
pub struct CounterFn<F> {
    f: F,
}

impl<F> CounterFn<F> {
    /// Creates a new function-backed counter.
    ///
    /// Prefer [`CounterFn::arc`] when you immediately need a [`CounterRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the counter and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> VehicleCounter for CounterFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<u32, DetectError>> + Send + 'static,
{
    async fn count(&self, source: &str) -> Result<u32, DetectError> {
        (self.f)(source.to_owned()).await
    }
}
