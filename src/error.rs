//! Error types used across the control runtime and the batch aggregators.
//!
//! One enum per concern:
//!
//! - [`RuntimeError`] — failures of the orchestration runtime itself.
//! - [`ControlError`] — invalid intersection setup refused before start.
//! - [`DetectError`] — failures of the external vehicle counter; callers
//!   degrade these to a count of `0` rather than propagating them.
//! - [`DeliveryError`] — a subscriber failing to accept an event; the
//!   broadcaster drops the subscriber in response.
//! - [`TableError`] — batch table (CSV) loading failures.
//!
//! Runtime and detector errors carry `as_label()` helpers producing short
//! stable snake_case labels for logs.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the control runtime.
///
/// These represent failures of the orchestration layer itself, such as a
/// shutdown sequence exceeding its grace period.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some controllers remained stuck.
    #[error("shutdown grace {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Intersections whose controllers did not stop in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck intersections={stuck:?}")
            }
        }
    }
}

/// # Errors refusing an invalid intersection setup.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ControlError {
    /// An intersection needs at least two lanes to cycle.
    #[error("intersection {intersection} has {lanes} lane(s); at least 2 required")]
    TooFewLanes {
        /// Intersection identifier.
        intersection: String,
        /// Number of lanes supplied.
        lanes: usize,
    },
}

/// # Errors produced by the external vehicle counter.
///
/// The control core never treats these as fatal: a failed count degrades to
/// `0` at the call site and the controller keeps cycling.
#[non_exhaustive]
#[derive(Debug)]
pub enum DetectError {
    /// The detector backend is not available at all (e.g. model not loaded).
    Unavailable {
        /// What is missing.
        reason: String,
    },

    /// A single count query failed.
    Failed {
        /// The lane source that was queried.
        source: String,
        /// The underlying failure message.
        reason: String,
    },
}

// NOTE: `Display`/`Error` are implemented by hand rather than via
// `#[derive(thiserror::Error)]` because the `Failed` variant has a field
// literally named `source`, which thiserror unconditionally treats as the
// error's `source()` and therefore requires to implement `std::error::Error`.
// Here `source` is a lane identifier string, not an error chain, so these
// impls reproduce the exact same `Display` output with `source()` == `None`.
impl std::fmt::Display for DetectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectError::Unavailable { reason } => {
                write!(f, "detector unavailable: {reason}")
            }
            DetectError::Failed { source, reason } => {
                write!(f, "count failed for {source}: {reason}")
            }
        }
    }
}

impl std::error::Error for DetectError {}

impl DetectError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DetectError::Unavailable { .. } => "detect_unavailable",
            DetectError::Failed { .. } => "detect_failed",
        }
    }
}

/// # A subscriber failing to accept an event.
///
/// Any delivery error causes the broadcaster to drop the subscriber:
/// at-most-once, no retry.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The subscriber's sink is gone (connection closed, writer dropped).
    #[error("subscriber sink closed")]
    Closed,

    /// The subscriber rejected or failed to process the event.
    #[error("delivery failed: {reason}")]
    Rejected {
        /// The underlying failure message.
        reason: String,
    },
}

/// # Batch table loading failures.
///
/// Raised by the roster, route-table, and lane-demand CSV loaders.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TableError {
    /// The file could not be opened or read.
    #[error("table I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be parsed.
    #[error("table parse error: {0}")]
    Parse(String),
}
