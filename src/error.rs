//! Error types used by the metronome runtime.
//!
//! Three error enums, one per containment boundary:
//!
//! - [`LifecycleError`] — invalid worker state transitions (defensive; the
//!   idempotency rules make these unreachable in normal operation).
//! - [`WorkError`] — failures raised by the work body during a tick; always
//!   caught at the tick boundary and never propagated further.
//! - [`HostError`] — fatal failures escaping the host run loop; these
//!   terminate the process with a non-zero status after a best-effort flush.
//!
//! All types provide `as_label` for stable snake_case labels in logs.

use thiserror::Error;

use crate::worker::WorkerState;

/// # Errors produced by worker lifecycle operations.
///
/// `start`/`stop` are idempotent, so in practice these only surface when the
/// state lock is poisoned by a panic elsewhere. [`LifecycleError::InvalidTransition`]
/// is reserved for defensive signaling.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// A lifecycle transition was attempted out of contract.
    #[error("invalid {op} from state {from:?}")]
    InvalidTransition {
        /// State the worker was in when the transition was attempted.
        from: WorkerState,
        /// The attempted operation (`"start"`, `"stop"`).
        op: &'static str,
    },

    /// The worker state lock was poisoned by a panicking thread.
    #[error("worker state lock poisoned during {op}")]
    Poisoned {
        /// The operation that observed the poisoned lock.
        op: &'static str,
    },
}

impl LifecycleError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use metronome::LifecycleError;
    ///
    /// let err = LifecycleError::Poisoned { op: "start" };
    /// assert_eq!(err.as_label(), "lifecycle_poisoned");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LifecycleError::InvalidTransition { .. } => "lifecycle_invalid_transition",
            LifecycleError::Poisoned { .. } => "lifecycle_poisoned",
        }
    }
}

/// # Errors produced by the work body during a tick.
///
/// Contained at the tick boundary: logged at Critical level with the tick's
/// correlation id and swallowed. A failing tick is reported, not escalated —
/// the next scheduled tick still fires.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkError {
    /// The work body returned an error.
    #[error("work unit failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The work body panicked; the unwind was caught at the tick boundary.
    #[error("work unit panicked: {info}")]
    Panic {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl WorkError {
    /// Convenience constructor for [`WorkError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        WorkError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use metronome::WorkError;
    ///
    /// let err = WorkError::fail("boom");
    /// assert_eq!(err.as_label(), "work_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkError::Fail { .. } => "work_failed",
            WorkError::Panic { .. } => "work_panicked",
        }
    }
}

/// # Fatal errors escaping the host run loop.
///
/// Logged at Critical level; the host still performs the stop/drain/flush
/// sequence before the process exits with a non-zero status.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HostError {
    /// OS signal handler registration failed.
    #[error("failed to register shutdown signal handler: {0}")]
    SignalRegistration(#[from] std::io::Error),

    /// The worker rejected a lifecycle transition driven by the host.
    #[error(transparent)]
    Worker(#[from] LifecycleError),
}

impl HostError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            HostError::SignalRegistration(_) => "host_signal_registration",
            HostError::Worker(_) => "host_worker_lifecycle",
        }
    }
}
