//! # Runtime events emitted by the worker and the host.
//!
//! [`EventKind`] classifies events across three categories:
//! - **Worker lifecycle**: start/stop transitions of the periodic worker
//! - **Tick events**: one scheduled execution of the work unit (started,
//!   completed, failed, skipped)
//! - **Host events**: shutdown progress and fatal host failures
//!
//! Tick events always carry the tick's correlation id — every event belonging
//! to one tick shares exactly one [`CorrelationId`], and no two ticks ever
//! share one.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically, so consumers can restore publish order after fan-out.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::correlation::CorrelationId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Severity of an event, as consumed by logging sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warn,
    Error,
    Critical,
}

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Worker lifecycle ===
    /// Worker transitioned to Running; the schedule is armed.
    ///
    /// Sets: `at`, `seq`.
    WorkerStarted,

    /// Worker transitioned to Stopped; no further tick will begin.
    ///
    /// Sets: `at`, `seq`.
    WorkerStopped,

    // === Tick events ===
    /// A tick opened its correlation scope and is about to run the work unit.
    ///
    /// Sets: `correlation`, `tick`, `at`, `seq`.
    TickStarted,

    /// The work unit finished this tick successfully.
    ///
    /// Sets: `correlation`, `tick`, `at`, `seq`.
    TickCompleted,

    /// The work unit returned an error or panicked during this tick.
    ///
    /// The failure is contained: the schedule keeps firing.
    ///
    /// Sets: `correlation`, `tick`, `reason`, `at`, `seq`.
    TickFailed,

    /// A scheduled tick was skipped because the previous tick was still
    /// running (only under [`OverlapPolicy::Skip`](crate::OverlapPolicy::Skip)).
    ///
    /// Sets: `tick`, `at`, `seq`. No correlation scope is opened.
    TickSkipped,

    // === Host events ===
    /// A termination signal was observed; graceful shutdown begins.
    ///
    /// Sets: `at`, `seq`.
    ShutdownRequested,

    /// All in-flight ticks finished within the grace period.
    ///
    /// Sets: `at`, `seq`.
    DrainedWithinGrace,

    /// The grace period elapsed with a tick still in flight; the process
    /// exits anyway (forced termination).
    ///
    /// Sets: `at`, `seq`.
    GraceExceeded,

    /// A fatal error escaped the host run loop.
    ///
    /// Sets: `reason`, `at`, `seq`.
    HostFatal,
}

impl EventKind {
    /// Severity this kind is logged at.
    pub fn level(&self) -> Level {
        match self {
            EventKind::TickFailed | EventKind::HostFatal => Level::Critical,
            EventKind::GraceExceeded => Level::Error,
            EventKind::TickSkipped => Level::Warn,
            _ => Level::Info,
        }
    }

    /// Short stable label (snake_case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::WorkerStarted => "worker_started",
            EventKind::WorkerStopped => "worker_stopped",
            EventKind::TickStarted => "tick_started",
            EventKind::TickCompleted => "tick_completed",
            EventKind::TickFailed => "tick_failed",
            EventKind::TickSkipped => "tick_skipped",
            EventKind::ShutdownRequested => "shutdown_requested",
            EventKind::DrainedWithinGrace => "drained_within_grace",
            EventKind::GraceExceeded => "grace_exceeded",
            EventKind::HostFatal => "host_fatal",
        }
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
///
/// # Example
/// ```
/// use metronome::{CorrelationId, Event, EventKind, Level};
///
/// let id = CorrelationId::new();
/// let ev = Event::now(EventKind::TickFailed)
///     .with_correlation(id)
///     .with_tick(3)
///     .with_reason("boom");
///
/// assert_eq!(ev.kind, EventKind::TickFailed);
/// assert_eq!(ev.level(), Level::Critical);
/// assert_eq!(ev.correlation, Some(id));
/// assert_eq!(ev.tick, Some(3));
/// ```
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Correlation id of the tick this event belongs to, if any.
    pub correlation: Option<CorrelationId>,
    /// Monotonic tick number (1-based), if applicable.
    pub tick: Option<u64>,
    /// Human-readable reason (failure messages, fatal error details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            correlation: None,
            tick: None,
            reason: None,
        }
    }

    /// Severity this event is logged at.
    #[inline]
    pub fn level(&self) -> Level {
        self.kind.level()
    }

    /// Attaches the correlation id of the owning tick.
    #[inline]
    pub fn with_correlation(mut self, id: CorrelationId) -> Self {
        self.correlation = Some(id);
        self
    }

    /// Attaches the tick number.
    #[inline]
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::TickStarted);
        let b = Event::now(EventKind::TickCompleted);
        let c = Event::now(EventKind::WorkerStopped);
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(EventKind::TickStarted.level(), Level::Info);
        assert_eq!(EventKind::TickCompleted.level(), Level::Info);
        assert_eq!(EventKind::TickSkipped.level(), Level::Warn);
        assert_eq!(EventKind::GraceExceeded.level(), Level::Error);
        assert_eq!(EventKind::TickFailed.level(), Level::Critical);
        assert_eq!(EventKind::HostFatal.level(), Level::Critical);
    }

    #[test]
    fn test_builders_attach_metadata() {
        let id = CorrelationId::new();
        let ev = Event::now(EventKind::TickFailed)
            .with_correlation(id)
            .with_tick(7)
            .with_reason("broken");
        assert_eq!(ev.correlation, Some(id));
        assert_eq!(ev.tick, Some(7));
        assert_eq!(ev.reason.as_deref(), Some("broken"));
    }
}
