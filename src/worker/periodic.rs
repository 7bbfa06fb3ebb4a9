//! # PeriodicWorker: the start/stop/execute lifecycle.
//!
//! [`PeriodicWorker`] runs one work unit on a fixed interval and transitions
//! through [`WorkerState`]:
//!
//! ```text
//!            start()              stop()
//!  Created ─────────► Running ─────────► Stopped
//!                        ▲                  │
//!                        └────── start() ───┘
//! ```
//!
//! ## Rules
//! - `start` is valid from Created/Stopped and is a **no-op success** while
//!   Running (the host may call it defensively during restarts).
//! - `stop` is valid from Running and is a **no-op success** otherwise. It
//!   prevents any future tick from beginning but never cancels a tick already
//!   in flight.
//! - `dispose` releases the scheduler resources and is safe to call any
//!   number of times; it is also invoked on drop.
//!
//! ## Concurrency
//! `start`/`stop`/`dispose` may be called from any thread while a tick is
//! executing. The state machine lives behind a `Mutex`; the armed schedule is
//! a `CancellationToken` + [`TaskTracker`] pair created per `start()` span.
//! Ticks share no mutable state with each other — each constructs its own
//! [`CorrelationContext`](crate::CorrelationContext).

use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::ScheduleConfig;
use crate::error::LifecycleError;
use crate::events::{Bus, Event, EventKind};
use crate::work::WorkRef;
use crate::worker::scheduler::Scheduler;

/// Lifecycle state of a [`PeriodicWorker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, never started.
    Created,
    /// Schedule armed; ticks fire until `stop()`.
    Running,
    /// Schedule disarmed; may be started again.
    Stopped,
}

/// Per-`start()` scheduling resources.
struct Inner {
    state: WorkerState,
    token: Option<CancellationToken>,
    tracker: Option<TaskTracker>,
}

/// Periodic worker: drives one work unit on a fixed schedule.
///
/// Constructed with an explicit [`Bus`] handle — events flow to whatever the
/// host wired up, never to a process-global sink.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use metronome::{Bus, CorrelationId, PeriodicWorker, ScheduleConfig, WorkError, WorkFn};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let bus = Bus::new(1024);
///     let work = WorkFn::arc("heartbeat", |correlation: CorrelationId| async move {
///         tracing::info!(%correlation, "beat");
///         Ok::<_, WorkError>(())
///     });
///
///     let schedule = ScheduleConfig {
///         initial_delay: Duration::ZERO,
///         interval: Duration::from_secs(5),
///         ..ScheduleConfig::default()
///     };
///     let worker = PeriodicWorker::new(work, schedule, bus.clone());
///
///     worker.start()?;
///     tokio::time::sleep(Duration::from_secs(12)).await;
///     worker.stop()?;
///     worker.wait_idle().await;
///     worker.dispose();
///     Ok(())
/// }
/// ```
pub struct PeriodicWorker {
    work: WorkRef,
    schedule: ScheduleConfig,
    bus: Bus,
    inner: Mutex<Inner>,
}

impl PeriodicWorker {
    /// Creates a worker in the Created state. The schedule is immutable from
    /// here on; a zero `interval` is clamped to 1 ms so the scheduler loop
    /// always suspends between ticks.
    pub fn new(work: WorkRef, mut schedule: ScheduleConfig, bus: Bus) -> Self {
        schedule.interval = schedule.interval.max(Duration::from_millis(1));
        Self {
            work,
            schedule,
            bus,
            inner: Mutex::new(Inner {
                state: WorkerState::Created,
                token: None,
                tracker: None,
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        self.inner
            .lock()
            .map(|inner| inner.state)
            .unwrap_or(WorkerState::Stopped)
    }

    /// Arms the schedule: Created/Stopped → Running.
    ///
    /// Returns immediately; the first tick fires after `initial_delay` on a
    /// dedicated scheduler task, then every `interval` thereafter. Calling
    /// `start` while already Running is a no-op success.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) -> Result<(), LifecycleError> {
        let (token, tracker) = {
            let mut inner = self
                .inner
                .lock()
                .map_err(|_| LifecycleError::Poisoned { op: "start" })?;
            if inner.state == WorkerState::Running {
                return Ok(());
            }
            let token = CancellationToken::new();
            let tracker = TaskTracker::new();
            inner.state = WorkerState::Running;
            inner.token = Some(token.clone());
            inner.tracker = Some(tracker.clone());
            (token, tracker)
        };

        self.bus.publish(Event::now(EventKind::WorkerStarted));

        let scheduler = Scheduler {
            work: self.work.clone(),
            schedule: self.schedule,
            bus: self.bus.clone(),
            tracker: tracker.clone(),
        };
        tracker.spawn(scheduler.run(token));
        Ok(())
    }

    /// Disarms the schedule: Running → Stopped.
    ///
    /// After `stop` returns, no new tick begins. A tick already in flight is
    /// allowed to complete; use [`PeriodicWorker::wait_idle`] to wait for it.
    /// Calling `stop` when not Running is a no-op success.
    pub fn stop(&self) -> Result<(), LifecycleError> {
        {
            let mut inner = self
                .inner
                .lock()
                .map_err(|_| LifecycleError::Poisoned { op: "stop" })?;
            if inner.state != WorkerState::Running {
                return Ok(());
            }
            inner.state = WorkerState::Stopped;
            if let Some(token) = inner.token.take() {
                token.cancel();
            }
        }
        self.bus.publish(Event::now(EventKind::WorkerStopped));
        Ok(())
    }

    /// Waits until the scheduler task and all in-flight ticks have finished.
    ///
    /// A no-op while the worker is still Running: the schedule keeps spawning
    /// ticks, so closing the live tracker would make the wait meaningless.
    /// Call after [`PeriodicWorker::stop`]; callers bound the wait themselves
    /// (e.g. `tokio::time::timeout`).
    pub async fn wait_idle(&self) {
        let tracker = match self.inner.lock() {
            Ok(inner) => {
                if inner.state == WorkerState::Running {
                    return;
                }
                inner.tracker.clone()
            }
            Err(_) => None,
        };
        if let Some(tracker) = tracker {
            tracker.close();
            tracker.wait().await;
        }
    }

    /// Releases the scheduling resources.
    ///
    /// Cancels the schedule if still armed and drops the token/tracker pair.
    /// Safe to call multiple times; typically invoked after `stop` during
    /// teardown. Also runs on drop.
    pub fn dispose(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.state = WorkerState::Stopped;
            if let Some(token) = inner.token.take() {
                token.cancel();
            }
            if let Some(tracker) = inner.tracker.take() {
                tracker.close();
            }
        }
    }
}

impl Drop for PeriodicWorker {
    fn drop(&mut self) {
        self.dispose();
    }
}
