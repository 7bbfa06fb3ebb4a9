//! # Host: process-level start, run, and graceful-stop orchestration.
//!
//! The [`Host`] owns the event bus, the [`SubscriberSet`], and the
//! [`PeriodicWorker`]. It starts the worker, blocks until a termination
//! signal or fatal error, then runs the shutdown sequence.
//!
//! ## Shutdown path
//! ```text
//! signal / fatal error
//!     └─► publish ShutdownRequested (or HostFatal)
//!     └─► worker.stop()            → no further tick begins
//!     └─► wait in-flight ticks, bounded by cfg.grace:
//!            ├─ drained  → publish DrainedWithinGrace
//!            └─ timeout  → publish GraceExceeded (forced termination)
//!     └─► worker.dispose()
//!     └─► flush subscriber queues, bounded by cfg.flush_timeout
//!     └─► exit (non-zero only for fatal errors)
//! ```
//!
//! All handles are constructed here and passed down explicitly — the bus and
//! the subscriber set are never process-global state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use crate::config::{AppConfig, HostConfig};
use crate::error::HostError;
use crate::events::{Bus, Event, EventKind};
use crate::host::shutdown;
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::work::WorkRef;
use crate::worker::PeriodicWorker;

/// Process supervisor: drives the worker's lifecycle from construction to
/// graceful exit.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use metronome::{AppConfig, CorrelationId, Host, LogWriter, Subscribe, WorkError, WorkFn};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let work = WorkFn::arc("heartbeat", |correlation: CorrelationId| async move {
///         tracing::info!(%correlation, "beat");
///         Ok::<_, WorkError>(())
///     });
///     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
///
///     let host = Host::new(AppConfig::default(), work, subs);
///     host.run().await?; // blocks until SIGINT/SIGTERM
///     Ok(())
/// }
/// ```
pub struct Host {
    cfg: HostConfig,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    worker: PeriodicWorker,
}

impl Host {
    /// Builds the bus, the subscriber set, and the worker from the resolved
    /// configuration.
    ///
    /// Must be called from within a Tokio runtime (subscriber workers are
    /// spawned here).
    pub fn new(cfg: AppConfig, work: WorkRef, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let bus = Bus::new(cfg.host.bus_capacity);
        let subs = Arc::new(SubscriberSet::new(subscribers));
        let worker = PeriodicWorker::new(work, cfg.schedule, bus.clone());
        Self {
            cfg: cfg.host,
            bus,
            subs,
            worker,
        }
    }

    /// Runs until a termination signal or fatal error, then shuts down.
    ///
    /// Returns `Err` only for fatal host errors; the caller maps that to a
    /// non-zero exit status. A grace-period overrun alone is not fatal — it
    /// is reported as [`EventKind::GraceExceeded`] and the process still
    /// exits cleanly (forced termination).
    pub async fn run(self) -> Result<(), HostError> {
        let Host {
            cfg,
            bus,
            subs,
            worker,
        } = self;

        // Subscribe before starting the worker so WorkerStarted is observed.
        let listener = spawn_event_listener(&bus, Arc::clone(&subs));

        let outcome = supervise(&worker, &bus).await;
        if let Err(e) = &outcome {
            tracing::error!(label = e.as_label(), error = %e, "fatal host error");
            bus.publish(Event::now(EventKind::HostFatal).with_reason(e.to_string()));
        }

        drain(&worker, &bus, cfg.grace).await;
        worker.dispose();

        // Release our bus handles so the listener observes Closed and exits
        // once the remaining events are forwarded. In-flight ticks that
        // overran the grace period may keep the bus open; the flush timeout
        // bounds the wait either way.
        drop(worker);
        drop(bus);

        let flush = async {
            let _ = listener.await;
            subs.flush().await;
        };
        if time::timeout(cfg.flush_timeout, flush).await.is_err() {
            tracing::warn!("flush timeout exceeded; exiting with undelivered events");
        }

        outcome
    }
}

/// Starts the worker and blocks until a shutdown signal arrives.
async fn supervise(worker: &PeriodicWorker, bus: &Bus) -> Result<(), HostError> {
    worker.start()?;
    shutdown::wait_for_shutdown_signal().await?;
    bus.publish(Event::now(EventKind::ShutdownRequested));
    Ok(())
}

/// Stops the schedule and waits for in-flight ticks, bounded by `grace`.
async fn drain(worker: &PeriodicWorker, bus: &Bus, grace: Duration) {
    if let Err(e) = worker.stop() {
        tracing::warn!(label = e.as_label(), error = %e, "worker stop failed during shutdown");
    }
    match time::timeout(grace, worker.wait_idle()).await {
        Ok(()) => bus.publish(Event::now(EventKind::DrainedWithinGrace)),
        Err(_) => bus.publish(Event::now(EventKind::GraceExceeded)),
    }
}

/// Forwards bus events to the subscriber set until the bus closes.
fn spawn_event_listener(bus: &Bus, subs: Arc<SubscriberSet>) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => subs.emit(&ev),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "event listener lagged; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
