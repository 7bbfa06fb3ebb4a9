//! # metronome
//!
//! **Metronome** is a supervised periodic worker runtime: it executes one
//! unit of work on a fixed interval, starts and stops cleanly under external
//! lifecycle control, and emits structured, correlatable events for every
//! execution.
//!
//! ## Architecture
//! ```text
//!   ┌─────────────────────────────────────────────────────────────┐
//!   │  Host (process supervisor)                                  │
//!   │  - resolves AppConfig (CLI > env > files > defaults)        │
//!   │  - owns Bus (broadcast events) and SubscriberSet            │
//!   │  - waits for SIGINT/SIGTERM, drives graceful shutdown       │
//!   └───────────────┬─────────────────────────────────────────────┘
//!                   │ start() / stop() / dispose()
//!                   ▼
//!   ┌─────────────────────────────────────────────────────────────┐
//!   │  PeriodicWorker (Created → Running → Stopped → …)           │
//!   │  scheduler task:  sleep(initial_delay); loop {              │
//!   │      fire tick ──► spawn on TaskTracker (fire-and-forget)   │
//!   │      sleep(interval)           (cancellable)                │
//!   │  }                                                          │
//!   └───────────────┬─────────────────────────────────────────────┘
//!                   │ per tick
//!                   ▼
//!   CorrelationContext (fresh id) ──► TickStarted ──► work.run(&ctx)
//!                                        │
//!                                        ├─ Ok          ─► TickCompleted
//!                                        └─ Err / panic ─► TickFailed (contained)
//!                   │
//!                   ▼ publishes
//!   Bus ──► host event listener ──► SubscriberSet ──► LogWriter, custom sinks
//! ```
//!
//! ## Guarantees
//! - `start`/`stop` are idempotent; state only moves along
//!   Created → Running → Stopped → Running → …
//! - every tick owns a fresh [`CorrelationId`]; all events of one tick share
//!   it and no two ticks ever share one;
//! - a failing or panicking tick is contained at the tick boundary — the next
//!   scheduled tick still fires on time;
//! - after `stop()` returns, no new tick begins; in-flight ticks finish and
//!   are drained by the host, bounded by its grace period;
//! - overlap behavior is an explicit [`OverlapPolicy`], not an accident.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use metronome::{
//!     AppConfig, CorrelationId, Host, LogWriter, Subscribe, WorkError, WorkFn,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let work = WorkFn::arc("heartbeat", |correlation: CorrelationId| async move {
//!         tracing::info!(%correlation, "beat");
//!         Ok::<_, WorkError>(())
//!     });
//!
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let host = Host::new(AppConfig::default(), work, subs);
//!     host.run().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod correlation;
mod error;
mod events;
mod host;
mod policies;
mod subscribers;
mod work;
mod worker;

// ---- Public re-exports ----

pub use config::{
    AppConfig, ENV_PREFIX, FileConfig, HostConfig, HostSection, Overrides, ScheduleConfig,
    ScheduleSection, env_overrides, resolve, resolve_with,
};
pub use correlation::{CorrelationContext, CorrelationId};
pub use error::{HostError, LifecycleError, WorkError};
pub use events::{Bus, Event, EventKind, Level};
pub use host::Host;
pub use policies::OverlapPolicy;
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use work::{Work, WorkFn, WorkRef};
pub use worker::{PeriodicWorker, WorkerState};
