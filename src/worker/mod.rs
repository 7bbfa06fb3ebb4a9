//! # The periodic worker: lifecycle, schedule, tick execution.
//!
//! Internal modules:
//! - [`periodic`]: the [`PeriodicWorker`] state machine (start/stop/dispose);
//! - [`scheduler`]: the explicit sleep-then-fire loop driving ticks;
//! - [`tick`]: one tick — correlation scope, event publishing, failure
//!   containment.

mod periodic;
mod scheduler;
mod tick;

pub use periodic::{PeriodicWorker, WorkerState};
