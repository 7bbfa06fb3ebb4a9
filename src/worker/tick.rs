//! # Execute a single tick of the work unit.
//!
//! One tick: open a fresh correlation scope, publish `TickStarted`, run the
//! work body, publish `TickCompleted` or `TickFailed` within the same scope.
//!
//! ```text
//!   CorrelationContext::new()
//!          ▼
//!   TickStarted ──► work.run(&ctx) ──► Ok   ──► TickCompleted
//!                        │
//!                        ├─ Err(WorkError) ──► TickFailed (Critical)
//!                        └─ panic (caught) ──► TickFailed (Critical)
//! ```
//!
//! Failures are contained here: neither an `Err` return nor a panic ever
//! reaches the scheduler loop, so a failing tick cannot stop the schedule.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::correlation::CorrelationContext;
use crate::error::WorkError;
use crate::events::{Bus, Event, EventKind};
use crate::work::Work;

/// Runs one tick of the work unit, publishing its lifecycle events.
///
/// Bails out before opening a correlation scope if `token` was cancelled
/// between scheduling and execution: once `stop()` has returned, no new tick
/// begins. An already-started tick is never cancelled from here.
pub(crate) async fn execute(work: &dyn Work, tick: u64, bus: &Bus, token: &CancellationToken) {
    if token.is_cancelled() {
        return;
    }

    let ctx = CorrelationContext::new();
    bus.publish(
        Event::now(EventKind::TickStarted)
            .with_correlation(ctx.id)
            .with_tick(tick),
    );

    let res = AssertUnwindSafe(work.run(&ctx)).catch_unwind().await;
    match res {
        Ok(Ok(())) => {
            bus.publish(
                Event::now(EventKind::TickCompleted)
                    .with_correlation(ctx.id)
                    .with_tick(tick),
            );
        }
        Ok(Err(e)) => {
            publish_failed(bus, &ctx, tick, &e);
        }
        Err(payload) => {
            let e = WorkError::Panic {
                info: panic_message(payload.as_ref()),
            };
            publish_failed(bus, &ctx, tick, &e);
        }
    }
}

/// Publishes a `TickFailed` event carrying the tick's correlation id.
fn publish_failed(bus: &Bus, ctx: &CorrelationContext, tick: u64, err: &WorkError) {
    bus.publish(
        Event::now(EventKind::TickFailed)
            .with_correlation(ctx.id)
            .with_tick(tick)
            .with_reason(err.to_string()),
    );
}

/// Renders a caught panic payload as text.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
