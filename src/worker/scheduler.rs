//! # The scheduler loop: an explicit sleep-then-fire timer.
//!
//! Instead of an opaque runtime timer, the schedule is a dedicated task that
//! sleeps and fires in a visible loop, so suspension points and cancellation
//! are part of the design:
//!
//! ```text
//! sleep(initial_delay)        (cancellable)
//! loop {
//!   ├─► fire: spawn one tick on the TaskTracker (fire-and-forget)
//!   │     └─ OverlapPolicy::Skip + previous tick still busy ─► TickSkipped
//!   └─► sleep(interval)       (cancellable)
//! }
//! ```
//!
//! Cancelling the token ends the loop at the next suspension point and
//! prevents any spawned-but-not-started tick from beginning; ticks already
//! executing are left to finish and are drained via the [`TaskTracker`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::ScheduleConfig;
use crate::events::{Bus, Event, EventKind};
use crate::policies::OverlapPolicy;
use crate::work::WorkRef;
use crate::worker::tick;

/// State owned by one armed schedule (one `start()`..`stop()` span).
pub(crate) struct Scheduler {
    pub work: WorkRef,
    pub schedule: ScheduleConfig,
    pub bus: Bus,
    pub tracker: TaskTracker,
}

impl Scheduler {
    /// Drives the schedule until the token is cancelled.
    pub(crate) async fn run(self, token: CancellationToken) {
        // Only consulted under OverlapPolicy::Skip.
        let busy = Arc::new(AtomicBool::new(false));
        let mut tick_no: u64 = 0;

        if !sleep_unless_cancelled(self.schedule.initial_delay, &token).await {
            return;
        }
        loop {
            if token.is_cancelled() {
                return;
            }
            tick_no += 1;
            self.fire(tick_no, &busy, &token);
            if !sleep_unless_cancelled(self.schedule.interval, &token).await {
                return;
            }
        }
    }

    /// Fires one tick, or skips it per the overlap policy.
    ///
    /// The tick runs on its own tracked task; the loop never awaits it, so a
    /// slow tick cannot delay the next scheduled one.
    fn fire(&self, tick_no: u64, busy: &Arc<AtomicBool>, token: &CancellationToken) {
        if self.schedule.overlap == OverlapPolicy::Skip && busy.swap(true, Ordering::SeqCst) {
            self.bus
                .publish(Event::now(EventKind::TickSkipped).with_tick(tick_no));
            return;
        }

        let work = Arc::clone(&self.work);
        let bus = self.bus.clone();
        let token = token.clone();
        let release =
            (self.schedule.overlap == OverlapPolicy::Skip).then(|| Arc::clone(busy));

        self.tracker.spawn(async move {
            tick::execute(work.as_ref(), tick_no, &bus, &token).await;
            if let Some(flag) = release {
                flag.store(false, Ordering::SeqCst);
            }
        });
    }
}

/// Sleeps for `d`, aborting early on cancellation.
///
/// Returns `false` if the token was cancelled before the sleep elapsed.
async fn sleep_unless_cancelled(d: Duration, token: &CancellationToken) -> bool {
    if d.is_zero() {
        return !token.is_cancelled();
    }
    tokio::select! {
        _ = time::sleep(d) => true,
        _ = token.cancelled() => false,
    }
}
