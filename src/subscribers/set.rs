//! # SubscriberSet: non-blocking fan-out over multiple subscribers.
//!
//! [`SubscriberSet`] distributes each [`Event`] to multiple subscribers
//! **without awaiting** their processing, and supports a bounded flush during
//! host teardown.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and logged (isolation).
//! - `flush()` closes every queue and waits for the workers to drain what was
//!   already queued; the host bounds the wait with its flush timeout.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers (use `Event::seq`).
//! - No retries on queue overflow — events are dropped for that subscriber.
//!
//! ```text
//!    emit(&Event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Event;

use super::Subscribe;

/// Per-subscriber channel with metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    channels: Mutex<Vec<SubscriberChannel>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let s = Arc::clone(&sub);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = s.on_event(ev.as_ref());
                    if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                        tracing::error!(
                            subscriber = s.name(),
                            info = ?panic_err,
                            "subscriber panicked while handling event"
                        );
                    }
                }
            });

            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels: Mutex::new(channels),
            workers: Mutex::new(workers),
        }
    }

    /// Fans one event out to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is full or closed, the event is dropped for it
    /// and a warning is logged with the subscriber's name.
    pub fn emit(&self, event: &Event) {
        let channels = match self.channels.lock() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        let ev = Arc::new(event.clone());
        for channel in channels.iter() {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(subscriber = channel.name, "dropped event: queue full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::warn!(subscriber = channel.name, "dropped event: worker closed");
                }
            }
        }
    }

    /// Flushes the set: closes all queues and awaits worker completion.
    ///
    /// Queued events are still delivered; events emitted after this call are
    /// dropped. Callers bound the wait (e.g. `tokio::time::timeout`).
    pub async fn flush(&self) {
        if let Ok(mut channels) = self.channels.lock() {
            channels.clear();
        }
        let workers = match self.workers.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(_) => return,
        };
        for handle in workers {
            let _ = handle.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::events::EventKind;

    struct Recorder {
        seen: AtomicU64,
        panic_on_first: bool,
        capacity: usize,
    }

    impl Recorder {
        fn arc(panic_on_first: bool, capacity: usize) -> Arc<Self> {
            Arc::new(Self {
                seen: AtomicU64::new(0),
                panic_on_first,
                capacity,
            })
        }
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, _event: &Event) {
            let n = self.seen.fetch_add(1, Ordering::SeqCst);
            if self.panic_on_first && n == 0 {
                panic!("sink failure");
            }
        }

        fn name(&self) -> &'static str {
            "Recorder"
        }

        fn queue_capacity(&self) -> usize {
            self.capacity
        }
    }

    fn events(n: u64) -> Vec<Event> {
        (0..n).map(|_| Event::now(EventKind::TickStarted)).collect()
    }

    #[tokio::test]
    async fn test_flush_delivers_queued_events() {
        let rec = Recorder::arc(false, 16);
        let set = SubscriberSet::new(vec![Arc::clone(&rec) as Arc<dyn Subscribe>]);

        for ev in events(5) {
            set.emit(&ev);
        }
        set.flush().await;

        assert_eq!(rec.seen.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_panicking_subscriber_keeps_consuming() {
        let rec = Recorder::arc(true, 16);
        let set = SubscriberSet::new(vec![Arc::clone(&rec) as Arc<dyn Subscribe>]);

        for ev in events(3) {
            set.emit(&ev);
        }
        set.flush().await;

        // The panic on the first event is caught; the worker loop delivers
        // the remaining two.
        assert_eq!(rec.seen.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_full_queue_drops_events_for_that_subscriber() {
        let rec = Recorder::arc(false, 1);
        let set = SubscriberSet::new(vec![Arc::clone(&rec) as Arc<dyn Subscribe>]);

        // No yield between emits on the current-thread runtime, so the worker
        // has not consumed anything yet: only one event fits the queue.
        for ev in events(3) {
            set.emit(&ev);
        }
        set.flush().await;

        assert_eq!(rec.seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_emit_after_flush_is_dropped() {
        let rec = Recorder::arc(false, 16);
        let set = SubscriberSet::new(vec![Arc::clone(&rec) as Arc<dyn Subscribe>]);
        set.flush().await;

        set.emit(&Event::now(EventKind::TickStarted));

        assert!(set.is_empty());
        assert_eq!(rec.seen.load(Ordering::SeqCst), 0);
    }
}
