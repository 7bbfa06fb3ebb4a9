//! # LogWriter — renders runtime events through `tracing`.
//!
//! The built-in logging sink. Every event is emitted as a structured
//! `tracing` record under the `metronome::events` target, with the tick's
//! correlation id as an explicit field — never via ambient scope state.
//!
//! Severity mapping: `Info` → `info!`, `Warn` → `warn!`, `Error` → `error!`,
//! `Critical` → `error!` with `critical = true` (tracing has no level above
//! error).
//!
//! ## Example output
//! ```text
//! INFO  metronome::events: tick_started seq=4 tick=2 correlation=6f9a…
//! ERROR metronome::events: tick_failed seq=5 tick=2 correlation=6f9a… reason="work unit failed: boom" critical=true
//! ```

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, Level};
use crate::subscribers::Subscribe;

/// Logging sink targeting `metronome::events`.
///
/// Per-category level filtering (e.g. silencing this target while keeping the
/// work unit's own logs) is the host's concern, configured through
/// `tracing_subscriber::EnvFilter`.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Constructs a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

const TARGET: &str = "metronome::events";

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let label = e.kind.as_label();
        let correlation = e.correlation.map(|c| c.to_string());
        let correlation = correlation.as_deref();
        let reason = e.reason.as_deref();

        match e.level() {
            Level::Info => {
                info!(target: TARGET, seq = e.seq, tick = e.tick, correlation, "{label}");
            }
            Level::Warn => {
                warn!(target: TARGET, seq = e.seq, tick = e.tick, correlation, "{label}");
            }
            Level::Error => {
                error!(target: TARGET, seq = e.seq, tick = e.tick, correlation, reason, "{label}");
            }
            Level::Critical => {
                error!(
                    target: TARGET,
                    seq = e.seq,
                    tick = e.tick,
                    correlation,
                    reason,
                    critical = true,
                    "{label}"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
