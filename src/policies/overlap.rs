//! # Overlap policy for slow ticks.
//!
//! When a work unit's duration exceeds the schedule interval, the next tick
//! falls due while the previous one is still running. [`OverlapPolicy`] makes
//! the behavior in that situation an explicit choice instead of an accident:
//!
//! - [`OverlapPolicy::Concurrent`] — the tick fires anyway; executions may
//!   overlap. Each tick still owns its own correlation scope, so overlapping
//!   ticks never share state.
//! - [`OverlapPolicy::Skip`] — the tick is skipped (a
//!   [`TickSkipped`](crate::EventKind::TickSkipped) event is published) and
//!   the schedule tries again at the next interval.
//!
//! The skipped tick still consumes a tick number, so gaps in the tick counter
//! are visible in the event stream.

use clap::ValueEnum;
use serde::Deserialize;

/// What to do when a tick falls due while the previous one is still running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Fire-and-forget: ticks may overlap (default).
    #[default]
    Concurrent,
    /// Skip the tick while a previous execution is in flight.
    Skip,
}

impl OverlapPolicy {
    /// Short stable label (snake_case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            OverlapPolicy::Concurrent => "concurrent",
            OverlapPolicy::Skip => "skip",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_concurrent() {
        assert_eq!(OverlapPolicy::default(), OverlapPolicy::Concurrent);
    }

    #[test]
    fn test_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrap {
            overlap: OverlapPolicy,
        }
        let w: Wrap = toml::from_str("overlap = \"skip\"").unwrap();
        assert_eq!(w.overlap, OverlapPolicy::Skip);
        let w: Wrap = toml::from_str("overlap = \"concurrent\"").unwrap();
        assert_eq!(w.overlap, OverlapPolicy::Concurrent);
    }
}
