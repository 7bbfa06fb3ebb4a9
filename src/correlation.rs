//! # Correlation identity for tick executions.
//!
//! Every tick gets a fresh [`CorrelationContext`] that groups all log events
//! belonging to that single execution. The context is owned by the tick that
//! created it and is never shared across concurrent ticks or reused.
//!
//! Correlation is passed **explicitly**: the worker hands the context to the
//! work unit and stamps the id onto every event it publishes for that tick.
//! There is no ambient/thread-local scope state.

use std::fmt;
use std::time::SystemTime;

use uuid::Uuid;

/// Opaque unique token identifying one tick's correlation scope.
///
/// Cheap to copy; renders as a UUID in logs.
///
/// # Example
/// ```
/// use metronome::CorrelationId;
///
/// let a = CorrelationId::new();
/// let b = CorrelationId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generates a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorrelationId({})", self.0)
    }
}

/// Per-tick correlation scope.
///
/// Created at the start of a tick, dropped when the tick finishes.
#[derive(Debug)]
pub struct CorrelationContext {
    /// Unique token for this tick.
    pub id: CorrelationId,
    /// When the scope was opened.
    pub created_at: SystemTime,
}

impl CorrelationContext {
    /// Opens a fresh scope with a new id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: CorrelationId::new(),
            created_at: SystemTime::now(),
        }
    }
}

impl Default for CorrelationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_never_share_ids() {
        let ids: Vec<CorrelationId> = (0..100).map(|_| CorrelationContext::new().id).collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_display_is_stable_uuid() {
        let ctx = CorrelationContext::new();
        let s = ctx.id.to_string();
        assert_eq!(s.len(), 36);
        assert_eq!(ctx.id.to_string(), s);
    }
}
