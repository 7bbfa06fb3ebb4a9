//! # Work unit abstraction.
//!
//! A [`Work`] implementation is the body executed on every tick. It receives
//! the tick's [`CorrelationContext`] so that anything it logs can carry the
//! same correlation id as the runtime's own tick events — correlation is
//! passed explicitly, never through ambient state.
//!
//! Work units are not cancelled mid-tick: once a tick begins, it runs to
//! completion even during shutdown (the host waits, bounded by its grace
//! period). Errors and panics are contained at the tick boundary by the
//! runtime; implementations just return a [`WorkError`] on failure.

use async_trait::async_trait;

use crate::correlation::CorrelationContext;
use crate::error::WorkError;

/// # One unit of periodic work.
///
/// A `Work` has a stable [`name`](Work::name) and an async
/// [`run`](Work::run) method invoked once per tick.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use metronome::{CorrelationContext, Work, WorkError};
///
/// struct Heartbeat;
///
/// #[async_trait]
/// impl Work for Heartbeat {
///     fn name(&self) -> &str { "heartbeat" }
///
///     async fn run(&self, ctx: &CorrelationContext) -> Result<(), WorkError> {
///         tracing::info!(correlation = %ctx.id, "beat");
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Returns a stable, human-readable name for this work unit.
    fn name(&self) -> &str;

    /// Executes one tick of work within the given correlation scope.
    async fn run(&self, ctx: &CorrelationContext) -> Result<(), WorkError>;
}
