//! # Function-backed work unit (`WorkFn`).
//!
//! [`WorkFn`] wraps a closure `F: Fn(CorrelationId) -> Fut`, producing a fresh
//! future per tick. This avoids shared mutable state between ticks; if shared
//! state is genuinely needed, capture an `Arc<...>` explicitly inside the
//! closure.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::correlation::{CorrelationContext, CorrelationId};
use crate::error::WorkError;
use crate::work::work::Work;

/// Shared handle to a work unit (`Arc<dyn Work>`).
pub type WorkRef = Arc<dyn Work>;

/// Function-backed work unit implementation.
///
/// Wraps a closure that *creates* a new future per tick. The closure receives
/// the tick's correlation id so its own logging can be correlated with the
/// runtime's tick events.
///
/// # Example
/// ```
/// use metronome::{CorrelationId, WorkError, WorkFn, WorkRef};
///
/// let w: WorkRef = WorkFn::arc("heartbeat", |correlation: CorrelationId| async move {
///     tracing::info!(%correlation, "beat");
///     Ok::<_, WorkError>(())
/// });
///
/// assert_eq!(w.name(), "heartbeat");
/// ```
pub struct WorkFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> WorkFn<F> {
    /// Creates a new function-backed work unit.
    ///
    /// Prefer [`WorkFn::arc`] when you immediately need a [`WorkRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the work unit and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Work for WorkFn<F>
where
    F: Fn(CorrelationId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), WorkError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: &CorrelationContext) -> Result<(), WorkError> {
        (self.f)(ctx.id).await
    }
}
