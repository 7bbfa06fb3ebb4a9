//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`]
//! fan-out, and the built-in [`LogWriter`] sink.
//!
//! ```text
//! Event flow:
//!   Bus ──► host event listener ──► SubscriberSet::emit(&Event)
//!                                       │
//!                                 ┌─────┴─────┐
//!                                 ▼           ▼
//!                             LogWriter    custom sinks…
//! ```
//!
//! Subscribers receive every runtime event; tick events carry the tick's
//! correlation id so sinks can group the log stream per execution.

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
