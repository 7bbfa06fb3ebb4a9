//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the worker, tick tasks and
//! the host supervisor.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`Level`] — event classification and payload
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind, Level};
