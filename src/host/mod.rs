//! # Host supervision: process lifetime and graceful shutdown.
//!
//! Internal modules:
//! - [`supervisor`]: the [`Host`] run loop (start, signal wait, drain, flush);
//! - [`shutdown`]: cross-platform termination signal handling.

mod shutdown;
mod supervisor;

pub use supervisor::Host;
