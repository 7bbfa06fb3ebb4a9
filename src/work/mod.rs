//! # Work unit abstractions.
//!
//! - [`Work`] — trait for implementing the periodic work body
//! - [`WorkFn`] — function-backed implementation
//! - [`WorkRef`] — shared reference to a work unit (`Arc<dyn Work>`)

mod work;
mod work_fn;

pub use work::Work;
pub use work_fn::{WorkFn, WorkRef};
