//! # Scheduling policies.
//!
//! Policies make behavioral choices of the runtime explicit and configurable.
//! Currently a single policy exists: [`OverlapPolicy`], which decides what
//! happens when a tick falls due while the previous one is still running.

mod overlap;

pub use overlap::OverlapPolicy;
