//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod random;
mod tokio_timer;

pub use random::{SeededRandomSource, ThreadRngSource};
pub use tokio_timer::TokioTimer;
