//! Application layer - Fault-injection use cases
//!
//! Contains the per-call fault-injection session, the policy resolver, the
//! random decision maker and the shared active-fault counter, together with
//! the ports through which they reach the outside world (timer, randomness,
//! call metadata). Adapters in the infrastructure layer implement the ports.

pub mod error;
pub mod ports;
pub mod services;
#[cfg(test)]
pub(crate) mod testing;

pub use error::InjectedAbort;
pub use ports::*;
pub use services::*;
