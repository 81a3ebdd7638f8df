//! Fault-injection filter for outgoing calls
//!
//! The filter looks up the policy for a method, runs a fault-injection
//! session around the call, and keeps running statistics.

mod filter;
mod registry;
mod stats;

pub use filter::FaultInjectionFilter;
pub use registry::PolicyRegistry;
pub use stats::{FilterStats, FilterStatsSnapshot};
