//! Domain entities

mod fault_injection_policy;

pub use fault_injection_policy::{DEFAULT_ABORT_MESSAGE, FaultInjectionPolicy, OverrideHeaders};
