//! Infrastructure layer - Adapters for the fault-injection engine
//!
//! Implements the application ports (tokio timer, random sources), loads
//! fault-injection policies from configuration, sets up logging, and
//! provides the call filter that drives a fault-injection session around an
//! outgoing call.

pub mod adapters;
pub mod config;
pub mod fault_filter;
pub mod telemetry;

pub use adapters::{SeededRandomSource, ThreadRngSource, TokioTimer};
pub use self::config::{ConfigurationError, FaultInjectionAppConfig, MethodPolicyConfig};
pub use fault_filter::{FaultInjectionFilter, FilterStats, FilterStatsSnapshot, PolicyRegistry};
pub use telemetry::{LoggingConfig, TelemetryError, init_logging};
