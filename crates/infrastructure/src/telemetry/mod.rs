//! Logging infrastructure
//!
//! Installs the global `tracing` subscriber used by the fault filter and the
//! session state machine.

mod logging;

pub use logging::{LoggingConfig, TelemetryError, init_logging};
