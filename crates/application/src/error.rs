//! Application-level errors

use domain::StatusCode;
use thiserror::Error;

/// The failure deliberately injected into an aborted call
///
/// This is the only caller-visible error of the fault-injection engine.
/// Capacity exhaustion and malformed overrides degrade silently instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct InjectedAbort {
    code: StatusCode,
    message: String,
}

impl InjectedAbort {
    /// Create an injected abort
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Status code the call fails with
    pub const fn code(&self) -> StatusCode {
        self.code
    }

    /// Status message the call fails with
    pub fn message(&self) -> &str {
        &self.message
    }
}
