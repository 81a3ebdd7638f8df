//! Fault-injection policy attached to an RPC method.
//!
//! A policy describes what may be injected into a call (an abort with a
//! status code, a delay, or both), how often, how many calls may be faulted
//! at the same time, and which request headers may override those values on
//! a per-call basis.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{FractionalPercent, MaxFaults, StatusCode};

/// Message carried by an injected abort when the policy sets none
pub const DEFAULT_ABORT_MESSAGE: &str = "Fault injected";

/// Names of request headers allowed to override policy values per call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideHeaders {
    /// Header carrying the abort status code
    #[serde(default)]
    pub abort_code: Option<String>,
    /// Header carrying the abort percentage numerator
    #[serde(default)]
    pub abort_percentage: Option<String>,
    /// Header carrying the delay in milliseconds
    #[serde(default)]
    pub delay: Option<String>,
    /// Header carrying the delay percentage numerator
    #[serde(default)]
    pub delay_percentage: Option<String>,
    /// Header carrying the max active faults ceiling
    #[serde(default)]
    pub max_faults: Option<String>,
}

impl OverrideHeaders {
    /// The header names Envoy-style fault filters use
    #[must_use]
    pub fn envoy() -> Self {
        Self {
            abort_code: Some("x-envoy-fault-abort-request".to_string()),
            abort_percentage: Some("x-envoy-fault-abort-request-percentage".to_string()),
            delay: Some("x-envoy-fault-delay-request".to_string()),
            delay_percentage: Some("x-envoy-fault-delay-request-percentage".to_string()),
            max_faults: None,
        }
    }

    /// True when no override header is configured
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.abort_code.is_none()
            && self.abort_percentage.is_none()
            && self.delay.is_none()
            && self.delay_percentage.is_none()
            && self.max_faults.is_none()
    }

    /// Check that every configured name is a usable header name
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidHeaderName` for empty names or names with
    /// characters outside visible ASCII.
    pub fn validate(&self) -> Result<(), DomainError> {
        [
            &self.abort_code,
            &self.abort_percentage,
            &self.delay,
            &self.delay_percentage,
            &self.max_faults,
        ]
        .into_iter()
        .flatten()
        .try_for_each(|name| {
            let valid = !name.is_empty() && name.bytes().all(|b| b.is_ascii_graphic());
            if valid {
                Ok(())
            } else {
                Err(DomainError::InvalidHeaderName(name.clone()))
            }
        })
    }
}

/// Policy for injecting faults into calls of one method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultInjectionPolicy {
    /// Status code of the injected abort (`Ok` disables aborts)
    pub abort_code: StatusCode,

    /// Message of the injected abort
    pub abort_message: Option<String>,

    /// How often calls are aborted
    pub abort_percentage: FractionalPercent,

    /// Delay added before the call proceeds (zero disables delays)
    pub delay: Duration,

    /// How often calls are delayed
    pub delay_percentage: FractionalPercent,

    /// Ceiling on concurrently faulted calls
    pub max_faults: MaxFaults,

    /// Headers that may override the values above per call
    pub headers: OverrideHeaders,
}

impl Default for FaultInjectionPolicy {
    fn default() -> Self {
        Self {
            abort_code: StatusCode::Ok,
            abort_message: None,
            abort_percentage: FractionalPercent::NEVER,
            delay: Duration::ZERO,
            delay_percentage: FractionalPercent::NEVER,
            max_faults: MaxFaults::UNLIMITED,
            headers: OverrideHeaders::default(),
        }
    }
}

impl FaultInjectionPolicy {
    /// Policy that aborts with `code` at the given rate
    #[must_use]
    pub fn abort(code: StatusCode, percentage: FractionalPercent) -> Self {
        Self::default().with_abort(code, percentage)
    }

    /// Policy that delays by `delay` at the given rate
    #[must_use]
    pub fn delay(delay: Duration, percentage: FractionalPercent) -> Self {
        Self::default().with_delay(delay, percentage)
    }

    /// Set the abort code and rate
    #[must_use]
    pub const fn with_abort(mut self, code: StatusCode, percentage: FractionalPercent) -> Self {
        self.abort_code = code;
        self.abort_percentage = percentage;
        self
    }

    /// Set the abort message
    #[must_use]
    pub fn with_abort_message(mut self, message: impl Into<String>) -> Self {
        self.abort_message = Some(message.into());
        self
    }

    /// Set the delay and its rate
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration, percentage: FractionalPercent) -> Self {
        self.delay = delay;
        self.delay_percentage = percentage;
        self
    }

    /// Set the max active faults ceiling
    #[must_use]
    pub const fn with_max_faults(mut self, max_faults: MaxFaults) -> Self {
        self.max_faults = max_faults;
        self
    }

    /// Set the override header names
    #[must_use]
    pub fn with_headers(mut self, headers: OverrideHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// Whether this policy can ever abort a call
    #[must_use]
    pub const fn is_abort_enabled(&self) -> bool {
        !self.abort_code.is_ok() && !self.abort_percentage.is_never()
    }

    /// Whether this policy can ever delay a call
    #[must_use]
    pub const fn is_delay_enabled(&self) -> bool {
        !self.delay.is_zero() && !self.delay_percentage.is_never()
    }

    /// Message carried by an injected abort
    #[must_use]
    pub fn abort_message(&self) -> &str {
        self.abort_message
            .as_deref()
            .unwrap_or(DEFAULT_ABORT_MESSAGE)
    }
}
