//! Per-method policy entries of the configuration file

use std::time::Duration;

use domain::{
    DomainError, FaultInjectionPolicy, FractionalPercent, MaxFaults, OverrideHeaders, StatusCode,
};
use serde::{Deserialize, Serialize};

/// Method name matching every method without a policy of its own
pub const DEFAULT_METHOD: &str = "*";

/// One `[[policies]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodPolicyConfig {
    /// Fully qualified method name (e.g. "/pkg.Service/Method") or `*`
    pub method: String,

    /// Abort status code, as number or canonical name
    #[serde(default)]
    pub abort_code: StatusCode,

    /// Abort message (defaults to "Fault injected")
    #[serde(default)]
    pub abort_message: Option<String>,

    #[serde(default)]
    pub abort_percentage: FractionalPercent,

    /// Injected delay in milliseconds
    #[serde(default)]
    pub delay_ms: u64,

    #[serde(default)]
    pub delay_percentage: FractionalPercent,

    /// Max concurrently faulted calls (unlimited when absent)
    #[serde(default)]
    pub max_faults: Option<u32>,

    #[serde(default)]
    pub abort_code_header: Option<String>,

    #[serde(default)]
    pub abort_percentage_header: Option<String>,

    #[serde(default)]
    pub delay_header: Option<String>,

    #[serde(default)]
    pub delay_percentage_header: Option<String>,

    #[serde(default)]
    pub max_faults_header: Option<String>,
}

impl MethodPolicyConfig {
    /// Entry for `method` with every fault disabled
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            abort_code: StatusCode::Ok,
            abort_message: None,
            abort_percentage: FractionalPercent::NEVER,
            delay_ms: 0,
            delay_percentage: FractionalPercent::NEVER,
            max_faults: None,
            abort_code_header: None,
            abort_percentage_header: None,
            delay_header: None,
            delay_percentage_header: None,
            max_faults_header: None,
        }
    }

    /// Whether this entry is the fallback for unlisted methods
    pub fn is_default(&self) -> bool {
        self.method == DEFAULT_METHOD
    }

    /// Build the domain policy
    ///
    /// Header names are lowercased so lookups match however the metadata
    /// spells them.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for an empty method name and
    /// `DomainError::InvalidHeaderName` for unusable header names.
    pub fn to_policy(&self) -> Result<FaultInjectionPolicy, DomainError> {
        if self.method.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "policy method must not be empty".to_string(),
            ));
        }

        let lower = |name: &Option<String>| name.as_deref().map(str::to_ascii_lowercase);
        let headers = OverrideHeaders {
            abort_code: lower(&self.abort_code_header),
            abort_percentage: lower(&self.abort_percentage_header),
            delay: lower(&self.delay_header),
            delay_percentage: lower(&self.delay_percentage_header),
            max_faults: lower(&self.max_faults_header),
        };
        headers.validate()?;

        Ok(FaultInjectionPolicy {
            abort_code: self.abort_code,
            abort_message: self.abort_message.clone(),
            abort_percentage: self.abort_percentage,
            delay: Duration::from_millis(self.delay_ms),
            delay_percentage: self.delay_percentage,
            max_faults: MaxFaults::from(self.max_faults),
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_is_inert() {
        let policy = MethodPolicyConfig::new("/svc/M").to_policy().unwrap();
        assert_eq!(policy, FaultInjectionPolicy::default());
    }

    #[test]
    fn converts_every_field() {
        let entry = MethodPolicyConfig {
            abort_code: StatusCode::Unavailable,
            abort_message: Some("down".to_string()),
            abort_percentage: FractionalPercent::per_hundred(20),
            delay_ms: 150,
            delay_percentage: FractionalPercent::ALWAYS,
            max_faults: Some(3),
            delay_header: Some("X-Envoy-Fault-Delay-Request".to_string()),
            ..MethodPolicyConfig::new("/svc/M")
        };
        let policy = entry.to_policy().unwrap();

        assert_eq!(policy.abort_code, StatusCode::Unavailable);
        assert_eq!(policy.abort_message(), "down");
        assert_eq!(policy.abort_percentage.numerator(), 20);
        assert_eq!(policy.delay, Duration::from_millis(150));
        assert!(policy.delay_percentage.is_always());
        assert_eq!(policy.max_faults, MaxFaults::limited(3));
        assert_eq!(
            policy.headers.delay.as_deref(),
            Some("x-envoy-fault-delay-request")
        );
        assert!(policy.headers.abort_code.is_none());
    }

    #[test]
    fn rejects_bad_header_name() {
        let entry = MethodPolicyConfig {
            abort_code_header: Some("bad header".to_string()),
            ..MethodPolicyConfig::new("/svc/M")
        };
        assert!(matches!(
            entry.to_policy(),
            Err(DomainError::InvalidHeaderName(_))
        ));
    }

    #[test]
    fn rejects_empty_method() {
        assert!(MethodPolicyConfig::new("  ").to_policy().is_err());
    }

    #[test]
    fn default_marker() {
        assert!(MethodPolicyConfig::new(DEFAULT_METHOD).is_default());
        assert!(!MethodPolicyConfig::new("/svc/M").is_default());
    }
}
