//! Application configuration
//!
//! Loaded with the `config` crate from an optional `fault_injection` file
//! (any format the crate understands, TOML in practice) layered under
//! `FAULTLINE__`-prefixed environment variables.

mod policy;

use std::path::Path;

use domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::fault_filter::PolicyRegistry;
use crate::telemetry::LoggingConfig;

pub use policy::{DEFAULT_METHOD, MethodPolicyConfig};

const ENV_PREFIX: &str = "FAULTLINE";
const ENV_SEPARATOR: &str = "__";

const fn default_true() -> bool {
    true
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A policy entry does not describe a valid policy
    #[error("Invalid policy for method '{method}': {source}")]
    InvalidPolicy {
        method: String,
        #[source]
        source: DomainError,
    },

    /// Two entries name the same method
    #[error("Duplicate policy for method '{0}'")]
    DuplicatePolicy(String),
}

/// Top-level fault-injection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultInjectionAppConfig {
    /// Master switch; when off every call passes through untouched
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seed for reproducible fault decisions (thread RNG when absent)
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-method policies
    #[serde(default)]
    pub policies: Vec<MethodPolicyConfig>,
}

impl Default for FaultInjectionAppConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: None,
            logging: LoggingConfig::default(),
            policies: Vec::new(),
        }
    }
}

impl FaultInjectionAppConfig {
    /// Load from `fault_injection.*` in the working directory, if present,
    /// overridden by environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or deserialized.
    pub fn load() -> Result<Self, ConfigurationError> {
        Self::build(config::File::with_name("fault_injection").required(false))
    }

    /// Load from an explicit file, overridden by environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        Self::build(config::File::from(path.as_ref()))
    }

    /// Parse a TOML document, ignoring the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigurationError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    fn build<S>(file: S) -> Result<Self, ConfigurationError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            // e.g. FAULTLINE__ENABLED=false, FAULTLINE__LOGGING__FILTER=debug
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        info!(
            enabled = loaded.enabled,
            policies = loaded.policies.len(),
            seeded = loaded.seed.is_some(),
            "Fault injection configuration loaded"
        );
        Ok(loaded)
    }

    /// Convert the policy entries into a lookup registry
    ///
    /// # Errors
    ///
    /// Returns an error for invalid entries or duplicate method names.
    pub fn registry(&self) -> Result<PolicyRegistry, ConfigurationError> {
        let mut registry = PolicyRegistry::new();
        for entry in &self.policies {
            let policy = entry
                .to_policy()
                .map_err(|source| ConfigurationError::InvalidPolicy {
                    method: entry.method.clone(),
                    source,
                })?;

            let previous = if entry.is_default() {
                registry.set_default(policy)
            } else {
                registry.insert(entry.method.clone(), policy)
            };
            if previous.is_some() {
                return Err(ConfigurationError::DuplicatePolicy(entry.method.clone()));
            }
            debug!(method = %entry.method, "Registered fault injection policy");
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::StatusCode;

    #[test]
    fn default_config() {
        let config = FaultInjectionAppConfig::default();
        assert!(config.enabled);
        assert!(config.seed.is_none());
        assert!(config.policies.is_empty());
        assert!(config.registry().unwrap().is_empty());
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = FaultInjectionAppConfig::from_toml_str("").unwrap();
        assert_eq!(config, FaultInjectionAppConfig::default());
    }

    #[test]
    fn registry_keeps_default_separate() {
        let config = FaultInjectionAppConfig {
            policies: vec![
                MethodPolicyConfig::new(DEFAULT_METHOD),
                MethodPolicyConfig {
                    abort_code: StatusCode::Internal,
                    ..MethodPolicyConfig::new("/svc/A")
                },
            ],
            ..FaultInjectionAppConfig::default()
        };
        let registry = config.registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.default_policy().is_some());
        assert_eq!(
            registry.policy_for("/svc/A").map(|p| p.abort_code),
            Some(StatusCode::Internal)
        );
    }

    #[test]
    fn duplicate_methods_rejected() {
        let config = FaultInjectionAppConfig {
            policies: vec![
                MethodPolicyConfig::new("/svc/A"),
                MethodPolicyConfig::new("/svc/A"),
            ],
            ..FaultInjectionAppConfig::default()
        };
        assert!(matches!(
            config.registry(),
            Err(ConfigurationError::DuplicatePolicy(m)) if m == "/svc/A"
        ));
    }

    #[test]
    fn invalid_entry_names_method() {
        let config = FaultInjectionAppConfig {
            policies: vec![MethodPolicyConfig {
                delay_header: Some(String::new()),
                ..MethodPolicyConfig::new("/svc/B")
            }],
            ..FaultInjectionAppConfig::default()
        };
        let err = config.registry().unwrap_err();
        assert!(err.to_string().contains("/svc/B"));
    }
}
