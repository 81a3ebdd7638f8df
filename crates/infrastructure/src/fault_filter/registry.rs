//! Method name to policy lookup

use std::collections::HashMap;

use domain::FaultInjectionPolicy;

/// Policies keyed by fully qualified method name, with an optional fallback
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    methods: HashMap<String, FaultInjectionPolicy>,
    default: Option<FaultInjectionPolicy>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method policy, builder style
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>, policy: FaultInjectionPolicy) -> Self {
        self.insert(method, policy);
        self
    }

    /// Set the fallback policy, builder style
    #[must_use]
    pub fn with_default(mut self, policy: FaultInjectionPolicy) -> Self {
        self.set_default(policy);
        self
    }

    /// Add a method policy, returning the one it replaced
    pub fn insert(
        &mut self,
        method: impl Into<String>,
        policy: FaultInjectionPolicy,
    ) -> Option<FaultInjectionPolicy> {
        self.methods.insert(method.into(), policy)
    }

    /// Set the fallback policy, returning the one it replaced
    pub fn set_default(&mut self, policy: FaultInjectionPolicy) -> Option<FaultInjectionPolicy> {
        self.default.replace(policy)
    }

    /// Policy for `method`, falling back to the default
    pub fn policy_for(&self, method: &str) -> Option<&FaultInjectionPolicy> {
        self.methods.get(method).or(self.default.as_ref())
    }

    pub fn default_policy(&self) -> Option<&FaultInjectionPolicy> {
        self.default.as_ref()
    }

    /// Number of method-specific policies
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// True when neither method policies nor a default are set
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.default.is_none()
    }
}
