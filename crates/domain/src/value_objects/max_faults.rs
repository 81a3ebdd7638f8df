//! Ceiling on concurrently active faults

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of calls that may be faulted at the same time
///
/// `None` inside means unlimited, mirroring how optional limits are
/// configured elsewhere (`max_faults = 5` or omitted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaxFaults(Option<u32>);

impl MaxFaults {
    /// No ceiling
    pub const UNLIMITED: Self = Self(None);

    /// Ceiling of `max` concurrent faults
    #[must_use]
    pub const fn limited(max: u32) -> Self {
        Self(Some(max))
    }

    /// The ceiling, if any
    #[must_use]
    pub const fn limit(self) -> Option<u32> {
        self.0
    }

    /// Whether one more fault may start while `active` faults are running
    #[must_use]
    pub const fn admits(self, active: u32) -> bool {
        match self.0 {
            Some(max) => active < max,
            None => true,
        }
    }
}

impl From<Option<u32>> for MaxFaults {
    fn from(value: Option<u32>) -> Self {
        Self(value)
    }
}

impl fmt::Display for MaxFaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(max) => write!(f, "{max}"),
            None => f.write_str("unlimited"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_admits_everything() {
        assert!(MaxFaults::UNLIMITED.admits(u32::MAX));
        assert_eq!(MaxFaults::default(), MaxFaults::UNLIMITED);
    }

    #[test]
    fn limited_admits_below_ceiling() {
        let max = MaxFaults::limited(2);
        assert!(max.admits(0));
        assert!(max.admits(1));
        assert!(!max.admits(2));
    }

    #[test]
    fn zero_admits_nothing() {
        assert!(!MaxFaults::limited(0).admits(0));
    }

    #[test]
    fn display() {
        assert_eq!(MaxFaults::limited(3).to_string(), "3");
        assert_eq!(MaxFaults::UNLIMITED.to_string(), "unlimited");
    }

    #[test]
    fn serde_is_transparent() {
        let limited: MaxFaults = serde_json::from_str("4").unwrap();
        let unlimited: MaxFaults = serde_json::from_str("null").unwrap();
        assert_eq!(limited, MaxFaults::limited(4));
        assert_eq!(unlimited, MaxFaults::UNLIMITED);
    }
}
