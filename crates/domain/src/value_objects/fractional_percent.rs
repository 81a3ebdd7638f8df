//! Fractional percentage value object
//!
//! A probability expressed as `numerator / denominator`, the way fault
//! percentages are configured (per hundred, per ten thousand, per million).
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::FractionalPercent;
//!
//! let pct = FractionalPercent::per_hundred(25);
//! assert_eq!(pct.numerator(), 25);
//! assert_eq!(pct.denominator(), 100);
//!
//! // Numerators are clamped into [0, denominator]
//! assert_eq!(FractionalPercent::clamped(500, 100).numerator(), 100);
//!
//! // A zero denominator disables the fault entirely
//! assert!(FractionalPercent::clamped(5, 0).is_never());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Probability as `numerator / denominator` with `numerator <= denominator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFraction")]
pub struct FractionalPercent {
    numerator: u32,
    denominator: u32,
}

impl FractionalPercent {
    /// Never fires
    pub const NEVER: Self = Self {
        numerator: 0,
        denominator: 100,
    };

    /// Always fires
    pub const ALWAYS: Self = Self {
        numerator: 100,
        denominator: 100,
    };

    /// Create a validated fraction
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPercentage` if the numerator exceeds the
    /// denominator.
    pub const fn new(numerator: u32, denominator: u32) -> Result<Self, DomainError> {
        if numerator > denominator {
            Err(DomainError::invalid_percentage(numerator, denominator))
        } else {
            Ok(Self {
                numerator,
                denominator,
            })
        }
    }

    /// Create a fraction, clamping the numerator into `[0, denominator]`
    #[must_use]
    pub const fn clamped(numerator: u32, denominator: u32) -> Self {
        let numerator = if numerator > denominator {
            denominator
        } else {
            numerator
        };
        Self {
            numerator,
            denominator,
        }
    }

    /// `numerator` out of 100
    #[must_use]
    pub const fn per_hundred(numerator: u32) -> Self {
        Self::clamped(numerator, 100)
    }

    /// `numerator` out of 1,000,000
    #[must_use]
    pub const fn per_million(numerator: u32) -> Self {
        Self::clamped(numerator, 1_000_000)
    }

    /// Same denominator, new numerator clamped into range
    #[must_use]
    pub const fn with_numerator(self, numerator: u32) -> Self {
        Self::clamped(numerator, self.denominator)
    }

    /// The numerator
    #[must_use]
    pub const fn numerator(self) -> u32 {
        self.numerator
    }

    /// The denominator
    #[must_use]
    pub const fn denominator(self) -> u32 {
        self.denominator
    }

    /// True when the fraction can never fire (zero numerator or denominator)
    #[must_use]
    pub const fn is_never(self) -> bool {
        self.numerator == 0 || self.denominator == 0
    }

    /// True when the fraction always fires
    #[must_use]
    pub const fn is_always(self) -> bool {
        !self.is_never() && self.numerator >= self.denominator
    }

    /// Probability in `[0.0, 1.0]`
    #[must_use]
    pub fn ratio(self) -> f64 {
        if self.denominator == 0 {
            0.0
        } else {
            f64::from(self.numerator) / f64::from(self.denominator)
        }
    }
}

impl Default for FractionalPercent {
    fn default() -> Self {
        Self::NEVER
    }
}

impl fmt::Display for FractionalPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[derive(Deserialize)]
struct RawFraction {
    numerator: u32,
    #[serde(default = "default_denominator")]
    denominator: u32,
}

const fn default_denominator() -> u32 {
    100
}

impl TryFrom<RawFraction> for FractionalPercent {
    type Error = DomainError;

    fn try_from(raw: RawFraction) -> Result<Self, Self::Error> {
        Self::new(raw.numerator, raw.denominator)
    }
}
