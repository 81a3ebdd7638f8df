//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Status code outside the canonical 0-16 range or with an unknown name
    #[error("Invalid status code: {0}")]
    InvalidStatusCode(String),

    /// Percentage with a numerator larger than its denominator
    #[error("Invalid percentage: {numerator}/{denominator}")]
    InvalidPercentage { numerator: u32, denominator: u32 },

    /// Metadata header name that cannot be used for overrides
    #[error("Invalid header name: {0:?}")]
    InvalidHeaderName(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create an invalid percentage error
    pub const fn invalid_percentage(numerator: u32, denominator: u32) -> Self {
        Self::InvalidPercentage {
            numerator,
            denominator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_status_code_message() {
        let err = DomainError::InvalidStatusCode("42".to_string());
        assert_eq!(err.to_string(), "Invalid status code: 42");
    }

    #[test]
    fn invalid_percentage_message() {
        let err = DomainError::invalid_percentage(150, 100);
        assert_eq!(err.to_string(), "Invalid percentage: 150/100");
    }

    #[test]
    fn invalid_header_name_message() {
        let err = DomainError::InvalidHeaderName(String::new());
        assert_eq!(err.to_string(), "Invalid header name: \"\"");
    }

    #[test]
    fn validation_error_message() {
        let err = DomainError::ValidationError("delay too large".to_string());
        assert_eq!(err.to_string(), "Validation failed: delay too large");
    }
}
