//! RPC status code value object
//!
//! The canonical set of RPC status codes an injected abort can carry.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::StatusCode;
//!
//! let code: StatusCode = "ABORTED".parse().expect("known name");
//! assert_eq!(code, StatusCode::Aborted);
//! assert_eq!(code.code(), 10);
//! assert_eq!(StatusCode::from_code(14), Some(StatusCode::Unavailable));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Canonical RPC status codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StatusCodeRepr", into = "String")]
#[repr(i32)]
pub enum StatusCode {
    /// Not an error. As an abort code it disables abort injection.
    #[default]
    Ok = 0,
    /// The operation was cancelled
    Cancelled = 1,
    /// Unknown error
    Unknown = 2,
    /// Client specified an invalid argument
    InvalidArgument = 3,
    /// Deadline expired before the operation could complete
    DeadlineExceeded = 4,
    /// Requested entity was not found
    NotFound = 5,
    /// Entity already exists
    AlreadyExists = 6,
    /// Caller lacks permission
    PermissionDenied = 7,
    /// Some resource has been exhausted
    ResourceExhausted = 8,
    /// System is not in a state required for the operation
    FailedPrecondition = 9,
    /// The operation was aborted
    Aborted = 10,
    /// Operation attempted past the valid range
    OutOfRange = 11,
    /// Operation is not implemented
    Unimplemented = 12,
    /// Internal error
    Internal = 13,
    /// Service is currently unavailable
    Unavailable = 14,
    /// Unrecoverable data loss or corruption
    DataLoss = 15,
    /// Request lacks valid authentication credentials
    Unauthenticated = 16,
}

const ALL: [StatusCode; 17] = [
    StatusCode::Ok,
    StatusCode::Cancelled,
    StatusCode::Unknown,
    StatusCode::InvalidArgument,
    StatusCode::DeadlineExceeded,
    StatusCode::NotFound,
    StatusCode::AlreadyExists,
    StatusCode::PermissionDenied,
    StatusCode::ResourceExhausted,
    StatusCode::FailedPrecondition,
    StatusCode::Aborted,
    StatusCode::OutOfRange,
    StatusCode::Unimplemented,
    StatusCode::Internal,
    StatusCode::Unavailable,
    StatusCode::DataLoss,
    StatusCode::Unauthenticated,
];

impl StatusCode {
    /// Look up a status code by its numeric value
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code).ok().and_then(|i| ALL.get(i).copied())
    }

    /// Numeric value of the code
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Whether this is the `OK` code
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Upper snake case name (e.g. `DEADLINE_EXCEEDED`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::FailedPrecondition => "FAILED_PRECONDITION",
            Self::Aborted => "ABORTED",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::Unimplemented => "UNIMPLEMENTED",
            Self::Internal => "INTERNAL",
            Self::Unavailable => "UNAVAILABLE",
            Self::DataLoss => "DATA_LOSS",
            Self::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusCode {
    type Err = DomainError;

    /// Accepts either the numeric value or the name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i32>() {
            return Self::from_code(code)
                .ok_or_else(|| DomainError::InvalidStatusCode(trimmed.to_string()));
        }
        ALL.iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::InvalidStatusCode(trimmed.to_string()))
    }
}

impl TryFrom<i32> for StatusCode {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_code(value).ok_or_else(|| DomainError::InvalidStatusCode(value.to_string()))
    }
}

impl From<StatusCode> for String {
    fn from(code: StatusCode) -> Self {
        code.as_str().to_string()
    }
}

/// Wire form accepted when deserializing: a number or a name
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusCodeRepr {
    Code(i32),
    Name(String),
}

impl TryFrom<StatusCodeRepr> for StatusCode {
    type Error = DomainError;

    fn try_from(repr: StatusCodeRepr) -> Result<Self, Self::Error> {
        match repr {
            StatusCodeRepr::Code(code) => Self::try_from(code),
            StatusCodeRepr::Name(name) => name.parse(),
        }
    }
}
