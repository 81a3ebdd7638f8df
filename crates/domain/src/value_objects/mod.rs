//! Value Objects - Immutable, identity-less domain primitives

mod call_metadata;
mod fractional_percent;
mod max_faults;
mod status_code;

pub use call_metadata::CallMetadata;
pub use fractional_percent::FractionalPercent;
pub use max_faults::MaxFaults;
pub use status_code::StatusCode;
