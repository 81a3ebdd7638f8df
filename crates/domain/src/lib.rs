//! Domain layer for the fault-injection engine
//!
//! Contains the fault-injection policy, the value objects it is built from,
//! and domain errors. This layer has no runtime dependencies and defines the
//! vocabulary shared by the application and infrastructure layers.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
