//! Port definitions for the application layer
//!
//! Ports are interfaces through which the fault-injection engine reaches
//! its collaborators. Adapters in the infrastructure layer implement them.

mod metadata_view;
mod random_source;
mod timer_port;

pub use metadata_view::MetadataView;
#[cfg(test)]
pub use random_source::MockRandomSource;
pub use random_source::RandomSource;
pub use timer_port::{TimerCallback, TimerHandle, TimerPort};
