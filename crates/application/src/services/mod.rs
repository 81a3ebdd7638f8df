//! Application services - Fault-injection use cases

mod active_faults;
mod decision;
mod policy_resolver;
mod session;

pub use active_faults::ActiveFaultCounter;
pub use decision::{Decision, RandomDecisionMaker, under_fraction};
pub use policy_resolver::{MAX_DELAY_OVERRIDE, resolve};
pub use session::{FaultInjectionSession, SessionState};
