//! Tournament lifecycle state machine.
//!
//! Status changes go through [`validate_transition`], which rejects any edge
//! outside the lifecycle graph and then checks the guard attached to that edge.
//! [`LifecycleManager`] wraps it with repository reads and the history write.

pub mod errors;
pub mod guards;
pub mod manager;
pub mod status;

pub use errors::{LifecycleError, LifecycleResult, TransitionError};
pub use guards::{LifecycleSnapshot, MIN_ACTIVE_ENROLLMENTS, validate_transition};
pub use manager::{LifecycleManager, TransitionOutcome};
pub use status::{StatusHistoryEntry, TournamentStatus, is_allowed, is_rollback};
