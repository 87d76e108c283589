//! Venue schedule resolution and per-venue field pools.

pub mod field_pool;
pub mod resolver;

pub use field_pool::{FieldPool, FieldSlot};
pub use resolver::{ResolvedVenue, ScheduleDefaults, VenueResolver};
