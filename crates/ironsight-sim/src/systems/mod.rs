//! Per-tick systems over the combat world.
//!
//! Systems are free functions; state lives in components and in the
//! engine-owned collaborators passed to them.

pub mod cleanup;
pub mod hostiles;
pub mod projectiles;
pub mod snapshot;
