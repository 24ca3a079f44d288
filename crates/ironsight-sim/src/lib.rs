//! Combat simulation for IRONSIGHT.
//!
//! Owns the hecs world of hostiles and projectiles, resolves ray hits
//! against world geometry, drives the hostile state machine and spawns
//! impact effects. Rendering, audio and input stay behind the traits in
//! [`backend`].

pub mod backend;
pub mod effects;
pub mod engine;
pub mod geometry;
pub mod hostile;
pub mod projectile;
pub mod resolver;
pub mod resources;
pub mod score;
pub mod systems;
pub mod timers;
pub mod weapon;
pub mod world_setup;

pub use engine::{CombatEngine, SimConfig};
pub use ironsight_core as core;
