//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in the sim crate's systems, not here.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::HostileState;
use crate::types::{Direction, TimerToken, VisualHandle};

/// A straight-line projectile resolving to a single hit or a timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Where the projectile was spawned.
    pub origin: Vec3,
    /// Current position.
    pub position: Vec3,
    pub direction: Direction,
    /// Units per second.
    pub speed: f32,
    pub spawn_time_ms: f64,
    pub lifespan_ms: f64,
    /// Pending lifespan timer; cancelled when the projectile resolves a hit.
    pub lifespan_timer: Option<TimerToken>,
    /// Set at a tick boundary once the lifespan timer fires.
    pub expired: bool,
    pub disposed: bool,
    pub visual: Option<VisualHandle>,
}

/// An orbiting monster with a hit-point pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub position: Vec3,
    /// Centre of the orbit.
    pub home_position: Vec3,
    /// Horizontal orbit angle (radians, wrapped to [0, 2π)).
    pub orbit_angle: f32,
    /// Vertical bob angle (radians, wrapped to [0, 2π)).
    pub vertical_angle: f32,
    pub hit_points: u32,
    pub state: HostileState,
    /// Cleared on entering `Dying`; the resolver skips disabled colliders.
    pub collision_enabled: bool,
    /// Bounding sphere radius.
    pub collider_radius: f32,
    pub visual: Option<VisualHandle>,
}

/// Sprite pose derived from facing and the walk cycle. Carries no gameplay meaning.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpritePose {
    /// Facing column in the atlas (0 = facing away, 4 = facing the viewer).
    pub column: u32,
    /// Horizontal flip for the viewer-left half of the facings.
    pub mirrored: bool,
    /// Walk cycle row.
    pub walk_row: u32,
    /// Time accumulated toward the next walk frame.
    pub walk_elapsed_ms: f64,
    /// Atlas cell last pushed to the visual.
    pub cell: u32,
}

/// Attached when a hostile enters `Dying`; drives death frames and the fall.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeathSequence {
    pub elapsed_ms: f64,
    /// Height when the fall started.
    pub fall_start_height: f32,
}
