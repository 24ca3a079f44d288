//! Fundamental geometric and simulation types.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::CombatError;

/// A unit-length direction. Both [`Direction::new`] and deserialization
/// normalize, so every holder can rely on `|d| == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec3")]
pub struct Direction(Vec3);

impl Direction {
    /// Normalize `v`. Fails for zero-length or non-finite input.
    pub fn new(v: Vec3) -> Result<Self, CombatError> {
        v.try_normalize()
            .map(Direction)
            .ok_or(CombatError::InvalidDirection)
    }

    pub fn get(self) -> Vec3 {
        self.0
    }
}

impl TryFrom<Vec3> for Direction {
    type Error = CombatError;

    fn try_from(v: Vec3) -> Result<Self, Self::Error> {
        Direction::new(v)
    }
}

/// A half-line through the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Direction,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Direction) -> Self {
        Self { origin, direction }
    }

    /// Point at parametric distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction.get() * t
    }
}

/// A single ray/shape intersection as reported by a geometry backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    /// Outward surface normal at `point` (unit length).
    pub normal: Vec3,
}

/// Opaque handle to a collidable piece of static world geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollidableHandle(pub u32);

/// Handle to a shared texture atlas held by the visual backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AtlasHandle(pub u32);

/// Handle to one spawned sprite/plane instance in the visual backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u32);

/// Cancellation token for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerToken(pub u64);

/// Which cell of an atlas a visual shows, and how.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteFrame {
    pub cell: u32,
    /// Horizontal flip (used for the mirrored half of the facing buckets).
    pub mirrored: bool,
    pub alpha: f32,
}

impl SpriteFrame {
    pub fn cell(cell: u32) -> Self {
        Self {
            cell,
            mirrored: false,
            alpha: 1.0,
        }
    }
}

/// Simulation time tracking. This is the simulation's clock: every timer
/// and animation is measured against `elapsed_ms`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: f64,
}

impl SimTime {
    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Advance by one tick of `dt_ms`.
    pub fn advance(&mut self, dt_ms: f64) {
        self.tick += 1;
        self.elapsed_ms += dt_ms;
    }
}
