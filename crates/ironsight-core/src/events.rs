//! Events emitted by the simulation for audio and HUD feedback.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::WeaponKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// A weapon produced a projectile.
    ShotFired { weapon: WeaponKind, ammo_remaining: u32 },
    /// Trigger pulled on an empty weapon.
    DryFire { weapon: WeaponKind },
    WeaponSwitched { weapon: WeaponKind },
    /// A hostile lost a hit point.
    HostileHit { point: Vec3, hit_points: u32 },
    /// A hostile's hit points reached zero.
    HostileKilled { position: Vec3 },
    /// A projectile struck world geometry and left a decal.
    SurfaceImpact { point: Vec3, normal: Vec3 },
    /// A projectile outlived its lifespan without hitting anything.
    ProjectileExpired { position: Vec3 },
}
