//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Hostile lifecycle. `Dead` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostileState {
    #[default]
    Alive,
    /// Out of hit points; death frames and fall are playing.
    Dying,
    /// Animation finished, visuals released, state frozen.
    Dead,
}

/// What a resolved ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Geometry,
    Hostile,
}

/// Weapon variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// One shot per trigger pull, locked out while the firing animation plays.
    #[default]
    SingleShot,
    /// Rate-limited continuous fire with no animation lock.
    Automatic,
}

/// Shared visual assets that are loaded once and cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetKind {
    Projectile,
    Hostile,
    Blood,
    Decal,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Projectile,
        AssetKind::Hostile,
        AssetKind::Blood,
        AssetKind::Decal,
    ];

    /// Asset path handed to the backend when the atlas is first loaded.
    pub fn path(self) -> &'static str {
        match self {
            AssetKind::Projectile => "assets/textures/bullet.png",
            AssetKind::Hostile => "assets/textures/cacodemon.png",
            AssetKind::Blood => "assets/textures/blood.png",
            AssetKind::Decal => "assets/textures/decals.png",
        }
    }
}

/// Transient impact effect kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Blood,
    Decal,
}

impl EffectKind {
    pub fn asset(self) -> AssetKind {
        match self {
            EffectKind::Blood => AssetKind::Blood,
            EffectKind::Decal => AssetKind::Decal,
        }
    }
}

/// Top-level level state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    #[default]
    Unloaded,
    Active,
    Paused,
}
