//! Combat snapshot for the visible state handed to the HUD layer each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::CombatEvent;
use crate::types::SimTime;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub time: SimTime,
    pub phase: LevelPhase,
    pub weapon: WeaponView,
    pub hostiles: Vec<HostileView>,
    pub projectiles: usize,
    pub decals: usize,
    pub blood_effects: usize,
    pub events: Vec<CombatEvent>,
    pub score: ScoreView,
}

/// The active weapon as the HUD shows it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponView {
    pub kind: WeaponKind,
    pub ammo: u32,
    /// View-model animation frame.
    pub frame: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostileView {
    pub position: Vec3,
    pub hit_points: u32,
    pub state: HostileState,
    /// Atlas cell currently shown.
    pub cell: u32,
    pub mirrored: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub shots_fired: u32,
    pub hostile_hits: u32,
    pub surface_hits: u32,
    pub kills: u32,
}
