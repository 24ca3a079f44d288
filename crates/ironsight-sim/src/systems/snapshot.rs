//! Snapshot system: builds the HUD-facing `CombatSnapshot`.
//!
//! Read-only over the world.

use hecs::World;

use ironsight_core::components::{Hostile, Projectile, SpritePose};
use ironsight_core::enums::LevelPhase;
use ironsight_core::events::CombatEvent;
use ironsight_core::state::{CombatSnapshot, HostileView, WeaponView};
use ironsight_core::types::SimTime;

use crate::effects::ImpactEffectFactory;
use crate::score::ScoreState;
use crate::weapon::Loadout;

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: LevelPhase,
    loadout: &Loadout,
    effects: &ImpactEffectFactory,
    events: Vec<CombatEvent>,
    score: &ScoreState,
) -> CombatSnapshot {
    CombatSnapshot {
        time: *time,
        phase,
        weapon: loadout
            .active()
            .map(|w| w.view())
            .unwrap_or_else(WeaponView::default),
        hostiles: build_hostiles(world),
        projectiles: world
            .query::<&Projectile>()
            .iter()
            .filter(|(_, p)| !p.disposed)
            .count(),
        decals: effects.decal_count(),
        blood_effects: effects.blood_count(),
        events,
        score: score.view(),
    }
}

/// Hostiles ordered by entity id.
fn build_hostiles(world: &World) -> Vec<HostileView> {
    let mut hostiles: Vec<(u32, HostileView)> = world
        .query::<(&Hostile, &SpritePose)>()
        .iter()
        .map(|(entity, (h, pose))| {
            (
                entity.id(),
                HostileView {
                    position: h.position,
                    hit_points: h.hit_points,
                    state: h.state,
                    cell: pose.cell,
                    mirrored: pose.mirrored,
                },
            )
        })
        .collect();
    hostiles.sort_by_key(|(id, _)| *id);
    hostiles.into_iter().map(|(_, view)| view).collect()
}
