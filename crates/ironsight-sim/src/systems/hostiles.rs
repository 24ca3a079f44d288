//! Hostile system: orbit, facing, walk cycle, death sequence.

use glam::{Quat, Vec3};
use hecs::{Entity, World};
use tracing::{info, warn};

use ironsight_core::components::{DeathSequence, Hostile, SpritePose};
use ironsight_core::config::HostileTuning;
use ironsight_core::enums::{AssetKind, HostileState};

use crate::backend::VisualBackend;
use crate::hostile;
use crate::resources::ResourceCache;

/// Advance every hostile by `dt_ms` and push its frame to the backend.
/// Returns the hostiles whose death sequence completed this tick.
pub fn run<V: VisualBackend + ?Sized>(
    world: &mut World,
    resources: &mut ResourceCache,
    visuals: &mut V,
    viewer: Vec3,
    dt_ms: f64,
    tuning: &HostileTuning,
) -> Vec<Entity> {
    let mut completed = Vec::new();

    for (entity, (h, pose, death)) in
        world.query_mut::<(&mut Hostile, &mut SpritePose, Option<&mut DeathSequence>)>()
    {
        let out = hostile::tick(h, pose, death, viewer, dt_ms, tuning);

        if let Some(frame) = out.frame {
            pose.cell = frame.cell;
            let current = h.visual;
            match current {
                Some(visual) => visuals.update(visual, h.position, frame),
                // Lost its sprite earlier; try again now.
                None if h.state == HostileState::Alive => {
                    h.visual = resources.spawn(
                        AssetKind::Hostile,
                        visuals,
                        h.position,
                        Quat::IDENTITY,
                        frame,
                    );
                    if h.visual.is_none() {
                        warn!(?entity, "hostile sprite unavailable");
                    }
                }
                None => {}
            }
        }

        if out.completed {
            hostile::dispose(h, visuals);
            info!(?entity, position = ?h.position, "hostile dead");
            completed.push(entity);
        }
    }

    for &entity in &completed {
        // Absent when the sequence never attached.
        world.remove_one::<DeathSequence>(entity).ok();
    }
    completed
}
