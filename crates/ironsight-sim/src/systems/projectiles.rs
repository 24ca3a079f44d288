//! Projectile system: lifespan expiry, lookahead queries, hit dispatch, motion.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use ironsight_core::components::Projectile;
use ironsight_core::config::ProjectileTuning;
use ironsight_core::events::CombatEvent;
use ironsight_core::types::Ray;

use crate::backend::{VisualBackend, WorldGeometry};
use crate::effects::ImpactEffectFactory;
use crate::projectile::{self, ProjectileOutcome};
use crate::resolver::CombatResolver;
use crate::score::ScoreState;
use crate::timers::TimerQueue;

/// Flag projectiles whose lifespan timer fired. Entities that are already
/// gone are skipped.
pub fn mark_expired(world: &mut World, expired: Vec<Entity>) {
    for entity in expired {
        if let Ok(mut projectile) = world.get::<&mut Projectile>(entity) {
            projectile.expired = true;
            projectile.lifespan_timer = None;
        }
    }
}

/// Step every live projectile once. Projectiles are processed one at a
/// time in entity-id order, so a hit applied by one is visible to the next.
#[allow(clippy::too_many_arguments)]
pub fn run<G: WorldGeometry + ?Sized, V: VisualBackend + ?Sized>(
    world: &mut World,
    resolver: &CombatResolver,
    geometry: &G,
    effects: &mut ImpactEffectFactory,
    visuals: &mut V,
    rng: &mut ChaCha8Rng,
    timers: &mut TimerQueue<Entity>,
    tuning: &ProjectileTuning,
    now_ms: f64,
    dt_ms: f64,
    events: &mut Vec<CombatEvent>,
    score: &mut ScoreState,
    despawn_buffer: &mut Vec<Entity>,
) {
    let mut live: Vec<(Entity, Ray)> = world
        .query::<&Projectile>()
        .iter()
        .filter(|(_, p)| !p.disposed)
        .map(|(entity, p)| (entity, projectile::lookahead_ray(p)))
        .collect();
    live.sort_by_key(|(entity, _)| entity.id());

    for (entity, ray) in live {
        let hit = resolver.query_nearest_hit(world, geometry, &ray, tuning.lookahead);

        let (outcome, position, visual, timer, spawn_time) = {
            let Ok(mut p) = world.get::<&mut Projectile>(entity) else {
                continue;
            };
            let outcome = projectile::step(&mut p, hit, tuning.lookahead, dt_ms);
            (outcome, p.position, p.visual, p.lifespan_timer, p.spawn_time_ms)
        };

        match outcome {
            ProjectileOutcome::Continuing => {
                if let Some(visual) = visual {
                    visuals.update(visual, position, projectile::sprite_frame(spawn_time, now_ms));
                }
            }
            ProjectileOutcome::ResolvedHit(record) => {
                if let Some(token) = timer {
                    timers.cancel(token);
                }
                debug!(?entity, kind = ?record.kind(), distance = record.distance, "projectile hit");
                resolver.apply_hit(&record, world, effects, visuals, rng, now_ms, events, score);
                release(world, entity, visuals, despawn_buffer);
            }
            ProjectileOutcome::ExpiredByTimeout => {
                events.push(CombatEvent::ProjectileExpired { position });
                release(world, entity, visuals, despawn_buffer);
            }
        }
    }
}

fn release<V: VisualBackend + ?Sized>(
    world: &mut World,
    entity: Entity,
    visuals: &mut V,
    despawn_buffer: &mut Vec<Entity>,
) {
    if let Ok(mut p) = world.get::<&mut Projectile>(entity) {
        if let Some(visual) = p.visual.take() {
            visuals.dispose(visual);
        }
    }
    despawn_buffer.push(entity);
}
