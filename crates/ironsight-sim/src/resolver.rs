//! Nearest-hit ray queries and hit dispatch.
//!
//! The resolver keeps an ordered registry of everything a projectile can
//! strike: static geometry (in the backend's enumeration order, registered
//! at level load) followed by hostile bounding spheres (registered as they
//! spawn). A query walks the registry and keeps the strictly nearest hit, so
//! equal distances go to whichever target was registered first.
//!
//! [`CombatResolver::apply_hit`] is the only path that damages a hostile.

use glam::Vec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use ironsight_core::components::Hostile;
use ironsight_core::enums::TargetKind;
use ironsight_core::events::CombatEvent;
use ironsight_core::types::{CollidableHandle, Ray, RayHit};

use crate::backend::{VisualBackend, WorldGeometry};
use crate::effects::ImpactEffectFactory;
use crate::geometry::ray_sphere;
use crate::hostile::{self, HitReaction};
use crate::score::ScoreState;

/// What a ray can hit. Resolved once at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactTarget {
    Geometry(CollidableHandle),
    Hostile(Entity),
}

impl ImpactTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            ImpactTarget::Geometry(_) => TargetKind::Geometry,
            ImpactTarget::Hostile(_) => TargetKind::Hostile,
        }
    }
}

/// A resolved hit. Consumed by [`CombatResolver::apply_hit`] and discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactRecord {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    pub target: ImpactTarget,
}

impl ImpactRecord {
    pub fn kind(&self) -> TargetKind {
        self.target.kind()
    }
}

#[derive(Debug, Default)]
pub struct CombatResolver {
    registry: Vec<ImpactTarget>,
}

impl CombatResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every collidable the backend lists, in its order.
    pub fn register_geometry<G: WorldGeometry + ?Sized>(&mut self, geometry: &G) {
        let handles = geometry.list_collidables();
        debug!(count = handles.len(), "registering world geometry");
        self.registry
            .extend(handles.into_iter().map(ImpactTarget::Geometry));
    }

    pub fn register_hostile(&mut self, entity: Entity) {
        self.registry.push(ImpactTarget::Hostile(entity));
    }

    /// Drop a hostile from the registry. Unknown entities are ignored.
    pub fn unregister_hostile(&mut self, entity: Entity) {
        self.registry
            .retain(|t| *t != ImpactTarget::Hostile(entity));
    }

    pub fn clear(&mut self) {
        self.registry.clear();
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Nearest intersection along `ray` within `max_distance`, or `None`.
    /// Hostiles with collision disabled (or no longer in the world) are skipped.
    pub fn query_nearest_hit<G: WorldGeometry + ?Sized>(
        &self,
        world: &World,
        geometry: &G,
        ray: &Ray,
        max_distance: f32,
    ) -> Option<ImpactRecord> {
        let mut nearest: Option<ImpactRecord> = None;

        for &target in &self.registry {
            let hit = match target {
                ImpactTarget::Geometry(handle) => geometry.intersect_ray(ray, max_distance, handle),
                ImpactTarget::Hostile(entity) => hostile_hit(world, entity, ray, max_distance),
            };
            let Some(hit) = hit else { continue };

            // Strict comparison: the earlier registration keeps a tie.
            if nearest.map_or(true, |n| hit.distance < n.distance) {
                nearest = Some(ImpactRecord {
                    point: hit.point,
                    normal: hit.normal,
                    distance: hit.distance,
                    target,
                });
            }
        }

        nearest
    }

    /// Dispatch a resolved hit: hostiles take one point of damage (via
    /// [`hostile::on_hit`]); geometry gets a decal. Returns whether the hit
    /// changed anything.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_hit<V: VisualBackend + ?Sized>(
        &self,
        record: &ImpactRecord,
        world: &mut World,
        effects: &mut ImpactEffectFactory,
        visuals: &mut V,
        rng: &mut ChaCha8Rng,
        now_ms: f64,
        events: &mut Vec<CombatEvent>,
        score: &mut ScoreState,
    ) -> bool {
        match record.target {
            ImpactTarget::Geometry(handle) => {
                debug!(handle = handle.0, point = ?record.point, "surface hit");
                effects.spawn_decal(record.point, record.normal, now_ms, visuals, rng);
                events.push(CombatEvent::SurfaceImpact {
                    point: record.point,
                    normal: record.normal,
                });
                score.surface_hits += 1;
                true
            }
            ImpactTarget::Hostile(entity) => {
                match hostile::on_hit(world, entity, record.point, effects, visuals, rng, events) {
                    HitReaction::Ignored => false,
                    HitReaction::Wounded { .. } => {
                        score.hostile_hits += 1;
                        true
                    }
                    HitReaction::Killed => {
                        score.hostile_hits += 1;
                        score.kills += 1;
                        true
                    }
                }
            }
        }
    }
}

fn hostile_hit(world: &World, entity: Entity, ray: &Ray, max_distance: f32) -> Option<RayHit> {
    let hostile = world.get::<&Hostile>(entity).ok()?;
    if !hostile.collision_enabled {
        return None;
    }
    ray_sphere(ray, max_distance, hostile.position, hostile.collider_radius)
}
