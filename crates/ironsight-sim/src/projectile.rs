//! Straight-line projectiles.
//!
//! Each tick a projectile looks ahead along its path for the nearest hit,
//! then either resolves that hit, expires, or moves. At most one outcome
//! other than `Continuing` is ever produced; a hit wins over a timeout that
//! lands in the same tick.

use glam::Vec3;
use hecs::{Entity, World};

use ironsight_core::components::Projectile;
use ironsight_core::constants::{PROJECTILE_FRAMES, PROJECTILE_FRAME_MS};
use ironsight_core::types::{Direction, Ray, SpriteFrame, VisualHandle};

use crate::resolver::ImpactRecord;
use crate::timers::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileOutcome {
    Continuing,
    ExpiredByTimeout,
    ResolvedHit(ImpactRecord),
}

/// Parameters for a new projectile.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileSpawn {
    pub origin: Vec3,
    pub direction: Direction,
    pub speed: f32,
    pub lifespan_ms: f64,
}

/// Spawn a projectile entity and schedule its lifespan timer.
pub fn spawn(
    world: &mut World,
    params: ProjectileSpawn,
    now_ms: f64,
    timers: &mut TimerQueue<Entity>,
    visual: Option<VisualHandle>,
) -> Entity {
    let entity = world.spawn((Projectile {
        origin: params.origin,
        position: params.origin,
        direction: params.direction,
        speed: params.speed,
        spawn_time_ms: now_ms,
        lifespan_ms: params.lifespan_ms,
        lifespan_timer: None,
        expired: false,
        disposed: false,
        visual,
    },));

    let token = timers.schedule(now_ms, params.lifespan_ms, entity);
    if let Ok(mut projectile) = world.get::<&mut Projectile>(entity) {
        projectile.lifespan_timer = Some(token);
    }
    entity
}

/// The lookahead ray from the projectile's current position.
pub fn lookahead_ray(projectile: &Projectile) -> Ray {
    Ray::new(projectile.position, projectile.direction)
}

/// Advance one tick given the result of this tick's lookahead query.
pub fn step(
    projectile: &mut Projectile,
    hit: Option<ImpactRecord>,
    lookahead: f32,
    dt_ms: f64,
) -> ProjectileOutcome {
    if projectile.disposed {
        return ProjectileOutcome::Continuing;
    }

    if let Some(record) = hit.filter(|h| h.distance < lookahead) {
        projectile.disposed = true;
        return ProjectileOutcome::ResolvedHit(record);
    }

    if projectile.expired {
        projectile.disposed = true;
        return ProjectileOutcome::ExpiredByTimeout;
    }

    let dt_secs = (dt_ms / 1000.0) as f32;
    projectile.position += projectile.direction.get() * projectile.speed * dt_secs;
    ProjectileOutcome::Continuing
}

/// Looping sprite frame for a projectile spawned at `spawn_time_ms`.
pub fn sprite_frame(spawn_time_ms: f64, now_ms: f64) -> SpriteFrame {
    let frame = ((now_ms - spawn_time_ms).max(0.0) / PROJECTILE_FRAME_MS) as u32;
    SpriteFrame::cell(frame % PROJECTILE_FRAMES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ImpactTarget;
    use ironsight_core::types::CollidableHandle;

    fn projectile(direction: Vec3) -> Projectile {
        Projectile {
            origin: Vec3::ZERO,
            position: Vec3::ZERO,
            direction: Direction::new(direction).unwrap(),
            speed: 150.0,
            spawn_time_ms: 0.0,
            lifespan_ms: 5000.0,
            lifespan_timer: None,
            expired: false,
            disposed: false,
            visual: None,
        }
    }

    fn record(distance: f32) -> ImpactRecord {
        ImpactRecord {
            point: Vec3::new(0.0, 0.0, distance),
            normal: Vec3::NEG_Z,
            distance,
            target: ImpactTarget::Geometry(CollidableHandle(0)),
        }
    }

    #[test]
    fn test_moves_speed_times_dt_along_direction() {
        for dir in [Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::new(-2.0, 0.5, 3.0)] {
            let mut p = projectile(dir);
            let before = p.position;
            assert_eq!(step(&mut p, None, 10.0, 20.0), ProjectileOutcome::Continuing);

            let moved = p.position - before;
            assert!((moved.length() - 3.0).abs() < 1e-5);
            assert!(moved.normalize().dot(p.direction.get()) > 0.9999);
        }
    }

    #[test]
    fn test_hit_beyond_lookahead_is_ignored() {
        let mut p = projectile(Vec3::Z);
        assert_eq!(step(&mut p, Some(record(10.0)), 10.0, 10.0), ProjectileOutcome::Continuing);
        assert!(!p.disposed);
    }

    #[test]
    fn test_hit_wins_over_expiry() {
        let mut p = projectile(Vec3::Z);
        p.expired = true;
        let hit = record(2.0);
        assert_eq!(
            step(&mut p, Some(hit), 10.0, 10.0),
            ProjectileOutcome::ResolvedHit(hit)
        );
        assert!(p.disposed);
        // Resolved once: later ticks do nothing.
        assert_eq!(step(&mut p, Some(hit), 10.0, 10.0), ProjectileOutcome::Continuing);
    }

    #[test]
    fn test_expires_once() {
        let mut p = projectile(Vec3::Z);
        p.expired = true;
        let position = p.position;
        assert_eq!(step(&mut p, None, 10.0, 10.0), ProjectileOutcome::ExpiredByTimeout);
        assert_eq!(step(&mut p, None, 10.0, 10.0), ProjectileOutcome::Continuing);
        assert_eq!(p.position, position);
    }

    #[test]
    fn test_spawn_schedules_lifespan() {
        let mut world = World::new();
        let mut timers = TimerQueue::new();
        let params = ProjectileSpawn {
            origin: Vec3::ONE,
            direction: Direction::new(Vec3::Z).unwrap(),
            speed: 150.0,
            lifespan_ms: 5000.0,
        };
        let entity = spawn(&mut world, params, 100.0, &mut timers, None);

        let p = world.get::<&Projectile>(entity).unwrap();
        assert!(p.lifespan_timer.is_some());
        assert_eq!(p.spawn_time_ms, 100.0);
        assert!(timers.drain_expired(5099.0).is_empty());
        assert_eq!(timers.drain_expired(5100.0), vec![entity]);
    }

    #[test]
    fn test_sprite_loops() {
        assert_eq!(sprite_frame(0.0, 0.0).cell, 0);
        assert_eq!(sprite_frame(0.0, 60.0).cell, 3);
        assert_eq!(sprite_frame(0.0, 80.0).cell, 0);
    }
}
