//! End-to-end combat scenarios driven through the public engine API.

use glam::Vec3;
use hecs::World;

use ironsight_core::commands::PlayerCommand;
use ironsight_core::components::{Hostile, Projectile};
use ironsight_core::config::{CombatConfig, HostileTuning, LevelTuning, WeaponTuning};
use ironsight_core::enums::{AssetKind, HostileState, TargetKind};
use ironsight_core::events::CombatEvent;
use ironsight_core::types::{CollidableHandle, Direction, Ray};

use ironsight_sim::backend::HeadlessVisuals;
use ironsight_sim::geometry::StaticGeometry;
use ironsight_sim::resolver::{CombatResolver, ImpactRecord, ImpactTarget};
use ironsight_sim::{CombatEngine, SimConfig};

const EYE: Vec3 = Vec3::new(0.0, 1.6, -5.0);

/// Room without random hostiles; hostiles added by hand hold still.
fn arena(weapons: WeaponTuning) -> CombatEngine<HeadlessVisuals> {
    let combat = CombatConfig {
        hostile: HostileTuning {
            horizontal_radius: 0.0,
            vertical_radius: 0.0,
            ..Default::default()
        },
        level: LevelTuning {
            hostile_count: 0,
            ..Default::default()
        },
        weapons,
        ..Default::default()
    };
    let mut engine = CombatEngine::new(SimConfig { seed: 99, combat });
    engine.load_level();
    engine
}

fn hostile_state(engine: &CombatEngine<HeadlessVisuals>, entity: hecs::Entity) -> Hostile {
    (*engine.world().get::<&Hostile>(entity).unwrap()).clone()
}

fn hit_record(entity: hecs::Entity, point: Vec3) -> ImpactRecord {
    ImpactRecord {
        point,
        normal: Vec3::NEG_Z,
        distance: 1.0,
        target: ImpactTarget::Hostile(entity),
    }
}

#[test]
fn projectile_moves_speed_times_dt_without_hits() {
    let mut engine = arena(WeaponTuning::default());
    for dir in [Vec3::Y, Vec3::new(0.2, 1.0, -0.1), Vec3::new(-0.3, 2.0, 0.4)] {
        let direction = Direction::new(dir).unwrap();
        let entity = engine.spawn_projectile(Vec3::new(0.0, 2.0, 0.0), direction);
        let before = engine.world().get::<&Projectile>(entity).unwrap().position;

        engine.tick_for(20.0);

        let after = engine.world().get::<&Projectile>(entity).unwrap().position;
        let moved = after - before;
        assert!((moved.length() - 150.0 * 0.020).abs() < 1e-4);
        assert!((moved.normalize() - direction.get()).length() < 1e-4);
    }
}

#[test]
fn nearest_hit_is_strict_minimum_with_first_registered_tie_break() {
    let mut geometry = StaticGeometry::new();
    let far = geometry.add_box(Vec3::new(0.0, 0.0, 9.0), Vec3::splat(0.5));
    let twin_a = geometry.add_sphere(Vec3::new(0.0, 0.0, 5.0), 1.0);
    let twin_b = geometry.add_sphere(Vec3::new(0.0, 0.0, 5.0), 1.0);

    let mut resolver = CombatResolver::new();
    resolver.register_geometry(&geometry);
    let world = World::new();
    let ray = Ray::new(Vec3::ZERO, Direction::new(Vec3::Z).unwrap());

    let hit = resolver.query_nearest_hit(&world, &geometry, &ray, 10.0).unwrap();
    assert_eq!(hit.target, ImpactTarget::Geometry(twin_a));
    assert_ne!(hit.target, ImpactTarget::Geometry(twin_b));
    assert_ne!(hit.target, ImpactTarget::Geometry(far));
    assert_eq!(hit.kind(), TargetKind::Geometry);
    assert!((hit.distance - 4.0).abs() < 1e-5);

    assert!(resolver.query_nearest_hit(&world, &geometry, &ray, 3.5).is_none());
    assert_eq!(twin_a, CollidableHandle(1));
}

#[test]
fn hostile_with_five_hit_points_dies_on_fifth_hit() {
    let mut engine = arena(WeaponTuning::default());
    let hostile = engine.spawn_hostile(Vec3::new(0.0, 2.0, 5.0), 0.0, 0.0);
    let point = Vec3::new(0.0, 2.0, 4.0);

    for _ in 0..4 {
        assert!(engine.apply_hit(&hit_record(hostile, point)));
    }
    let h = hostile_state(&engine, hostile);
    assert_eq!(h.state, HostileState::Alive);
    assert_eq!(h.hit_points, 1);
    assert!(h.collision_enabled);

    assert!(engine.apply_hit(&hit_record(hostile, point)));
    let h = hostile_state(&engine, hostile);
    assert_eq!(h.state, HostileState::Dying);
    assert_eq!(h.hit_points, 0);
    assert!(!h.collision_enabled);

    // Excess hits change nothing.
    for _ in 0..3 {
        assert!(!engine.apply_hit(&hit_record(hostile, point)));
    }
    assert_eq!(hostile_state(&engine, hostile).hit_points, 0);
    assert_eq!(engine.score().kills, 1);
    assert_eq!(engine.score().hostile_hits, 5);
    assert_eq!(engine.effects().blood_count(), 5);
}

#[test]
fn dead_hostile_is_frozen_and_released() {
    let mut engine = arena(WeaponTuning::default());
    let hostile = engine.spawn_hostile(Vec3::new(0.0, 2.0, 5.0), 0.0, 0.0);
    for _ in 0..5 {
        engine.apply_hit(&hit_record(hostile, Vec3::new(0.0, 2.0, 4.0)));
    }

    // Death takes about a second.
    for _ in 0..30 {
        engine.tick();
    }
    assert_eq!(hostile_state(&engine, hostile).state, HostileState::Dying);
    assert!((hostile_state(&engine, hostile).position.y - 0.9).abs() < 1e-5);

    for _ in 0..40 {
        engine.tick();
    }
    let dead = hostile_state(&engine, hostile);
    assert_eq!(dead.state, HostileState::Dead);
    assert!(dead.visual.is_none());
    assert_eq!(engine.visuals().live_of(AssetKind::Hostile), 0);
    // Only the room is left to hit.
    assert_eq!(engine.resolver().len(), 5);

    for _ in 0..30 {
        engine.tick();
    }
    let later = hostile_state(&engine, hostile);
    assert_eq!(later.position, dead.position);
    assert_eq!(later.hit_points, 0);
    assert!(!engine.apply_hit(&hit_record(hostile, Vec3::ZERO)));
}

#[test]
fn projectile_expires_exactly_once_after_lifespan() {
    let mut engine = arena(WeaponTuning::default());
    // Straight up: the room has no ceiling.
    engine.spawn_projectile(Vec3::new(0.0, 2.0, 0.0), Direction::new(Vec3::Y).unwrap());

    let mut expired = 0;
    let mut hits = 0;
    for ms in 1..=5001 {
        let snap = engine.tick_for(1.0);
        for event in &snap.events {
            match event {
                CombatEvent::ProjectileExpired { .. } => expired += 1,
                CombatEvent::SurfaceImpact { .. } | CombatEvent::HostileHit { .. } => hits += 1,
                _ => {}
            }
        }
        if ms == 4999 {
            assert_eq!(snap.projectiles, 1);
        }
    }

    assert_eq!(expired, 1);
    assert_eq!(hits, 0);
    assert!(engine.projectiles().is_empty());
    assert_eq!(engine.visuals().live_of(AssetKind::Projectile), 0);
}

#[test]
fn single_shot_refuses_second_fire_during_animation() {
    let mut engine = arena(WeaponTuning {
        single_shot_ammo: 1,
        ..Default::default()
    });
    assert!(matches!(engine.fire(EYE, Vec3::Z), Ok(true)));
    assert!(matches!(engine.fire(EYE, Vec3::Z), Ok(false)));
    assert_eq!(engine.loadout().active().unwrap().ammo_remaining(), 0);
}

#[test]
fn ammo_never_increases_and_empty_weapon_reports_false() {
    let mut engine = arena(WeaponTuning {
        automatic_ammo: 12,
        ..Default::default()
    });
    engine.switch_weapon();

    let mut last = engine.loadout().active().unwrap().ammo_remaining();
    let mut produced = 0;
    for _ in 0..200 {
        if matches!(engine.fire(EYE, Vec3::new(0.1, -0.05, 1.0)), Ok(true)) {
            produced += 1;
        }
        let ammo = engine.loadout().active().unwrap().ammo_remaining();
        assert!(ammo <= last);
        last = ammo;
        engine.tick();
    }
    assert_eq!(produced, 12);
    assert_eq!(last, 0);
    assert!(matches!(engine.fire(EYE, Vec3::Z), Ok(false)));
}

#[test]
fn decals_face_away_from_the_surface() {
    let mut engine = arena(WeaponTuning::default());
    engine.switch_weapon();

    // Fan of shots at the far wall (outward normal -Z).
    for i in 0..60 {
        engine.queue_command(PlayerCommand::Fire {
            origin: EYE,
            direction: Vec3::new((i as f32 * 0.37).sin() * 0.3, 0.1, 1.0),
        });
        engine.tick();
    }
    for _ in 0..30 {
        engine.tick();
    }

    let decals = engine.effects().decals();
    assert!(decals.len() >= 5);
    for decal in decals {
        let face = decal.orientation * Vec3::Z;
        assert!(face.dot(Vec3::NEG_Z) < 0.0);
        assert!((decal.position.z - (20.0 - 0.5 - 0.01)).abs() < 1e-3);
        assert!(decal.cell < 64);
    }
    assert_eq!(engine.visuals().live_of(AssetKind::Decal), decals.len());
    assert_eq!(engine.visuals().atlas_loads(), 2, "projectile and decal atlases");
}

#[test]
fn automatic_fire_kills_hostile_then_hits_wall() {
    let mut engine = arena(WeaponTuning::default());
    let hostile = engine.spawn_hostile(Vec3::new(0.0, 1.6, 5.0), 0.0, 0.0);
    engine.queue_command(PlayerCommand::SwitchWeapon);

    let mut hostile_hits = 0;
    let mut kills = 0;
    let mut surface_hits = 0;
    for _ in 0..200 {
        engine.queue_command(PlayerCommand::Fire {
            origin: EYE,
            direction: Vec3::Z,
        });
        let snap = engine.tick();
        for event in &snap.events {
            match event {
                CombatEvent::HostileHit { .. } => hostile_hits += 1,
                CombatEvent::HostileKilled { .. } => kills += 1,
                CombatEvent::SurfaceImpact { normal, .. } => {
                    assert_eq!(*normal, Vec3::NEG_Z);
                    surface_hits += 1;
                }
                _ => {}
            }
        }
    }

    assert_eq!(hostile_hits, 5);
    assert_eq!(kills, 1);
    assert!(surface_hits > 0);
    assert_eq!(hostile_state(&engine, hostile).state, HostileState::Dead);

    let score = engine.score();
    assert_eq!(score.kills, 1);
    assert_eq!(score.hostile_hits, 5);
    assert_eq!(score.surface_hits, surface_hits);
    assert!(score.accuracy() > 0.0 && score.accuracy() < 1.0);

    // Blood bursts are long gone.
    assert_eq!(engine.effects().blood_count(), 0);
    assert_eq!(engine.visuals().live_of(AssetKind::Blood), 0);
}
