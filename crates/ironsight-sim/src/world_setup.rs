//! Level construction: the room's static geometry and the hostiles in it.

use std::f32::consts::TAU;

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use ironsight_core::components::{Hostile, SpritePose};
use ironsight_core::config::{HostileTuning, LevelTuning};
use ironsight_core::enums::HostileState;

use crate::geometry::StaticGeometry;

/// Floor and four walls, registered in that order. The floor's top face
/// sits at y = 0.
pub fn build_room(geometry: &mut StaticGeometry, level: &LevelTuning) {
    let half_w = level.room_width / 2.0;
    let half_d = level.room_depth / 2.0;
    let half_h = level.room_height / 2.0;
    let half_t = level.wall_thickness / 2.0;

    geometry.add_box(
        Vec3::new(0.0, -half_t, 0.0),
        Vec3::new(half_w, half_t, half_d),
    );

    // Front and back.
    for z in [half_d, -half_d] {
        geometry.add_box(
            Vec3::new(0.0, half_h, z),
            Vec3::new(half_w, half_h, half_t),
        );
    }
    // Left and right.
    for x in [-half_w, half_w] {
        geometry.add_box(
            Vec3::new(x, half_h, 0.0),
            Vec3::new(half_t, half_h, half_d),
        );
    }
}

/// Spawn one hostile orbiting `home`. It sits at `home` until its first tick.
pub fn spawn_hostile(
    world: &mut World,
    home: Vec3,
    orbit_angle: f32,
    vertical_angle: f32,
    tuning: &HostileTuning,
) -> Entity {
    world.spawn((
        Hostile {
            position: home,
            home_position: home,
            orbit_angle,
            vertical_angle,
            hit_points: tuning.hit_points,
            state: HostileState::Alive,
            collision_enabled: true,
            collider_radius: tuning.collider_radius,
            visual: None,
        },
        SpritePose::default(),
    ))
}

/// Scatter the level's hostiles over the room with random orbit phases.
pub fn spawn_hostiles(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    level: &LevelTuning,
    tuning: &HostileTuning,
) -> Vec<Entity> {
    let extent = level.hostile_spawn_half_extent;
    (0..level.hostile_count)
        .map(|_| {
            let home = Vec3::new(
                rng.gen_range(-extent..=extent),
                level.hostile_spawn_height,
                rng.gen_range(-extent..=extent),
            );
            let orbit_angle = rng.gen::<f32>() * TAU;
            let vertical_angle = rng.gen::<f32>() * TAU;
            spawn_hostile(world, home, orbit_angle, vertical_angle, tuning)
        })
        .collect()
}

/// Build the full level. Returns the hostiles in spawn order.
pub fn setup_level(
    world: &mut World,
    geometry: &mut StaticGeometry,
    rng: &mut ChaCha8Rng,
    level: &LevelTuning,
    tuning: &HostileTuning,
) -> Vec<Entity> {
    build_room(geometry, level);
    spawn_hostiles(world, rng, level, tuning)
}
