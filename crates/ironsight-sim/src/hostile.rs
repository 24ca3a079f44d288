//! Hostile state machine: `Alive -> Dying -> Dead`.
//!
//! Damage enters only through [`on_hit`], which the resolver calls. Motion,
//! sprite pose and the death sequence are advanced by [`tick`], a pure
//! function over the hostile's components; the hostiles system applies the
//! resulting frame to the visual backend.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use ironsight_core::components::{DeathSequence, Hostile, SpritePose};
use ironsight_core::config::HostileTuning;
use ironsight_core::constants::{
    HOSTILE_DEATH_FRAMES, HOSTILE_DEATH_ROW, HOSTILE_FACING_COLUMNS, HOSTILE_WALK_ROWS,
};
use ironsight_core::enums::HostileState;
use ironsight_core::events::CombatEvent;
use ironsight_core::types::SpriteFrame;

use crate::backend::VisualBackend;
use crate::effects::ImpactEffectFactory;

/// Result of one hit against a hostile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitReaction {
    /// Not alive; nothing happened.
    Ignored,
    Wounded { hit_points: u32 },
    /// That was the last hit point.
    Killed,
}

/// Apply one point of damage. Entering `Dying` disables collision.
pub fn register_hit(hostile: &mut Hostile) -> HitReaction {
    if hostile.state != HostileState::Alive {
        return HitReaction::Ignored;
    }

    hostile.hit_points = hostile.hit_points.saturating_sub(1);
    if hostile.hit_points > 0 {
        return HitReaction::Wounded {
            hit_points: hostile.hit_points,
        };
    }

    hostile.state = HostileState::Dying;
    hostile.collision_enabled = false;
    HitReaction::Killed
}

/// Hit a hostile at `point`: blood, damage, and on the killing blow the
/// start of the death sequence. Hits on anything not alive are ignored.
pub fn on_hit<V: VisualBackend + ?Sized>(
    world: &mut World,
    entity: Entity,
    point: Vec3,
    effects: &mut ImpactEffectFactory,
    visuals: &mut V,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<CombatEvent>,
) -> HitReaction {
    let (reaction, position, hit_points) = {
        let Ok(mut hostile) = world.get::<&mut Hostile>(entity) else {
            return HitReaction::Ignored;
        };
        let reaction = register_hit(&mut hostile);
        (reaction, hostile.position, hostile.hit_points)
    };
    if reaction == HitReaction::Ignored {
        return reaction;
    }

    effects.spawn_blood_effect(point, visuals, rng);
    events.push(CombatEvent::HostileHit { point, hit_points });
    debug!(?entity, hit_points, "hostile hit");

    if reaction == HitReaction::Killed {
        let death = DeathSequence {
            elapsed_ms: 0.0,
            fall_start_height: position.y,
        };
        if let Err(err) = world.insert_one(entity, death) {
            warn!(?entity, %err, "death sequence not attached");
        }
        events.push(CombatEvent::HostileKilled { position });
        info!(?entity, ?position, "hostile killed");
    }

    reaction
}

/// What one tick did to a hostile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostileTick {
    /// Frame to show, if the hostile still has a visual.
    pub frame: Option<SpriteFrame>,
    /// The death sequence finished this tick; the hostile is now `Dead`.
    pub completed: bool,
}

/// Advance a hostile by `dt_ms`. Alive hostiles orbit and walk; dying ones
/// play death frames and fall; dead ones are frozen.
pub fn tick(
    hostile: &mut Hostile,
    pose: &mut SpritePose,
    death: Option<&mut DeathSequence>,
    viewer: Vec3,
    dt_ms: f64,
    tuning: &HostileTuning,
) -> HostileTick {
    match (hostile.state, death) {
        (HostileState::Alive, _) => {
            advance_orbit(hostile, dt_ms, tuning);
            let rel = relative_facing(hostile.orbit_angle, hostile.position, viewer);
            let (column, mirrored) = facing_bucket(rel);
            pose.column = column;
            pose.mirrored = mirrored;
            advance_walk(pose, dt_ms, tuning.walk_frame_ms);
            HostileTick {
                frame: Some(SpriteFrame {
                    cell: cell_index(pose.walk_row, pose.column),
                    mirrored: pose.mirrored,
                    alpha: 1.0,
                }),
                completed: false,
            }
        }
        (HostileState::Dying, Some(death)) => {
            death.elapsed_ms += dt_ms;
            hostile.position.y = fall_height(
                death.fall_start_height,
                tuning.resting_height,
                death.elapsed_ms,
                tuning.fall_duration_ms,
            );
            if death.elapsed_ms >= tuning.death_animation_ms {
                hostile.state = HostileState::Dead;
                return HostileTick {
                    frame: None,
                    completed: true,
                };
            }
            HostileTick {
                frame: Some(SpriteFrame {
                    cell: cell_index(
                        HOSTILE_DEATH_ROW,
                        death_frame(death.elapsed_ms, tuning.death_frame_ms),
                    ),
                    mirrored: pose.mirrored,
                    alpha: 1.0,
                }),
                completed: false,
            }
        }
        // No sequence to play: finish the death now rather than stall in Dying.
        (HostileState::Dying, None) => {
            hostile.state = HostileState::Dead;
            HostileTick {
                frame: None,
                completed: true,
            }
        }
        (HostileState::Dead, _) => HostileTick {
            frame: None,
            completed: false,
        },
    }
}

/// Release the hostile's visual. Safe to call more than once.
pub fn dispose<V: VisualBackend + ?Sized>(hostile: &mut Hostile, visuals: &mut V) {
    if let Some(visual) = hostile.visual.take() {
        visuals.dispose(visual);
    }
}

fn advance_orbit(hostile: &mut Hostile, dt_ms: f64, tuning: &HostileTuning) {
    let step = tuning.angular_speed * (dt_ms / 1000.0) as f32;
    hostile.orbit_angle = wrap_angle(hostile.orbit_angle + step);
    hostile.vertical_angle = wrap_angle(hostile.vertical_angle + step * 0.5);
    hostile.position = orbit_position(
        hostile.home_position,
        hostile.orbit_angle,
        hostile.vertical_angle,
        tuning,
    );
}

fn advance_walk(pose: &mut SpritePose, dt_ms: f64, walk_frame_ms: f64) {
    if walk_frame_ms <= 0.0 {
        return;
    }
    pose.walk_elapsed_ms += dt_ms;
    while pose.walk_elapsed_ms >= walk_frame_ms {
        pose.walk_elapsed_ms -= walk_frame_ms;
        pose.walk_row = (pose.walk_row + 1) % HOSTILE_WALK_ROWS;
    }
}

/// Point on the orbit for the given angles.
pub fn orbit_position(home: Vec3, angle: f32, vertical_angle: f32, tuning: &HostileTuning) -> Vec3 {
    home + Vec3::new(
        angle.cos() * tuning.horizontal_radius,
        vertical_angle.sin() * tuning.vertical_radius,
        angle.sin() * tuning.horizontal_radius,
    )
}

/// Wrap to [0, 2π).
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed angle in (-π, π] between the hostile's facing and the viewer.
/// Zero means the hostile looks straight at the viewer.
pub fn relative_facing(orbit_angle: f32, position: Vec3, viewer: Vec3) -> f32 {
    let to_viewer = viewer - position;
    let bearing = to_viewer.x.atan2(to_viewer.z);
    let rel = wrap_angle(orbit_angle + bearing + PI);
    if rel > PI {
        rel - TAU
    } else {
        rel
    }
}

/// Atlas column (0 = back, 4 = front) and mirror flag for a relative angle.
pub fn facing_bucket(relative: f32) -> (u32, bool) {
    let columns = HOSTILE_FACING_COLUMNS as f32;
    let column = (columns * (1.0 - relative.abs() / PI)).floor();
    let column = (column.max(0.0) as u32).min(HOSTILE_FACING_COLUMNS - 1);
    (column, relative < 0.0)
}

/// Death frame index for the elapsed time, holding on the last frame.
pub fn death_frame(elapsed_ms: f64, frame_ms: f64) -> u32 {
    if frame_ms <= 0.0 {
        return HOSTILE_DEATH_FRAMES - 1;
    }
    ((elapsed_ms / frame_ms) as u32).min(HOSTILE_DEATH_FRAMES - 1)
}

/// Linear fall from `start` to `rest` over `duration_ms`.
pub fn fall_height(start: f32, rest: f32, elapsed_ms: f64, duration_ms: f64) -> f32 {
    let progress = if duration_ms <= 0.0 {
        1.0
    } else {
        (elapsed_ms / duration_ms).min(1.0) as f32
    };
    rest * progress + start * (1.0 - progress)
}

pub fn cell_index(row: u32, column: u32) -> u32 {
    row * HOSTILE_FACING_COLUMNS + column
}
