//! Tunable combat parameters.
//!
//! Every hardcoded number in the combat loop lives here so it can be
//! overridden from JSON. Missing fields fall back to the defaults in
//! [`constants`](crate::constants).

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::CombatError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub projectile: ProjectileTuning,
    pub hostile: HostileTuning,
    pub effects: EffectTuning,
    pub weapons: WeaponTuning,
    pub level: LevelTuning,
}

impl CombatConfig {
    /// Overlay a JSON document on the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CombatError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or panic the simulation later on.
    pub fn validate(&self) -> Result<(), CombatError> {
        let p = &self.projectile;
        positive("projectile.lookahead", p.lookahead as f64)?;
        positive("projectile.speed", p.speed as f64)?;
        positive("projectile.lifespan_ms", p.lifespan_ms)?;
        finite("projectile.muzzle_forward_offset", p.muzzle_forward_offset as f64)?;
        finite("projectile.muzzle_drop", p.muzzle_drop as f64)?;

        let h = &self.hostile;
        if h.hit_points == 0 {
            return Err(invalid("hostile.hit_points", "must be at least 1"));
        }
        positive("hostile.collider_radius", h.collider_radius as f64)?;
        non_negative("hostile.horizontal_radius", h.horizontal_radius as f64)?;
        non_negative("hostile.vertical_radius", h.vertical_radius as f64)?;
        finite("hostile.angular_speed", h.angular_speed as f64)?;
        positive("hostile.walk_frame_ms", h.walk_frame_ms)?;
        positive("hostile.death_frame_ms", h.death_frame_ms)?;
        non_negative("hostile.death_animation_ms", h.death_animation_ms)?;
        non_negative("hostile.fall_duration_ms", h.fall_duration_ms)?;
        finite("hostile.resting_height", h.resting_height as f64)?;

        let e = &self.effects;
        non_negative("effects.decal_lifespan_ms", e.decal_lifespan_ms)?;
        non_negative("effects.decal_fade_ms", e.decal_fade_ms)?;
        non_negative("effects.decal_surface_offset", e.decal_surface_offset as f64)?;
        if e.blood_frame_count == 0 {
            return Err(invalid("effects.blood_frame_count", "must be at least 1"));
        }
        positive("effects.blood_frame_ms", e.blood_frame_ms)?;

        let w = &self.weapons;
        if w.single_shot_frame_hold == 0 {
            return Err(invalid("weapons.single_shot_frame_hold", "must be at least 1"));
        }
        if w
            .single_shot_animation_frames
            .checked_mul(w.single_shot_frame_hold)
            .is_none()
        {
            return Err(invalid(
                "weapons.single_shot_animation_frames",
                "times frame hold overflows",
            ));
        }
        non_negative("weapons.automatic_interval_ms", w.automatic_interval_ms)?;

        let l = &self.level;
        positive("level.room_width", l.room_width as f64)?;
        positive("level.room_depth", l.room_depth as f64)?;
        positive("level.room_height", l.room_height as f64)?;
        positive("level.wall_thickness", l.wall_thickness as f64)?;
        non_negative("level.hostile_spawn_half_extent", l.hostile_spawn_half_extent as f64)?;
        finite("level.hostile_spawn_height", l.hostile_spawn_height as f64)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> CombatError {
    CombatError::InvalidConfig { field, reason }
}

fn finite(field: &'static str, value: f64) -> Result<(), CombatError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), CombatError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(invalid(field, "must not be negative"));
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), CombatError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(invalid(field, "must be greater than zero"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub lookahead: f32,
    /// Units per second.
    pub speed: f32,
    pub lifespan_ms: f64,
    pub muzzle_forward_offset: f32,
    pub muzzle_drop: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            lookahead: RAY_LOOKAHEAD,
            speed: PROJECTILE_SPEED,
            lifespan_ms: PROJECTILE_LIFESPAN_MS,
            muzzle_forward_offset: MUZZLE_FORWARD_OFFSET,
            muzzle_drop: MUZZLE_DROP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileTuning {
    pub hit_points: u32,
    pub collider_radius: f32,
    pub horizontal_radius: f32,
    pub vertical_radius: f32,
    /// Radians per second.
    pub angular_speed: f32,
    pub walk_frame_ms: f64,
    pub death_frame_ms: f64,
    pub death_animation_ms: f64,
    pub fall_duration_ms: f64,
    pub resting_height: f32,
}

impl Default for HostileTuning {
    fn default() -> Self {
        Self {
            hit_points: HOSTILE_HIT_POINTS,
            collider_radius: HOSTILE_COLLIDER_RADIUS,
            horizontal_radius: ORBIT_HORIZONTAL_RADIUS,
            vertical_radius: ORBIT_VERTICAL_RADIUS,
            angular_speed: ORBIT_ANGULAR_SPEED,
            walk_frame_ms: HOSTILE_WALK_FRAME_MS,
            death_frame_ms: HOSTILE_DEATH_FRAME_MS,
            death_animation_ms: HOSTILE_DEATH_ANIMATION_MS,
            fall_duration_ms: HOSTILE_FALL_DURATION_MS,
            resting_height: HOSTILE_RESTING_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub decal_lifespan_ms: f64,
    pub decal_fade_ms: f64,
    pub decal_surface_offset: f32,
    pub blood_frame_count: u32,
    pub blood_frame_ms: f64,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            decal_lifespan_ms: DECAL_LIFESPAN_MS,
            decal_fade_ms: DECAL_FADE_MS,
            decal_surface_offset: DECAL_SURFACE_OFFSET,
            blood_frame_count: BLOOD_FRAME_COUNT,
            blood_frame_ms: BLOOD_FRAME_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub single_shot_ammo: u32,
    pub single_shot_animation_frames: u32,
    pub single_shot_frame_hold: u32,
    pub automatic_ammo: u32,
    pub automatic_interval_ms: f64,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            single_shot_ammo: SINGLE_SHOT_AMMO,
            single_shot_animation_frames: SINGLE_SHOT_ANIMATION_FRAMES,
            single_shot_frame_hold: SINGLE_SHOT_FRAME_HOLD,
            automatic_ammo: AUTOMATIC_AMMO,
            automatic_interval_ms: AUTOMATIC_FIRE_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub room_width: f32,
    pub room_depth: f32,
    pub room_height: f32,
    pub wall_thickness: f32,
    pub hostile_count: usize,
    pub hostile_spawn_half_extent: f32,
    pub hostile_spawn_height: f32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            room_width: ROOM_WIDTH,
            room_depth: ROOM_DEPTH,
            room_height: ROOM_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            hostile_count: HOSTILE_COUNT,
            hostile_spawn_half_extent: HOSTILE_SPAWN_HALF_EXTENT,
            hostile_spawn_height: HOSTILE_SPAWN_HEIGHT,
        }
    }
}
