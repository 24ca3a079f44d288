//! Simulation constants and tuning defaults.
//!
//! These seed [`CombatConfig`](crate::config::CombatConfig); runtime code reads
//! the config, not these values directly.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Milliseconds per tick.
pub const DT_MS: f64 = 1000.0 / TICK_RATE as f64;

// --- Projectiles ---

/// Ray lookahead from the projectile's current position (world units).
pub const RAY_LOOKAHEAD: f32 = 10.0;

/// Projectile speed (units per second).
pub const PROJECTILE_SPEED: f32 = 150.0;

/// Projectile lifetime before it is disposed regardless of position.
pub const PROJECTILE_LIFESPAN_MS: f64 = 5000.0;

/// Projectiles spawn this far ahead of the shooter...
pub const MUZZLE_FORWARD_OFFSET: f32 = 1.0;

/// ...and this far below the line of sight.
pub const MUZZLE_DROP: f32 = 0.15;

/// Projectile sprite loops through this many atlas cells...
pub const PROJECTILE_FRAMES: u32 = 4;

/// ...one every this many milliseconds.
pub const PROJECTILE_FRAME_MS: f64 = 20.0;

// --- Hostiles ---

pub const HOSTILE_HIT_POINTS: u32 = 5;

/// Bounding sphere radius.
pub const HOSTILE_COLLIDER_RADIUS: f32 = 1.0;

pub const ORBIT_HORIZONTAL_RADIUS: f32 = 3.0;

pub const ORBIT_VERTICAL_RADIUS: f32 = 1.0;

/// Orbit angular speed (rad/s). The vertical bob runs at half this rate.
pub const ORBIT_ANGULAR_SPEED: f32 = 0.6;

/// Atlas columns for facing; the mirrored half reuses columns 1..=3,
/// giving 8 distinct facings over the visible hemisphere.
pub const HOSTILE_FACING_COLUMNS: u32 = 5;

/// Walk cycle rows in the hostile atlas.
pub const HOSTILE_WALK_ROWS: u32 = 6;

/// Walk cycle frame interval (10 frames at 60 Hz).
pub const HOSTILE_WALK_FRAME_MS: f64 = 10.0 * DT_MS;

/// Atlas row holding the death frames.
pub const HOSTILE_DEATH_ROW: u32 = 6;

pub const HOSTILE_DEATH_FRAMES: u32 = 5;

pub const HOSTILE_DEATH_FRAME_MS: f64 = 100.0;

/// Total time in `Dying` before the hostile becomes `Dead`.
pub const HOSTILE_DEATH_ANIMATION_MS: f64 = 1000.0;

pub const HOSTILE_FALL_DURATION_MS: f64 = 200.0;

/// Height the corpse settles at.
pub const HOSTILE_RESTING_HEIGHT: f32 = 0.9;

// --- Impact effects ---

pub const DECAL_LIFESPAN_MS: f64 = 100_000.0;

pub const DECAL_FADE_MS: f64 = 1000.0;

/// Offset along the surface normal to avoid z-fighting.
pub const DECAL_SURFACE_OFFSET: f32 = 0.01;

/// Decal atlas is DECAL_ATLAS_GRID x DECAL_ATLAS_GRID cells.
pub const DECAL_ATLAS_GRID: u32 = 8;

pub const BLOOD_FRAME_COUNT: u32 = 4;

pub const BLOOD_FRAME_MS: f64 = 100.0;

// --- Weapons ---

pub const SINGLE_SHOT_AMMO: u32 = 50;

pub const SINGLE_SHOT_ANIMATION_FRAMES: u32 = 4;

/// Ticks each firing-animation frame is held.
pub const SINGLE_SHOT_FRAME_HOLD: u32 = 4;

pub const AUTOMATIC_AMMO: u32 = 100;

pub const AUTOMATIC_FIRE_INTERVAL_MS: f64 = 100.0;

// --- Level ---

pub const ROOM_WIDTH: f32 = 40.0;

pub const ROOM_DEPTH: f32 = 40.0;

pub const ROOM_HEIGHT: f32 = 6.0;

pub const WALL_THICKNESS: f32 = 1.0;

pub const HOSTILE_COUNT: usize = 5;

/// Hostiles spawn with x, z uniformly in [-extent, extent].
pub const HOSTILE_SPAWN_HALF_EXTENT: f32 = 9.0;

pub const HOSTILE_SPAWN_HEIGHT: f32 = 2.0;

/// Viewer (camera) start position.
pub const VIEWER_START: [f32; 3] = [0.0, 1.6, -5.0];
