//! Transient impact effects: blood bursts on hostiles, decals on surfaces.
//!
//! Both kinds spawn from the shared atlas cache. Blood plays its frames once
//! and disposes itself. Decals sit on the surface for their lifespan, fade
//! out, then dispose. All progression happens in [`ImpactEffectFactory::tick`].

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use ironsight_core::config::EffectTuning;
use ironsight_core::constants::DECAL_ATLAS_GRID;
use ironsight_core::enums::EffectKind;
use ironsight_core::types::{Direction, SpriteFrame, VisualHandle};

use crate::backend::VisualBackend;
use crate::resources::ResourceCache;
use crate::timers::TimerQueue;

/// A decal stuck to world geometry.
#[derive(Debug, Clone)]
pub struct Decal {
    id: u64,
    pub visual: VisualHandle,
    pub position: Vec3,
    pub orientation: Quat,
    /// Atlas cell, 0..64.
    pub cell: u32,
    /// Set once the lifespan elapses.
    pub fade_started_ms: Option<f64>,
}

/// A one-shot blood burst.
#[derive(Debug, Clone)]
pub struct BloodEffect {
    pub visual: VisualHandle,
    pub position: Vec3,
    /// Random rotation about the view axis.
    pub roll: f32,
    pub elapsed_ms: f64,
    pub frame: u32,
}

pub struct ImpactEffectFactory {
    tuning: EffectTuning,
    resources: ResourceCache,
    decals: Vec<Decal>,
    blood: Vec<BloodEffect>,
    fade_timers: TimerQueue<u64>,
    next_decal_id: u64,
}

impl ImpactEffectFactory {
    pub fn new(tuning: EffectTuning, resources: ResourceCache) -> Self {
        Self {
            tuning,
            resources,
            decals: Vec::new(),
            blood: Vec::new(),
            fade_timers: TimerQueue::new(),
            next_decal_id: 0,
        }
    }

    /// Spawn a blood burst at `point`. Returns false if the visual could not
    /// be created this time.
    pub fn spawn_blood_effect<V: VisualBackend + ?Sized>(
        &mut self,
        point: Vec3,
        visuals: &mut V,
        rng: &mut ChaCha8Rng,
    ) -> bool {
        let roll = rng.gen::<f32>() * TAU;
        let Some(visual) = self.resources.spawn(
            EffectKind::Blood.asset(),
            visuals,
            point,
            Quat::from_rotation_z(roll),
            SpriteFrame::cell(0),
        ) else {
            warn!(?point, "blood effect dropped");
            return false;
        };

        self.blood.push(BloodEffect {
            visual,
            position: point,
            roll,
            elapsed_ms: 0.0,
            frame: 0,
        });
        true
    }

    /// Stick a decal on the surface at `point` with outward `normal`.
    pub fn spawn_decal<V: VisualBackend + ?Sized>(
        &mut self,
        point: Vec3,
        normal: Vec3,
        now_ms: f64,
        visuals: &mut V,
        rng: &mut ChaCha8Rng,
    ) -> bool {
        let Ok(normal) = Direction::new(normal) else {
            warn!(?point, "decal dropped: degenerate surface normal");
            return false;
        };
        let roll = rng.gen::<f32>() * TAU;
        let cell = rng.gen_range(0..DECAL_ATLAS_GRID * DECAL_ATLAS_GRID);
        let (position, orientation) =
            decal_placement(point, normal, roll, self.tuning.decal_surface_offset);

        let Some(visual) = self.resources.spawn(
            EffectKind::Decal.asset(),
            visuals,
            position,
            orientation,
            SpriteFrame::cell(cell),
        ) else {
            warn!(?point, "decal dropped");
            return false;
        };

        let id = self.next_decal_id;
        self.next_decal_id += 1;
        self.fade_timers
            .schedule(now_ms, self.tuning.decal_lifespan_ms, id);
        self.decals.push(Decal {
            id,
            visual,
            position,
            orientation,
            cell,
            fade_started_ms: None,
        });
        debug!(cell, ?position, "decal spawned");
        true
    }

    /// Advance blood frames and decal fades.
    pub fn tick<V: VisualBackend + ?Sized>(&mut self, now_ms: f64, dt_ms: f64, visuals: &mut V) {
        let frame_ms = self.tuning.blood_frame_ms;
        let frame_count = self.tuning.blood_frame_count;
        self.blood.retain_mut(|blood| {
            blood.elapsed_ms += dt_ms;
            let frame = (blood.elapsed_ms / frame_ms) as u32;
            if frame >= frame_count {
                visuals.dispose(blood.visual);
                return false;
            }
            if frame != blood.frame {
                blood.frame = frame;
                visuals.update(blood.visual, blood.position, SpriteFrame::cell(frame));
            }
            true
        });

        // A fade timer for a decal that is already gone finds nothing to do.
        for id in self.fade_timers.drain_expired(now_ms) {
            if let Some(decal) = self.decals.iter_mut().find(|d| d.id == id) {
                decal.fade_started_ms = Some(now_ms);
            }
        }

        let fade_ms = self.tuning.decal_fade_ms;
        self.decals.retain(|decal| {
            let Some(started) = decal.fade_started_ms else {
                return true;
            };
            let alpha = fade_alpha(now_ms - started, fade_ms);
            if alpha <= 0.0 {
                visuals.dispose(decal.visual);
                return false;
            }
            visuals.update(
                decal.visual,
                decal.position,
                SpriteFrame {
                    alpha,
                    ..SpriteFrame::cell(decal.cell)
                },
            );
            true
        });
    }

    pub fn decals(&self) -> &[Decal] {
        &self.decals
    }

    pub fn decal_count(&self) -> usize {
        self.decals.len()
    }

    pub fn blood_effects(&self) -> &[BloodEffect] {
        &self.blood
    }

    pub fn blood_count(&self) -> usize {
        self.blood.len()
    }

    /// The shared atlas cache, also used for projectile and hostile sprites.
    pub fn resources_mut(&mut self) -> &mut ResourceCache {
        &mut self.resources
    }

    /// Dispose every live effect and release the cached atlases.
    pub fn teardown<V: VisualBackend + ?Sized>(&mut self, visuals: &mut V) {
        for blood in self.blood.drain(..) {
            visuals.dispose(blood.visual);
        }
        for decal in self.decals.drain(..) {
            visuals.dispose(decal.visual);
        }
        self.fade_timers.clear();
        self.resources.release_all(visuals);
    }
}

/// Position and orientation of a decal. The plane's face normal
/// (`orientation * Z`) points into the surface; the plane sits just off it.
pub fn decal_placement(point: Vec3, normal: Direction, roll: f32, offset: f32) -> (Vec3, Quat) {
    let n = normal.get();
    let facing = Quat::from_rotation_arc(Vec3::Z, -n);
    let orientation = (Quat::from_axis_angle(n, roll) * facing).normalize();
    (point + n * offset, orientation)
}

fn fade_alpha(elapsed_ms: f64, fade_ms: f64) -> f32 {
    if fade_ms <= 0.0 {
        return 0.0;
    }
    (1.0 - elapsed_ms / fade_ms).clamp(0.0, 1.0) as f32
}
