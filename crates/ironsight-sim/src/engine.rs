//! Combat engine: owns the world and drives one tick at a time.
//!
//! `CombatEngine` holds the hecs world of hostiles and projectiles, the
//! level's static geometry, the collision registry, the effect factory and
//! the player's loadout. Commands are queued and applied at the tick
//! boundary; every timer fires there too. Headless apart from the
//! [`VisualBackend`] it is handed.

use std::collections::VecDeque;

use glam::{Quat, Vec3};
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use ironsight_core::commands::PlayerCommand;
use ironsight_core::components::{Hostile, Projectile};
use ironsight_core::config::CombatConfig;
use ironsight_core::constants::{DT_MS, VIEWER_START};
use ironsight_core::enums::{AssetKind, LevelPhase, WeaponKind};
use ironsight_core::error::CombatError;
use ironsight_core::events::CombatEvent;
use ironsight_core::state::CombatSnapshot;
use ironsight_core::types::{Direction, Ray, SimTime, SpriteFrame};

use crate::backend::{HeadlessVisuals, VisualBackend};
use crate::effects::ImpactEffectFactory;
use crate::geometry::StaticGeometry;
use crate::hostile;
use crate::projectile::{self, ProjectileSpawn};
use crate::resolver::{CombatResolver, ImpactRecord};
use crate::resources::ResourceCache;
use crate::score::ScoreState;
use crate::systems;
use crate::timers::TimerQueue;
use crate::weapon::Loadout;
use crate::world_setup;

/// Configuration for a new engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. Same seed and same commands give the same run.
    pub seed: u64,
    pub combat: CombatConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            combat: CombatConfig::default(),
        }
    }
}

pub struct CombatEngine<V: VisualBackend> {
    world: World,
    time: SimTime,
    phase: LevelPhase,
    rng: ChaCha8Rng,
    config: CombatConfig,
    geometry: StaticGeometry,
    visuals: V,
    resolver: CombatResolver,
    effects: ImpactEffectFactory,
    loadout: Loadout,
    timers: TimerQueue<Entity>,
    viewer: Vec3,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<CombatEvent>,
    score: ScoreState,
}

impl CombatEngine<HeadlessVisuals> {
    /// Engine backed by in-memory visuals.
    pub fn new(config: SimConfig) -> Self {
        Self::with_visuals(config, HeadlessVisuals::new())
    }
}

impl SimConfig {
    /// Parse `{ "seed": .., "combat": { .. } }`; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CombatError> {
        let config: Self = serde_json::from_str(json)?;
        config.combat.validate()?;
        Ok(config)
    }
}

impl<V: VisualBackend> CombatEngine<V> {
    pub fn with_visuals(config: SimConfig, visuals: V) -> Self {
        let combat = config.combat;
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: LevelPhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            effects: ImpactEffectFactory::new(combat.effects.clone(), ResourceCache::new()),
            loadout: Loadout::standard(&combat.weapons),
            config: combat,
            geometry: StaticGeometry::new(),
            visuals,
            resolver: CombatResolver::new(),
            timers: TimerQueue::new(),
            viewer: Vec3::from_array(VIEWER_START),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            score: ScoreState::default(),
        }
    }

    /// Queue a command for the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Advance one fixed 60 Hz tick.
    pub fn tick(&mut self) -> CombatSnapshot {
        self.tick_for(DT_MS)
    }

    /// Advance by an explicit `dt_ms` and return the resulting snapshot.
    pub fn tick_for(&mut self, dt_ms: f64) -> CombatSnapshot {
        self.process_commands();

        if self.phase == LevelPhase::Active {
            self.time.advance(dt_ms);
            self.run_systems(dt_ms);
        }

        self.snapshot()
    }

    fn snapshot(&mut self) -> CombatSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.loadout,
            &self.effects,
            events,
            &self.score,
        )
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::LoadLevel => self.load_level(),
            PlayerCommand::Fire { origin, direction } => {
                if let Err(err) = self.fire(origin, direction) {
                    warn!(%err, "fire command rejected");
                }
            }
            PlayerCommand::SwitchWeapon => {
                self.switch_weapon();
            }
            PlayerCommand::SetViewer { position } => self.viewer = position,
            PlayerCommand::Pause => {
                if self.phase == LevelPhase::Active {
                    self.phase = LevelPhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == LevelPhase::Paused {
                    self.phase = LevelPhase::Active;
                }
            }
            PlayerCommand::Teardown => self.teardown(),
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt_ms: f64) {
        let now_ms = self.time.now_ms();

        // 1. Timers due this tick
        let expired = self.timers.drain_expired(now_ms);
        systems::projectiles::mark_expired(&mut self.world, expired);
        // 2. Projectiles: lookahead, hit dispatch, motion
        systems::projectiles::run(
            &mut self.world,
            &self.resolver,
            &self.geometry,
            &mut self.effects,
            &mut self.visuals,
            &mut self.rng,
            &mut self.timers,
            &self.config.projectile,
            now_ms,
            dt_ms,
            &mut self.events,
            &mut self.score,
            &mut self.despawn_buffer,
        );
        // 3. Hostiles: orbit, facing, death sequence
        let dead = systems::hostiles::run(
            &mut self.world,
            self.effects.resources_mut(),
            &mut self.visuals,
            self.viewer,
            dt_ms,
            &self.config.hostile,
        );
        // 4. Blood frames, decal fades
        self.effects.tick(now_ms, dt_ms, &mut self.visuals);
        // 5. Weapon animation
        self.loadout.advance();
        // 6. Cleanup
        systems::cleanup::run(
            &mut self.world,
            &mut self.resolver,
            &dead,
            &mut self.despawn_buffer,
        );
    }

    /// Build the room and its hostiles. A loaded level is torn down first.
    pub fn load_level(&mut self) {
        if self.phase != LevelPhase::Unloaded {
            self.teardown();
        }

        let hostiles = world_setup::setup_level(
            &mut self.world,
            &mut self.geometry,
            &mut self.rng,
            &self.config.level,
            &self.config.hostile,
        );
        self.resolver.register_geometry(&self.geometry);
        for &entity in &hostiles {
            self.attach_hostile(entity);
        }

        self.loadout = Loadout::standard(&self.config.weapons);
        self.score = ScoreState::default();
        self.time = SimTime::default();
        self.phase = LevelPhase::Active;
        info!(
            hostiles = hostiles.len(),
            collidables = self.resolver.len(),
            "level loaded"
        );
    }

    /// Spawn a hostile orbiting `home` and register it for hits.
    pub fn spawn_hostile(&mut self, home: Vec3, orbit_angle: f32, vertical_angle: f32) -> Entity {
        let entity = world_setup::spawn_hostile(
            &mut self.world,
            home,
            orbit_angle,
            vertical_angle,
            &self.config.hostile,
        );
        self.attach_hostile(entity);
        entity
    }

    fn attach_hostile(&mut self, entity: Entity) {
        if let Ok(mut h) = self.world.get::<&mut Hostile>(entity) {
            h.visual = self.effects.resources_mut().spawn(
                AssetKind::Hostile,
                &mut self.visuals,
                h.position,
                Quat::IDENTITY,
                SpriteFrame::cell(hostile::cell_index(0, 0)),
            );
        }
        self.resolver.register_hostile(entity);
    }

    /// Pull the trigger of the active weapon. `Ok(false)` means no shot:
    /// out of ammo, locked out, rate limited, or no active level.
    pub fn fire(&mut self, origin: Vec3, direction: Vec3) -> Result<bool, CombatError> {
        let direction = Direction::new(direction)?;
        if self.phase != LevelPhase::Active {
            return Ok(false);
        }

        let now_ms = self.time.now_ms();
        let Some(weapon) = self.loadout.active_mut() else {
            return Ok(false);
        };
        let kind = weapon.kind();
        let Some(shot) = weapon.fire(now_ms, origin, direction) else {
            if weapon.ammo_remaining() == 0 {
                self.events.push(CombatEvent::DryFire { weapon: kind });
            }
            return Ok(false);
        };
        let ammo_remaining = weapon.ammo_remaining();

        let tuning = &self.config.projectile;
        let muzzle = shot.origin + shot.direction.get() * tuning.muzzle_forward_offset
            - Vec3::Y * tuning.muzzle_drop;
        self.spawn_projectile(muzzle, shot.direction);

        self.score.shots_fired += 1;
        self.events.push(CombatEvent::ShotFired {
            weapon: kind,
            ammo_remaining,
        });
        debug!(?kind, ammo_remaining, "shot fired");
        Ok(true)
    }

    /// Spawn a projectile with the configured speed and lifespan.
    pub fn spawn_projectile(&mut self, origin: Vec3, direction: Direction) -> Entity {
        let tuning = &self.config.projectile;
        let params = ProjectileSpawn {
            origin,
            direction,
            speed: tuning.speed,
            lifespan_ms: tuning.lifespan_ms,
        };
        let now_ms = self.time.now_ms();
        let visual = self.effects.resources_mut().spawn(
            AssetKind::Projectile,
            &mut self.visuals,
            origin,
            Quat::IDENTITY,
            projectile::sprite_frame(now_ms, now_ms),
        );
        projectile::spawn(&mut self.world, params, now_ms, &mut self.timers, visual)
    }

    /// Rotate to the next weapon.
    pub fn switch_weapon(&mut self) -> Option<WeaponKind> {
        let kind = self.loadout.switch_next()?;
        self.events.push(CombatEvent::WeaponSwitched { weapon: kind });
        Some(kind)
    }

    /// Nearest hit along a ray against everything registered.
    pub fn query_nearest_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Result<Option<ImpactRecord>, CombatError> {
        let ray = Ray::new(origin, Direction::new(direction)?);
        Ok(self
            .resolver
            .query_nearest_hit(&self.world, &self.geometry, &ray, max_distance))
    }

    /// Dispatch a resolved hit immediately.
    pub fn apply_hit(&mut self, record: &ImpactRecord) -> bool {
        self.resolver.apply_hit(
            record,
            &mut self.world,
            &mut self.effects,
            &mut self.visuals,
            &mut self.rng,
            self.time.now_ms(),
            &mut self.events,
            &mut self.score,
        )
    }

    /// Dispose every hostile, projectile and effect and release the cached
    /// atlases. The engine returns to `Unloaded`.
    pub fn teardown(&mut self) {
        for (_, h) in self.world.query_mut::<&mut Hostile>() {
            hostile::dispose(h, &mut self.visuals);
        }
        for (_, p) in self.world.query_mut::<&mut Projectile>() {
            if let Some(visual) = p.visual.take() {
                self.visuals.dispose(visual);
            }
            p.disposed = true;
        }
        self.effects.teardown(&mut self.visuals);

        self.world.clear();
        self.resolver.clear();
        self.geometry.clear();
        self.timers.clear();
        self.despawn_buffer.clear();
        self.phase = LevelPhase::Unloaded;
        info!("level torn down");
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn geometry(&self) -> &StaticGeometry {
        &self.geometry
    }

    pub fn resolver(&self) -> &CombatResolver {
        &self.resolver
    }

    pub fn effects(&self) -> &ImpactEffectFactory {
        &self.effects
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn viewer(&self) -> Vec3 {
        self.viewer
    }

    pub fn visuals(&self) -> &V {
        &self.visuals
    }

    pub fn visuals_mut(&mut self) -> &mut V {
        &mut self.visuals
    }

    /// Hostile entities ordered by id.
    pub fn hostiles(&self) -> Vec<Entity> {
        let mut hostiles: Vec<Entity> = self
            .world
            .query::<&Hostile>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        hostiles.sort_by_key(|e| e.id());
        hostiles
    }

    /// Live projectile entities ordered by id.
    pub fn projectiles(&self) -> Vec<Entity> {
        let mut projectiles: Vec<Entity> = self
            .world
            .query::<&Projectile>()
            .iter()
            .filter(|(_, p)| !p.disposed)
            .map(|(entity, _)| entity)
            .collect();
        projectiles.sort_by_key(|e| e.id());
        projectiles
    }
}
