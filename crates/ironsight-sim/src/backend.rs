//! Capabilities the combat core consumes from the rendering/world backend.
//!
//! The core never creates meshes or sprites itself. It asks a
//! [`WorldGeometry`] for ray intersections and a [`VisualBackend`] for
//! sprite instances. [`HeadlessVisuals`] is an in-memory backend used by the
//! headless runner and by tests.

use std::collections::HashMap;

use glam::{Quat, Vec3};

use ironsight_core::enums::AssetKind;
use ironsight_core::error::CombatError;
use ironsight_core::types::{AtlasHandle, CollidableHandle, Ray, RayHit, SpriteFrame, VisualHandle};

/// Static, collidable world geometry.
pub trait WorldGeometry {
    /// All collidables, in a stable order. Ties in the nearest-hit search
    /// are broken by this order.
    fn list_collidables(&self) -> Vec<CollidableHandle>;

    /// Intersect `ray` with one collidable. Returns `None` when there is no
    /// intersection within `max_distance`.
    fn intersect_ray(&self, ray: &Ray, max_distance: f32, handle: CollidableHandle)
        -> Option<RayHit>;
}

/// Sprite/plane instancing.
pub trait VisualBackend {
    /// Load a shared texture atlas.
    fn load_atlas(&mut self, asset: AssetKind) -> AtlasHandle;

    fn release_atlas(&mut self, atlas: AtlasHandle);

    /// Spawn an instance of `asset` from its loaded `atlas`. Fails with
    /// [`CombatError::ResourceUnavailable`] when the atlas is gone.
    fn spawn_oriented(
        &mut self,
        asset: AssetKind,
        atlas: AtlasHandle,
        position: Vec3,
        orientation: Quat,
        frame: SpriteFrame,
    ) -> Result<VisualHandle, CombatError>;

    /// Move an instance and change the frame it shows.
    fn update(&mut self, handle: VisualHandle, position: Vec3, frame: SpriteFrame);

    fn dispose(&mut self, handle: VisualHandle);
}

/// One live instance in [`HeadlessVisuals`].
#[derive(Debug, Clone, Copy)]
pub struct HeadlessVisual {
    pub asset: AssetKind,
    pub position: Vec3,
    pub orientation: Quat,
    pub frame: SpriteFrame,
}

/// Backend that keeps visuals in memory and counts what happens to them.
#[derive(Debug, Default)]
pub struct HeadlessVisuals {
    next_atlas: u32,
    next_visual: u32,
    atlases: HashMap<AtlasHandle, AssetKind>,
    live: HashMap<VisualHandle, HeadlessVisual>,
    atlas_loads: usize,
}

impl HeadlessVisuals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&HeadlessVisual> {
        self.live.get(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live instances spawned from `asset`.
    pub fn live_of(&self, asset: AssetKind) -> usize {
        self.live.values().filter(|v| v.asset == asset).count()
    }

    /// Number of `load_atlas` calls so far.
    pub fn atlas_loads(&self) -> usize {
        self.atlas_loads
    }

    pub fn loaded_atlases(&self) -> usize {
        self.atlases.len()
    }

    /// Drop an atlas behind the cache's back, as a lost graphics context would.
    pub fn evict_atlas(&mut self, asset: AssetKind) {
        self.atlases.retain(|_, a| *a != asset);
    }
}

impl VisualBackend for HeadlessVisuals {
    fn load_atlas(&mut self, asset: AssetKind) -> AtlasHandle {
        let handle = AtlasHandle(self.next_atlas);
        self.next_atlas += 1;
        self.atlas_loads += 1;
        self.atlases.insert(handle, asset);
        handle
    }

    fn release_atlas(&mut self, atlas: AtlasHandle) {
        self.atlases.remove(&atlas);
    }

    fn spawn_oriented(
        &mut self,
        asset: AssetKind,
        atlas: AtlasHandle,
        position: Vec3,
        orientation: Quat,
        frame: SpriteFrame,
    ) -> Result<VisualHandle, CombatError> {
        if self.atlases.get(&atlas) != Some(&asset) {
            return Err(CombatError::ResourceUnavailable { asset });
        }
        let handle = VisualHandle(self.next_visual);
        self.next_visual += 1;
        self.live.insert(
            handle,
            HeadlessVisual {
                asset,
                position,
                orientation,
                frame,
            },
        );
        Ok(handle)
    }

    fn update(&mut self, handle: VisualHandle, position: Vec3, frame: SpriteFrame) {
        if let Some(visual) = self.live.get_mut(&handle) {
            visual.position = position;
            visual.frame = frame;
        }
    }

    fn dispose(&mut self, handle: VisualHandle) {
        self.live.remove(&handle);
    }
}
