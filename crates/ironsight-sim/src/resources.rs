//! Shared atlas cache.
//!
//! Each asset's atlas is loaded on first use and reused by every instance
//! afterwards. The cache is owned by whoever spawns visuals (the effect
//! factory) and passed explicitly; there is no process-wide state.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use tracing::{debug, warn};

use ironsight_core::enums::AssetKind;
use ironsight_core::error::CombatError;
use ironsight_core::types::{AtlasHandle, SpriteFrame, VisualHandle};

use crate::backend::VisualBackend;

#[derive(Debug, Default)]
pub struct ResourceCache {
    atlases: BTreeMap<AssetKind, AtlasHandle>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atlas for `asset`, loading it if this is the first request.
    pub fn acquire<V: VisualBackend + ?Sized>(
        &mut self,
        asset: AssetKind,
        visuals: &mut V,
    ) -> AtlasHandle {
        *self.atlases.entry(asset).or_insert_with(|| {
            debug!(asset = asset.path(), "loading atlas");
            visuals.load_atlas(asset)
        })
    }

    /// Forget a cached atlas so the next `acquire` reloads it.
    pub fn invalidate(&mut self, asset: AssetKind) {
        if self.atlases.remove(&asset).is_some() {
            warn!(asset = asset.path(), "cached atlas invalidated");
        }
    }

    pub fn is_cached(&self, asset: AssetKind) -> bool {
        self.atlases.contains_key(&asset)
    }

    /// Spawn an instance from the cached atlas. If the backend reports the
    /// atlas unavailable the cache entry is dropped and `None` is returned;
    /// the next spawn reloads.
    pub fn spawn<V: VisualBackend + ?Sized>(
        &mut self,
        asset: AssetKind,
        visuals: &mut V,
        position: Vec3,
        orientation: Quat,
        frame: SpriteFrame,
    ) -> Option<VisualHandle> {
        let atlas = self.acquire(asset, visuals);
        match visuals.spawn_oriented(asset, atlas, position, orientation, frame) {
            Ok(handle) => Some(handle),
            Err(CombatError::ResourceUnavailable { asset }) => {
                self.invalidate(asset);
                None
            }
            Err(err) => {
                warn!(%err, "visual spawn failed");
                None
            }
        }
    }

    /// Release every cached atlas back to the backend.
    pub fn release_all<V: VisualBackend + ?Sized>(&mut self, visuals: &mut V) {
        for (asset, atlas) in std::mem::take(&mut self.atlases) {
            debug!(asset = asset.path(), "releasing atlas");
            visuals.release_atlas(atlas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessVisuals;

    #[test]
    fn test_atlas_loaded_once() {
        let mut cache = ResourceCache::new();
        let mut visuals = HeadlessVisuals::new();

        let a = cache.acquire(AssetKind::Decal, &mut visuals);
        let b = cache.acquire(AssetKind::Decal, &mut visuals);
        assert_eq!(a, b);
        assert_eq!(visuals.atlas_loads(), 1);

        cache.acquire(AssetKind::Blood, &mut visuals);
        assert_eq!(visuals.atlas_loads(), 2);
    }

    #[test]
    fn test_spawn_recovers_from_lost_atlas() {
        let mut cache = ResourceCache::new();
        let mut visuals = HeadlessVisuals::new();
        let frame = SpriteFrame::cell(0);

        assert!(cache
            .spawn(AssetKind::Blood, &mut visuals, Vec3::ZERO, Quat::IDENTITY, frame)
            .is_some());

        visuals.evict_atlas(AssetKind::Blood);
        assert!(cache
            .spawn(AssetKind::Blood, &mut visuals, Vec3::ZERO, Quat::IDENTITY, frame)
            .is_none());
        assert!(!cache.is_cached(AssetKind::Blood));

        // Next spawn reloads and succeeds.
        assert!(cache
            .spawn(AssetKind::Blood, &mut visuals, Vec3::ZERO, Quat::IDENTITY, frame)
            .is_some());
        assert_eq!(visuals.atlas_loads(), 2);
        assert_eq!(visuals.live_count(), 2);
    }

    #[test]
    fn test_release_all() {
        let mut cache = ResourceCache::new();
        let mut visuals = HeadlessVisuals::new();
        for asset in AssetKind::ALL {
            cache.acquire(asset, &mut visuals);
        }
        assert_eq!(visuals.loaded_atlases(), 4);

        cache.release_all(&mut visuals);
        assert_eq!(visuals.loaded_atlases(), 0);
        assert!(AssetKind::ALL.iter().all(|a| !cache.is_cached(*a)));
    }
}
