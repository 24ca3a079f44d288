//! Cleanup system: despawns resolved projectiles and retires dead hostiles
//! from the collision registry.

use hecs::{Entity, World};

use crate::resolver::CombatResolver;

/// Dead hostiles stay in the world, frozen, but stop being hit candidates.
pub fn run(
    world: &mut World,
    resolver: &mut CombatResolver,
    dead_hostiles: &[Entity],
    despawn_buffer: &mut Vec<Entity>,
) {
    for &entity in dead_hostiles {
        resolver.unregister_hostile(entity);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
