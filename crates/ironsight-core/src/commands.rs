//! Player commands sent from the input layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Build the level: room geometry and hostiles.
    LoadLevel,
    /// Pull the trigger of the active weapon. `direction` need not be normalized.
    Fire { origin: Vec3, direction: Vec3 },
    /// Rotate to the next weapon in the loadout.
    SwitchWeapon,
    /// Update the viewer (camera) position used for hostile facing.
    SetViewer { position: Vec3 },
    Pause,
    Resume,
    /// Dispose everything and release cached resources.
    Teardown,
}
