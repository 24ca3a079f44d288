//! Error taxonomy for the combat core.
//!
//! Bad directions, lost atlases and bad config are the real errors. Everything else the simulation can
//! run into (empty magazine, hitting a corpse, a disposed timer target) is
//! ordinary control flow and surfaces as a `bool` or `Option`.

use thiserror::Error;

use crate::enums::AssetKind;

#[derive(Debug, Error)]
pub enum CombatError {
    /// A zero-length or non-finite direction was supplied. Callers must
    /// normalize before constructing projectiles or firing.
    #[error("direction vector must be finite and non-zero")]
    InvalidDirection,

    /// The backend no longer holds the shared atlas for this asset.
    /// The resource cache drops its entry and reloads on next use.
    #[error("visual resource unavailable: {asset:?}")]
    ResourceUnavailable { asset: AssetKind },

    #[error("malformed combat config: {0}")]
    Config(#[from] serde_json::Error),

    /// A config value parsed but is outside the range the simulation can run with.
    #[error("invalid combat config: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}
