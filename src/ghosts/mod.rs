//! Ghost module - snapshots of past player poses and the bounded pool of
//! frozen ghost actors built from them.

mod plugin;
mod pool;
mod snapshot;
mod spawner;

pub use plugin::GhostPlugin;
pub use pool::{
    ghost_collision_groups, layer_index, CreationStatus, GhostBlueprint, GhostPool, GhostSettings,
    GhostSpawner, GhostTemplate, GhostVolume, LiveGhost, ReferenceBody, DEFAULT_GHOST_LAYER,
};
pub use snapshot::{GhostStateKind, KinematicSnapshot, MOVING_DEADZONE};
pub use spawner::{CommandsGhostSpawner, Ghost, GhostCollider};
