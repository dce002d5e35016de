//! Checkpoint module - the rotating registry of respawn points.

mod plugin;
mod registry;

pub use plugin::{Checkpoint, CheckpointMaterials, CheckpointPlugin};
pub use registry::{CheckpointError, CheckpointRegistry, RespawnPoint};
