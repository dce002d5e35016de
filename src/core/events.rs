//! Global events used for cross-system communication.
//!
//! These are fire-and-forget notifications. The simulation core only sends
//! them; VFX, audio and UI listeners live outside the core and may or may not
//! be present.

use bevy::prelude::*;

use crate::ghosts::GhostStateKind;

/// Sent on the frame a jump is applied.
#[derive(Event, Debug, Clone, Copy)]
pub struct JumpEvent {
    pub player: Entity,
}

/// Sent on the airborne to grounded transition.
#[derive(Event, Debug, Clone, Copy)]
pub struct LandEvent {
    pub player: Entity,
}

/// Sent after a ghost has been fully spawned and added to the pool.
#[derive(Event, Debug, Clone, Copy)]
pub struct GhostCreatedEvent {
    /// The new ghost entity
    pub ghost: Entity,
    /// Pose the player was in when the snapshot was taken
    pub state: GhostStateKind,
}

/// Sent when the player touches a hazard.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerDiedEvent {
    pub player: Entity,
}

/// Why the level was reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadReason {
    /// A level was (re)built from its layout
    Loaded,
    /// Full reset key or retry after game over
    FullReset,
}

/// Sent whenever the level is rebuilt or fully reset.
#[derive(Event, Debug, Clone, Copy)]
pub struct LevelReloadEvent {
    pub reason: ReloadReason,
}

/// Sent when a checkpoint is registered for the first time.
#[derive(Event, Debug, Clone, Copy)]
pub struct CheckpointActivatedEvent {
    pub checkpoint: Entity,
}
