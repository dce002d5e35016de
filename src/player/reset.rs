//! The reset protocol: freeze, leave a ghost behind, respawn at the next checkpoint.
//!
//! A reset is a suspended task. It starts on a reset edge, keeps the player
//! hidden and frozen while `ResetProtocol::Hidden` accumulates frame time, and
//! completes exactly once when the accumulated time reaches the reset delay.
//! Only one reset can be in flight; triggers during a reset are dropped.

use bevy::prelude::*;

use super::components::{MovementState, PlayerSpawn};
use crate::checkpoints::CheckpointRegistry;
use crate::ghosts::{GhostPool, GhostSpawner, GhostStateKind};

/// Status of the reset protocol for one player.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum ResetProtocol {
    #[default]
    Idle,
    /// Player hidden and frozen, waiting for the delay to elapse
    Hidden { elapsed: f32 },
}

impl ResetProtocol {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Hidden { .. })
    }

    /// Start a reset unless one is already running.
    pub fn try_begin(&mut self) -> bool {
        match self {
            Self::Idle => {
                *self = Self::Hidden { elapsed: 0.0 };
                true
            }
            Self::Hidden { .. } => false,
        }
    }

    /// Accumulate frame time; returns `true` on the frame the delay is reached.
    pub fn tick(&mut self, dt: f32, delay: f32) -> bool {
        let Self::Hidden { elapsed } = self else {
            return false;
        };

        *elapsed += dt;
        if *elapsed >= delay {
            *self = Self::Idle;
            return true;
        }
        false
    }
}

/// Result of a reset trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResetBegin {
    /// A reset was already running; nothing happened
    AlreadyResetting,
    /// The reset started; `ghost` is `None` if the pool produced nothing
    Started {
        ghost: Option<Entity>,
        state: GhostStateKind,
    },
}

/// Begin a reset: capture a snapshot and hand it to the ghost pool.
pub fn begin_reset(
    transform: &Transform,
    movement: &MovementState,
    protocol: &mut ResetProtocol,
    pool: Option<&mut GhostPool>,
    spawner: &mut impl GhostSpawner,
) -> ResetBegin {
    if !protocol.try_begin() {
        return ResetBegin::AlreadyResetting;
    }

    let snapshot = movement.capture(transform);
    let state = snapshot.state;

    let ghost = match pool {
        Some(pool) => pool.create_ghost(transform.translation, transform.rotation, snapshot, spawner),
        None => {
            error!("No ghost pool available, reset leaves no ghost");
            None
        }
    };

    ResetBegin::Started { ghost, state }
}

/// Finish a reset: move to the next respawn point (or the start) and stop.
///
/// Returns the transform the player was moved to.
pub fn finish_reset(
    transform: &mut Transform,
    movement: &mut MovementState,
    registry: Option<&mut CheckpointRegistry>,
    spawn: &PlayerSpawn,
) -> Transform {
    let respawn = match registry {
        Some(registry) => match registry.get_next_respawn_point() {
            Ok(respawn) => Some(respawn),
            Err(e) => {
                error!("Checkpoint registry: {}", e);
                None
            }
        },
        None => None,
    };

    match respawn {
        Some(respawn) => {
            transform.translation = respawn.translation;
            transform.rotation = respawn.rotation;
        }
        None => reset_to_start(transform, movement, spawn),
    }

    movement.velocity = Vec3::ZERO;
    *transform
}

/// Non-animated full reset to the original spawn.
pub fn reset_to_start(transform: &mut Transform, movement: &mut MovementState, spawn: &PlayerSpawn) {
    transform.translation = spawn.0.translation;
    transform.rotation = spawn.0.rotation;
    movement.clear();
    debug!("Player reset to start position");
}
