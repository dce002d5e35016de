//! Immutable captures of the player's kinematic state.

use bevy::prelude::*;

/// Horizontal input magnitude above which a standing player counts as moving.
pub const MOVING_DEADZONE: f32 = 0.1;

/// Pose the player was in when a snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GhostStateKind {
    #[default]
    Standing,
    Crouching,
    Jumping,
    Falling,
    Moving,
}

impl GhostStateKind {
    /// Derive the pose tag by priority: crouching, rising, descending, moving, standing.
    pub fn classify(crouching: bool, grounded: bool, vertical_velocity: f32, horizontal_input: f32) -> Self {
        if crouching {
            Self::Crouching
        } else if !grounded && vertical_velocity > 0.0 {
            Self::Jumping
        } else if !grounded && vertical_velocity < 0.0 {
            Self::Falling
        } else if horizontal_input.abs() > MOVING_DEADZONE {
            Self::Moving
        } else {
            Self::Standing
        }
    }

    /// Short label used for ghost entity names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standing => "Standing",
            Self::Crouching => "Crouching",
            Self::Jumping => "Jumping",
            Self::Falling => "Falling",
            Self::Moving => "Moving",
        }
    }
}

/// The player's kinematic state at the instant of a reset.
///
/// Deliberately not `Clone`: each snapshot is moved into the ghost pool and
/// becomes exactly one ghost.
#[derive(Debug, PartialEq)]
pub struct KinematicSnapshot {
    pub state: GhostStateKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub grounded: bool,
    pub horizontal_input: f32,
}
