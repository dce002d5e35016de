//! Player-related components and movement tuning.

use bevy::prelude::*;
use serde::Deserialize;

use crate::ghosts::{GhostStateKind, KinematicSnapshot, ReferenceBody, DEFAULT_GHOST_LAYER};

/// Collision layer bit for level geometry.
pub const WORLD_LAYER: u32 = 1 << 0;
/// Collision layer bit for the player.
pub const PLAYER_LAYER: u32 = 1 << 1;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Per-player kinematic state driven by the movement state machine.
///
/// Position and orientation live in the entity's `Transform`.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct MovementState {
    pub velocity: Vec3,
    pub grounded: bool,
    pub crouching: bool,
    pub horizontal_input: f32,
    /// Time left in which a jump is allowed after leaving the ground
    pub coyote_timer: f32,
    /// Time left in which an early jump press is still honored
    pub jump_buffer: f32,
}

impl MovementState {
    /// Pose tag for a snapshot taken right now.
    pub fn snapshot_state(&self) -> GhostStateKind {
        GhostStateKind::classify(
            self.crouching,
            self.grounded,
            self.velocity.y,
            self.horizontal_input,
        )
    }

    /// Capture the current kinematic state at the given pose.
    pub fn capture(&self, transform: &Transform) -> KinematicSnapshot {
        KinematicSnapshot {
            state: self.snapshot_state(),
            position: transform.translation,
            rotation: transform.rotation,
            velocity: self.velocity,
            grounded: self.grounded,
            horizontal_input: self.horizontal_input,
        }
    }

    /// External impulse: drop current vertical velocity, then add `launch_velocity`.
    pub fn launch(&mut self, launch_velocity: Vec3) {
        self.velocity.y = 0.0;
        self.velocity += launch_velocity;
    }

    /// Forget all motion (used by the reset paths).
    pub fn clear(&mut self) {
        self.velocity = Vec3::ZERO;
        self.grounded = false;
        self.crouching = false;
    }
}

/// The player's collision capsule.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerBody {
    pub radius: f32,
    /// Full height including both caps
    pub height: f32,
}

impl PlayerBody {
    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// Reference capsule for ghost collision volumes.
    pub fn reference(&self) -> ReferenceBody {
        ReferenceBody {
            radius: self.radius,
            height: self.height,
            center: Vec3::ZERO,
        }
    }
}

/// The original spawn transform, used when no checkpoint can be found.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerSpawn(pub Transform);

/// Movement and reset tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal speed in units per second
    pub move_speed: f32,
    /// Apex height of a jump
    pub jump_height: f32,
    /// Vertical acceleration (negative is down)
    pub gravity: f32,
    /// Extra ray length beyond the feet for ground detection
    pub ground_check_distance: f32,
    /// Ray length above the head for ceiling detection
    pub ceiling_check_distance: f32,
    /// Vertical velocity held while standing on the ground
    pub grounded_velocity: f32,
    /// Grace window after leaving a ledge
    pub coyote_time: f32,
    /// Grace window before landing
    pub jump_buffer_time: f32,
    /// Seconds the player stays hidden during a reset
    pub reset_delay: f32,
    /// Layers that count as ground and ceiling
    pub ground_mask: u32,
    pub body_radius: f32,
    pub body_height: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 8.0,
            jump_height: 4.0,
            gravity: -20.0,
            ground_check_distance: 0.1,
            ceiling_check_distance: 0.1,
            grounded_velocity: -2.0,
            coyote_time: 0.2,
            jump_buffer_time: 0.15,
            reset_delay: 0.5,
            ground_mask: WORLD_LAYER | DEFAULT_GHOST_LAYER,
            body_radius: 0.5,
            body_height: 2.0,
        }
    }
}

impl MovementConfig {
    /// Launch speed that reaches `jump_height` under `gravity`.
    pub fn jump_velocity(&self) -> f32 {
        (self.jump_height * -2.0 * self.gravity).max(0.0).sqrt()
    }

    pub fn body(&self) -> PlayerBody {
        PlayerBody {
            radius: self.body_radius,
            height: self.body_height,
        }
    }
}
