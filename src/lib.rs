//! Echo Loop - a 2.5D time-loop platformer core in Bevy.
//!
//! Pressing reset freezes the player, leaves a solid ghost of their pose
//! behind, and respawns them at the next checkpoint in rotation. Ghosts are
//! platforms for later loops; the pool keeps only the most recent few.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, configuration, statistics
//! - **Player**: Movement state machine, reset protocol, follow camera
//! - **Ghosts**: Snapshots and the bounded ghost pool
//! - **Checkpoints**: Respawn rotation and highlighting
//! - **World**: Level layouts, trigger volumes, jump pads, hazards, exits

pub mod checkpoints;
pub mod core;
pub mod ghosts;
pub mod player;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct EchoLoopPlugin;

impl Plugin for EchoLoopPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Ghost pool and checkpoint registry
            .add_plugins(ghosts::GhostPlugin)
            .add_plugins(checkpoints::CheckpointPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // World systems
            .add_plugins(world::WorldPlugin);
    }
}
