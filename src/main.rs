//! Echo Loop - Entry Point
//!
//! Controls:
//! - A/D or arrows: Move
//! - Space: Jump
//! - S: Crouch
//! - F: Reset (leave a ghost, respawn at the next checkpoint)
//! - R: Full reset (clear ghosts, back to the start)
//! - Escape: Pause/Unpause

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Echo Loop".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Our game plugin
        .add_plugins(echo_loop::EchoLoopPlugin)

        .run();
}
