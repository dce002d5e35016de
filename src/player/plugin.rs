//! Player plugin - input, movement state machine, reset cycle, and camera.

use bevy::prelude::*;

use super::input::{read_keyboard_input, KeyBindings, PlayerInput};
use super::movement;
use crate::core::LoopSet;

/// Player plugin - handles input, movement, resets and the follow camera.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<KeyBindings>()
            .init_resource::<PlayerInput>()
            // Input is sampled in every state so game over can read the full reset key
            .add_systems(PreUpdate, read_keyboard_input.after(bevy::input::InputSystem))
            .add_systems(Update, movement::player_tick.in_set(LoopSet::Simulate))
            .add_systems(
                Update,
                movement::follow_player
                    .in_set(LoopSet::Presentation)
                    .before(crate::core::update_smooth_transforms),
            );
    }
}
