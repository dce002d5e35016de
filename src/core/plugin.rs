//! Core plugin that sets up game states, events, configuration, and fundamental systems.

use bevy::prelude::*;

use super::config::TimeLoopConfig;
use super::events::*;
use super::states::*;
use super::stats::{tally_stats, GameStats};
use super::tween::*;

/// System set ordering for one simulation frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoopSet {
    /// Movement state machine and reset protocol
    Simulate,
    /// Trigger volumes noticing the player
    Detect,
    /// Interactables reacting to trigger entries
    Triggers,
    /// Camera, highlights and other visual bookkeeping
    Presentation,
}

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Paused, GameOver)
/// - Global events (JumpEvent, GhostCreatedEvent, etc.)
/// - The time-loop configuration resource
/// - Session statistics
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        // Tests and embedding apps may insert their own config first
        if !app.world().contains_resource::<TimeLoopConfig>() {
            app.insert_resource(TimeLoopConfig::load());
        }

        app
            // Initialize game states
            .init_state::<GameState>()

            // Register global events
            .add_event::<JumpEvent>()
            .add_event::<LandEvent>()
            .add_event::<GhostCreatedEvent>()
            .add_event::<PlayerDiedEvent>()
            .add_event::<LevelReloadEvent>()
            .add_event::<CheckpointActivatedEvent>()

            .init_resource::<GameStats>()

            // Frame ordering shared by every gameplay plugin
            .configure_sets(
                Update,
                (LoopSet::Simulate, LoopSet::Detect, LoopSet::Triggers)
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .configure_sets(Update, LoopSet::Presentation.after(LoopSet::Triggers))

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame).or(in_state(GameState::Paused)))
            )

            .add_systems(Update, tally_stats)

            // Smooth transform interpolation (runs for all game states)
            .add_systems(Update, update_smooth_transforms.in_set(LoopSet::Presentation));
    }
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            GameState::InGame => next_state.set(GameState::Paused),
            GameState::Paused => next_state.set(GameState::InGame),
            _ => {}
        }
    }
}
