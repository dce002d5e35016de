//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. Player simulation
//! only runs in `InGame`; `GameOver` waits for a retry.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` until the first level has been built
/// - `InGame` is the active time loop
/// - `Paused` freezes the simulation but keeps the world visible
/// - `GameOver` after touching a hazard; a full reset returns to `InGame`
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Waiting for the first level to be built
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
    /// Player has died
    GameOver,
}
