//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. For example,
//! player movement only runs while a level is being played, while menu
//! systems only run in the MainMenu state.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` to register sprite sheets and animations
/// - Move to `MainMenu` when loading completes
/// - `Credits` is reached from the title screen and returns to it
/// - Enter `InGame` when the player starts a run
/// - `LevelTransition` is a one-frame hop used to rebuild a level
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading assets and data files
    #[default]
    Loading,
    /// Title screen with character and music selection
    MainMenu,
    /// Who made the game
    Credits,
    /// A level attempt is running
    InGame,
    /// Leaving a level so the next (or same) one can be set up again
    LevelTransition,
}

/// Sub-states for a level attempt - only active when GameState::InGame.
///
/// - `Playing`: input, AI, collisions and timers all run
/// - `LevelComplete`: the exit was reached, waiting out the fade
/// - `GameOver`: the player died, world is frozen while the countdown runs
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    #[default]
    Playing,
    LevelComplete,
    GameOver,
}

/// Ordering of gameplay systems within a frame.
///
/// The chain mirrors the update order of a level: the orchestrator reads
/// input first, then the player acts, then enemies, then overlaps are
/// resolved, then level progress and visual feedback catch up.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Input,
    Player,
    Enemies,
    Collisions,
    Progress,
    Feedback,
}
