//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;

use super::context::AppContext;
use super::events::*;
use super::states::*;
use super::tween::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, MainMenu, InGame, ...) and the gameplay sets
/// - Global events (PlayerShoot, EnemyDied, ...)
/// - The shared application context
/// - Tweening
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            .init_resource::<AppContext>()

            // Register global events
            .add_event::<DamageEvent>()
            .add_event::<PlayerShoot>()
            .add_event::<PlayerLasso>()
            .add_event::<PlayerHealthChanged>()
            .add_event::<PlayerDied>()
            .add_event::<EnemyDied>()
            .add_event::<EnemyDroppedPowerup>()
            .add_event::<WeaponChanged>()
            .add_event::<ShowMessage>()

            // Gameplay runs in a fixed order, and only while a level is live
            .configure_sets(
                Update,
                (
                    GameplaySet::Input,
                    GameplaySet::Player,
                    GameplaySet::Enemies,
                    GameplaySet::Collisions,
                    GameplaySet::Progress,
                    GameplaySet::Feedback,
                )
                    .chain()
                    .run_if(in_state(GameState::InGame))
                    .run_if(in_state(PlayState::Playing)),
            )

            // Loading state - move on once the loading systems have run
            .add_systems(OnEnter(GameState::Loading), transition_to_main_menu)
            .add_systems(OnEnter(GameState::LevelTransition), transition_to_level)
            .add_systems(OnExit(GameState::InGame), clear_gameplay_events)

            .add_systems(Update, (update_smooth_transforms, update_tweens));
    }
}

/// Transition from Loading to MainMenu.
///
/// Sheet and animation registration run in the same `OnEnter` schedule,
/// and the state change only applies on the next frame.
fn transition_to_main_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}

/// Re-enter InGame so the level is built again from `CurrentLevel`.
fn transition_to_level(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Drop every queued gameplay event when a level is torn down.
fn clear_gameplay_events(
    mut damage: ResMut<Events<DamageEvent>>,
    mut shoot: ResMut<Events<PlayerShoot>>,
    mut lasso: ResMut<Events<PlayerLasso>>,
    mut health: ResMut<Events<PlayerHealthChanged>>,
    mut player_died: ResMut<Events<PlayerDied>>,
    mut enemy_died: ResMut<Events<EnemyDied>>,
    mut dropped: ResMut<Events<EnemyDroppedPowerup>>,
    mut weapon: ResMut<Events<WeaponChanged>>,
    mut messages: ResMut<Events<ShowMessage>>,
) {
    damage.clear();
    shoot.clear();
    lasso.clear();
    health.clear();
    player_died.clear();
    enemy_died.clear();
    dropped.clear();
    weapon.clear();
    messages.clear();
}
