//! World plugin - level building, progress and pickups.

use bevy::prelude::*;

use super::builder::{build_level, LevelAssets, LevelEntity};
use super::levels::level;
use super::powerups::{collect_powerups, spawn_dropped_powerups};
use super::progress::*;
use crate::core::{AppContext, GameState, GameplaySet, PlayState};
use crate::player::{apply_player_damage, Player, PlayerConfig};
use crate::rendering::{snap_camera_to_player, AnimationLibrary, SpriteAssets, VisualConfig};

/// World plugin - handles level setup, teardown and level flow.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentLevel>()
            .init_resource::<LevelProgress>()
            .add_systems(OnEnter(GameState::MainMenu), reset_current_level)
            .add_systems(
                OnEnter(GameState::InGame),
                (setup_level, snap_camera_to_player).chain(),
            )
            .add_systems(
                OnExit(GameState::InGame),
                (cleanup_level, clear_progress_timers, resume_time),
            )
            .add_systems(Update, collect_powerups.in_set(GameplaySet::Collisions))
            .add_systems(
                Update,
                (
                    count_enemy_deaths,
                    check_exit_door,
                    watch_player_death.after(apply_player_damage),
                    spawn_dropped_powerups,
                )
                    .in_set(GameplaySet::Progress),
            )
            .add_systems(OnEnter(PlayState::LevelComplete), start_level_complete)
            .add_systems(
                Update,
                tick_level_complete.run_if(in_state(PlayState::LevelComplete)),
            )
            .add_systems(OnEnter(PlayState::GameOver), start_game_over)
            .add_systems(Update, tick_game_over.run_if(in_state(PlayState::GameOver)))
            .add_systems(OnExit(PlayState::GameOver), resume_time);
    }
}

/// Build the current level and reset its progress.
pub fn setup_level(
    mut commands: Commands,
    current: Res<CurrentLevel>,
    sprites: Res<SpriteAssets>,
    library: Res<AnimationLibrary>,
    context: Res<AppContext>,
    player_config: Res<PlayerConfig>,
    visuals: Res<VisualConfig>,
) {
    let Some(layout) = level(current.index) else {
        error!("Level {} has no layout!", current.index);
        return;
    };

    info!("Building level {}", layout.number);

    let assets = LevelAssets {
        sprites: &sprites,
        library: &library,
        context: &context,
        player_config: &player_config,
        visuals: &visuals,
    };
    let built = build_level(&mut commands, layout, &assets);
    commands.insert_resource(LevelProgress::new(built.enemies));
}

/// Clean up level entities when leaving InGame state.
fn cleanup_level(
    mut commands: Commands,
    level_query: Query<Entity, With<LevelEntity>>,
    player_query: Query<Entity, With<Player>>,
) {
    for entity in level_query.iter().chain(player_query.iter()) {
        commands.entity(entity).despawn_recursive();
    }
}
