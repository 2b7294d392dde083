//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::animation;
use crate::core::GameplaySet;

/// Enemy plugin - handles enemy AI, status effects, death, and visuals.
///
/// Enemies are spawned by the level builder from the level's spawn table.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            // Timers first, so a status that just expired releases the enemy
            .add_systems(
                Update,
                (
                    ai::tick_enemy_timers,
                    ai::tick_status_effects,
                    ai::enemy_behavior,
                )
                    .chain()
                    .in_set(GameplaySet::Enemies),
            )
            // Projectile hits and burn ticks have both had their say by now
            .add_systems(Update, ai::handle_enemy_death.in_set(GameplaySet::Progress))
            .add_systems(
                Update,
                (
                    animation::spawn_stun_rings,
                    animation::tick_enemy_flashes,
                    animation::apply_enemy_tints,
                    animation::sync_enemy_animation,
                )
                    .chain()
                    .in_set(GameplaySet::Feedback),
            );
    }
}
