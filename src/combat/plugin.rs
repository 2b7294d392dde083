//! Combat plugin - projectiles, the lasso, and damage routing.

use bevy::prelude::*;

use super::effects;
use super::systems;
use crate::core::GameplaySet;

/// Combat plugin - handles all combat systems.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Spawn what the player fired, then move it
            .add_systems(
                Update,
                (
                    systems::spawn_projectiles,
                    systems::spawn_lassos,
                    systems::move_projectiles,
                    systems::update_lassos,
                )
                    .chain()
                    .in_set(GameplaySet::Enemies),
            )
            // Overlap routing
            .add_systems(
                Update,
                (
                    systems::projectile_enemy_hits,
                    systems::projectile_platform_hits,
                    systems::expire_projectiles,
                    systems::enemy_contact_damage,
                )
                    .chain()
                    .in_set(GameplaySet::Collisions),
            )
            // Effects keep fading outside of play so none are left behind
            .add_systems(Update, (effects::update_particles, effects::update_stun_rings));
    }
}
