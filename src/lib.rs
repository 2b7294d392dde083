//! Alien Outlaws - a side-scrolling space western platformer in Bevy.
//!
//! A lone lawman clears four levels of alien rustlers and hovering
//! drones with a plasma revolver, elemental ammo and a lasso.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, shared context, tweening
//! - **Player**: Movement, jumping, sliding, weapons and damage
//! - **Combat**: Hitboxes, projectiles, the lasso, elemental effects
//! - **Enemies**: Rustler and drone AI, status effects, loot
//! - **World**: Level layouts, building, pickups and level progress
//! - **Rendering**: Sprite sheets, animation, camera and parallax
//! - **Audio**: Sound effects and background music
//! - **UI**: Title menu, HUD and overlays

pub mod audio;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod player;
pub mod rendering;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct AlienOutlawsPlugin;

impl Plugin for AlienOutlawsPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // Rendering systems
            .add_plugins(rendering::RenderingPlugin)

            // Sound effects and music
            .add_plugins(audio::GameAudioPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
