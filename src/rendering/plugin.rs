//! Rendering plugin - sprite sheets, animation, camera and backgrounds.

use bevy::prelude::*;

use super::animation::*;
use super::camera::*;
use super::sprites::*;
use super::visual_config::*;
use crate::core::GameState;

/// Rendering plugin - loads sheets, validates clips and drives the camera.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VisualConfig>()
            .init_resource::<AnimationLibrary>()
            // Camera reads the config, so load it before anything spawns
            .add_systems(PreStartup, load_visual_config)
            .add_systems(Startup, spawn_camera)
            .add_systems(
                OnEnter(GameState::Loading),
                (load_sprite_assets, register_animations).chain(),
            )
            .add_systems(OnEnter(GameState::MainMenu), reset_camera)
            .add_systems(
                Update,
                (report_failed_images, track_loaded_images, animate_sprites).chain(),
            )
            .add_systems(
                Update,
                (camera_follow, update_parallax)
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            );
    }
}
