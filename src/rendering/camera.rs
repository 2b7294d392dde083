//! Side-scrolling camera and parallax backgrounds.

use bevy::prelude::*;

use super::sprites::SpriteAssets;
use super::visual_config::VisualConfig;
use crate::core::SmoothTransform;
use crate::player::Player;
use crate::world::{LevelEntity, WORLD_HEIGHT, WORLD_WIDTH};

/// Visible area, matching the window.
pub const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

/// The one camera. It lives for the whole session.
#[derive(Component)]
pub struct MainCamera;

/// A background layer scrolling at a fraction of the camera's speed.
#[derive(Component, Debug, Clone, Copy)]
pub struct ParallaxLayer {
    /// On-screen speed relative to the world: 1.0 scrolls with the
    /// ground, 0.0 never moves
    pub scroll_factor: f32,
    pub anchor_x: f32,
}

impl ParallaxLayer {
    pub fn x_for_camera(&self, camera_x: f32) -> f32 {
        self.anchor_x + camera_x * (1.0 - self.scroll_factor)
    }
}

/// Where the camera should be to frame `focus`, kept inside the world.
pub fn camera_target(focus: Vec2) -> Vec2 {
    let half = VIEWPORT / 2.0;
    let max_x = (WORLD_WIDTH - half.x).max(half.x);
    let max_y = (WORLD_HEIGHT - half.y).max(half.y);
    Vec2::new(focus.x.clamp(half.x, max_x), focus.y.clamp(half.y, max_y))
}

pub fn spawn_camera(mut commands: Commands, config: Res<VisualConfig>) {
    let start = camera_target(Vec2::ZERO);
    commands.spawn((
        Name::new("Main Camera"),
        MainCamera,
        Camera2d,
        Transform::from_translation(start.extend(100.0)),
        SmoothTransform::new(config.camera_follow_speed),
    ));
}

/// Put the camera straight on the player when a level starts.
pub fn snap_camera_to_player(
    player_query: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut camera_query: Query<(&mut Transform, &mut SmoothTransform), With<MainCamera>>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let target = camera_target(player.translation.truncate());
    for (mut transform, mut smooth) in camera_query.iter_mut() {
        transform.translation = target.extend(transform.translation.z);
        smooth.target_translation = None;
    }
}

pub fn camera_follow(
    player_query: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    mut camera_query: Query<(&Transform, &mut SmoothTransform), With<MainCamera>>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let target = camera_target(player.translation.truncate());
    for (transform, mut smooth) in camera_query.iter_mut() {
        smooth.target_translation = Some(target.extend(transform.translation.z));
    }
}

/// Frame the title screen: back to the start of the world.
pub fn reset_camera(mut camera_query: Query<(&mut Transform, &mut SmoothTransform), With<MainCamera>>) {
    let start = camera_target(Vec2::ZERO);
    for (mut transform, mut smooth) in camera_query.iter_mut() {
        smooth.target_translation = None;
        transform.translation = start.extend(transform.translation.z);
    }
}

/// Spawn the far and mid background layers for a level.
pub fn spawn_parallax_layers(commands: &mut Commands, sprites: &SpriteAssets, config: &VisualConfig) {
    let layers = [
        ("bg-far", config.parallax_far, -50.0, Color::srgb(0.05, 0.04, 0.15)),
        ("bg-mid", config.parallax_mid, -40.0, Color::srgba(0.25, 0.12, 0.3, 0.6)),
    ];

    for (key, scroll_factor, z, fallback) in layers {
        // Twice the world wide so scrolling never shows an edge
        let size = Vec2::new(WORLD_WIDTH * 2.0, WORLD_HEIGHT);
        let sprite = match sprites.image(key) {
            Some(image) => Sprite {
                image,
                custom_size: Some(size),
                image_mode: SpriteImageMode::Tiled {
                    tile_x: true,
                    tile_y: false,
                    stretch_value: 1.0,
                },
                ..default()
            },
            None => Sprite::from_color(fallback, size),
        };

        let layer = ParallaxLayer {
            scroll_factor,
            anchor_x: WORLD_WIDTH / 2.0,
        };
        commands.spawn((
            Name::new(key),
            layer,
            sprite,
            Transform::from_xyz(layer.anchor_x, WORLD_HEIGHT / 2.0, z),
            LevelEntity,
        ));
    }
}

pub fn update_parallax(
    camera_query: Query<&Transform, With<MainCamera>>,
    mut layers: Query<(&ParallaxLayer, &mut Transform), Without<MainCamera>>,
) {
    let Ok(camera) = camera_query.get_single() else {
        return;
    };
    for (layer, mut transform) in layers.iter_mut() {
        transform.translation.x = layer.x_for_camera(camera.translation.x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_stays_inside_the_world() {
        assert_eq!(camera_target(Vec2::new(100.0, 120.0)), Vec2::new(640.0, 360.0));
        assert_eq!(camera_target(Vec2::new(1500.0, 500.0)), Vec2::new(1500.0, 360.0));
        assert_eq!(camera_target(Vec2::new(3100.0, 300.0)), Vec2::new(2560.0, 360.0));
    }

    #[test]
    fn far_layers_drift_slower_than_near_ones() {
        let far = ParallaxLayer {
            scroll_factor: 0.1,
            anchor_x: 0.0,
        };
        let mid = ParallaxLayer {
            scroll_factor: 0.5,
            anchor_x: 0.0,
        };
        // On-screen shift is camera movement minus layer movement
        let camera_move = 1000.0;
        let far_shift = camera_move - far.x_for_camera(camera_move);
        let mid_shift = camera_move - mid.x_for_camera(camera_move);
        assert!((far_shift - 100.0).abs() < 1e-3);
        assert!((mid_shift - 500.0).abs() < 1e-3);
    }
}
