//! Alien Outlaws - Entry Point
//!
//! Controls:
//! - Left/Right arrows: Run
//! - Up arrow: Jump (again in mid-air with the double jump)
//! - Shift while running: Slide
//! - Z: Shoot
//! - X: Lasso
//! - C: Switch weapon (cycle character on the title screen)
//! - M: Cycle music on the title screen
//! - Enter: Start

use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;
use bevy_rapier2d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins, pixel art friendly
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Alien Outlaws".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )

        // Physics, 100 pixels to the meter
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(100.0))

        // Audio
        .add_plugins(AudioPlugin)

        // Our game plugin
        .add_plugins(alien_outlaws::AlienOutlawsPlugin)

        .run();
}
