//! Rendering module - sprite sheets, animation playback, camera, parallax.

mod animation;
mod camera;
mod plugin;
mod sprites;
pub mod visual_config;

pub use animation::{
    AnimationClip, AnimationLibrary, ClipSpec, Registration, Resolved, SpriteAnimator,
    CLIPS, DEFAULT_ANIMATION,
};
pub use camera::{
    camera_target, snap_camera_to_player, spawn_parallax_layers, MainCamera, ParallaxLayer,
};
pub use plugin::RenderingPlugin;
pub use sprites::{SheetSpec, SpriteAssets, SpriteSheet, IMAGES, SHEETS};
pub use visual_config::VisualConfig;
