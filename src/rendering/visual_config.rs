//! Visual configuration loaded from an external RON file.
//!
//! Allows tweaking the camera and backgrounds without recompilation.

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::load_ron_or_default;

/// Visual configuration loaded from assets/data/visuals.ron.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    pub clear_color: (f32, f32, f32),
    /// Camera catch-up rate, higher is snappier
    pub camera_follow_speed: f32,
    // Parallax scroll factors
    pub parallax_far: f32,
    pub parallax_mid: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            clear_color: (0.04, 0.02, 0.1),
            camera_follow_speed: 8.0,
            parallax_far: 0.1,
            parallax_mid: 0.5,
        }
    }
}

impl VisualConfig {
    pub const PATH: &'static str = "assets/data/visuals.ron";

    pub fn clear_color(&self) -> Color {
        let (r, g, b) = self.clear_color;
        Color::srgb(r, g, b)
    }
}

/// Load the visual config and apply the clear colour.
pub fn load_visual_config(mut commands: Commands) {
    let config = load_ron_or_default::<VisualConfig>(VisualConfig::PATH);
    commands.insert_resource(ClearColor(config.clear_color()));
    commands.insert_resource(config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: VisualConfig =
            crate::core::parse_ron("visuals.ron", "(parallax_far: 0.2)").expect("valid ron");
        assert_eq!(config.parallax_far, 0.2);
        assert_eq!(config.parallax_mid, 0.5);
    }
}
