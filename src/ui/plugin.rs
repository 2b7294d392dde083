//! UI plugin - title menu, credits, HUD and level overlays.

use bevy::prelude::*;

use super::{credits, hud, menu, overlays};
use crate::core::GameState;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);
        overlays::setup_overlay_systems(app);

        app
            // Title menu
            .add_systems(OnEnter(GameState::MainMenu), menu::setup_main_menu)
            .add_systems(
                Update,
                (menu::main_menu_input, menu::refresh_menu_labels)
                    .chain()
                    .run_if(in_state(GameState::MainMenu)),
            )
            .add_systems(OnExit(GameState::MainMenu), menu::cleanup_main_menu)
            // Credits
            .add_systems(OnEnter(GameState::Credits), credits::setup_credits)
            .add_systems(
                Update,
                (credits::credits_input, credits::twinkle_stars)
                    .run_if(in_state(GameState::Credits)),
            )
            .add_systems(OnExit(GameState::Credits), credits::cleanup_credits);
    }
}
