//! UI module - title menu, credits, HUD and overlays.

mod credits;
mod hud;
mod menu;
mod overlays;
mod plugin;

pub use credits::CreditsUi;
pub use hud::{HudRoot, Toast};
pub use menu::{MainMenuUi, MenuButton};
pub use overlays::{countdown_text, fade_alpha, FadeCurtain, OverlayUi};
pub use plugin::UiPlugin;
