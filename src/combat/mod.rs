//! Combat module - health, damage capabilities, projectiles and the lasso.

mod components;
mod effects;
mod hitbox;
mod lasso;
mod plugin;
mod projectile;
mod systems;

pub use components::*;
pub use effects::{spawn_burst, spawn_hit_effect, spawn_muzzle_flash, spawn_stun_ring, BurstProfile};
pub use hitbox::Hitbox;
pub use lasso::{Lasso, LassoPhase};
pub use plugin::CombatPlugin;
pub use projectile::{element_profile, HitReport, Projectile, SecondaryEffect};
