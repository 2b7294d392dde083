//! Enemies module - enemy kinds, AI, status effects, spawning and death.

mod ai;
mod animation;
mod components;
mod data;
mod plugin;
mod spawning;
mod status;

pub use ai::{steer, Steering};
pub use animation::enemy_tint;
pub use components::*;
pub use data::*;
pub use plugin::EnemyPlugin;
pub use spawning::spawn_enemy;
pub use status::*;
