//! Player module - the outlaw hunter: movement, weapons, damage.

mod components;
mod damage;
mod movement;
mod plugin;
mod weapons;

pub use components::*;
pub use damage::apply_player_damage;
pub use movement::{JumpKind, Motor, MovementInput, MovementStep};
pub use plugin::{spawn_player, PlayerPlugin};
