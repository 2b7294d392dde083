//! World module - level layouts, building, progress and pickups.

mod builder;
mod levels;
mod plugin;
mod powerups;
mod progress;

pub use builder::{actor_collision_groups, platform_collision_groups, LevelEntity, Platform};
pub use levels::{
    layout_to_world, level, EnemySpawn, LevelLayout, FINAL_LEVEL, GRAVITY_SCALE, WORLD_HEIGHT,
    WORLD_WIDTH,
};
pub use plugin::{setup_level, WorldPlugin};
pub use powerups::Powerup;
pub use progress::{
    CurrentLevel, ExitDoor, GameOverCountdown, LevelCompleteTimer, LevelProgress,
    DOOR_LOCKED_MESSAGE, GAME_OVER_COUNTDOWN, LEVEL_COMPLETE_DELAY,
};
