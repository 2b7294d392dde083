//! Enemy kinds and their tuning.

use std::time::Duration;

use bevy::prelude::*;

use crate::core::DropKind;

/// Every kind of alien the levels can spawn.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    AlienRustler,
    HoveringDrone,
    SpaceScorpion,
    RoboCacti,
}

/// Tuning for one enemy kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyDefinition {
    pub max_health: u32,
    pub damage: u32,
    pub move_speed: f32,
    /// Ignores gravity and bobs while patrolling. Everything else,
    /// robo-cacti included, stays on the ground.
    pub flying: bool,
    /// Colour multiplied over the sprite when no status effect shows
    pub base_tint: Color,
    pub size: Vec2,
}

/// Chase when the player is closer than this.
pub const DETECTION_RANGE: f32 = 300.0;
/// Attack when the player is closer than this.
pub const ATTACK_RANGE: f32 = 50.0;
pub const ATTACK_COOLDOWN: Duration = Duration::from_millis(1000);
/// Patrolling enemies turn around this often.
pub const PATROL_FLIP: Duration = Duration::from_millis(2000);
/// Vertical bob of a patrolling flyer, px/s.
pub const HOVER_AMPLITUDE: f32 = 50.0;
/// Period scale of the bob: vy = sin(t / 300 ms) * amplitude.
pub const HOVER_PERIOD_MS: f32 = 300.0;

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::AlienRustler,
        EnemyKind::HoveringDrone,
        EnemyKind::SpaceScorpion,
        EnemyKind::RoboCacti,
    ];

    pub fn definition(self) -> EnemyDefinition {
        match self {
            EnemyKind::AlienRustler => EnemyDefinition {
                max_health: 25,
                damage: 10,
                move_speed: 120.0,
                flying: false,
                base_tint: Color::WHITE,
                size: Vec2::new(48.0, 56.0),
            },
            EnemyKind::HoveringDrone => EnemyDefinition {
                max_health: 30,
                damage: 10,
                move_speed: 150.0,
                flying: true,
                base_tint: Color::srgb_u8(0x00, 0xcc, 0xff),
                size: Vec2::new(40.0, 32.0),
            },
            EnemyKind::SpaceScorpion => EnemyDefinition {
                max_health: 20,
                damage: 15,
                move_speed: 200.0,
                flying: false,
                base_tint: Color::srgb_u8(0xcc, 0x00, 0xff),
                size: Vec2::new(56.0, 32.0),
            },
            EnemyKind::RoboCacti => EnemyDefinition {
                max_health: 40,
                damage: 20,
                move_speed: 100.0,
                flying: false,
                base_tint: Color::srgb_u8(0x00, 0xff, 0x00),
                size: Vec2::new(40.0, 64.0),
            },
        }
    }

    /// Sprite sheet used for this kind.
    pub fn sheet_key(self) -> &'static str {
        match self {
            EnemyKind::AlienRustler => "alien-rustler",
            EnemyKind::HoveringDrone => "hovering-drone",
            EnemyKind::SpaceScorpion => "space-scorpion",
            EnemyKind::RoboCacti => "robo-cacti",
        }
    }

    /// Looping animation while moving.
    pub fn move_animation(self) -> &'static str {
        match self {
            EnemyKind::AlienRustler => "alien-run",
            EnemyKind::HoveringDrone => "drone-hover",
            EnemyKind::SpaceScorpion => "space-scorpion-walk",
            EnemyKind::RoboCacti => "robo-cacti-walk",
        }
    }
}

/// Loot for a uniform roll in [0, 1): nothing up to 0.7, ammo above,
/// health above 0.9.
pub fn loot_for_roll(roll: f32) -> Option<DropKind> {
    if roll > 0.9 {
        Some(DropKind::Health)
    } else if roll > 0.7 {
        Some(DropKind::Ammo)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuning_table_matches_the_roster() {
        let rustler = EnemyKind::AlienRustler.definition();
        assert_eq!((rustler.max_health, rustler.damage), (25, 10));
        assert!(!rustler.flying);

        let drone = EnemyKind::HoveringDrone.definition();
        assert_eq!((drone.max_health, drone.damage, drone.move_speed), (30, 10, 150.0));
        assert!(drone.flying);

        assert_eq!(EnemyKind::SpaceScorpion.definition().damage, 15);
        let cacti = EnemyKind::RoboCacti.definition();
        assert_eq!((cacti.max_health, cacti.damage, cacti.move_speed), (40, 20, 100.0));
        assert!(!cacti.flying);
    }

    #[test]
    fn loot_thresholds() {
        assert_eq!(loot_for_roll(0.0), None);
        assert_eq!(loot_for_roll(0.7), None);
        assert_eq!(loot_for_roll(0.75), Some(DropKind::Ammo));
        assert_eq!(loot_for_roll(0.9), Some(DropKind::Ammo));
        assert_eq!(loot_for_roll(0.95), Some(DropKind::Health));
    }
}
