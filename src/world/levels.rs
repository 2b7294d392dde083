//! Static level layouts.
//!
//! Layout coordinates are the screen convention the levels were designed
//! in: origin top-left, y growing downwards. [`layout_to_world`] turns them
//! into world space (y up).

use bevy::prelude::*;

use crate::enemies::EnemyKind;

pub const WORLD_WIDTH: f32 = 3200.0;
pub const WORLD_HEIGHT: f32 = 720.0;

/// Rapier's default gravity is 981 px/s² at 100 px per metre. Actors fall
/// at 1000 px/s².
pub const GRAVITY_SCALE: f32 = 1000.0 / 981.0;

pub const FINAL_LEVEL: u32 = 4;

pub const PLAYER_SPAWN: Vec2 = Vec2::new(100.0, 600.0);
pub const GROUND_CENTER: Vec2 = Vec2::new(1600.0, 700.0);
pub const GROUND_SIZE: Vec2 = Vec2::new(WORLD_WIDTH, 32.0);
pub const PLATFORM_SIZE: Vec2 = Vec2::new(200.0, 32.0);
pub const DOOR_CENTER: Vec2 = Vec2::new(3000.0, 500.0);
pub const DOOR_SIZE: Vec2 = Vec2::new(60.0, 120.0);

pub fn layout_to_world(layout: Vec2) -> Vec2 {
    Vec2::new(layout.x, WORLD_HEIGHT - layout.y)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub position: Vec2,
}

const fn rustler(x: f32, y: f32) -> EnemySpawn {
    EnemySpawn {
        kind: EnemyKind::AlienRustler,
        position: Vec2::new(x, y),
    }
}

const fn drone(x: f32, y: f32) -> EnemySpawn {
    EnemySpawn {
        kind: EnemyKind::HoveringDrone,
        position: Vec2::new(x, y),
    }
}

/// Everything placed in one level, in layout coordinates.
#[derive(Debug)]
pub struct LevelLayout {
    pub number: u32,
    pub platforms: &'static [Vec2],
    pub enemies: &'static [EnemySpawn],
    pub double_jump: Vec2,
}

impl LevelLayout {
    /// Spread of platform heights, growing with each level.
    pub fn height_variance(&self) -> f32 {
        let count = self.platforms.len() as f32;
        if count == 0.0 {
            return 0.0;
        }
        let mean = self.platforms.iter().map(|p| p.y).sum::<f32>() / count;
        self.platforms
            .iter()
            .map(|p| (p.y - mean).powi(2))
            .sum::<f32>()
            / count
    }
}

static LEVELS: [LevelLayout; 4] = [
    // Basic introduction
    LevelLayout {
        number: 1,
        platforms: &[
            Vec2::new(400.0, 570.0),
            Vec2::new(700.0, 500.0),
            Vec2::new(1000.0, 400.0),
            Vec2::new(1300.0, 300.0),
            Vec2::new(1600.0, 400.0),
            Vec2::new(1900.0, 500.0),
            Vec2::new(2200.0, 450.0),
            Vec2::new(2500.0, 550.0),
            Vec2::new(2800.0, 500.0),
        ],
        enemies: &[
            rustler(400.0, 530.0),
            rustler(650.0, 530.0),
            drone(1200.0, 350.0),
            rustler(1600.0, 380.0),
            drone(2400.0, 450.0),
            rustler(2700.0, 480.0),
        ],
        double_jump: Vec2::new(1000.0, 360.0),
    },
    LevelLayout {
        number: 2,
        platforms: &[
            Vec2::new(300.0, 550.0),
            Vec2::new(600.0, 450.0),
            Vec2::new(900.0, 350.0),
            Vec2::new(1200.0, 250.0),
            Vec2::new(1500.0, 400.0),
            Vec2::new(1800.0, 300.0),
            Vec2::new(2100.0, 450.0),
            Vec2::new(2400.0, 200.0),
            Vec2::new(2700.0, 350.0),
            Vec2::new(3000.0, 500.0),
        ],
        enemies: &[
            rustler(300.0, 500.0),
            drone(600.0, 400.0),
            rustler(1200.0, 200.0),
            drone(1500.0, 350.0),
            rustler(1800.0, 280.0),
            drone(2300.0, 180.0),
            rustler(2700.0, 330.0),
            drone(2900.0, 470.0),
        ],
        double_jump: Vec2::new(900.0, 310.0),
    },
    // Zigzag
    LevelLayout {
        number: 3,
        platforms: &[
            Vec2::new(200.0, 600.0),
            Vec2::new(500.0, 400.0),
            Vec2::new(800.0, 600.0),
            Vec2::new(1100.0, 300.0),
            Vec2::new(1400.0, 500.0),
            Vec2::new(1700.0, 200.0),
            Vec2::new(2000.0, 400.0),
            Vec2::new(2300.0, 600.0),
            Vec2::new(2600.0, 300.0),
            Vec2::new(2900.0, 500.0),
        ],
        enemies: &[
            rustler(200.0, 550.0),
            drone(500.0, 350.0),
            rustler(800.0, 550.0),
            drone(1100.0, 250.0),
            rustler(1400.0, 450.0),
            drone(1700.0, 180.0),
            rustler(2000.0, 380.0),
            rustler(2300.0, 550.0),
            drone(2600.0, 280.0),
            rustler(2800.0, 480.0),
        ],
        double_jump: Vec2::new(500.0, 360.0),
    },
    // Extreme height changes
    LevelLayout {
        number: 4,
        platforms: &[
            Vec2::new(150.0, 650.0),
            Vec2::new(450.0, 300.0),
            Vec2::new(750.0, 550.0),
            Vec2::new(1050.0, 150.0),
            Vec2::new(1350.0, 450.0),
            Vec2::new(1650.0, 100.0),
            Vec2::new(1950.0, 350.0),
            Vec2::new(2250.0, 600.0),
            Vec2::new(2550.0, 200.0),
            Vec2::new(2850.0, 400.0),
        ],
        enemies: &[
            rustler(150.0, 550.0),
            drone(450.0, 250.0),
            rustler(750.0, 500.0),
            drone(1050.0, 100.0),
            rustler(1350.0, 400.0),
            drone(1650.0, 50.0),
            rustler(1850.0, 330.0),
            drone(2000.0, 200.0),
            rustler(2250.0, 550.0),
            drone(2550.0, 150.0),
            rustler(2750.0, 380.0),
            drone(2850.0, 300.0),
        ],
        double_jump: Vec2::new(750.0, 510.0),
    },
];

/// Layout of level `number`, counting from 1.
pub fn level(number: u32) -> Option<&'static LevelLayout> {
    LEVELS.iter().find(|layout| layout.number == number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_exists_with_growing_enemy_counts() {
        let counts: Vec<usize> = (1..=FINAL_LEVEL)
            .map(|n| level(n).map_or(0, |layout| layout.enemies.len()))
            .collect();
        assert_eq!(counts, vec![6, 8, 10, 12]);
        assert!(level(0).is_none());
        assert!(level(FINAL_LEVEL + 1).is_none());
    }

    #[test]
    fn height_variance_increases_per_level() {
        let variances: Vec<f32> = (1..=FINAL_LEVEL)
            .filter_map(level)
            .map(LevelLayout::height_variance)
            .collect();
        assert!(variances.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn layout_y_is_flipped() {
        assert_eq!(layout_to_world(PLAYER_SPAWN), Vec2::new(100.0, 120.0));
        assert_eq!(layout_to_world(Vec2::new(0.0, WORLD_HEIGHT)), Vec2::ZERO);
    }

    #[test]
    fn everything_is_inside_the_world() {
        for layout in LEVELS.iter() {
            let points = layout
                .platforms
                .iter()
                .copied()
                .chain(layout.enemies.iter().map(|e| e.position))
                .chain([layout.double_jump]);
            for point in points {
                assert!((0.0..=WORLD_WIDTH).contains(&point.x), "{:?}", point);
                assert!((0.0..=WORLD_HEIGHT).contains(&point.y), "{:?}", point);
            }
        }
    }
}
