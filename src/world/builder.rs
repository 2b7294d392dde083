//! Level construction from the static layouts.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::levels::*;
use super::powerups::spawn_powerup;
use super::progress::ExitDoor;
use crate::combat::Hitbox;
use crate::core::AppContext;
use crate::enemies::spawn_enemy;
use crate::player::{spawn_player, PlayerConfig, PowerupKind};
use crate::rendering::{spawn_parallax_layers, AnimationLibrary, SpriteAssets, VisualConfig};

/// Marker for everything that belongs to one level attempt.
#[derive(Component)]
pub struct LevelEntity;

/// Solid level geometry that stops projectiles.
#[derive(Component)]
pub struct Platform;

const PLATFORMS: Group = Group::GROUP_1;
const ACTORS: Group = Group::GROUP_2;
const WALL_THICKNESS: f32 = 32.0;
const TERRAIN_COLOR: Color = Color::srgb(0.545, 0.271, 0.075);

/// Player and enemies only collide with level geometry, never each other.
pub fn actor_collision_groups() -> CollisionGroups {
    CollisionGroups::new(ACTORS, PLATFORMS)
}

pub fn platform_collision_groups() -> CollisionGroups {
    CollisionGroups::new(PLATFORMS, ACTORS)
}

/// Shared sprites, tuning and context the builder reads.
pub struct LevelAssets<'a> {
    pub sprites: &'a SpriteAssets,
    pub library: &'a AnimationLibrary,
    pub context: &'a AppContext,
    pub player_config: &'a PlayerConfig,
    pub visuals: &'a VisualConfig,
}

/// What was built.
#[derive(Debug)]
pub struct BuiltLevel {
    pub player: Entity,
    pub enemies: u32,
}

/// Build a level from its layout.
pub fn build_level(commands: &mut Commands, layout: &LevelLayout, assets: &LevelAssets) -> BuiltLevel {
    spawn_parallax_layers(commands, assets.sprites, assets.visuals);

    // Ground across the whole width
    spawn_terrain(commands, assets.sprites, "ground", layout_to_world(GROUND_CENTER), GROUND_SIZE);
    for platform in layout.platforms {
        spawn_terrain(
            commands,
            assets.sprites,
            "platform",
            layout_to_world(*platform),
            PLATFORM_SIZE,
        );
    }
    spawn_world_bounds(commands);
    spawn_door(commands, layout_to_world(DOOR_CENTER));
    spawn_powerup(commands, PowerupKind::DoubleJump, layout_to_world(layout.double_jump));

    for spawn in layout.enemies {
        let entity = spawn_enemy(
            commands,
            spawn.kind,
            layout_to_world(spawn.position),
            assets.sprites,
            assets.library,
            assets.context,
        );
        commands.entity(entity).insert(LevelEntity);
    }

    let player = spawn_player(
        commands,
        layout_to_world(PLAYER_SPAWN),
        assets.player_config,
        assets.sprites,
        assets.library,
        assets.context,
    );

    BuiltLevel {
        player,
        enemies: layout.enemies.len() as u32,
    }
}

fn spawn_terrain(commands: &mut Commands, sprites: &SpriteAssets, key: &str, center: Vec2, size: Vec2) {
    let sprite = match sprites.image(key) {
        Some(image) => Sprite {
            image,
            custom_size: Some(size),
            ..default()
        },
        None => Sprite::from_color(TERRAIN_COLOR, size),
    };

    commands.spawn((
        Name::new(key.to_string()),
        Platform,
        Hitbox::new(size.x, size.y),
        sprite,
        Transform::from_translation(center.extend(0.0)),
        RigidBody::Fixed,
        Collider::cuboid(size.x / 2.0, size.y / 2.0),
        platform_collision_groups(),
        LevelEntity,
    ));
}

/// Centre and size of the walls left, right and above the world.
fn world_bounds() -> [(Vec2, Vec2); 3] {
    let half = WALL_THICKNESS / 2.0;
    [
        (
            Vec2::new(-half, WORLD_HEIGHT / 2.0),
            Vec2::new(WALL_THICKNESS, WORLD_HEIGHT),
        ),
        (
            Vec2::new(WORLD_WIDTH + half, WORLD_HEIGHT / 2.0),
            Vec2::new(WALL_THICKNESS, WORLD_HEIGHT),
        ),
        (
            Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT + half),
            Vec2::new(WORLD_WIDTH, WALL_THICKNESS),
        ),
    ]
}

/// Invisible walls that stop actors and projectiles alike.
fn spawn_world_bounds(commands: &mut Commands) {
    for (center, size) in world_bounds() {
        commands.spawn((
            Name::new("World Bound"),
            Platform,
            Hitbox::new(size.x, size.y),
            Transform::from_translation(center.extend(0.0)),
            RigidBody::Fixed,
            Collider::cuboid(size.x / 2.0, size.y / 2.0),
            platform_collision_groups(),
            LevelEntity,
        ));
    }
}

fn spawn_door(commands: &mut Commands, center: Vec2) {
    let wood = Color::srgb(0.545, 0.271, 0.075);
    let planks = Color::srgb(0.396, 0.263, 0.129);
    let gold = Color::srgb(1.0, 0.843, 0.0);

    commands
        .spawn((
            Name::new("Exit Door"),
            ExitDoor,
            Hitbox::new(DOOR_SIZE.x, DOOR_SIZE.y),
            // Frame
            Sprite::from_color(Color::srgb(0.45, 0.22, 0.06), DOOR_SIZE),
            Transform::from_translation(center.extend(1.0)),
            LevelEntity,
        ))
        .with_children(|door| {
            door.spawn((
                Sprite::from_color(Color::srgba(1.0, 1.0, 0.0, 0.3), Vec2::new(80.0, 140.0)),
                Transform::from_xyz(0.0, 0.0, -0.5),
            ));
            door.spawn((
                Sprite::from_color(wood, Vec2::new(50.0, 110.0)),
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));
            for i in 0..11 {
                door.spawn((
                    Sprite::from_color(planks, Vec2::new(50.0, 2.0)),
                    Transform::from_xyz(0.0, -50.0 + i as f32 * 10.0, 0.2),
                ));
            }
            door.spawn((
                Sprite::from_color(gold, Vec2::splat(10.0)),
                Transform::from_xyz(20.0, 0.0, 0.3),
            ));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_bounds_stop_projectiles() {
        let mut app = App::new();
        app.add_systems(Update, |mut commands: Commands| spawn_world_bounds(&mut commands));
        app.update();

        let mut walls = app
            .world_mut()
            .query_filtered::<(&Transform, &Hitbox), (With<Platform>, With<LevelEntity>)>();
        let walls: Vec<(Vec2, Hitbox)> = walls
            .iter(app.world())
            .map(|(transform, hitbox)| (transform.translation.truncate(), *hitbox))
            .collect();
        assert_eq!(walls.len(), 3);

        // A bullet just past each edge of the world
        let shot = Hitbox::new(16.0, 8.0);
        let escapes = [
            Vec2::new(-4.0, WORLD_HEIGHT / 2.0),
            Vec2::new(WORLD_WIDTH + 4.0, WORLD_HEIGHT / 2.0),
            Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT + 4.0),
        ];
        for position in escapes {
            assert!(
                walls
                    .iter()
                    .any(|(center, wall)| shot.overlaps(position, wall, *center)),
                "nothing stops a shot at {position}"
            );
        }
    }
}
