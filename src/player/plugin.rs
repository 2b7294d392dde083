//! Player plugin - movement, weapons, damage and spawning.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::*;
use super::damage;
use super::movement::{self, stance_collider, Motor};
use super::weapons;
use crate::combat::{DamageFlash, Health, Invulnerability};
use crate::core::{load_ron_or_default, AppContext, GameState, GameplaySet};
use crate::rendering::{AnimationLibrary, SpriteAnimator, SpriteAssets};
use crate::world::{actor_collision_groups, GRAVITY_SCALE};

/// Player plugin - handles player input, movement, weapons and damage.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerConfig>()
            .add_systems(OnEnter(GameState::Loading), load_player_config)
            .add_systems(
                Update,
                (
                    weapons::tick_lasso_cooldown,
                    weapons::player_switch_weapon,
                    weapons::player_shoot,
                    weapons::player_lasso,
                )
                    .chain()
                    .in_set(GameplaySet::Input),
            )
            .add_systems(Update, movement::player_movement.in_set(GameplaySet::Player))
            // Contact and attack hits are all in by now
            .add_systems(Update, damage::apply_player_damage.in_set(GameplaySet::Progress))
            .add_systems(
                Update,
                (damage::tick_player_timers, damage::apply_player_tint)
                    .chain()
                    .in_set(GameplaySet::Feedback),
            );
    }
}

fn load_player_config(mut commands: Commands) {
    commands.insert_resource(load_ron_or_default::<PlayerConfig>(PlayerConfig::PATH));
}

/// Spawn the player for a level attempt at a world position.
pub fn spawn_player(
    commands: &mut Commands,
    position: Vec2,
    config: &PlayerConfig,
    sprites: &SpriteAssets,
    library: &AnimationLibrary,
    context: &AppContext,
) -> Entity {
    let character = context.selected_character;
    let standing = Stance::Standing;

    let mut animator = SpriteAnimator::default();
    animator.play(&character.animation("idle"), library, context);
    let sprite = sprites
        .atlas_sprite(character.sheet_key())
        .unwrap_or_else(|| Sprite::from_color(Color::srgb(0.9, 0.7, 0.3), Vec2::new(40.0, 60.0)));

    commands
        .spawn((
            Name::new("Player"),
            Player,
            Motor::default(),
            JumpBuffer::default(),
            Arsenal::default(),
            LassoCooldown::default(),
            Health::new(config.max_health),
            Invulnerability::default(),
            DamageFlash::new(Color::srgb(1.0, 0.0, 0.0)),
            standing.hitbox(),
            sprite,
            animator,
            Transform::from_translation(position.extend(8.0)),
        ))
        .insert((
            RigidBody::Dynamic,
            stance_collider(standing),
            LockedAxes::ROTATION_LOCKED,
            GravityScale(GRAVITY_SCALE),
            Velocity::zero(),
            Friction::coefficient(0.0),
            Ccd::enabled(),
            actor_collision_groups(),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::SpriteSheet;

    fn spawn_at_origin(
        mut commands: Commands,
        config: Res<PlayerConfig>,
        sprites: Res<SpriteAssets>,
        library: Res<AnimationLibrary>,
        context: Res<AppContext>,
    ) {
        spawn_player(&mut commands, Vec2::ZERO, &config, &sprites, &library, &context);
    }

    /// Spawn the default character with its sheet registered but only
    /// optionally finished loading.
    fn spawned_sprite(loaded: bool) -> Sprite {
        let image = Handle::<Image>::default();
        let mut sprites = SpriteAssets::default();
        sprites.insert_sheet(
            AppContext::default().selected_character.sheet_key(),
            SpriteSheet {
                image: image.clone(),
                layout: Handle::default(),
                frame_size: UVec2::new(64, 64),
                frames: 16,
            },
        );
        if loaded {
            sprites.mark_loaded(image.id());
        }

        let mut app = App::new();
        app.init_resource::<PlayerConfig>()
            .init_resource::<AnimationLibrary>()
            .init_resource::<AppContext>()
            .insert_resource(sprites)
            .add_systems(Update, spawn_at_origin);
        app.update();

        let mut query = app.world_mut().query_filtered::<&Sprite, With<Player>>();
        query.single(app.world()).clone()
    }

    #[test]
    fn each_level_starts_without_double_jump() {
        let mut app = App::new();
        app.init_resource::<PlayerConfig>()
            .init_resource::<AnimationLibrary>()
            .init_resource::<AppContext>()
            .init_resource::<SpriteAssets>()
            .add_systems(Update, spawn_at_origin);
        app.update();

        let mut query = app.world_mut().query_filtered::<&Motor, With<Player>>();
        let motor = query.single(app.world());
        assert!(!motor.double_jump_this_level);
        assert!(!motor.double_jump_armed);
    }

    #[test]
    fn unloaded_sheet_spawns_a_placeholder() {
        let sprite = spawned_sprite(false);
        assert!(sprite.texture_atlas.is_none());
        assert_eq!(sprite.custom_size, Some(Vec2::new(40.0, 60.0)));
    }

    #[test]
    fn loaded_sheet_spawns_the_atlas() {
        let sprite = spawned_sprite(true);
        assert_eq!(sprite.texture_atlas.map(|atlas| atlas.index), Some(0));
    }
}
