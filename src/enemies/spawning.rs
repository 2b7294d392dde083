//! Enemy spawning.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::{AiMode, AttackCooldown, Enemy, EnemyStats, Patrol};
use super::data::EnemyKind;
use super::status::StatusEffects;
use crate::combat::{DamageFlash, Health, Hitbox};
use crate::core::AppContext;
use crate::rendering::{AnimationLibrary, SpriteAnimator, SpriteAssets};
use crate::world::{actor_collision_groups, GRAVITY_SCALE};

/// Spawn one enemy of `kind` at a world position.
///
/// Kinds without a sprite sheet are drawn as a rectangle in their tint.
pub fn spawn_enemy(
    commands: &mut Commands,
    kind: EnemyKind,
    position: Vec2,
    sprites: &SpriteAssets,
    library: &AnimationLibrary,
    context: &AppContext,
) -> Entity {
    let definition = kind.definition();
    let stats = EnemyStats::from(&definition);

    let mut animator = SpriteAnimator::default();
    let sprite = match sprites.atlas_sprite(kind.sheet_key()) {
        Some(sprite) => {
            animator.play(kind.move_animation(), library, context);
            sprite
        }
        None => Sprite::from_color(definition.base_tint, definition.size),
    };

    let gravity = if definition.flying { 0.0 } else { GRAVITY_SCALE };
    let half = definition.size / 2.0;

    commands
        .spawn((
            Name::new(format!("{:?}", kind)),
            Enemy,
            kind,
            stats,
            Health::new(definition.max_health),
            StatusEffects::default(),
            Patrol::default(),
            AttackCooldown::default(),
            AiMode::default(),
            DamageFlash::new(Color::WHITE),
            Hitbox::new(definition.size.x, definition.size.y),
            sprite,
            animator,
            Transform::from_translation(position.extend(5.0)),
        ))
        .insert((
            RigidBody::Dynamic,
            Collider::cuboid(half.x, half.y),
            LockedAxes::ROTATION_LOCKED,
            GravityScale(gravity),
            Velocity::zero(),
            Friction::coefficient(0.0),
            actor_collision_groups(),
        ))
        .id()
}
