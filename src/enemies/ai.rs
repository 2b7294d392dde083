//! Enemy AI behavior systems.

use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;

use super::components::{AiMode, AttackCooldown, Enemy, EnemyStats, Patrol};
use super::data::{loot_for_roll, EnemyKind, HOVER_AMPLITUDE, HOVER_PERIOD_MS};
use super::status::StatusEffects;
use crate::combat::{spawn_burst, BurstProfile, DamageFlash, DamageOutcome, Dead, Health};
use crate::core::{DamageEvent, EnemyDied, EnemyDroppedPowerup};
use crate::player::Player;
use crate::rendering::SpriteAssets;

/// What an enemy wants to do this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub mode: AiMode,
    pub velocity_x: f32,
    /// None leaves vertical motion to gravity
    pub velocity_y: Option<f32>,
    /// Some(true) to face left, None to keep facing
    pub face_left: Option<bool>,
    pub attack: bool,
}

/// Decide movement and attacks from the enemy's and player's positions.
///
/// The mode is re-evaluated every call from the current distance, so an
/// enemy drops back to patrolling as soon as the player leaves range.
pub fn steer(
    stats: &EnemyStats,
    enemy: Vec2,
    player: Vec2,
    patrol_direction: f32,
    elapsed_secs: f32,
    immobilized: bool,
    attack_ready: bool,
) -> Steering {
    if immobilized {
        return Steering {
            mode: AiMode::Held,
            velocity_x: 0.0,
            velocity_y: Some(0.0),
            face_left: None,
            attack: false,
        };
    }

    let offset = player - enemy;
    let distance = offset.length();
    if distance < stats.detection_range {
        let direction = offset.normalize_or_zero();
        return Steering {
            mode: AiMode::Chase,
            velocity_x: direction.x * stats.move_speed,
            velocity_y: stats.flying.then_some(direction.y * stats.move_speed),
            face_left: Some(offset.x < 0.0),
            attack: distance < stats.attack_range && attack_ready,
        };
    }

    let hover = (elapsed_secs * 1000.0 / HOVER_PERIOD_MS).sin() * HOVER_AMPLITUDE;
    Steering {
        mode: AiMode::Patrol,
        velocity_x: stats.move_speed * patrol_direction,
        velocity_y: stats.flying.then_some(hover),
        face_left: Some(patrol_direction < 0.0),
        attack: false,
    }
}

/// Chase, patrol or attack, depending on where the player is.
pub fn enemy_behavior(
    time: Res<Time>,
    player_query: Query<(Entity, &Transform), (With<Player>, Without<Dead>, Without<Enemy>)>,
    mut enemy_query: Query<
        (
            Entity,
            &Transform,
            &EnemyStats,
            &StatusEffects,
            &Patrol,
            &mut AttackCooldown,
            &mut AiMode,
            &mut Velocity,
            &mut Sprite,
        ),
        (With<Enemy>, Without<Dead>, Without<Player>),
    >,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let Ok((player, player_transform)) = player_query.get_single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, transform, stats, status, patrol, mut cooldown, mut mode, mut velocity, mut sprite) in
        enemy_query.iter_mut()
    {
        let steering = steer(
            stats,
            transform.translation.truncate(),
            player_pos,
            patrol.direction,
            time.elapsed_secs(),
            status.is_immobilized(),
            cooldown.is_ready(),
        );

        *mode = steering.mode;
        velocity.linvel.x = steering.velocity_x;
        if let Some(vy) = steering.velocity_y {
            velocity.linvel.y = vy;
        }
        if let Some(face_left) = steering.face_left {
            sprite.flip_x = face_left;
        }

        if steering.attack {
            cooldown.start(stats.attack_cooldown);
            damage_events.send(DamageEvent {
                target: player,
                source: entity,
                amount: stats.damage,
                knockback: None,
            });
        }
    }
}

/// Advance patrol and attack timers.
pub fn tick_enemy_timers(
    time: Res<Time>,
    mut query: Query<(&mut Patrol, &mut AttackCooldown), (With<Enemy>, Without<Dead>)>,
) {
    for (mut patrol, mut cooldown) in query.iter_mut() {
        patrol.tick(time.delta());
        cooldown.tick(time.delta());
    }
}

/// Advance status effects and apply burn damage one tick at a time.
pub fn tick_status_effects(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<
        (Entity, &mut StatusEffects, &mut Health, &mut DamageFlash),
        (With<Enemy>, Without<Dead>),
    >,
) {
    for (entity, mut status, mut health, mut flash) in query.iter_mut() {
        let burn = status.tick(time.delta());
        for _ in 0..burn.ticks {
            match health.take_damage(burn.damage_per_tick) {
                DamageOutcome::Survived => flash.trigger(DamageFlash::DURATION),
                DamageOutcome::Died => {
                    status.cancel_all();
                    commands.entity(entity).insert(Dead);
                    break;
                }
                DamageOutcome::AlreadyDead => break,
            }
        }
    }
}

/// Death path: cancel timers, burst, roll loot, report and despawn.
///
/// Runs once per enemy, since the entity is gone afterwards.
pub fn handle_enemy_death(
    mut commands: Commands,
    sprites: Option<Res<SpriteAssets>>,
    mut query: Query<
        (
            Entity,
            &Transform,
            &EnemyKind,
            &EnemyStats,
            &mut StatusEffects,
            &mut Patrol,
            &mut AttackCooldown,
        ),
        (With<Enemy>, With<Dead>),
    >,
    mut died_events: EventWriter<EnemyDied>,
    mut drop_events: EventWriter<EnemyDroppedPowerup>,
) {
    for (entity, transform, kind, stats, mut status, mut patrol, mut cooldown) in query.iter_mut() {
        status.cancel_all();
        patrol.cancel();
        cooldown.cancel();

        let position = transform.translation.truncate();
        let texture = sprites
            .as_ref()
            .and_then(|sprites| sprites.image(kind.sheet_key()));
        spawn_burst(&mut commands, position, texture, stats.base_tint, &BurstProfile::DEATH);

        if let Some(drop) = loot_for_roll(rand::random::<f32>()) {
            drop_events.send(EnemyDroppedPowerup {
                position,
                kind: drop,
            });
        }

        info!("{:?} defeated at {:?}", kind, position);
        died_events.send(EnemyDied { entity, position });
        commands.entity(entity).despawn_recursive();
    }
}
