//! Combat systems - projectiles, the lasso, and overlap routing.

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use super::components::*;
use super::effects::spawn_hit_effect;
use super::hitbox::Hitbox;
use super::lasso::*;
use super::projectile::{Projectile, PROJECTILE_JITTER};
use crate::core::{Ease, PlayerLasso, PlayerShoot, Tween, TweenEnd, TweenTo};
use crate::enemies::{Enemy, EnemyStats, EnemyTarget, StatusEffects};
use crate::player::Player;
use crate::rendering::SpriteAssets;
use crate::world::{LevelEntity, Platform};

/// Post-hit grace window after contact damage.
pub const CONTACT_INVULNERABILITY: Duration = Duration::from_millis(1000);
/// Knockback applied to the player on contact, away from the enemy.
pub const CONTACT_KNOCKBACK: Vec2 = Vec2::new(200.0, 200.0);

const PROJECTILE_SHEET: &str = "plasma-revolver";
const LASSO_SHEET: &str = "lasso";

fn projectile_texture(sprites: &Option<Res<SpriteAssets>>) -> Option<Handle<Image>> {
    sprites
        .as_ref()
        .and_then(|sprites| sprites.image(PROJECTILE_SHEET))
}

/// Spawn a projectile for every shot fired this frame.
pub fn spawn_projectiles(
    mut commands: Commands,
    sprites: Option<Res<SpriteAssets>>,
    mut shots: EventReader<PlayerShoot>,
) {
    let mut rng = rand::thread_rng();
    for shot in shots.read() {
        let jitter = rng.gen_range(-PROJECTILE_JITTER..=PROJECTILE_JITTER);
        let projectile = Projectile::new(shot.element).fire(shot.direction, jitter);

        let mut sprite = sprites
            .as_ref()
            .and_then(|sprites| sprites.atlas_sprite(PROJECTILE_SHEET))
            .unwrap_or_else(|| Sprite::from_color(Color::WHITE, Vec2::new(12.0, 6.0)));
        sprite.color = shot.element.tint();
        sprite.flip_x = shot.direction < 0.0;

        commands.spawn((
            Name::new("Projectile"),
            projectile,
            Hitbox::new(16.0, 8.0),
            sprite,
            Transform::from_translation(shot.origin.extend(10.0)),
            LevelEntity,
        ));
    }
}

/// Projectiles fly in a straight line, without gravity.
pub fn move_projectiles(time: Res<Time>, mut query: Query<(&Projectile, &mut Transform)>) {
    let dt = time.delta_secs();
    for (projectile, mut transform) in query.iter_mut() {
        transform.translation += (projectile.velocity * dt).extend(0.0);
    }
}

/// Remove projectiles whose lifespan ran out.
pub fn expire_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Projectile)>,
) {
    for (entity, mut projectile) in query.iter_mut() {
        if projectile.age(time.delta()) && !projectile.is_spent() {
            projectile.consume();
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Projectile ↔ enemy: each projectile damages at most one live enemy.
pub fn projectile_enemy_hits(
    mut commands: Commands,
    sprites: Option<Res<SpriteAssets>>,
    mut projectiles: Query<(Entity, &Transform, &Hitbox, &mut Projectile)>,
    mut enemies: Query<
        (Entity, &Transform, &Hitbox, &mut Health, &mut StatusEffects, &mut DamageFlash),
        (With<Enemy>, Without<Dead>, Without<Projectile>),
    >,
) {
    let texture = projectile_texture(&sprites);

    for (projectile_entity, projectile_transform, projectile_box, mut projectile) in
        projectiles.iter_mut()
    {
        if projectile.is_spent() {
            continue;
        }
        let projectile_pos = projectile_transform.translation.truncate();

        for (enemy_entity, enemy_transform, enemy_box, mut health, mut status, mut flash) in
            enemies.iter_mut()
        {
            // Killed earlier this frame, the Dead marker is not applied yet
            if health.is_dead() {
                continue;
            }
            let enemy_pos = enemy_transform.translation.truncate();
            if !projectile_box.overlaps(projectile_pos, enemy_box, enemy_pos) {
                continue;
            }

            let mut target = EnemyTarget {
                health: &mut health,
                status: &mut status,
                flash: &mut flash,
            };
            if let Some(report) = projectile.hit(&mut target) {
                if report.outcome == DamageOutcome::Died {
                    status.cancel_all();
                    commands.entity(enemy_entity).insert(Dead);
                }
                spawn_hit_effect(
                    &mut commands,
                    projectile_pos,
                    texture.clone(),
                    projectile.element.tint(),
                );
                commands.entity(projectile_entity).despawn_recursive();
            }
            break;
        }
    }
}

/// Projectile ↔ platform: the projectile bursts against the surface.
pub fn projectile_platform_hits(
    mut commands: Commands,
    sprites: Option<Res<SpriteAssets>>,
    mut projectiles: Query<(Entity, &Transform, &Hitbox, &mut Projectile)>,
    platforms: Query<(&Transform, &Hitbox), (With<Platform>, Without<Projectile>)>,
) {
    let texture = projectile_texture(&sprites);

    for (entity, transform, hitbox, mut projectile) in projectiles.iter_mut() {
        let position = transform.translation.truncate();
        let touching = platforms.iter().any(|(platform_transform, platform_box)| {
            hitbox.overlaps(position, platform_box, platform_transform.translation.truncate())
        });
        if touching && projectile.consume() {
            spawn_hit_effect(&mut commands, position, texture.clone(), projectile.element.tint());
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Player ↔ enemy contact: damage, knockback away from the enemy, and a
/// grace window during which further contact is ignored.
pub fn enemy_contact_damage(
    mut player_query: Query<
        (Entity, &Transform, &Hitbox, &mut Invulnerability),
        (With<Player>, Without<Dead>),
    >,
    enemy_query: Query<(Entity, &Transform, &Hitbox, &EnemyStats), (With<Enemy>, Without<Dead>)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let Ok((player, player_transform, player_box, mut invulnerability)) =
        player_query.get_single_mut()
    else {
        return;
    };
    if invulnerability.is_active() {
        return;
    }

    let player_pos = player_transform.translation.truncate();
    for (enemy, enemy_transform, enemy_box, stats) in enemy_query.iter() {
        let enemy_pos = enemy_transform.translation.truncate();
        if !player_box.overlaps(player_pos, enemy_box, enemy_pos) {
            continue;
        }

        let away = if player_pos.x < enemy_pos.x { -1.0 } else { 1.0 };
        invulnerability.grant(CONTACT_INVULNERABILITY);
        damage_events.send(DamageEvent {
            target: player,
            source: enemy,
            amount: stats.damage,
            knockback: Some(Vec2::new(away * CONTACT_KNOCKBACK.x, CONTACT_KNOCKBACK.y)),
        });
        break;
    }
}

/// Spawn a lasso for every throw this frame.
pub fn spawn_lassos(
    mut commands: Commands,
    sprites: Option<Res<SpriteAssets>>,
    mut throws: EventReader<PlayerLasso>,
) {
    for throw in throws.read() {
        let mut sprite = sprites
            .as_ref()
            .and_then(|sprites| sprites.atlas_sprite(LASSO_SHEET))
            .unwrap_or_else(|| Sprite::from_color(Color::srgb(0.8, 0.6, 0.3), Vec2::splat(16.0)));
        sprite.flip_x = throw.direction < 0.0;

        commands.spawn((
            Name::new("Lasso"),
            Lasso::throw(throw.origin, throw.direction, throw.range),
            sprite,
            Transform::from_translation(throw.origin.extend(12.0)),
            LevelEntity,
        ));
    }
}

/// Fly lassos out and back, catching the first live enemy in reach.
pub fn update_lassos(
    mut commands: Commands,
    time: Res<Time>,
    player_query: Query<&Transform, (With<Player>, Without<Lasso>)>,
    mut lassos: Query<(Entity, &mut Lasso, &mut Transform), (Without<Enemy>, Without<Player>)>,
    mut enemies: Query<
        (Entity, &Transform, &Health, &mut StatusEffects),
        (With<Enemy>, Without<Dead>, Without<Lasso>, Without<Player>),
    >,
) {
    let player_pos = player_query
        .get_single()
        .ok()
        .map(|transform| transform.translation.truncate());

    for (entity, mut lasso, mut transform) in lassos.iter_mut() {
        let thrower = player_pos.unwrap_or(lasso.position());
        let position = match lasso.advance(time.delta()) {
            LassoStep::Done => {
                commands.entity(entity).despawn_recursive();
                continue;
            }
            LassoStep::Missed(position) => {
                lasso.reel_in(thrower);
                position
            }
            LassoStep::Moving(position) => position,
        };
        transform.translation.x = position.x;
        transform.translation.y = position.y;

        if lasso.phase() != LassoPhase::Outbound {
            continue;
        }
        let caught = enemies.iter_mut().find(|(_, enemy_transform, health, _)| {
            !health.is_dead() && lasso.can_catch(enemy_transform.translation.truncate())
        });
        if let Some((enemy, enemy_transform, _, mut status)) = caught {
            status.stun(LASSO_STUN);
            let from = enemy_transform.translation.truncate();
            commands.entity(enemy).insert(TweenTo::new(
                Tween::new(from, pull_destination(thrower, lasso.direction), LASSO_PULL_TIME, Ease::QuadOut),
                TweenEnd::Remove,
            ));
            info!("Lasso caught {:?}", enemy);
            lasso.reel_in(thrower);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Projectile;
    use crate::core::Element;
    use crate::enemies::{EnemyKind, Patrol};

    fn spawn_rustler(app: &mut App, x: f32) -> Entity {
        let definition = EnemyKind::AlienRustler.definition();
        app.world_mut()
            .spawn((
                Enemy,
                EnemyStats::from(&definition),
                Health::new(definition.max_health),
                StatusEffects::default(),
                Patrol::default(),
                DamageFlash::new(Color::WHITE),
                Hitbox::new(48.0, 56.0),
                Transform::from_xyz(x, 100.0, 0.0),
            ))
            .id()
    }

    #[test]
    fn projectile_over_two_enemies_damages_exactly_one() {
        let mut app = App::new();
        app.add_systems(Update, projectile_enemy_hits);

        let first = spawn_rustler(&mut app, 100.0);
        let second = spawn_rustler(&mut app, 110.0);
        let projectile = app
            .world_mut()
            .spawn((
                Projectile::new(Element::Plasma).fire(1.0, 0.0),
                Hitbox::new(16.0, 8.0),
                Transform::from_xyz(105.0, 100.0, 0.0),
            ))
            .id();

        app.update();

        let total: u32 = [first, second]
            .iter()
            .map(|entity| app.world().get::<Health>(*entity).map_or(0, |h| h.current))
            .sum();
        assert_eq!(total, 25 + 15);
        assert!(!app.world().entities().contains(projectile));
    }

    #[test]
    fn dead_enemies_are_skipped() {
        let mut app = App::new();
        app.add_systems(Update, projectile_enemy_hits);

        let dead = spawn_rustler(&mut app, 100.0);
        app.world_mut().entity_mut(dead).insert(Dead);
        let projectile = app
            .world_mut()
            .spawn((
                Projectile::new(Element::Plasma),
                Hitbox::new(16.0, 8.0),
                Transform::from_xyz(100.0, 100.0, 0.0),
            ))
            .id();

        app.update();

        assert_eq!(app.world().get::<Health>(dead).map(|h| h.current), Some(25));
        assert!(app.world().entities().contains(projectile));
    }

    #[test]
    fn contact_damage_respects_the_grace_window() {
        let mut app = App::new();
        app.add_event::<DamageEvent>()
            .add_systems(Update, enemy_contact_damage);

        spawn_rustler(&mut app, 120.0);
        let player = app
            .world_mut()
            .spawn((
                Player,
                Hitbox::new(40.0, 60.0),
                Invulnerability::default(),
                Transform::from_xyz(100.0, 100.0, 0.0),
            ))
            .id();

        app.update();
        app.update();

        let events = app.world().resource::<Events<DamageEvent>>();
        let mut cursor = events.get_cursor();
        let hits: Vec<_> = cursor.read(events).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, player);
        assert_eq!(hits[0].amount, 10);
        assert_eq!(hits[0].knockback, Some(Vec2::new(-200.0, 200.0)));
        assert!(app
            .world()
            .get::<Invulnerability>(player)
            .is_some_and(|i| i.is_active()));
    }
}
