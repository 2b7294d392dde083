//! Powerup pickups: enemy drops and the per-level double jump.

use bevy::prelude::*;
use rand::seq::SliceRandom;

use super::builder::LevelEntity;
use crate::combat::{Dead, Health, Hitbox};
use crate::core::{
    DropKind, Element, EnemyDroppedPowerup, PlayerHealthChanged, ShowMessage, WeaponChanged,
};
use crate::player::{collect_powerup, Arsenal, Motor, Player, PowerupKind};

pub const HEALTH_PICKUP: u32 = 25;
pub const AMMO_PICKUP: u32 = 10;
const PICKUP_SIZE: f32 = 24.0;
const PICKUP_MESSAGE_SECONDS: f32 = 1.5;

/// A pickup lying in the level.
#[derive(Component, Debug, Clone, Copy)]
pub struct Powerup(pub PowerupKind);

/// What a drop turns into. Ammo goes to one of the elemental weapons.
pub fn powerup_for_drop(kind: DropKind, rng: &mut impl rand::Rng) -> PowerupKind {
    match kind {
        DropKind::Health => PowerupKind::Health(HEALTH_PICKUP),
        DropKind::Ammo => {
            let elemental: Vec<Element> = Element::ALL
                .into_iter()
                .filter(|element| !element.has_infinite_ammo())
                .collect();
            let element = elemental.choose(rng).copied().unwrap_or(Element::Electric);
            PowerupKind::Ammo {
                element,
                count: AMMO_PICKUP,
            }
        }
    }
}

fn pickup_color(kind: PowerupKind) -> Color {
    match kind {
        PowerupKind::Health(_) => Color::srgb(1.0, 0.2, 0.2),
        PowerupKind::Ammo { element, .. } => element.tint(),
        PowerupKind::DoubleJump => Color::srgb(1.0, 0.84, 0.0),
    }
}

pub fn spawn_powerup(commands: &mut Commands, kind: PowerupKind, position: Vec2) -> Entity {
    commands
        .spawn((
            Name::new(format!("Powerup {:?}", kind)),
            Powerup(kind),
            Hitbox::new(PICKUP_SIZE, PICKUP_SIZE),
            Sprite::from_color(pickup_color(kind), Vec2::splat(PICKUP_SIZE)),
            Transform::from_translation(position.extend(4.0)),
            LevelEntity,
        ))
        .id()
}

pub fn spawn_dropped_powerups(mut commands: Commands, mut drops: EventReader<EnemyDroppedPowerup>) {
    let mut rng = rand::thread_rng();
    for drop in drops.read() {
        let kind = powerup_for_drop(drop.kind, &mut rng);
        debug!("Dropped {:?} at {:?}", kind, drop.position);
        spawn_powerup(&mut commands, kind, drop.position);
    }
}

pub fn collect_powerups(
    mut commands: Commands,
    mut player_query: Query<
        (&Transform, &Hitbox, &mut Health, &mut Arsenal, &mut Motor),
        (With<Player>, Without<Dead>),
    >,
    powerups: Query<(Entity, &Transform, &Hitbox, &Powerup)>,
    mut health_events: EventWriter<PlayerHealthChanged>,
    mut weapon_events: EventWriter<WeaponChanged>,
    mut messages: EventWriter<ShowMessage>,
) {
    let Ok((transform, hitbox, mut health, mut arsenal, mut motor)) = player_query.get_single_mut()
    else {
        return;
    };
    let player_pos = transform.translation.truncate();

    for (entity, pickup_transform, pickup_box, powerup) in powerups.iter() {
        if !hitbox.overlaps(player_pos, pickup_box, pickup_transform.translation.truncate()) {
            continue;
        }

        let kind = powerup.0;
        collect_powerup(kind, &mut health, &mut arsenal, &mut motor);
        match kind {
            PowerupKind::Health(_) => {
                health_events.send(PlayerHealthChanged {
                    fraction: health.percentage(),
                });
            }
            PowerupKind::Ammo { .. } => {
                let weapon = arsenal.current();
                weapon_events.send(WeaponChanged {
                    weapon,
                    ammo: arsenal.ammo(weapon),
                });
            }
            PowerupKind::DoubleJump => {}
        }
        messages.send(ShowMessage {
            text: kind.label(),
            seconds: PICKUP_MESSAGE_SECONDS,
        });
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ammo_drops_never_give_plasma() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            match powerup_for_drop(DropKind::Ammo, &mut rng) {
                PowerupKind::Ammo { element, count } => {
                    assert_ne!(element, Element::Plasma);
                    assert_eq!(count, AMMO_PICKUP);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(
            powerup_for_drop(DropKind::Health, &mut rng),
            PowerupKind::Health(HEALTH_PICKUP)
        );
    }

    #[test]
    fn walking_over_a_pickup_collects_it_once() {
        let mut app = App::new();
        app.add_event::<PlayerHealthChanged>()
            .add_event::<WeaponChanged>()
            .add_event::<ShowMessage>()
            .add_systems(Update, collect_powerups);

        let mut health = Health::new(100);
        health.take_damage(50);
        let player = app
            .world_mut()
            .spawn((
                Player,
                Transform::default(),
                Hitbox::new(40.0, 60.0),
                health,
                Arsenal::default(),
                Motor::default(),
            ))
            .id();
        for kind in [PowerupKind::Health(HEALTH_PICKUP), PowerupKind::DoubleJump] {
            app.world_mut().spawn((
                Powerup(kind),
                Transform::from_xyz(10.0, 0.0, 0.0),
                Hitbox::new(PICKUP_SIZE, PICKUP_SIZE),
            ));
        }

        app.update();
        app.update();

        let world = app.world();
        assert_eq!(world.get::<Health>(player).map(|h| h.current), Some(75));
        assert!(world.get::<Motor>(player).is_some_and(|m| m.double_jump_this_level));
        let events = world.resource::<Events<ShowMessage>>();
        assert_eq!(events.get_cursor().read(events).count(), 2);
    }
}
