//! Player damage, death and hurt feedback.

use bevy::prelude::*;
use bevy_rapier2d::prelude::{RigidBodyDisabled, Velocity};

use super::components::Player;
use crate::combat::{DamageFlash, DamageOutcome, Dead, Health, Invulnerability};
use crate::core::{AppContext, DamageEvent, PlayerDied, PlayerHealthChanged};
use crate::rendering::{AnimationLibrary, SpriteAnimator};

/// Apply enemy hits to the player.
///
/// Each hit flashes the player red and reports the new health fraction.
/// The hit that empties the health bar marks the player dead, stops its
/// body and reports the death, once.
pub fn apply_player_damage(
    mut commands: Commands,
    library: Res<AnimationLibrary>,
    context: Res<AppContext>,
    mut events: EventReader<DamageEvent>,
    mut player_query: Query<
        (
            Entity,
            &mut Health,
            &mut Velocity,
            &mut DamageFlash,
            &mut Invulnerability,
            &mut SpriteAnimator,
        ),
        (With<Player>, Without<Dead>),
    >,
    mut health_events: EventWriter<PlayerHealthChanged>,
    mut died_events: EventWriter<PlayerDied>,
) {
    for event in events.read() {
        let Ok((entity, mut health, mut velocity, mut flash, mut invulnerability, mut animator)) =
            player_query.get_mut(event.target)
        else {
            continue;
        };

        match health.take_damage(event.amount) {
            DamageOutcome::AlreadyDead => continue,
            DamageOutcome::Survived => {
                flash.trigger(DamageFlash::DURATION);
                if let Some(knockback) = event.knockback {
                    velocity.linvel = knockback;
                }
            }
            DamageOutcome::Died => {
                info!("Player died");
                flash.clear();
                invulnerability.clear();
                velocity.linvel = Vec2::ZERO;
                let key = context.selected_character.animation("die");
                animator.play(&key, &library, &context);
                commands.entity(entity).insert((Dead, RigidBodyDisabled));
                died_events.send(PlayerDied);
            }
        }

        health_events.send(PlayerHealthChanged {
            fraction: health.percentage(),
        });
    }
}

pub fn tick_player_timers(
    time: Res<Time>,
    mut query: Query<(&mut Invulnerability, &mut DamageFlash), With<Player>>,
) {
    for (mut invulnerability, mut flash) in query.iter_mut() {
        invulnerability.tick(time.delta());
        flash.tick(time.delta());
    }
}

pub fn apply_player_tint(mut query: Query<(&DamageFlash, &mut Sprite), With<Player>>) {
    for (flash, mut sprite) in query.iter_mut() {
        let tint = flash.active_color().unwrap_or(Color::WHITE);
        if sprite.color != tint {
            sprite.color = tint;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (App, Entity) {
        let mut app = App::new();
        app.init_resource::<AnimationLibrary>()
            .init_resource::<AppContext>()
            .add_event::<DamageEvent>()
            .add_event::<PlayerHealthChanged>()
            .add_event::<PlayerDied>()
            .add_systems(Update, apply_player_damage);

        let player = app
            .world_mut()
            .spawn((
                Player,
                Health::new(20),
                Velocity::zero(),
                DamageFlash::new(Color::srgb(1.0, 0.0, 0.0)),
                Invulnerability::default(),
                SpriteAnimator::default(),
            ))
            .id();
        (app, player)
    }

    fn hit(app: &mut App, player: Entity, amount: u32) {
        app.world_mut().send_event(DamageEvent {
            target: player,
            source: player,
            amount,
            knockback: Some(Vec2::new(-200.0, 200.0)),
        });
    }

    #[test]
    fn knockback_and_flash_on_a_survivable_hit() {
        let (mut app, player) = setup();
        hit(&mut app, player, 5);
        app.update();

        let world = app.world();
        assert_eq!(world.get::<Health>(player).map(|h| h.current), Some(15));
        assert_eq!(
            world.get::<Velocity>(player).map(|v| v.linvel),
            Some(Vec2::new(-200.0, 200.0))
        );
        assert!(world
            .get::<DamageFlash>(player)
            .is_some_and(|f| f.active_color().is_some()));
    }

    #[test]
    fn player_dies_exactly_once() {
        let (mut app, player) = setup();
        hit(&mut app, player, 15);
        hit(&mut app, player, 15);
        hit(&mut app, player, 15);
        app.update();
        hit(&mut app, player, 15);
        app.update();

        let world = app.world();
        assert!(world.get::<Dead>(player).is_some());
        assert!(world.get::<RigidBodyDisabled>(player).is_some());
        assert_eq!(world.get::<Health>(player).map(|h| h.current), Some(0));

        let events = world.resource::<Events<PlayerDied>>();
        assert_eq!(events.get_cursor().read(events).count(), 1);
    }
}
