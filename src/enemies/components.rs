//! Enemy-related components.

use std::time::Duration;

use bevy::prelude::*;

use super::data::{EnemyDefinition, ATTACK_COOLDOWN, ATTACK_RANGE, DETECTION_RANGE, PATROL_FLIP};
use super::status::StatusEffects;
use crate::combat::{
    Burnable, DamageFlash, DamageOutcome, Damageable, Freezable, Health, HitTarget, Stunnable,
};

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// What the enemy did on its last update.
#[derive(Component, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum AiMode {
    /// Walking back and forth, player out of range.
    #[default]
    Patrol,
    /// Moving toward the player.
    Chase,
    /// Stunned or frozen, not acting.
    Held,
}

/// Enemy stats, copied from the kind's definition at spawn.
#[derive(Component, Clone, Debug)]
pub struct EnemyStats {
    pub damage: u32,
    pub move_speed: f32,
    pub flying: bool,
    pub base_tint: Color,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: Duration,
}

impl From<&EnemyDefinition> for EnemyStats {
    fn from(definition: &EnemyDefinition) -> Self {
        Self {
            damage: definition.damage,
            move_speed: definition.move_speed,
            flying: definition.flying,
            base_tint: definition.base_tint,
            detection_range: DETECTION_RANGE,
            attack_range: ATTACK_RANGE,
            attack_cooldown: ATTACK_COOLDOWN,
        }
    }
}

/// Patrol direction, flipped on a repeating timer.
#[derive(Component, Debug)]
pub struct Patrol {
    pub direction: f32,
    flip: Option<Timer>,
}

impl Default for Patrol {
    fn default() -> Self {
        Self {
            direction: 1.0,
            flip: Some(Timer::new(PATROL_FLIP, TimerMode::Repeating)),
        }
    }
}

impl Patrol {
    /// Returns true if the direction flipped during this tick.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(timer) = self.flip.as_mut() else {
            return false;
        };
        timer.tick(delta);
        let flips = timer.times_finished_this_tick();
        if flips % 2 == 1 {
            self.direction = -self.direction;
        }
        flips > 0
    }

    pub fn cancel(&mut self) {
        self.flip = None;
    }
}

/// Time until the enemy may attack again.
#[derive(Component, Debug, Default)]
pub struct AttackCooldown(Option<Timer>);

impl AttackCooldown {
    pub fn is_ready(&self) -> bool {
        self.0.is_none()
    }

    pub fn start(&mut self, duration: Duration) {
        self.0 = Some(Timer::new(duration, TimerMode::Once));
    }

    pub fn tick(&mut self, delta: Duration) {
        if let Some(timer) = self.0.as_mut() {
            if timer.tick(delta).finished() {
                self.0 = None;
            }
        }
    }

    pub fn cancel(&mut self) {
        self.0 = None;
    }
}

/// Mutable view of a live enemy, as seen by a projectile.
pub struct EnemyTarget<'a> {
    pub health: &'a mut Health,
    pub status: &'a mut StatusEffects,
    pub flash: &'a mut DamageFlash,
}

impl Damageable for EnemyTarget<'_> {
    fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        let outcome = self.health.take_damage(amount);
        if outcome != DamageOutcome::AlreadyDead {
            self.flash.trigger(DamageFlash::DURATION);
        }
        outcome
    }

    fn is_alive(&self) -> bool {
        !self.health.is_dead()
    }
}

impl Stunnable for EnemyTarget<'_> {
    fn stun(&mut self, duration: Duration) {
        self.status.stun(duration);
    }
}

impl Freezable for EnemyTarget<'_> {
    fn freeze(&mut self, duration: Duration) {
        self.status.freeze(duration);
    }
}

impl Burnable for EnemyTarget<'_> {
    fn burn(&mut self, damage_per_tick: u32, duration: Duration) {
        self.status.burn(damage_per_tick, duration);
    }
}

impl HitTarget for EnemyTarget<'_> {
    fn as_stunnable(&mut self) -> Option<&mut dyn Stunnable> {
        Some(self)
    }

    fn as_freezable(&mut self) -> Option<&mut dyn Freezable> {
        Some(self)
    }

    fn as_burnable(&mut self) -> Option<&mut dyn Burnable> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Projectile;
    use crate::core::Element;
    use crate::enemies::EnemyKind;

    #[test]
    fn patrol_flips_every_two_seconds() {
        let mut patrol = Patrol::default();
        assert!(!patrol.tick(Duration::from_millis(1999)));
        assert!(patrol.tick(Duration::from_millis(1)));
        assert_eq!(patrol.direction, -1.0);

        patrol.cancel();
        assert!(!patrol.tick(Duration::from_secs(10)));
        assert_eq!(patrol.direction, -1.0);
    }

    #[test]
    fn rustler_dies_on_the_third_plasma_hit() {
        let definition = EnemyKind::AlienRustler.definition();
        let mut health = Health::new(definition.max_health);
        let mut status = StatusEffects::default();
        let mut flash = DamageFlash::new(Color::WHITE);

        let mut outcomes = Vec::new();
        for _ in 0..3 {
            let mut target = EnemyTarget {
                health: &mut health,
                status: &mut status,
                flash: &mut flash,
            };
            let report = Projectile::new(Element::Plasma)
                .hit(&mut target)
                .expect("fresh projectile connects");
            outcomes.push((report.outcome, health.current));
        }
        assert_eq!(
            outcomes,
            vec![
                (DamageOutcome::Survived, 15),
                (DamageOutcome::Survived, 5),
                (DamageOutcome::Died, 0),
            ]
        );
    }

    #[test]
    fn fire_projectile_sets_the_enemy_alight() {
        let mut health = Health::new(25);
        let mut status = StatusEffects::default();
        let mut flash = DamageFlash::new(Color::WHITE);
        let mut target = EnemyTarget {
            health: &mut health,
            status: &mut status,
            flash: &mut flash,
        };
        Projectile::new(Element::Fire).hit(&mut target);
        assert!(status.is_burning());
        assert_eq!(health.current, 20);
        assert!(flash.active_color().is_some());
    }
}
