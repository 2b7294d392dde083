//! Combat-related components and the damage capability traits.

use std::time::Duration;

use bevy::prelude::*;

// Re-export from core to avoid duplication
pub use crate::core::{DamageEvent, Element};

/// Result of applying damage to a health pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Health dropped but stayed above zero
    Survived,
    /// This hit brought health to zero
    Died,
    /// Health was already zero, nothing happened
    AlreadyDead,
}

/// Component for entities that can take damage.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Health {
    pub current: u32,
    pub maximum: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Health never goes below zero, and only the hit that reaches zero
    /// reports `Died`.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.current == 0 {
            return DamageOutcome::AlreadyDead;
        }
        self.current = self.current.saturating_sub(amount);
        if self.current == 0 {
            DamageOutcome::Died
        } else {
            DamageOutcome::Survived
        }
    }

    /// Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.maximum - self.current);
        self.current += actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum == 0 {
            return 0.0;
        }
        self.current as f32 / self.maximum as f32
    }
}

/// Anything that can be hurt.
pub trait Damageable {
    fn take_damage(&mut self, amount: u32) -> DamageOutcome;
    fn is_alive(&self) -> bool;
}

/// Can be stunned for a while.
pub trait Stunnable {
    fn stun(&mut self, duration: Duration);
}

/// Can be frozen in place for a while.
pub trait Freezable {
    fn freeze(&mut self, duration: Duration);
}

/// Can be set on fire: periodic damage for a while.
pub trait Burnable {
    fn burn(&mut self, damage_per_tick: u32, duration: Duration);
}

/// Something a projectile can hit.
///
/// Secondary effects are only applied when the target exposes the
/// matching capability. Targets that cannot be stunned, frozen or burned
/// keep the defaults and simply take the damage.
pub trait HitTarget: Damageable {
    fn as_stunnable(&mut self) -> Option<&mut dyn Stunnable> {
        None
    }

    fn as_freezable(&mut self) -> Option<&mut dyn Freezable> {
        None
    }

    fn as_burnable(&mut self) -> Option<&mut dyn Burnable> {
        None
    }
}

impl Damageable for Health {
    fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        Health::take_damage(self, amount)
    }

    fn is_alive(&self) -> bool {
        !self.is_dead()
    }
}

/// A bare health pool only takes damage.
impl HitTarget for Health {}

/// Marker component for entities that have died (prevents multiple death events).
#[derive(Component, Debug)]
pub struct Dead;

/// Temporary immunity to contact and attack damage.
#[derive(Component, Debug, Default)]
pub struct Invulnerability {
    remaining: Option<Timer>,
}

impl Invulnerability {
    pub fn grant(&mut self, duration: Duration) {
        self.remaining = Some(Timer::new(duration, TimerMode::Once));
    }

    pub fn is_active(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn tick(&mut self, delta: Duration) {
        if let Some(timer) = self.remaining.as_mut() {
            if timer.tick(delta).finished() {
                self.remaining = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.remaining = None;
    }
}

/// Short colour flash shown when an entity is hurt.
#[derive(Component, Debug)]
pub struct DamageFlash {
    pub color: Color,
    timer: Option<Timer>,
}

impl DamageFlash {
    pub const DURATION: Duration = Duration::from_millis(100);

    pub fn new(color: Color) -> Self {
        Self { color, timer: None }
    }

    pub fn trigger(&mut self, duration: Duration) {
        self.timer = Some(Timer::new(duration, TimerMode::Once));
    }

    /// The flash colour while the flash runs.
    pub fn active_color(&self) -> Option<Color> {
        self.timer.as_ref().map(|_| self.color)
    }

    pub fn tick(&mut self, delta: Duration) {
        if let Some(timer) = self.timer.as_mut() {
            if timer.tick(delta).finished() {
                self.timer = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.timer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_reports_death_once() {
        let mut health = Health::new(25);
        assert_eq!(health.take_damage(10), DamageOutcome::Survived);
        assert_eq!(health.take_damage(30), DamageOutcome::Died);
        assert_eq!(health.current, 0);
        assert_eq!(health.take_damage(10), DamageOutcome::AlreadyDead);
    }

    #[test]
    fn heal_is_capped_at_maximum() {
        let mut health = Health::new(100);
        health.take_damage(10);
        assert_eq!(health.heal(25), 10);
        assert_eq!(health.current, 100);
        assert_eq!(health.percentage(), 1.0);
    }

    #[test]
    fn bare_health_exposes_no_status_capabilities() {
        let mut health = Health::new(10);
        let target: &mut dyn HitTarget = &mut health;
        assert!(target.as_stunnable().is_none());
        assert!(target.as_freezable().is_none());
        assert!(target.as_burnable().is_none());
        assert!(target.is_alive());
    }

    #[test]
    fn invulnerability_expires() {
        let mut invulnerability = Invulnerability::default();
        invulnerability.grant(Duration::from_millis(1000));
        invulnerability.tick(Duration::from_millis(600));
        assert!(invulnerability.is_active());
        invulnerability.tick(Duration::from_millis(400));
        assert!(!invulnerability.is_active());
    }

    #[test]
    fn flash_colour_only_while_running() {
        let mut flash = DamageFlash::new(Color::WHITE);
        assert_eq!(flash.active_color(), None);
        flash.trigger(DamageFlash::DURATION);
        assert_eq!(flash.active_color(), Some(Color::WHITE));
        flash.tick(Duration::from_millis(100));
        assert_eq!(flash.active_color(), None);
    }
}
