//! Elemental projectiles fired by the player.

use std::time::Duration;

use bevy::prelude::*;

use super::components::{DamageOutcome, HitTarget};
use crate::core::Element;

/// Horizontal speed in px/s.
pub const PROJECTILE_SPEED: f32 = 500.0;
/// Projectiles that hit nothing disappear after this long.
pub const PROJECTILE_LIFESPAN: Duration = Duration::from_millis(2000);
/// Maximum vertical spread in px/s, either way.
pub const PROJECTILE_JITTER: f32 = 30.0;

/// What a projectile does on top of its damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryEffect {
    None,
    Stun(Duration),
    Burn {
        damage_per_tick: u32,
        duration: Duration,
    },
    Freeze(Duration),
}

/// Damage and secondary effect of an element.
pub fn element_profile(element: Element) -> (u32, SecondaryEffect) {
    match element {
        Element::Plasma => (10, SecondaryEffect::None),
        Element::Electric => (8, SecondaryEffect::Stun(Duration::from_millis(500))),
        Element::Fire => (
            5,
            SecondaryEffect::Burn {
                damage_per_tick: 5,
                duration: Duration::from_millis(3000),
            },
        ),
        Element::Ice => (7, SecondaryEffect::Freeze(Duration::from_millis(1000))),
    }
}

/// What happened when a projectile connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitReport {
    pub outcome: DamageOutcome,
    /// The secondary effect, if the target accepted it
    pub applied: Option<SecondaryEffect>,
}

#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub element: Element,
    pub damage: u32,
    pub effect: SecondaryEffect,
    pub velocity: Vec2,
    lifespan: Timer,
    spent: bool,
}

impl Projectile {
    pub fn new(element: Element) -> Self {
        let (damage, effect) = element_profile(element);
        Self {
            element,
            damage,
            effect,
            velocity: Vec2::ZERO,
            lifespan: Timer::new(PROJECTILE_LIFESPAN, TimerMode::Once),
            spent: false,
        }
    }

    /// Launch along `direction` (+1 right, -1 left) with a vertical
    /// `jitter` that is clamped to the allowed spread.
    pub fn fire(mut self, direction: f32, jitter: f32) -> Self {
        self.velocity = Vec2::new(
            direction.signum() * PROJECTILE_SPEED,
            jitter.clamp(-PROJECTILE_JITTER, PROJECTILE_JITTER),
        );
        self
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Apply damage and the elemental effect to `target`.
    ///
    /// A projectile connects at most once: after the first hit every later
    /// call returns `None` and leaves the target alone.
    pub fn hit(&mut self, target: &mut dyn HitTarget) -> Option<HitReport> {
        if self.spent {
            return None;
        }
        self.spent = true;

        let outcome = target.take_damage(self.damage);
        if outcome == DamageOutcome::AlreadyDead {
            return Some(HitReport {
                outcome,
                applied: None,
            });
        }

        let applied = match self.effect {
            SecondaryEffect::None => None,
            SecondaryEffect::Stun(duration) => target.as_stunnable().map(|t| t.stun(duration)),
            SecondaryEffect::Burn {
                damage_per_tick,
                duration,
            } => target
                .as_burnable()
                .map(|t| t.burn(damage_per_tick, duration)),
            SecondaryEffect::Freeze(duration) => {
                target.as_freezable().map(|t| t.freeze(duration))
            }
        }
        .map(|_| self.effect);

        Some(HitReport { outcome, applied })
    }

    /// Hitting a platform uses the projectile up. Returns false if it was
    /// already spent.
    pub fn consume(&mut self) -> bool {
        !std::mem::replace(&mut self.spent, true)
    }

    /// Advance the lifespan. Returns true once the projectile has expired.
    pub fn age(&mut self, delta: Duration) -> bool {
        self.lifespan.tick(delta).finished()
    }
}
