//! Status effects on enemies: stun, freeze and burn.
//!
//! Each effect runs on its own timer. The displayed tint is derived from
//! whichever effects are still active, so one effect ending never clears
//! the colour of another that is still running.

use std::time::Duration;

use bevy::prelude::*;

/// Interval between burn damage ticks.
pub const BURN_TICK: Duration = Duration::from_millis(500);

pub const STUN_TINT: Color = Color::srgb(0.0, 1.0, 1.0);
pub const FREEZE_TINT: Color = Color::srgb(0.533, 0.8, 1.0);
pub const BURN_TINT: Color = Color::srgb(1.0, 0.267, 0.0);

#[derive(Debug, Clone)]
struct Burn {
    damage_per_tick: u32,
    ticks_left: u32,
    tick: Timer,
    remaining: Timer,
}

/// Damage a tick of the status timers produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BurnDamage {
    pub ticks: u32,
    pub damage_per_tick: u32,
}

#[derive(Component, Debug, Default)]
pub struct StatusEffects {
    stun: Option<Timer>,
    freeze: Option<Timer>,
    burn: Option<Burn>,
    /// A stun that started since the last time the ring was drawn
    fresh_stun: Option<Duration>,
}

impl StatusEffects {
    /// Re-stunning restarts the timer.
    pub fn stun(&mut self, duration: Duration) {
        self.stun = Some(Timer::new(duration, TimerMode::Once));
        self.fresh_stun = Some(duration);
    }

    /// Re-freezing restarts the timer.
    pub fn freeze(&mut self, duration: Duration) {
        self.freeze = Some(Timer::new(duration, TimerMode::Once));
    }

    /// Replaces any running burn. Deals `damage_per_tick` every 500 ms,
    /// `total / 500 ms` times, and stops burning at `total`.
    pub fn burn(&mut self, damage_per_tick: u32, total: Duration) {
        let ticks = (total.as_millis() / BURN_TICK.as_millis()) as u32;
        self.burn = Some(Burn {
            damage_per_tick,
            ticks_left: ticks,
            tick: Timer::new(BURN_TICK, TimerMode::Repeating),
            remaining: Timer::new(total, TimerMode::Once),
        });
    }

    pub fn is_stunned(&self) -> bool {
        self.stun.is_some()
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze.is_some()
    }

    pub fn is_burning(&self) -> bool {
        self.burn.is_some()
    }

    /// Stunned or frozen enemies neither move nor act.
    pub fn is_immobilized(&self) -> bool {
        self.is_stunned() || self.is_frozen()
    }

    /// Tint for the current flag set: stun over freeze over burn, `base`
    /// when nothing is active.
    pub fn tint(&self, base: Color) -> Color {
        if self.is_stunned() {
            STUN_TINT
        } else if self.is_frozen() {
            FREEZE_TINT
        } else if self.is_burning() {
            BURN_TINT
        } else {
            base
        }
    }

    /// Advance every timer. Returns the burn damage that came due; the
    /// caller applies it one tick at a time and stops at death.
    pub fn tick(&mut self, delta: Duration) -> BurnDamage {
        if let Some(timer) = self.stun.as_mut() {
            if timer.tick(delta).finished() {
                self.stun = None;
            }
        }
        if let Some(timer) = self.freeze.as_mut() {
            if timer.tick(delta).finished() {
                self.freeze = None;
            }
        }

        let mut damage = BurnDamage::default();
        if let Some(burn) = self.burn.as_mut() {
            burn.tick.tick(delta);
            let due = burn.tick.times_finished_this_tick().min(burn.ticks_left);
            burn.ticks_left -= due;
            damage = BurnDamage {
                ticks: due,
                damage_per_tick: burn.damage_per_tick,
            };
            if burn.remaining.tick(delta).finished() {
                self.burn = None;
            }
        }
        damage
    }

    /// Drop every running effect. Used on death.
    pub fn cancel_all(&mut self) {
        self.stun = None;
        self.freeze = None;
        self.burn = None;
        self.fresh_stun = None;
    }

    /// Take the duration of a stun applied since the last call.
    pub fn take_fresh_stun(&mut self) -> Option<Duration> {
        self.fresh_stun.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{DamageOutcome, Health};

    const BASE: Color = Color::WHITE;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn tint_follows_precedence() {
        let mut status = StatusEffects::default();
        assert_eq!(status.tint(BASE), BASE);

        status.burn(5, ms(3000));
        assert_eq!(status.tint(BASE), BURN_TINT);
        status.freeze(ms(1000));
        assert_eq!(status.tint(BASE), FREEZE_TINT);
        status.stun(ms(500));
        assert_eq!(status.tint(BASE), STUN_TINT);
    }

    #[test]
    fn burn_keeps_its_tint_after_freeze_expires() {
        let mut status = StatusEffects::default();
        status.burn(5, ms(3000));
        status.freeze(ms(1000));

        status.tick(ms(1000));
        assert!(!status.is_frozen());
        assert_eq!(status.tint(BASE), BURN_TINT);

        status.tick(ms(2000));
        assert_eq!(status.tint(BASE), BASE);
    }

    #[test]
    fn burn_ticks_six_times_over_three_seconds() {
        let mut status = StatusEffects::default();
        status.burn(5, ms(3000));

        let mut ticks = Vec::new();
        for step in 1..=8 {
            let damage = status.tick(ms(500));
            if damage.ticks > 0 {
                ticks.push(step * 500);
            }
        }
        assert_eq!(ticks, vec![500, 1000, 1500, 2000, 2500, 3000]);
        assert!(!status.is_burning());
    }

    #[test]
    fn reapplying_burn_replaces_the_schedule() {
        let mut status = StatusEffects::default();
        status.burn(5, ms(3000));
        status.tick(ms(2500));
        status.burn(5, ms(1000));

        let mut total = 0;
        for _ in 0..10 {
            total += status.tick(ms(500)).ticks;
        }
        assert_eq!(total, 2);
    }

    #[test]
    fn no_burn_damage_after_death() {
        let mut health = Health::new(12);
        let mut status = StatusEffects::default();
        status.burn(5, ms(3000));

        let mut hits = 0;
        for _ in 0..6 {
            let damage = status.tick(ms(500));
            for _ in 0..damage.ticks {
                hits += 1;
                if health.take_damage(damage.damage_per_tick) == DamageOutcome::Died {
                    status.cancel_all();
                    break;
                }
            }
        }
        assert_eq!(hits, 3);
        assert!(!status.is_burning());
    }

    #[test]
    fn stun_restarts_and_reports_a_ring_once() {
        let mut status = StatusEffects::default();
        status.stun(ms(500));
        status.tick(ms(400));
        status.stun(ms(500));
        status.tick(ms(400));
        assert!(status.is_immobilized());
        assert_eq!(status.take_fresh_stun(), Some(ms(500)));
        assert_eq!(status.take_fresh_stun(), None);
        status.tick(ms(100));
        assert!(!status.is_stunned());
    }
}
