//! The lasso: a thrown rope that stuns and reels in one enemy.

use std::time::Duration;

use bevy::prelude::*;

use crate::core::{Ease, Tween};

/// Outbound flight time to full range.
pub const LASSO_FLIGHT: Duration = Duration::from_millis(500);
/// Flight time back to the thrower.
pub const LASSO_RETURN: Duration = Duration::from_millis(300);
/// Enemies closer than this to the lasso are caught.
pub const LASSO_CATCH_RADIUS: f32 = 50.0;
pub const LASSO_STUN: Duration = Duration::from_millis(2000);
/// A caught enemy is dragged to this distance in front of the player.
pub const LASSO_PULL_DISTANCE: f32 = 100.0;
pub const LASSO_PULL_TIME: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LassoPhase {
    /// Flying out, can still catch something
    Outbound,
    /// Coming back, harmless
    Returning,
}

/// Where the lasso is after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LassoStep {
    Moving(Vec2),
    /// Reached the end of the outbound flight without catching anything
    Missed(Vec2),
    /// Back at the thrower, remove it
    Done,
}

#[derive(Component, Debug, Clone)]
pub struct Lasso {
    pub direction: f32,
    phase: LassoPhase,
    flight: Tween,
}

impl Lasso {
    pub fn throw(origin: Vec2, direction: f32, range: f32) -> Self {
        let target = origin + Vec2::X * direction.signum() * range;
        Self {
            direction: direction.signum(),
            phase: LassoPhase::Outbound,
            flight: Tween::new(origin, target, LASSO_FLIGHT, Ease::QuadOut),
        }
    }

    pub fn phase(&self) -> LassoPhase {
        self.phase
    }

    pub fn position(&self) -> Vec2 {
        self.flight.sample()
    }

    /// Turn around and fly back to `thrower`. Ignored if already returning.
    pub fn reel_in(&mut self, thrower: Vec2) {
        if self.phase == LassoPhase::Returning {
            return;
        }
        self.phase = LassoPhase::Returning;
        self.flight = Tween::new(self.position(), thrower, LASSO_RETURN, Ease::Linear);
    }

    pub fn advance(&mut self, delta: Duration) -> LassoStep {
        let finished = self.flight.tick(delta);
        let position = self.flight.sample();
        match (self.phase, finished) {
            (LassoPhase::Outbound, true) => LassoStep::Missed(position),
            (LassoPhase::Returning, true) => LassoStep::Done,
            _ => LassoStep::Moving(position),
        }
    }

    /// Whether an enemy at `position` is within catching distance.
    pub fn can_catch(&self, position: Vec2) -> bool {
        self.phase == LassoPhase::Outbound
            && self.position().distance(position) < LASSO_CATCH_RADIUS
    }
}

/// Where a caught enemy ends up relative to the player.
pub fn pull_destination(player: Vec2, direction: f32) -> Vec2 {
    player + Vec2::X * direction.signum() * LASSO_PULL_DISTANCE
}
