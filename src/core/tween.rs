//! Transform interpolation: smoothed following and timed tweens.

use std::time::Duration;

use bevy::prelude::*;

/// Component for smooth transform following (used by the camera).
#[derive(Component)]
pub struct SmoothTransform {
    /// Target translation (None = don't animate)
    pub target_translation: Option<Vec3>,
    /// Interpolation speed multiplier (higher = faster)
    pub translation_speed: f32,
}

impl Default for SmoothTransform {
    fn default() -> Self {
        Self {
            target_translation: None,
            translation_speed: 12.0,
        }
    }
}

impl SmoothTransform {
    pub fn new(translation_speed: f32) -> Self {
        Self {
            translation_speed,
            ..default()
        }
    }
}

/// System that interpolates transforms toward their targets.
pub fn update_smooth_transforms(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &SmoothTransform)>,
) {
    let dt = time.delta_secs();

    for (mut transform, smooth) in query.iter_mut() {
        if let Some(target) = smooth.target_translation {
            let t = (smooth.translation_speed * dt).min(1.0);
            transform.translation = transform.translation.lerp(target, t);
        }
    }
}

/// Easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    /// Quadratic ease-out: fast start, gentle arrival
    QuadOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// A timed interpolation between two points.
#[derive(Debug, Clone)]
pub struct Tween {
    pub from: Vec2,
    pub to: Vec2,
    pub ease: Ease,
    timer: Timer,
}

impl Tween {
    pub fn new(from: Vec2, to: Vec2, duration: Duration, ease: Ease) -> Self {
        Self {
            from,
            to,
            ease,
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    /// Advance the tween. Returns true once it has reached its end.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.timer.tick(delta);
        self.timer.finished()
    }

    /// Current interpolated position.
    pub fn sample(&self) -> Vec2 {
        self.from.lerp(self.to, self.ease.apply(self.timer.fraction()))
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self) -> f32 {
        self.timer.fraction()
    }

    pub fn finished(&self) -> bool {
        self.timer.finished()
    }
}

/// What happens to an entity when its [`TweenTo`] ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenEnd {
    /// Remove the tween component, keep the entity
    Remove,
    /// Despawn the entity
    Despawn,
}

/// Moves an entity's translation along a tween, keeping its z.
#[derive(Component, Debug, Clone)]
pub struct TweenTo {
    pub tween: Tween,
    pub on_end: TweenEnd,
}

impl TweenTo {
    pub fn new(tween: Tween, on_end: TweenEnd) -> Self {
        Self { tween, on_end }
    }
}

/// System that drives [`TweenTo`] components.
pub fn update_tweens(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut TweenTo)>,
) {
    for (entity, mut transform, mut tween_to) in query.iter_mut() {
        let done = tween_to.tween.tick(time.delta());
        let position = tween_to.tween.sample();
        transform.translation.x = position.x;
        transform.translation.y = position.y;

        if done {
            match tween_to.on_end {
                TweenEnd::Remove => {
                    commands.entity(entity).remove::<TweenTo>();
                }
                TweenEnd::Despawn => {
                    commands.entity(entity).despawn_recursive();
                }
            }
        }
    }
}
