//! Enemy visual feedback: tint, stun rings and animation.

use bevy::prelude::*;

use super::components::{AiMode, Enemy, EnemyStats};
use super::data::EnemyKind;
use super::status::StatusEffects;
use crate::combat::{spawn_stun_ring, DamageFlash, Dead};
use crate::core::AppContext;
use crate::rendering::{AnimationLibrary, SpriteAnimator};

/// Colour shown for an enemy: a running damage flash wins, then the
/// status tint, then the kind's base tint.
pub fn enemy_tint(flash: &DamageFlash, status: &StatusEffects, base: Color) -> Color {
    flash.active_color().unwrap_or_else(|| status.tint(base))
}

pub fn tick_enemy_flashes(time: Res<Time>, mut query: Query<&mut DamageFlash, With<Enemy>>) {
    for mut flash in query.iter_mut() {
        flash.tick(time.delta());
    }
}

pub fn apply_enemy_tints(
    mut query: Query<(&DamageFlash, &StatusEffects, &EnemyStats, &mut Sprite), With<Enemy>>,
) {
    for (flash, status, stats, mut sprite) in query.iter_mut() {
        let tint = enemy_tint(flash, status, stats.base_tint);
        if sprite.color != tint {
            sprite.color = tint;
        }
    }
}

/// Draw an expanding ring for every stun that started this frame.
pub fn spawn_stun_rings(
    mut commands: Commands,
    mut query: Query<(&Transform, &mut StatusEffects), (With<Enemy>, Without<Dead>)>,
) {
    for (transform, mut status) in query.iter_mut() {
        if let Some(duration) = status.take_fresh_stun() {
            spawn_stun_ring(&mut commands, transform.translation.truncate(), duration);
        }
    }
}

/// Held enemies freeze on their current frame; others keep moving.
pub fn sync_enemy_animation(
    library: Res<AnimationLibrary>,
    context: Res<AppContext>,
    mut query: Query<(&EnemyKind, &AiMode, &mut SpriteAnimator), (With<Enemy>, Changed<AiMode>)>,
) {
    for (kind, mode, mut animator) in query.iter_mut() {
        match mode {
            AiMode::Held => animator.pause(),
            AiMode::Patrol | AiMode::Chase => {
                animator.play(kind.move_animation(), &library, &context);
                animator.resume();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::enemies::status::{BURN_TINT, STUN_TINT};

    #[test]
    fn flash_overrides_status_tint() {
        let mut flash = DamageFlash::new(Color::WHITE);
        let mut status = StatusEffects::default();
        let base = Color::srgb(0.0, 0.8, 1.0);

        assert_eq!(enemy_tint(&flash, &status, base), base);

        status.burn(5, Duration::from_millis(3000));
        assert_eq!(enemy_tint(&flash, &status, base), BURN_TINT);

        flash.trigger(DamageFlash::DURATION);
        assert_eq!(enemy_tint(&flash, &status, base), Color::WHITE);

        flash.tick(DamageFlash::DURATION);
        status.stun(Duration::from_millis(500));
        assert_eq!(enemy_tint(&flash, &status, base), STUN_TINT);
    }
}
