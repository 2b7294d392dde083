//! Shooting, the lasso and weapon switching.

use bevy::prelude::*;

use super::components::*;
use super::movement::Motor;
use crate::audio::SoundEffects;
use crate::combat::{spawn_muzzle_flash, Dead};
use crate::core::{PlayerLasso, PlayerShoot, WeaponChanged};

/// Fire the current weapon on Z.
pub fn player_shoot(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<PlayerConfig>,
    sounds: SoundEffects,
    mut player_query: Query<(&Transform, &Motor, &mut Arsenal), (With<Player>, Without<Dead>)>,
    mut shots: EventWriter<PlayerShoot>,
    mut weapon_events: EventWriter<WeaponChanged>,
) {
    if !keyboard.just_pressed(KeyCode::KeyZ) {
        return;
    }
    let Ok((transform, motor, mut arsenal)) = player_query.get_single_mut() else {
        return;
    };
    let Some(element) = arsenal.shoot() else {
        return;
    };

    let direction = motor.facing();
    let (offset_x, offset_y) = config.muzzle_offset;
    let origin = transform.translation.truncate() + Vec2::new(offset_x * direction, offset_y);
    shots.send(PlayerShoot {
        origin,
        direction,
        element,
    });

    if !element.has_infinite_ammo() {
        weapon_events.send(WeaponChanged {
            weapon: element,
            ammo: arsenal.ammo(element),
        });
    }

    if !sounds.play("laser-shot", 0.3) {
        spawn_muzzle_flash(&mut commands, origin);
    }
}

/// Throw the lasso on X, unless it is cooling down.
pub fn player_lasso(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<PlayerConfig>,
    mut player_query: Query<(&Transform, &Motor, &mut LassoCooldown), (With<Player>, Without<Dead>)>,
    mut throws: EventWriter<PlayerLasso>,
) {
    if !keyboard.just_pressed(KeyCode::KeyX) {
        return;
    }
    let Ok((transform, motor, mut cooldown)) = player_query.get_single_mut() else {
        return;
    };
    if !cooldown.try_start(config.lasso_cooldown()) {
        return;
    }

    throws.send(PlayerLasso {
        origin: transform.translation.truncate() + Vec2::Y * config.lasso_height,
        direction: motor.facing(),
        range: config.lasso_range,
    });
}

/// Cycle weapons on C.
pub fn player_switch_weapon(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut player_query: Query<&mut Arsenal, (With<Player>, Without<Dead>)>,
    mut weapon_events: EventWriter<WeaponChanged>,
) {
    if !keyboard.just_pressed(KeyCode::KeyC) {
        return;
    }
    let Ok(mut arsenal) = player_query.get_single_mut() else {
        return;
    };

    let weapon = arsenal.switch_weapon();
    weapon_events.send(WeaponChanged {
        weapon,
        ammo: arsenal.ammo(weapon),
    });
}

pub fn tick_lasso_cooldown(time: Res<Time>, mut query: Query<&mut LassoCooldown, With<Player>>) {
    for mut cooldown in query.iter_mut() {
        cooldown.tick(time.delta());
    }
}
