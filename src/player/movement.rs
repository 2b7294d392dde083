//! Player movement: running, jumping, double jumping and sliding.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::*;
use crate::combat::{spawn_burst, BurstProfile, Dead, Hitbox};
use crate::core::AppContext;
use crate::rendering::{AnimationLibrary, SpriteAnimator, SpriteAssets};
use crate::audio::SoundEffects;

/// Half the standing height, where the ground ray starts.
const FEET_OFFSET: f32 = 30.0;
/// How far below the feet still counts as standing on something.
const GROUND_RAY: f32 = 4.0;

/// Input relevant to one movement step.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementInput {
    pub left: bool,
    pub right: bool,
    pub slide: bool,
    /// A fresh, unconsumed jump press
    pub jump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    Ground,
    Double,
}

/// Outcome of a movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStep {
    pub velocity: Vec2,
    pub jumped: Option<JumpKind>,
    /// Set when the collision shape must change
    pub stance: Option<Stance>,
    /// Action of the animation to start, e.g. "run"
    pub animation: Option<&'static str>,
}

/// Movement state machine of the player.
#[derive(Component, Debug, Clone)]
pub struct Motor {
    pub state: MovementState,
    pub facing_right: bool,
    /// The next airborne jump is a double jump
    pub double_jump_armed: bool,
    /// Double-jump pickup collected during this level attempt. Levels
    /// spawn a fresh player, so the upgrade never carries over.
    pub double_jump_this_level: bool,
}

impl Default for Motor {
    fn default() -> Self {
        Self {
            state: MovementState::GroundedIdle,
            facing_right: true,
            double_jump_armed: false,
            double_jump_this_level: false,
        }
    }
}

impl Motor {
    pub fn facing(&self) -> f32 {
        if self.facing_right {
            1.0
        } else {
            -1.0
        }
    }

    /// Advance one frame. `velocity` is the body's current velocity,
    /// y up; the returned velocity replaces it.
    pub fn step(
        &mut self,
        input: MovementInput,
        grounded: bool,
        velocity: Vec2,
        dt: f32,
        config: &PlayerConfig,
    ) -> MovementStep {
        let mut step = MovementStep {
            velocity,
            jumped: None,
            stance: None,
            animation: None,
        };
        let v = &mut step.velocity;
        let mut sliding = self.state == MovementState::Sliding;

        if grounded {
            self.double_jump_armed = false;
        }

        // Slide entry and exit
        if !sliding && input.slide && grounded && v.x.abs() > config.slide_min_speed {
            sliding = true;
            v.x *= config.slide_boost;
            step.stance = Some(Stance::Crouched);
            step.animation = Some("slide");
        } else if sliding && (!grounded || v.x.abs() < config.slide_min_speed) {
            sliding = false;
            step.stance = Some(Stance::Standing);
        }

        if sliding {
            let decay = config.slide_deceleration * dt;
            v.x = if v.x > 0.0 {
                (v.x - decay).max(0.0)
            } else {
                (v.x + decay).min(0.0)
            };
        } else {
            if input.left {
                v.x = -config.run_speed;
                self.facing_right = false;
            } else if input.right {
                v.x = config.run_speed;
                self.facing_right = true;
            } else {
                v.x = 0.0;
            }
            if grounded {
                step.animation = Some(if v.x != 0.0 { "run" } else { "idle" });
            }
        }

        if input.jump {
            if grounded {
                v.y = config.jump_velocity;
                self.double_jump_armed = self.double_jump_this_level;
                step.jumped = Some(JumpKind::Ground);
            } else if self.double_jump_armed {
                v.y = config.double_jump_velocity;
                self.double_jump_armed = false;
                step.jumped = Some(JumpKind::Double);
            }
        }

        if step.jumped.is_some() {
            step.animation = Some("jump");
            if sliding {
                sliding = false;
                step.stance = Some(Stance::Standing);
            }
        }

        self.state = if sliding {
            MovementState::Sliding
        } else if !grounded || step.jumped.is_some() {
            MovementState::Airborne
        } else if step.velocity.x != 0.0 {
            MovementState::GroundedRun
        } else {
            MovementState::GroundedIdle
        };
        step
    }
}

/// Read the keyboard, cast a ray at the ground and run the movement state machine.
#[allow(clippy::too_many_arguments)]
pub fn player_movement(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    context: Res<AppContext>,
    library: Res<AnimationLibrary>,
    sprites: Option<Res<SpriteAssets>>,
    sounds: SoundEffects,
    rapier_context: Query<&RapierContext>,
    mut player_query: Query<
        (
            Entity,
            &Transform,
            &mut Motor,
            &mut JumpBuffer,
            &mut Velocity,
            &mut Collider,
            &mut Hitbox,
            &mut Sprite,
            &mut SpriteAnimator,
        ),
        (With<Player>, Without<Dead>),
    >,
) {
    let Ok((
        player_entity,
        transform,
        mut motor,
        mut jump,
        mut velocity,
        mut collider,
        mut hitbox,
        mut sprite,
        mut animator,
    )) = player_query.get_single_mut()
    else {
        return;
    };

    // Ground check: short ray down from the feet against level geometry
    let grounded = if let Ok(context) = rapier_context.get_single() {
        let origin = transform.translation.truncate() - Vec2::Y * (FEET_OFFSET - 1.0);
        context
            .cast_ray(
                origin,
                Vec2::NEG_Y,
                GROUND_RAY,
                true,
                QueryFilter::only_fixed().exclude_collider(player_entity),
            )
            .is_some()
    } else {
        // No physics world: treat resting bodies as grounded
        velocity.linvel.y.abs() < f32::EPSILON
    };

    jump.update(
        keyboard.just_pressed(KeyCode::ArrowUp),
        keyboard.pressed(KeyCode::ArrowUp),
        time.delta(),
        config.jump_window(),
    );

    let input = MovementInput {
        left: keyboard.pressed(KeyCode::ArrowLeft),
        right: keyboard.pressed(KeyCode::ArrowRight),
        slide: keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight),
        jump: jump.is_pending(),
    };

    let step = motor.step(input, grounded, velocity.linvel, time.delta_secs(), &config);
    velocity.linvel = step.velocity;
    sprite.flip_x = !motor.facing_right;

    if let Some(stance) = step.stance {
        *hitbox = stance.hitbox();
        *collider = stance_collider(stance);
    }

    if let Some(kind) = step.jumped {
        jump.consume();
        if !sounds.play("jump", 0.5) {
            // No sound, show dust instead
            let texture = sprites
                .as_ref()
                .and_then(|sprites| sprites.image(context.selected_character.sheet_key()));
            let feet = transform.translation.truncate() - Vec2::Y * FEET_OFFSET;
            spawn_burst(&mut commands, feet, texture, Color::WHITE, &BurstProfile::JUMP_DUST);
        }
        debug!("{:?} jump", kind);
    }

    if let Some(action) = step.animation {
        let key = context.selected_character.animation(action);
        animator.play(&key, &library, &context);
    }
}

/// Physics shape for a stance. Mirrors [`Stance::hitbox`].
pub fn stance_collider(stance: Stance) -> Collider {
    let hitbox = stance.hitbox();
    let cuboid = Collider::cuboid(hitbox.half_size.x, hitbox.half_size.y);
    if hitbox.offset == Vec2::ZERO {
        cuboid
    } else {
        Collider::compound(vec![(hitbox.offset, 0.0, cuboid)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PlayerConfig {
        PlayerConfig::default()
    }

    fn run_right() -> MovementInput {
        MovementInput {
            right: true,
            ..default()
        }
    }

    #[test]
    fn running_sets_speed_and_facing() {
        let mut motor = Motor::default();
        let step = motor.step(
            MovementInput {
                left: true,
                ..default()
            },
            true,
            Vec2::ZERO,
            0.016,
            &config(),
        );
        assert_eq!(step.velocity.x, -250.0);
        assert!(!motor.facing_right);
        assert_eq!(motor.state, MovementState::GroundedRun);
        assert_eq!(step.animation, Some("run"));
    }

    #[test]
    fn slide_needs_speed_and_ground() {
        let mut motor = Motor::default();
        let slide = MovementInput {
            slide: true,
            ..default()
        };

        let step = motor.step(slide, true, Vec2::ZERO, 0.016, &config());
        assert_eq!(motor.state, MovementState::GroundedIdle);
        assert_eq!(step.stance, None);

        let step = motor.step(slide, false, Vec2::new(250.0, 0.0), 0.016, &config());
        assert_eq!(motor.state, MovementState::Airborne);
        assert_eq!(step.stance, None);
    }

    #[test]
    fn slide_boosts_then_decays_and_ends() {
        let mut motor = Motor::default();
        let slide = MovementInput {
            slide: true,
            right: true,
            ..default()
        };

        let step = motor.step(slide, true, Vec2::new(250.0, 0.0), 0.0, &config());
        assert_eq!(motor.state, MovementState::Sliding);
        assert_eq!(step.velocity.x, 375.0);
        assert_eq!(step.stance, Some(Stance::Crouched));

        // Horizontal input is ignored while sliding
        let step = motor.step(slide, true, step.velocity, 1.0, &config());
        assert_eq!(step.velocity.x, 75.0);
        assert_eq!(motor.state, MovementState::Sliding);

        let step = motor.step(slide, true, Vec2::new(5.0, 0.0), 0.016, &config());
        assert_eq!(step.stance, Some(Stance::Standing));
        assert_eq!(motor.state, MovementState::GroundedRun);
        assert_eq!(step.velocity.x, 250.0);
    }

    #[test]
    fn leaving_the_ground_ends_a_slide() {
        let mut motor = Motor {
            state: MovementState::Sliding,
            ..default()
        };
        let step = motor.step(MovementInput::default(), false, Vec2::new(300.0, 0.0), 0.016, &config());
        assert_eq!(step.stance, Some(Stance::Standing));
        assert_eq!(motor.state, MovementState::Airborne);
    }

    #[test]
    fn jump_from_a_slide_stands_up() {
        let mut motor = Motor {
            state: MovementState::Sliding,
            ..default()
        };
        let input = MovementInput {
            slide: true,
            jump: true,
            ..default()
        };
        let step = motor.step(input, true, Vec2::new(300.0, 0.0), 0.016, &config());
        assert_eq!(step.jumped, Some(JumpKind::Ground));
        assert_eq!(step.velocity.y, 650.0);
        assert_eq!(step.stance, Some(Stance::Standing));
        assert_eq!(motor.state, MovementState::Airborne);
    }

    #[test]
    fn double_jump_requires_the_upgrade() {
        let jump = MovementInput {
            jump: true,
            ..run_right()
        };

        let mut motor = Motor::default();
        motor.step(jump, true, Vec2::ZERO, 0.016, &config());
        let step = motor.step(jump, false, Vec2::new(250.0, 300.0), 0.016, &config());
        assert_eq!(step.jumped, None);
        assert_eq!(step.velocity.y, 300.0);

        let mut motor = Motor {
            double_jump_this_level: true,
            ..default()
        };
        motor.step(jump, true, Vec2::ZERO, 0.016, &config());
        let step = motor.step(jump, false, Vec2::new(250.0, 300.0), 0.016, &config());
        assert_eq!(step.jumped, Some(JumpKind::Double));
        assert_eq!(step.velocity.y, 550.0);

        // Only once per flight
        let step = motor.step(jump, false, Vec2::new(250.0, 100.0), 0.016, &config());
        assert_eq!(step.jumped, None);
    }

    #[test]
    fn landing_disarms_the_double_jump() {
        let mut motor = Motor {
            double_jump_this_level: true,
            ..default()
        };
        let jump = MovementInput {
            jump: true,
            ..default()
        };
        motor.step(jump, true, Vec2::ZERO, 0.016, &config());
        assert!(motor.double_jump_armed);

        motor.step(MovementInput::default(), true, Vec2::ZERO, 0.016, &config());
        assert!(!motor.double_jump_armed);
        assert_eq!(motor.state, MovementState::GroundedIdle);
    }

    #[test]
    fn crouched_collider_is_lowered() {
        let hitbox = Stance::Crouched.hitbox();
        assert_eq!(hitbox.half_size, Vec2::new(20.0, 15.0));
        assert_eq!(hitbox.offset, Vec2::new(0.0, -15.0));
    }
}
