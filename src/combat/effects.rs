//! Short-lived visual effects: particle bursts, hit rings, stun rings.
//!
//! Every effect is best-effort. When a texture is not available the
//! effect falls back to plain coloured squares, and nothing here can fail.

use std::f32::consts::TAU;
use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

/// Shape of a particle burst.
#[derive(Debug, Clone, Copy)]
pub struct BurstProfile {
    pub count: u32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub lifetime: Duration,
    pub scale_start: f32,
    pub scale_end: f32,
    /// Downward acceleration in px/s²
    pub gravity: f32,
    /// Emit only within this cone (radians) around `direction`
    pub spread: f32,
    pub direction: Vec2,
}

impl BurstProfile {
    /// Projectile impact.
    pub const HIT: BurstProfile = BurstProfile {
        count: 10,
        speed_min: 50.0,
        speed_max: 150.0,
        lifetime: Duration::from_millis(300),
        scale_start: 0.4,
        scale_end: 0.0,
        gravity: 0.0,
        spread: TAU,
        direction: Vec2::X,
    };

    /// Enemy death.
    pub const DEATH: BurstProfile = BurstProfile {
        count: 15,
        speed_min: 50.0,
        speed_max: 200.0,
        lifetime: Duration::from_millis(800),
        scale_start: 0.5,
        scale_end: 0.0,
        gravity: 0.0,
        spread: TAU,
        direction: Vec2::X,
    };

    /// Dust kicked up by a jump.
    pub const JUMP_DUST: BurstProfile = BurstProfile {
        count: 5,
        speed_min: 20.0,
        speed_max: 50.0,
        lifetime: Duration::from_millis(300),
        scale_start: 0.2,
        scale_end: 0.0,
        gravity: 300.0,
        spread: std::f32::consts::PI / 2.0,
        direction: Vec2::NEG_Y,
    };
}

/// A single particle. Moves, shrinks and fades until its lifetime ends.
#[derive(Component, Debug)]
pub struct Particle {
    pub velocity: Vec2,
    pub gravity: f32,
    pub scale_start: f32,
    pub scale_end: f32,
    lifetime: Timer,
}

impl Particle {
    pub fn new(velocity: Vec2, lifetime: Duration) -> Self {
        Self {
            velocity,
            gravity: 0.0,
            scale_start: 1.0,
            scale_end: 1.0,
            lifetime: Timer::new(lifetime, TimerMode::Once),
        }
    }

    pub fn with_scale(mut self, start: f32, end: f32) -> Self {
        self.scale_start = start;
        self.scale_end = end;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }
}

/// Side length of the untextured fallback squares.
const FALLBACK_SQUARE: f32 = 6.0;
const EFFECT_Z: f32 = 20.0;

/// Spawn a burst at `origin`. Uses `texture` when given, tinted by
/// `color`, otherwise small squares of `color`.
pub fn spawn_burst(
    commands: &mut Commands,
    origin: Vec2,
    texture: Option<Handle<Image>>,
    color: Color,
    profile: &BurstProfile,
) {
    let mut rng = rand::thread_rng();
    let base_angle = profile.direction.to_angle();
    for _ in 0..profile.count {
        let angle = base_angle + rng.gen_range(-0.5..=0.5) * profile.spread;
        let speed = rng.gen_range(profile.speed_min..=profile.speed_max);
        let particle = Particle::new(Vec2::from_angle(angle) * speed, profile.lifetime)
            .with_scale(profile.scale_start, profile.scale_end)
            .with_gravity(profile.gravity);
        commands.spawn((
            particle_sprite(texture.clone(), color),
            Transform::from_translation(origin.extend(EFFECT_Z))
                .with_scale(Vec3::splat(profile.scale_start)),
            particle,
        ));
    }
}

fn particle_sprite(texture: Option<Handle<Image>>, color: Color) -> Sprite {
    match texture {
        Some(image) => Sprite {
            image,
            color,
            ..default()
        },
        None => Sprite::from_color(color, Vec2::splat(FALLBACK_SQUARE)),
    }
}

/// Impact of a projectile: a textured burst, or a ring of eight coloured
/// squares flying outward when the projectile texture is unavailable.
pub fn spawn_hit_effect(
    commands: &mut Commands,
    origin: Vec2,
    texture: Option<Handle<Image>>,
    color: Color,
) {
    if texture.is_some() {
        spawn_burst(commands, origin, texture, color, &BurstProfile::HIT);
        return;
    }

    let lifetime = Duration::from_millis(300);
    // Each square travels 20 px over the lifetime
    let speed = 20.0 / lifetime.as_secs_f32();
    for i in 0..8 {
        let angle = i as f32 / 8.0 * TAU;
        commands.spawn((
            Sprite::from_color(color, Vec2::splat(FALLBACK_SQUARE)),
            Transform::from_translation(origin.extend(EFFECT_Z)),
            Particle::new(Vec2::from_angle(angle) * speed, lifetime).with_scale(1.0, 0.5),
        ));
    }
}

/// Muzzle flash shown when the shot sound cannot be played.
pub fn spawn_muzzle_flash(commands: &mut Commands, origin: Vec2) {
    commands.spawn((
        Sprite::from_color(Color::srgb(1.0, 1.0, 0.0), Vec2::splat(24.0)),
        Transform::from_translation(origin.extend(EFFECT_Z)).with_scale(Vec3::splat(0.5)),
        Particle::new(Vec2::ZERO, Duration::from_millis(100)).with_scale(0.5, 0.1),
    ));
}

/// Expanding ring drawn around a stunned enemy.
#[derive(Component, Debug)]
pub struct StunRing {
    pub radius: f32,
    timer: Timer,
}

impl StunRing {
    pub fn new(duration: Duration) -> Self {
        Self {
            radius: 20.0,
            timer: Timer::new(duration, TimerMode::Once),
        }
    }
}

/// Spawn a stun ring above `position`, lasting the stun.
pub fn spawn_stun_ring(commands: &mut Commands, position: Vec2, duration: Duration) {
    commands.spawn((
        Transform::from_translation((position + Vec2::new(0.0, 40.0)).extend(EFFECT_Z)),
        StunRing::new(duration),
    ));
}

pub fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut Particle, &mut Sprite)>,
) {
    let dt = time.delta_secs();
    for (entity, mut transform, mut particle, mut sprite) in query.iter_mut() {
        if particle.lifetime.tick(time.delta()).finished() {
            commands.entity(entity).despawn();
            continue;
        }

        particle.velocity.y -= particle.gravity * dt;
        transform.translation += (particle.velocity * dt).extend(0.0);

        let t = particle.lifetime.fraction();
        let scale = particle.scale_start + (particle.scale_end - particle.scale_start) * t;
        transform.scale = Vec3::splat(scale.max(0.01));
        sprite.color = sprite.color.with_alpha(1.0 - t);
    }
}

pub fn update_stun_rings(
    mut commands: Commands,
    time: Res<Time>,
    mut gizmos: Gizmos,
    mut query: Query<(Entity, &Transform, &mut StunRing)>,
) {
    for (entity, transform, mut ring) in query.iter_mut() {
        if ring.timer.tick(time.delta()).finished() {
            commands.entity(entity).despawn();
            continue;
        }
        let t = ring.timer.fraction();
        gizmos.circle_2d(
            transform.translation.truncate(),
            ring.radius * (1.0 + 0.5 * t),
            Color::srgb_u8(0x00, 0xff, 0xff).with_alpha(1.0 - t),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_texture_falls_back_to_eight_squares() {
        let mut app = App::new();
        app.add_systems(Update, |mut commands: Commands| {
            spawn_hit_effect(&mut commands, Vec2::ZERO, None, Color::WHITE);
        });
        app.update();

        let count = app
            .world_mut()
            .query::<(&Particle, &Sprite)>()
            .iter(app.world())
            .count();
        assert_eq!(count, 8);
    }

    #[test]
    fn particles_expire() {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.add_systems(Update, update_particles);
        app.world_mut().spawn((
            Sprite::default(),
            Transform::default(),
            Particle::new(Vec2::X, Duration::from_millis(100)),
        ));

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(150));
        app.update();

        let remaining = app
            .world_mut()
            .query::<&Particle>()
            .iter(app.world())
            .count();
        assert_eq!(remaining, 0);
    }
}
