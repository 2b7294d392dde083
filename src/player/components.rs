//! Player-related components.

use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;

use crate::combat::{Health, Hitbox};
use crate::core::Element;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Player tuning, loaded from `assets/data/player.ron`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: u32,
    /// Horizontal run speed in px/s
    pub run_speed: f32,
    /// Upward launch speed of a grounded jump
    pub jump_velocity: f32,
    /// Upward launch speed of the double jump
    pub double_jump_velocity: f32,
    /// How long a fresh jump press stays usable, in ms
    pub jump_window_ms: u64,
    /// Slides need at least this much horizontal speed
    pub slide_min_speed: f32,
    /// Speed multiplier when a slide starts
    pub slide_boost: f32,
    /// Slide slowdown in px/s²
    pub slide_deceleration: f32,
    pub lasso_range: f32,
    pub lasso_cooldown_ms: u64,
    /// Muzzle position relative to the player, x mirrored with facing
    pub muzzle_offset: (f32, f32),
    /// Lasso release height above the player's centre
    pub lasso_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            run_speed: 250.0,
            jump_velocity: 650.0,
            double_jump_velocity: 550.0,
            jump_window_ms: 300,
            slide_min_speed: 10.0,
            slide_boost: 1.5,
            slide_deceleration: 300.0,
            lasso_range: 200.0,
            lasso_cooldown_ms: 1000,
            muzzle_offset: (30.0, 5.0),
            lasso_height: 10.0,
        }
    }
}

impl PlayerConfig {
    pub const PATH: &'static str = "assets/data/player.ron";

    pub fn jump_window(&self) -> Duration {
        Duration::from_millis(self.jump_window_ms)
    }

    pub fn lasso_cooldown(&self) -> Duration {
        Duration::from_millis(self.lasso_cooldown_ms)
    }
}

/// Movement state of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementState {
    #[default]
    GroundedIdle,
    GroundedRun,
    Airborne,
    Sliding,
}

/// Standing and crouched (sliding) collision shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    Standing,
    Crouched,
}

impl Stance {
    pub fn hitbox(self) -> Hitbox {
        match self {
            Stance::Standing => Hitbox::new(40.0, 60.0),
            Stance::Crouched => Hitbox::new(40.0, 30.0).with_offset(Vec2::new(0.0, -15.0)),
        }
    }
}

/// A press of the jump key, usable for a short window.
///
/// Holding the key does not jump again: only a fresh press opens the
/// window, and a successful jump consumes it.
#[derive(Component, Debug, Default)]
pub struct JumpBuffer {
    age: Option<Duration>,
}

impl JumpBuffer {
    pub fn update(&mut self, just_pressed: bool, held: bool, delta: Duration, window: Duration) {
        if just_pressed {
            self.age = Some(Duration::ZERO);
            return;
        }
        self.age = match self.age {
            Some(age) if held && age + delta < window => Some(age + delta),
            _ => None,
        };
    }

    pub fn is_pending(&self) -> bool {
        self.age.is_some()
    }

    pub fn consume(&mut self) {
        self.age = None;
    }
}

/// Weapons and ammo. Plasma never runs out.
#[derive(Component, Debug, Clone, PartialEq, Eq, Default)]
pub struct Arsenal {
    current: Element,
    ammo: [u32; 4],
}

impl Arsenal {
    pub fn current(&self) -> Element {
        self.current
    }

    /// None for infinite ammo.
    pub fn ammo(&self, element: Element) -> Option<u32> {
        if element.has_infinite_ammo() {
            None
        } else {
            Some(self.ammo[element.index()])
        }
    }

    fn is_usable(&self, element: Element) -> bool {
        self.ammo(element).map_or(true, |count| count > 0)
    }

    /// Use a round of the current weapon. None when it is empty.
    pub fn shoot(&mut self) -> Option<Element> {
        if !self.is_usable(self.current) {
            return None;
        }
        if !self.current.has_infinite_ammo() {
            self.ammo[self.current.index()] -= 1;
        }
        Some(self.current)
    }

    /// Select the next weapon with ammo, in cycling order.
    ///
    /// Plasma is always usable, so this never takes more steps than there
    /// are weapons.
    pub fn switch_weapon(&mut self) -> Element {
        let start = self.current.index();
        for step in 1..Element::ALL.len() {
            let candidate = Element::ALL[(start + step) % Element::ALL.len()];
            if self.is_usable(candidate) {
                self.current = candidate;
                break;
            }
        }
        self.current
    }

    pub fn add_ammo(&mut self, element: Element, count: u32) {
        if !element.has_infinite_ammo() {
            self.ammo[element.index()] = self.ammo[element.index()].saturating_add(count);
        }
    }
}

/// Time until the lasso can be thrown again.
#[derive(Component, Debug, Default)]
pub struct LassoCooldown(Option<Timer>);

impl LassoCooldown {
    pub fn is_ready(&self) -> bool {
        self.0.is_none()
    }

    /// Start the cooldown. Returns false if it was already running.
    pub fn try_start(&mut self, duration: Duration) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.0 = Some(Timer::new(duration, TimerMode::Once));
        true
    }

    pub fn tick(&mut self, delta: Duration) {
        if let Some(timer) = self.0.as_mut() {
            if timer.tick(delta).finished() {
                self.0 = None;
            }
        }
    }
}

/// What a pickup gives.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    Health(u32),
    Ammo { element: Element, count: u32 },
    DoubleJump,
}

impl PowerupKind {
    pub fn label(self) -> String {
        match self {
            PowerupKind::Health(amount) => format!("+{} Health", amount),
            PowerupKind::Ammo { element, count } => format!("+{} {} ammo", count, element.label()),
            PowerupKind::DoubleJump => "Double Jump!".to_string(),
        }
    }
}

/// Apply a pickup to the player.
pub fn collect_powerup(
    kind: PowerupKind,
    health: &mut Health,
    arsenal: &mut Arsenal,
    motor: &mut super::movement::Motor,
) {
    match kind {
        PowerupKind::Health(amount) => {
            health.heal(amount);
        }
        PowerupKind::Ammo { element, count } => arsenal.add_ammo(element, count),
        PowerupKind::DoubleJump => motor.double_jump_this_level = true,
    }
}
