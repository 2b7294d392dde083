//! Global events used for cross-system communication.
//!
//! Entities never call into the level orchestrator directly. The player
//! and enemies send these events, and the orchestrator, HUD and effect
//! systems react to them. Every queue is cleared when a level is torn down
//! so a new attempt never sees events from the previous one.

use bevy::prelude::*;

/// Elemental type of a weapon and of the projectiles it fires.
///
/// The declaration order is the weapon cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Element {
    #[default]
    Plasma,
    Electric,
    Fire,
    Ice,
}

impl Element {
    /// All elements in weapon cycling order.
    pub const ALL: [Element; 4] = [Element::Plasma, Element::Electric, Element::Fire, Element::Ice];

    /// Position of this element in the cycling order.
    pub fn index(self) -> usize {
        match self {
            Element::Plasma => 0,
            Element::Electric => 1,
            Element::Fire => 2,
            Element::Ice => 3,
        }
    }

    /// Plasma never runs out of ammo.
    pub fn has_infinite_ammo(self) -> bool {
        self == Element::Plasma
    }

    pub fn label(self) -> &'static str {
        match self {
            Element::Plasma => "Plasma",
            Element::Electric => "Electric",
            Element::Fire => "Fire",
            Element::Ice => "Ice",
        }
    }

    /// Projectile tint for this element.
    pub fn tint(self) -> Color {
        match self {
            Element::Plasma => Color::srgb_u8(0xff, 0x00, 0xff),
            Element::Electric => Color::srgb_u8(0x00, 0xff, 0xff),
            Element::Fire => Color::srgb_u8(0xff, 0x44, 0x00),
            Element::Ice => Color::srgb_u8(0x88, 0xcc, 0xff),
        }
    }
}

/// Sent when an enemy lands a hit on the player.
///
/// Projectiles apply their damage directly (they must hit at most once,
/// synchronously); enemy attacks and contact damage go through this event
/// so the player's damage handling lives in one place.
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage
    pub source: Entity,
    pub amount: u32,
    /// Velocity to apply to the target, if the hit knocks it back
    pub knockback: Option<Vec2>,
}

/// Sent when the player fires. The orchestrator spawns the projectile.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerShoot {
    /// Muzzle position in world space
    pub origin: Vec2,
    /// +1.0 to the right, -1.0 to the left
    pub direction: f32,
    pub element: Element,
}

/// Sent when the player throws the lasso.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerLasso {
    pub origin: Vec2,
    pub direction: f32,
    pub range: f32,
}

/// Sent whenever player health changes, carrying current / max.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerHealthChanged {
    pub fraction: f32,
}

/// Sent exactly once per level attempt, when the player dies.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerDied;

/// Sent exactly once per enemy, from its death path.
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyDied {
    pub entity: Entity,
    pub position: Vec2,
}

/// What a defeated enemy left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Health,
    Ammo,
}

/// Sent when an enemy's loot roll succeeds.
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyDroppedPowerup {
    pub position: Vec2,
    pub kind: DropKind,
}

/// Sent when the selected weapon or its ammo count changes.
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponChanged {
    pub weapon: Element,
    /// None for infinite ammo
    pub ammo: Option<u32>,
}

/// Request to show a transient centred message on the HUD.
#[derive(Event, Debug, Clone)]
pub struct ShowMessage {
    pub text: String,
    pub seconds: f32,
}
