//! In-game HUD - health, weapon, level progress and the message toast.

use bevy::prelude::*;

use crate::combat::Health;
use crate::core::{Element, GameState, PlayerHealthChanged, ShowMessage, WeaponChanged};
use crate::player::{Arsenal, Player};
use crate::world::{CurrentLevel, LevelProgress};

/// Marker for HUD root entities.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

#[derive(Component)]
pub struct WeaponLabel;

#[derive(Component)]
pub struct LevelLabel;

#[derive(Component)]
pub struct EnemyCounter;

/// The single centred message. A new message replaces the old one.
#[derive(Component, Default)]
pub struct Toast {
    timer: Option<Timer>,
}

impl Toast {
    pub fn show(&mut self, seconds: f32) {
        self.timer = Some(Timer::from_seconds(seconds, TimerMode::Once));
    }

    /// Returns true when the message just expired.
    pub fn tick(&mut self, delta: std::time::Duration) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if timer.tick(delta).finished() {
            self.timer = None;
            return true;
        }
        false
    }

    pub fn is_showing(&self) -> bool {
        self.timer.is_some()
    }
}

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (
                update_health_bar,
                update_weapon_label,
                update_level_labels,
                update_toast,
            )
                .run_if(in_state(GameState::InGame)),
        );
}

fn weapon_text(weapon: Element, ammo: Option<u32>) -> String {
    match ammo {
        Some(count) => format!("Weapon: {} ({})", weapon.label(), count),
        None => format!("Weapon: {} (inf)", weapon.label()),
    }
}

fn label(text: String, size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands, current: Res<CurrentLevel>, progress: Res<LevelProgress>) {
    // Top-left: health and weapon
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(16.0),
                left: Val::Px(16.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            spawn_bar(parent, "Health", Color::srgb(0.8, 0.2, 0.2), HealthBar);
            parent.spawn((
                label(
                    weapon_text(Element::Plasma, None),
                    18.0,
                    Color::srgb(0.0, 1.0, 1.0),
                ),
                WeaponLabel,
            ));
        });

    // Top-right: level and enemies
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(16.0),
                right: Val::Px(16.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::End,
                row_gap: Val::Px(6.0),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                label(format!("Level {}", current.index), 24.0, Color::WHITE),
                LevelLabel,
            ));
            parent.spawn((
                label(
                    format!("Enemies Remaining: {}", progress.enemies_remaining()),
                    18.0,
                    Color::srgb(1.0, 0.6, 0.2),
                ),
                EnemyCounter,
            ));
        });

    // Centre: toast
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                top: Val::Percent(30.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                label(String::new(), 28.0, Color::srgb(1.0, 0.9, 0.3)),
                Visibility::Hidden,
                Toast::default(),
            ));
        });
}

/// Helper to spawn a status bar.
fn spawn_bar<M: Component>(parent: &mut ChildBuilder, text: &str, color: Color, bar_marker: M) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|bar_parent| {
            bar_parent.spawn((
                label(text.to_string(), 14.0, Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            // Bar background
            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(200.0),
                        height: Val::Px(16.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    // Bar fill
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });
        });
}

/// Follow health change events, falling back to the player's health.
fn update_health_bar(
    mut events: EventReader<PlayerHealthChanged>,
    player_query: Query<Ref<Health>, With<Player>>,
    mut bar_query: Query<&mut Node, With<HealthBar>>,
) {
    let from_event = events.read().last().map(|event| event.fraction);
    let fraction = from_event.or_else(|| {
        player_query
            .get_single()
            .ok()
            .filter(|health| health.is_changed())
            .map(|health| health.percentage())
    });
    let Some(fraction) = fraction else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent(fraction.clamp(0.0, 1.0) * 100.0);
}

fn update_weapon_label(
    mut events: EventReader<WeaponChanged>,
    player_query: Query<Ref<Arsenal>, With<Player>>,
    mut label_query: Query<&mut Text, With<WeaponLabel>>,
) {
    let from_event = events
        .read()
        .last()
        .map(|event| weapon_text(event.weapon, event.ammo));
    let text = from_event.or_else(|| {
        player_query
            .get_single()
            .ok()
            .filter(|arsenal| arsenal.is_changed())
            .map(|arsenal| {
                let weapon = arsenal.current();
                weapon_text(weapon, arsenal.ammo(weapon))
            })
    });
    let Some(text) = text else {
        return;
    };
    for mut label in label_query.iter_mut() {
        label.0 = text.clone();
    }
}

fn update_level_labels(
    current: Res<CurrentLevel>,
    progress: Res<LevelProgress>,
    mut level_query: Query<&mut Text, (With<LevelLabel>, Without<EnemyCounter>)>,
    mut counter_query: Query<&mut Text, (With<EnemyCounter>, Without<LevelLabel>)>,
) {
    if current.is_changed() {
        for mut text in level_query.iter_mut() {
            text.0 = format!("Level {}", current.index);
        }
    }
    if progress.is_changed() {
        for mut text in counter_query.iter_mut() {
            text.0 = format!("Enemies Remaining: {}", progress.enemies_remaining());
        }
    }
}

/// Show the newest message and hide it once its time is up.
fn update_toast(
    time: Res<Time>,
    mut events: EventReader<ShowMessage>,
    mut toast_query: Query<(&mut Text, &mut Visibility, &mut Toast)>,
) {
    let latest = events.read().last().cloned();
    let Ok((mut text, mut visibility, mut toast)) = toast_query.get_single_mut() else {
        return;
    };

    if let Some(message) = latest {
        text.0 = message.text;
        toast.show(message.seconds);
        *visibility = Visibility::Inherited;
        return;
    }

    if toast.tick(time.delta()) {
        *visibility = Visibility::Hidden;
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn toast_expires_after_its_time() {
        let mut toast = Toast::default();
        assert!(!toast.tick(Duration::from_secs(1)));

        toast.show(1.5);
        assert!(!toast.tick(Duration::from_secs(1)));
        assert!(toast.is_showing());
        assert!(toast.tick(Duration::from_secs(1)));
        assert!(!toast.is_showing());
    }

    #[test]
    fn newer_message_restarts_the_toast() {
        let mut toast = Toast::default();
        toast.show(2.0);
        toast.tick(Duration::from_millis(1900));
        toast.show(2.0);
        assert!(!toast.tick(Duration::from_millis(1900)));
    }

    #[test]
    fn infinite_ammo_reads_inf() {
        let text = weapon_text(Element::Plasma, None);
        assert!(text.ends_with("(inf)"));
        assert_eq!(
            weapon_text(Element::Fire, Some(7)),
            format!("Weapon: {} (7)", Element::Fire.label())
        );
    }

    #[test]
    fn health_events_drive_the_bar() {
        let mut app = App::new();
        app.add_event::<PlayerHealthChanged>()
            .add_systems(Update, update_health_bar);
        let bar = app
            .world_mut()
            .spawn((
                Node {
                    width: Val::Percent(100.0),
                    ..default()
                },
                HealthBar,
            ))
            .id();

        app.world_mut()
            .send_event(PlayerHealthChanged { fraction: 0.4 });
        app.update();

        let width = app.world().get::<Node>(bar).map(|node| node.width);
        assert_eq!(width, Some(Val::Percent(40.0)));
    }
}
