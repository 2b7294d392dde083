//! Credits page, reached from the title screen.

use bevy::prelude::*;
use rand::Rng;

use crate::core::GameState;

/// Marker for credits UI entities.
#[derive(Component)]
pub struct CreditsUi;

#[derive(Component)]
pub struct BackButton;

/// Background star fading in and out.
#[derive(Component, Debug, Clone, Copy)]
pub struct Twinkle {
    period: f32,
    phase: f32,
}

impl Twinkle {
    /// Alpha between 0.2 and 1.0 at `seconds`.
    pub fn alpha(&self, seconds: f32) -> f32 {
        let wave = ((seconds / self.period + self.phase) * std::f32::consts::TAU).cos();
        0.6 + 0.4 * wave
    }
}

/// One developer: name, role and the colour of their name.
pub struct Credit {
    pub name: &'static str,
    pub role: &'static str,
    pub color: Color,
}

pub const CREDITS: [Credit; 4] = [
    Credit {
        name: "Josh Kent",
        role: "LEAD DEVELOPER & DESIGN",
        color: Color::srgb(1.0, 0.416, 0.0),
    },
    Credit {
        name: "Evelyn Kent",
        role: "LEAD LEVEL DESIGNER",
        color: Color::srgb(1.0, 0.0, 1.0),
    },
    Credit {
        name: "Shelley Arnold",
        role: "CREATIVE DIRECTOR & ART",
        color: Color::srgb(0.0, 0.8, 1.0),
    },
    Credit {
        name: "Lillian Kent",
        role: "LEAD QA ENGINEER",
        color: Color::srgb(0.0, 1.0, 0.0),
    },
];

const STARS: usize = 100;
const BACK_IDLE: Color = Color::srgb(0.133, 0.133, 0.133);
const BACK_TEXT: Color = Color::WHITE;
const BACK_TEXT_HOVER: Color = Color::srgb(1.0, 0.8, 0.0);

pub fn setup_credits(mut commands: Commands) {
    let mut rng = rand::thread_rng();

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.0, 0.0, 0.2)),
            CreditsUi,
        ))
        .with_children(|parent| {
            for _ in 0..STARS {
                let size = rng.gen_range(1.0..=3.0) * 2.0;
                parent.spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Percent(rng.gen_range(0.0..100.0)),
                        top: Val::Percent(rng.gen_range(0.0..100.0)),
                        width: Val::Px(size),
                        height: Val::Px(size),
                        ..default()
                    },
                    BackgroundColor(Color::WHITE),
                    Twinkle {
                        period: rng.gen_range(2.0..6.0),
                        phase: rng.gen_range(0.0..1.0),
                    },
                ));
            }

            parent.spawn((
                Text::new("CREDITS"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.8, 0.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(20.0)),
                    ..default()
                },
            ));
            parent.spawn((
                Text::new("THE COSMIC TEAM"),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::srgb(0.0, 0.8, 1.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(50.0)),
                    ..default()
                },
            ));

            // Two columns, two names each
            parent
                .spawn(Node {
                    display: Display::Grid,
                    grid_template_columns: RepeatedGridTrack::flex(2, 1.0),
                    column_gap: Val::Px(120.0),
                    row_gap: Val::Px(40.0),
                    ..default()
                })
                .with_children(|grid| {
                    for credit in &CREDITS {
                        spawn_credit(grid, credit);
                    }
                });

            parent
                .spawn((
                    Button,
                    Node {
                        margin: UiRect::top(Val::Px(60.0)),
                        padding: UiRect::axes(Val::Px(20.0), Val::Px(10.0)),
                        ..default()
                    },
                    BackgroundColor(BACK_IDLE),
                    BackButton,
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new("BACK TO MENU"),
                        TextFont {
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(BACK_TEXT),
                    ));
                });
        });
}

fn spawn_credit(parent: &mut ChildBuilder, credit: &Credit) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|column| {
            column.spawn((
                Text::new(credit.name),
                TextFont {
                    font_size: 36.0,
                    ..default()
                },
                TextColor(credit.color),
            ));
            column.spawn((
                Text::new(credit.role),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Back button, Escape or Enter return to the title screen.
pub fn credits_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    button_query: Query<(&Interaction, &Children), (Changed<Interaction>, With<BackButton>)>,
    mut text_query: Query<&mut TextColor>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let mut back = keyboard.any_just_pressed([KeyCode::Escape, KeyCode::Enter]);

    for (interaction, children) in button_query.iter() {
        let color = match interaction {
            Interaction::Pressed => {
                back = true;
                BACK_TEXT_HOVER
            }
            Interaction::Hovered => BACK_TEXT_HOVER,
            Interaction::None => BACK_TEXT,
        };
        for child in children.iter() {
            if let Ok(mut text_color) = text_query.get_mut(*child) {
                text_color.0 = color;
            }
        }
    }

    if back {
        next_state.set(GameState::MainMenu);
    }
}

pub fn twinkle_stars(time: Res<Time>, mut query: Query<(&Twinkle, &mut BackgroundColor)>) {
    let seconds = time.elapsed_secs();
    for (twinkle, mut color) in query.iter_mut() {
        color.0 = Color::srgba(1.0, 1.0, 1.0, twinkle.alpha(seconds));
    }
}

pub fn cleanup_credits(mut commands: Commands, query: Query<Entity, With<CreditsUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
