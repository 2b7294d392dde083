//! Title screen with character and music selection.

use bevy::prelude::*;

use crate::audio::music_failed;
use crate::core::{AppContext, GameState};

/// Marker for main menu UI entities.
#[derive(Component)]
pub struct MainMenuUi;

/// Marker for menu buttons.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    Play,
    Character,
    Music,
    Credits,
    Quit,
}

#[derive(Component)]
pub struct CharacterLabel;

#[derive(Component)]
pub struct MusicLabel;

/// Shown when the background music cannot start.
#[derive(Component)]
pub struct AudioNotice;

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.12, 0.22);
const BUTTON_HOVER: Color = Color::srgb(0.25, 0.2, 0.35);
const BUTTON_PRESSED: Color = Color::srgb(0.35, 0.3, 0.45);

fn character_text(context: &AppContext) -> String {
    let character = context.selected_character;
    format!("Character: {} - {}", character.display_name(), character.description())
}

fn music_text(context: &AppContext) -> String {
    format!("Music: {}", context.selected_music.display_name())
}

/// Set up the main menu.
pub fn setup_main_menu(mut commands: Commands, context: Res<AppContext>) {
    // Root container
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
            BackgroundColor(Color::srgb(0.04, 0.02, 0.1)),
            MainMenuUi,
        ))
        .with_children(|parent| {
            // Title
            parent.spawn((
                Text::new("Alien Outlaws"),
                TextFont {
                    font_size: 72.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.85, 0.3)),
                Node {
                    margin: UiRect::bottom(Val::Px(10.0)),
                    ..default()
                },
            ));

            // Subtitle
            parent.spawn((
                Text::new("The Cosmic Stampede"),
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

            spawn_menu_button(parent, "PLAY (Enter)", MenuButton::Play);
            spawn_menu_button(parent, "Change Character (C)", MenuButton::Character);
            spawn_menu_button(parent, "Change Music (M)", MenuButton::Music);
            spawn_menu_button(parent, "Credits", MenuButton::Credits);
            spawn_menu_button(parent, "Quit", MenuButton::Quit);

            parent.spawn((
                Text::new(character_text(&context)),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.9)),
                Node {
                    margin: UiRect::top(Val::Px(30.0)),
                    ..default()
                },
                CharacterLabel,
            ));
            parent.spawn((
                Text::new(music_text(&context)),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.9)),
                MusicLabel,
            ));

            parent.spawn((
                Text::new("Arrows: move / jump   Shift: slide   Z: shoot   X: lasso   C: switch weapon"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.5, 0.5, 0.6)),
                Node {
                    margin: UiRect::top(Val::Px(40.0)),
                    ..default()
                },
            ));
        });

    // Audio warning, top-left
    let notice_visibility = if music_failed(&context) {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    commands.spawn((
        Text::new("Audio not working"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.3, 0.3)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        notice_visibility,
        AudioNotice,
        MainMenuUi,
    ));
}

/// Helper to spawn a menu button.
fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(320.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(8.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.95)),
            ));
        });
}

fn activate(
    button: MenuButton,
    context: &mut AppContext,
    next_state: &mut NextState<GameState>,
    exit: &mut EventWriter<AppExit>,
) {
    match button {
        MenuButton::Play => {
            info!(
                "Starting run as {}",
                context.selected_character.display_name()
            );
            next_state.set(GameState::InGame);
        }
        MenuButton::Character => {
            context.selected_character = context.selected_character.next();
        }
        MenuButton::Music => {
            context.selected_music = context.selected_music.next();
        }
        MenuButton::Credits => {
            next_state.set(GameState::Credits);
        }
        MenuButton::Quit => {
            exit.send(AppExit::Success);
        }
    }
}

/// Handle main menu buttons and their keyboard shortcuts.
pub fn main_menu_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut context: ResMut<AppContext>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = BUTTON_PRESSED.into();
                activate(*button, &mut context, &mut next_state, &mut exit);
            }
            Interaction::Hovered => {
                *bg_color = BUTTON_HOVER.into();
            }
            Interaction::None => {
                *bg_color = BUTTON_IDLE.into();
            }
        }
    }

    let shortcuts = [
        (KeyCode::Enter, MenuButton::Play),
        (KeyCode::KeyC, MenuButton::Character),
        (KeyCode::KeyM, MenuButton::Music),
    ];
    for (key, button) in shortcuts {
        if keyboard.just_pressed(key) {
            activate(button, &mut context, &mut next_state, &mut exit);
        }
    }
}

/// Keep the selection labels and the audio notice current.
pub fn refresh_menu_labels(
    context: Res<AppContext>,
    mut character_query: Query<&mut Text, (With<CharacterLabel>, Without<MusicLabel>)>,
    mut music_query: Query<&mut Text, (With<MusicLabel>, Without<CharacterLabel>)>,
    mut notice_query: Query<&mut Visibility, With<AudioNotice>>,
) {
    if !context.is_changed() {
        return;
    }
    for mut text in character_query.iter_mut() {
        text.0 = character_text(&context);
    }
    for mut text in music_query.iter_mut() {
        text.0 = music_text(&context);
    }
    let visibility = if music_failed(&context) {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut notice in notice_query.iter_mut() {
        notice.set_if_neq(visibility);
    }
}

/// Clean up main menu entities.
pub fn cleanup_main_menu(mut commands: Commands, ui_query: Query<Entity, With<MainMenuUi>>) {
    for entity in ui_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn menu_app() -> App {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<GameState>()
            .init_resource::<AppContext>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_event::<AppExit>()
            .add_systems(Update, main_menu_input);
        app
    }

    fn press(app: &mut App, key: KeyCode) {
        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        input.release_all();
        input.clear();
        input.press(key);
    }

    #[test]
    fn keyboard_cycles_character_and_music() {
        let mut app = menu_app();
        press(&mut app, KeyCode::KeyC);
        app.update();
        press(&mut app, KeyCode::KeyM);
        app.update();

        let context = app.world().resource::<AppContext>();
        assert_eq!(context.selected_character, crate::core::Character::Cowboy);
        assert_eq!(context.selected_music, crate::core::MusicTrack::WhereMyAliensAt);
    }

    #[test]
    fn credits_button_opens_the_credits() {
        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .insert_state(GameState::MainMenu)
            .init_resource::<AppContext>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_event::<AppExit>()
            .add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
            .add_systems(Update, main_menu_input);
        app.update();

        let mut buttons = app.world_mut().query::<(&MenuButton, &mut Interaction)>();
        for (button, mut interaction) in buttons.iter_mut(app.world_mut()) {
            if *button == MenuButton::Credits {
                *interaction = Interaction::Pressed;
            }
        }
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<GameState>>().get(),
            GameState::Credits
        );
    }

    #[test]
    fn enter_starts_the_game() {
        let mut app = menu_app();
        press(&mut app, KeyCode::Enter);
        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<GameState>>().get(),
            GameState::InGame
        );
    }
}
