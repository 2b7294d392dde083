//! Level complete and game over overlays, plus the fade to black.

use bevy::prelude::*;

use crate::core::{GameState, PlayState};
use crate::world::{GameOverCountdown, LevelCompleteTimer};

/// Marker for overlay entities; all of them go when the level does.
#[derive(Component)]
pub struct OverlayUi;

/// Full-screen black node whose alpha follows the active fade.
#[derive(Component)]
pub struct FadeCurtain;

#[derive(Component)]
pub struct CountdownLabel;

#[derive(Component)]
pub struct LevelCompleteBanner;

pub const LEVEL_COMPLETE_COLOR: Color = Color::srgb(1.0, 1.0, 0.0);

pub fn countdown_text(seconds: u32) -> String {
    format!("Returning to title screen in {}...", seconds)
}

fn overlay_root() -> (Node, OverlayUi) {
    (
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        OverlayUi,
    )
}

pub fn spawn_fade_curtain(mut commands: Commands) {
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        GlobalZIndex(10),
        FadeCurtain,
        OverlayUi,
    ));
}

pub fn show_level_complete(mut commands: Commands) {
    commands.spawn(overlay_root()).with_children(|parent| {
        parent.spawn((
            Text::new("LEVEL COMPLETE!"),
            TextFont {
                font_size: 64.0,
                ..default()
            },
            TextColor(LEVEL_COMPLETE_COLOR),
            LevelCompleteBanner,
        ));
    });
}

pub fn show_game_over(mut commands: Commands) {
    commands
        .spawn((
            overlay_root(),
            BackgroundColor(Color::srgba(0.1, 0.0, 0.0, 0.6)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("GAME OVER"),
                TextFont {
                    font_size: 72.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.0, 0.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(30.0)),
                    ..default()
                },
            ));
            parent.spawn((
                Text::new(countdown_text(crate::world::GAME_OVER_COUNTDOWN)),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                CountdownLabel,
            ));
        });
}

pub fn update_countdown_label(
    countdown: Option<Res<GameOverCountdown>>,
    mut label_query: Query<&mut Text, With<CountdownLabel>>,
) {
    let Some(countdown) = countdown else {
        return;
    };
    if !countdown.is_changed() {
        return;
    }
    let text = countdown_text(countdown.seconds_left());
    for mut label in label_query.iter_mut() {
        if label.0 != text {
            label.0 = text.clone();
        }
    }
}

/// Current fade alpha: level complete fades while its timer runs, game
/// over only once the countdown has reached zero.
pub fn fade_alpha(
    level_complete: Option<&LevelCompleteTimer>,
    game_over: Option<&GameOverCountdown>,
    play_state: Option<PlayState>,
) -> f32 {
    match play_state {
        Some(PlayState::LevelComplete) => level_complete.map_or(0.0, |timer| timer.fade()),
        Some(PlayState::GameOver) => game_over.and_then(|countdown| countdown.fade()).unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn update_fade(
    level_complete: Option<Res<LevelCompleteTimer>>,
    game_over: Option<Res<GameOverCountdown>>,
    play_state: Option<Res<State<PlayState>>>,
    mut curtain_query: Query<&mut BackgroundColor, With<FadeCurtain>>,
) {
    let alpha = fade_alpha(
        level_complete.as_deref(),
        game_over.as_deref(),
        play_state.map(|state| *state.get()),
    );
    for mut color in curtain_query.iter_mut() {
        color.0 = Color::srgba(0.0, 0.0, 0.0, alpha);
    }
}

pub fn cleanup_overlays(mut commands: Commands, query: Query<Entity, With<OverlayUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

/// Overlay systems, wired by the UI plugin.
pub fn setup_overlay_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_fade_curtain)
        .add_systems(OnEnter(PlayState::LevelComplete), show_level_complete)
        .add_systems(OnEnter(PlayState::GameOver), show_game_over)
        .add_systems(OnExit(GameState::InGame), cleanup_overlays)
        .add_systems(
            Update,
            (update_countdown_label, update_fade).run_if(in_state(GameState::InGame)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn level_complete_banner_is_yellow() {
        let mut app = App::new();
        app.add_systems(Update, show_level_complete);
        app.update();

        let mut query = app
            .world_mut()
            .query_filtered::<(&Text, &TextColor), With<LevelCompleteBanner>>();
        let (text, color) = query.single(app.world());
        assert_eq!(text.0, "LEVEL COMPLETE!");
        assert_eq!(color.0, Color::srgb(1.0, 1.0, 0.0));
    }

    #[test]
    fn no_fade_while_playing() {
        let countdown = GameOverCountdown::default();
        assert_eq!(fade_alpha(None, Some(&countdown), Some(PlayState::Playing)), 0.0);
        assert_eq!(fade_alpha(None, None, None), 0.0);
    }

    #[test]
    fn level_complete_fades_in_over_a_second() {
        let mut timer = LevelCompleteTimer(Timer::new(
            crate::world::LEVEL_COMPLETE_DELAY,
            TimerMode::Once,
        ));
        timer.0.tick(Duration::from_millis(500));
        let alpha = fade_alpha(Some(&timer), None, Some(PlayState::LevelComplete));
        assert!((alpha - 0.5).abs() < 1e-4);

        timer.0.tick(Duration::from_millis(1000));
        assert_eq!(fade_alpha(Some(&timer), None, Some(PlayState::LevelComplete)), 1.0);
    }

    #[test]
    fn game_over_fades_only_after_the_countdown() {
        let mut countdown = GameOverCountdown::default();
        countdown.tick(Duration::from_secs(3));
        assert_eq!(fade_alpha(None, Some(&countdown), Some(PlayState::GameOver)), 0.0);
        assert_eq!(countdown_text(countdown.seconds_left()), "Returning to title screen in 2...");

        countdown.tick(Duration::from_secs(2));
        countdown.tick(Duration::from_millis(250));
        let alpha = fade_alpha(None, Some(&countdown), Some(PlayState::GameOver));
        assert!(alpha > 0.0 && alpha < 1.0);
    }
}
