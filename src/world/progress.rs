//! Level progress: enemy counter, exit door, completion and game over.

use std::time::Duration;

use bevy::prelude::*;

use super::levels::FINAL_LEVEL;
use crate::audio::SoundEffects;
use crate::combat::{Dead, Hitbox};
use crate::core::{EnemyDied, GameState, PlayState, PlayerDied, ShowMessage};
use crate::player::Player;

pub const DOOR_LOCKED_MESSAGE: &str = "Defeat all enemies first!";
pub const DOOR_MESSAGE_SECONDS: f32 = 2.0;
/// Wait after reaching the exit before the next level starts.
pub const LEVEL_COMPLETE_DELAY: Duration = Duration::from_millis(2000);
pub const GAME_OVER_COUNTDOWN: u32 = 5;
pub const FADE_DURATION: Duration = Duration::from_millis(1000);

/// Level of the current run, counting from 1.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentLevel {
    pub index: u32,
}

impl Default for CurrentLevel {
    fn default() -> Self {
        Self { index: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelAdvance {
    Next(u32),
    /// The last level was beaten. The run starts over from level 1.
    Finished,
}

impl CurrentLevel {
    pub fn advance(&mut self) -> LevelAdvance {
        if self.index < FINAL_LEVEL {
            self.index += 1;
            LevelAdvance::Next(self.index)
        } else {
            self.index = 1;
            LevelAdvance::Finished
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitAttempt {
    /// Enemies are left, the door stays shut
    Locked,
    Completed,
    /// Already done, ignore further overlaps
    AlreadyCompleted,
}

/// Bookkeeping for the level being played.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct LevelProgress {
    enemies_remaining: u32,
    completed: bool,
}

impl LevelProgress {
    pub fn new(enemies: u32) -> Self {
        Self {
            enemies_remaining: enemies,
            completed: false,
        }
    }

    pub fn enemies_remaining(&self) -> u32 {
        self.enemies_remaining
    }

    pub fn on_enemy_died(&mut self) {
        self.enemies_remaining = self.enemies_remaining.saturating_sub(1);
    }

    pub fn is_door_unlocked(&self) -> bool {
        self.enemies_remaining == 0
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn try_exit(&mut self) -> ExitAttempt {
        if self.completed {
            ExitAttempt::AlreadyCompleted
        } else if !self.is_door_unlocked() {
            ExitAttempt::Locked
        } else {
            self.completed = true;
            ExitAttempt::Completed
        }
    }
}

/// The level exit.
#[derive(Component)]
pub struct ExitDoor;

/// Runs while "LEVEL COMPLETE!" is on screen.
#[derive(Resource, Debug)]
pub struct LevelCompleteTimer(pub Timer);

impl LevelCompleteTimer {
    /// How far the fade to black has gone, 0.0 to 1.0.
    pub fn fade(&self) -> f32 {
        (self.0.elapsed_secs() / FADE_DURATION.as_secs_f32()).min(1.0)
    }
}

/// Counts down to the title screen after the player died.
///
/// Ticks on real time, since virtual time is paused for the game over.
#[derive(Resource, Debug)]
pub struct GameOverCountdown {
    seconds_left: u32,
    tick: Timer,
    fade: Option<Timer>,
}

impl Default for GameOverCountdown {
    fn default() -> Self {
        Self {
            seconds_left: GAME_OVER_COUNTDOWN,
            tick: Timer::from_seconds(1.0, TimerMode::Repeating),
            fade: None,
        }
    }
}

impl GameOverCountdown {
    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    /// Fade progress once the countdown ran out.
    pub fn fade(&self) -> Option<f32> {
        self.fade.as_ref().map(|timer| timer.fraction())
    }

    /// Returns true once the fade has finished.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if let Some(fade) = self.fade.as_mut() {
            return fade.tick(delta).finished();
        }

        self.tick.tick(delta);
        let elapsed = self.tick.times_finished_this_tick();
        self.seconds_left = self.seconds_left.saturating_sub(elapsed);
        if self.seconds_left == 0 {
            self.fade = Some(Timer::new(FADE_DURATION, TimerMode::Once));
        }
        false
    }
}

pub fn count_enemy_deaths(mut events: EventReader<EnemyDied>, mut progress: ResMut<LevelProgress>) {
    for _ in events.read() {
        progress.on_enemy_died();
    }
}

/// The exit only opens with every enemy dead.
pub fn check_exit_door(
    mut progress: ResMut<LevelProgress>,
    player_query: Query<(&Transform, &Hitbox), (With<Player>, Without<Dead>)>,
    door_query: Query<(&Transform, &Hitbox), With<ExitDoor>>,
    mut messages: EventWriter<ShowMessage>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    let Ok((player_transform, player_box)) = player_query.get_single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    let at_door = door_query.iter().any(|(transform, hitbox)| {
        player_box.overlaps(player_pos, hitbox, transform.translation.truncate())
    });
    if !at_door {
        return;
    }

    match progress.try_exit() {
        ExitAttempt::Locked => {
            messages.send(ShowMessage {
                text: DOOR_LOCKED_MESSAGE.to_string(),
                seconds: DOOR_MESSAGE_SECONDS,
            });
        }
        ExitAttempt::Completed => {
            info!("Level complete");
            next_state.set(PlayState::LevelComplete);
        }
        ExitAttempt::AlreadyCompleted => {}
    }
}

pub fn watch_player_death(
    mut events: EventReader<PlayerDied>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    if events.read().count() > 0 {
        next_state.set(PlayState::GameOver);
    }
}

pub fn start_level_complete(mut commands: Commands, sounds: SoundEffects) {
    sounds.play("portal", 0.6);
    commands.insert_resource(LevelCompleteTimer(Timer::new(
        LEVEL_COMPLETE_DELAY,
        TimerMode::Once,
    )));
}

/// Move on to the next level, or back to the title after the last one.
pub fn tick_level_complete(
    time: Res<Time>,
    mut timer: ResMut<LevelCompleteTimer>,
    mut current: ResMut<CurrentLevel>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    match current.advance() {
        LevelAdvance::Next(level) => {
            info!("Advancing to level {}", level);
            next_state.set(GameState::LevelTransition);
        }
        LevelAdvance::Finished => {
            info!("All levels cleared");
            next_state.set(GameState::MainMenu);
        }
    }
}

/// Freeze the world: physics, timers and animations all run on virtual time.
pub fn start_game_over(mut commands: Commands, mut time: ResMut<Time<Virtual>>) {
    info!("Game over");
    time.pause();
    commands.insert_resource(GameOverCountdown::default());
}

pub fn tick_game_over(
    time: Res<Time<Real>>,
    mut countdown: ResMut<GameOverCountdown>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if countdown.tick(time.delta()) {
        next_state.set(GameState::MainMenu);
    }
}

pub fn resume_time(mut time: ResMut<Time<Virtual>>) {
    if time.is_paused() {
        time.unpause();
    }
}

pub fn clear_progress_timers(mut commands: Commands) {
    commands.remove_resource::<LevelCompleteTimer>();
    commands.remove_resource::<GameOverCountdown>();
}

/// A new run always starts from level 1.
pub fn reset_current_level(mut current: ResMut<CurrentLevel>) {
    *current = CurrentLevel::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_advance_then_wrap_to_one() {
        let mut current = CurrentLevel::default();
        assert_eq!(current.advance(), LevelAdvance::Next(2));
        assert_eq!(current.advance(), LevelAdvance::Next(3));
        assert_eq!(current.advance(), LevelAdvance::Next(4));
        assert_eq!(current.advance(), LevelAdvance::Finished);
        assert_eq!(current.index, 1);
    }

    #[test]
    fn door_stays_locked_until_the_last_enemy() {
        let mut progress = LevelProgress::new(2);
        assert_eq!(progress.try_exit(), ExitAttempt::Locked);
        progress.on_enemy_died();
        assert_eq!(progress.try_exit(), ExitAttempt::Locked);
        progress.on_enemy_died();
        assert!(progress.is_door_unlocked());
        assert_eq!(progress.try_exit(), ExitAttempt::Completed);
        assert_eq!(progress.try_exit(), ExitAttempt::AlreadyCompleted);
    }

    #[test]
    fn enemy_counter_never_goes_negative() {
        let mut progress = LevelProgress::new(1);
        progress.on_enemy_died();
        progress.on_enemy_died();
        assert_eq!(progress.enemies_remaining(), 0);
    }

    #[test]
    fn countdown_runs_five_seconds_then_fades() {
        let mut countdown = GameOverCountdown::default();
        for left in (1..GAME_OVER_COUNTDOWN).rev() {
            assert!(!countdown.tick(Duration::from_secs(1)));
            assert_eq!(countdown.seconds_left(), left);
        }
        assert!(countdown.fade().is_none());
        assert!(!countdown.tick(Duration::from_secs(1)));
        assert_eq!(countdown.fade(), Some(0.0));
        assert!(!countdown.tick(Duration::from_millis(500)));
        assert!(countdown.tick(Duration::from_millis(500)));
    }

    fn progress_app(enemies: u32) -> App {
        let mut app = App::new();
        app.insert_resource(LevelProgress::new(enemies))
            .add_event::<EnemyDied>()
            .add_systems(Update, count_enemy_deaths);
        app
    }

    #[test]
    fn all_enemies_dying_in_one_frame_empties_the_counter() {
        let mut app = progress_app(6);
        for _ in 0..6 {
            app.world_mut().send_event(EnemyDied {
                entity: Entity::PLACEHOLDER,
                position: Vec2::ZERO,
            });
        }
        app.update();
        assert_eq!(app.world().resource::<LevelProgress>().enemies_remaining(), 0);

        // Stray deaths after the count hit zero
        app.world_mut().send_event(EnemyDied {
            entity: Entity::PLACEHOLDER,
            position: Vec2::ZERO,
        });
        app.update();
        assert_eq!(app.world().resource::<LevelProgress>().enemies_remaining(), 0);
    }

    fn door_app(enemies: u32) -> App {
        use bevy::state::app::StatesPlugin;

        let mut app = App::new();
        app.add_plugins(StatesPlugin)
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()
            .insert_resource(LevelProgress::new(enemies))
            .add_event::<ShowMessage>()
            .add_systems(Update, check_exit_door);

        app.world_mut().spawn((
            Player,
            Hitbox::new(40.0, 60.0),
            Transform::from_xyz(3000.0, 220.0, 0.0),
        ));
        app.world_mut().spawn((
            ExitDoor,
            Hitbox::new(60.0, 120.0),
            Transform::from_xyz(3000.0, 220.0, 0.0),
        ));
        app
    }

    fn sent_messages(app: &App) -> usize {
        let events = app.world().resource::<Events<ShowMessage>>();
        events.get_cursor().read(events).count()
    }

    #[test]
    fn locked_door_warns_and_does_not_complete() {
        let mut app = door_app(3);
        app.update();

        assert_eq!(sent_messages(&app), 1);
        assert!(!app.world().resource::<LevelProgress>().is_completed());
    }

    #[test]
    fn open_door_completes_exactly_once() {
        let mut app = door_app(0);
        app.update();
        app.update();
        app.update();

        assert!(app.world().resource::<LevelProgress>().is_completed());
        assert_eq!(sent_messages(&app), 0);
    }
}
