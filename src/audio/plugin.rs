//! Audio plugin - sound bank, failure tracking and background music.

use bevy::prelude::*;
use bevy_kira_audio::prelude::*;

use super::music::{ensure_music_playing, MusicChannel};
use super::sounds::{load_sound_bank, track_failed_audio};
use crate::core::GameState;

/// Audio plugin. Expects `bevy_kira_audio::AudioPlugin` to be added.
pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_audio_channel::<MusicChannel>()
            .add_systems(OnEnter(GameState::Loading), load_sound_bank)
            .add_systems(
                Update,
                (track_failed_audio, ensure_music_playing)
                    .chain()
                    .run_if(not(in_state(GameState::Loading))),
            );
    }
}
