//! Background music on its own channel.
//!
//! One track loops for the whole session. Picking another track on the
//! title screen swaps it, and levels never restart it.

use bevy::prelude::*;
use bevy_kira_audio::prelude::*;

use super::sounds::{is_playable, SoundBank};
use crate::core::{AppContext, MusicTrack};

pub const MUSIC_VOLUME: f64 = 0.5;

#[derive(Resource)]
pub struct MusicChannel;

/// What the music system should do about the selected track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicAction {
    Keep,
    Start(MusicTrack),
    /// Selected track cannot be played, silence the old one
    Stop,
    /// Still loading
    Wait,
}

pub fn music_action(selected: MusicTrack, playing: Option<MusicTrack>, playable: Option<bool>) -> MusicAction {
    if playing == Some(selected) {
        return MusicAction::Keep;
    }
    match playable {
        Some(true) => MusicAction::Start(selected),
        Some(false) if playing.is_some() => MusicAction::Stop,
        Some(false) => MusicAction::Keep,
        None => MusicAction::Wait,
    }
}

/// Start or swap the looping track to match the selection.
pub fn ensure_music_playing(
    channel: Res<AudioChannel<MusicChannel>>,
    bank: Option<Res<SoundBank>>,
    asset_server: Res<AssetServer>,
    mut context: ResMut<AppContext>,
) {
    let Some(bank) = bank else {
        return;
    };
    let selected = context.selected_music;
    let handle = is_playable(selected.key(), &bank, &context, &asset_server);
    let playable = if handle.is_some() {
        Some(true)
    } else if context.is_audio_failed(selected.key()) {
        Some(false)
    } else {
        None
    };

    match music_action(selected, context.playing_music, playable) {
        MusicAction::Start(track) => {
            let Some(handle) = handle else {
                return;
            };
            channel.stop();
            channel.play(handle).looped().with_volume(MUSIC_VOLUME);
            context.playing_music = Some(track);
            info!("Playing music '{}'", track.key());
        }
        MusicAction::Stop => {
            channel.stop();
            context.playing_music = None;
        }
        MusicAction::Keep | MusicAction::Wait => {}
    }
}

/// True when the selected track failed, for the title screen notice.
pub fn music_failed(context: &AppContext) -> bool {
    context.is_audio_failed(context.selected_music.key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playing_track_is_left_alone() {
        let track = MusicTrack::AlienOutlaw;
        assert_eq!(music_action(track, Some(track), Some(true)), MusicAction::Keep);
    }

    #[test]
    fn new_selection_swaps_once_loaded() {
        let old = Some(MusicTrack::AlienOutlaw);
        let new = MusicTrack::NoAliens;
        assert_eq!(music_action(new, old, None), MusicAction::Wait);
        assert_eq!(music_action(new, old, Some(true)), MusicAction::Start(new));
        assert_eq!(music_action(new, old, Some(false)), MusicAction::Stop);
        assert_eq!(music_action(new, None, Some(false)), MusicAction::Keep);
    }

    #[test]
    fn failed_selection_is_reported() {
        let mut context = AppContext::default();
        assert!(!music_failed(&context));
        context.mark_audio_failed("alien-outlaw");
        assert!(music_failed(&context));
    }
}
