//! Sound bank and sound effect playback.
//!
//! A sound that is missing or failed to decode is recorded in the
//! application context. Callers get `false` back from
//! [`SoundEffects::play`] and show a visual effect instead.

use std::collections::HashMap;

use bevy::asset::LoadState;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_kira_audio::prelude::*;

use crate::core::AppContext;

/// Every sound the game knows about. Music tracks included.
pub const SOUND_KEYS: [&str; 6] = [
    "jump",
    "laser-shot",
    "portal",
    "alien-outlaw",
    "where-my-aliens-at",
    "no-aliens",
];

fn sound_path(key: &str) -> String {
    format!("audio/{}.ogg", key)
}

#[derive(Resource, Debug, Default)]
pub struct SoundBank {
    handles: HashMap<String, Handle<AudioSource>>,
}

impl SoundBank {
    pub fn insert(&mut self, key: &str, handle: Handle<AudioSource>) {
        self.handles.insert(key.to_string(), handle);
    }

    pub fn get(&self, key: &str) -> Option<&Handle<AudioSource>> {
        self.handles.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Handle<AudioSource>)> {
        self.handles.iter().map(|(key, handle)| (key.as_str(), handle))
    }
}

pub fn load_sound_bank(mut commands: Commands, asset_server: Res<AssetServer>) {
    let mut bank = SoundBank::default();
    for key in SOUND_KEYS {
        bank.insert(key, asset_server.load(sound_path(key)));
    }
    commands.insert_resource(bank);
}

/// Record sounds that failed to load so nobody tries them again.
pub fn track_failed_audio(
    bank: Option<Res<SoundBank>>,
    asset_server: Res<AssetServer>,
    mut context: ResMut<AppContext>,
) {
    let Some(bank) = bank else {
        return;
    };
    for (key, handle) in bank.iter() {
        if context.is_audio_failed(key) {
            continue;
        }
        if let LoadState::Failed(err) = asset_server.load_state(handle.id()) {
            if context.mark_audio_failed(key) {
                warn!("Audio '{}' unavailable: {}", key, err);
            }
        }
    }
}

/// Whether a sound can be played right now.
pub fn is_playable(
    key: &str,
    bank: &SoundBank,
    context: &AppContext,
    asset_server: &AssetServer,
) -> Option<Handle<AudioSource>> {
    if context.is_audio_failed(key) {
        return None;
    }
    let handle = bank.get(key)?;
    match asset_server.load_state(handle.id()) {
        LoadState::Loaded => Some(handle.clone()),
        _ => None,
    }
}

/// One-shot sound effects.
#[derive(SystemParam)]
pub struct SoundEffects<'w> {
    audio: Option<Res<'w, Audio>>,
    bank: Option<Res<'w, SoundBank>>,
    context: Res<'w, AppContext>,
    asset_server: Option<Res<'w, AssetServer>>,
}

impl SoundEffects<'_> {
    /// Play a sound at `volume` (0.0 to 1.0). Returns false if it could
    /// not be played, so the caller can fall back to a visual effect.
    pub fn play(&self, key: &str, volume: f64) -> bool {
        let (Some(audio), Some(bank), Some(server)) = (&self.audio, &self.bank, &self.asset_server)
        else {
            return false;
        };
        let Some(handle) = is_playable(key, bank, &self.context, server) else {
            return false;
        };
        audio.play(handle).with_volume(volume);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_audio_stack_falls_back() {
        let mut app = App::new();
        app.init_resource::<AppContext>()
            .init_resource::<ShotLog>()
            .add_systems(Update, try_sound);
        app.update();
        assert_eq!(app.world().resource::<ShotLog>().0, vec![false]);
    }

    #[derive(Resource, Default)]
    struct ShotLog(Vec<bool>);

    fn try_sound(sounds: SoundEffects, mut log: ResMut<ShotLog>) {
        log.0.push(sounds.play("laser-shot", 0.3));
    }

    #[test]
    fn every_music_track_is_in_the_bank() {
        for track in crate::core::MusicTrack::ALL {
            assert!(SOUND_KEYS.contains(&track.key()));
        }
    }
}
