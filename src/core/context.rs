//! Cross-scene application context.
//!
//! Holds what the title screen selected and what the loading layer
//! learned about the assets. Created at startup, written by the loading
//! and menu layers, read by levels. Gameplay only ever appends to
//! `failed_audio` when a sound turns out to be unusable.

use std::collections::HashSet;

use bevy::prelude::*;

/// Playable characters. Each one has its own sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Character {
    #[default]
    Sheriff,
    Cowboy,
    Cowgirl,
}

impl Character {
    pub const ALL: [Character; 3] = [Character::Sheriff, Character::Cowboy, Character::Cowgirl];

    /// Sprite sheet key, also the prefix of the character's animation keys.
    pub fn sheet_key(self) -> &'static str {
        match self {
            Character::Sheriff => "sheriff",
            Character::Cowboy => "cowboy",
            Character::Cowgirl => "cowgirl",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Character::Sheriff => "Sheriff",
            Character::Cowboy => "Cowboy",
            Character::Cowgirl => "Cowgirl",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Character::Sheriff => "The classic lawman of the cosmos.",
            Character::Cowboy => "A rugged space wanderer with quick reflexes.",
            Character::Cowgirl => "Fast and agile with expert shooting skills.",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Animation key for one of this character's clips, e.g. `sheriff-run`.
    pub fn animation(self, action: &str) -> String {
        format!("{}-{}", self.sheet_key(), action)
    }
}

/// Background music tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MusicTrack {
    #[default]
    AlienOutlaw,
    WhereMyAliensAt,
    NoAliens,
}

impl MusicTrack {
    pub const ALL: [MusicTrack; 3] = [
        MusicTrack::AlienOutlaw,
        MusicTrack::WhereMyAliensAt,
        MusicTrack::NoAliens,
    ];

    /// Sound bank key of the track.
    pub fn key(self) -> &'static str {
        match self {
            MusicTrack::AlienOutlaw => "alien-outlaw",
            MusicTrack::WhereMyAliensAt => "where-my-aliens-at",
            MusicTrack::NoAliens => "no-aliens",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MusicTrack::AlienOutlaw => "Alien Outlaw",
            MusicTrack::WhereMyAliensAt => "Where My Aliens At",
            MusicTrack::NoAliens => "No Aliens",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Shared state that outlives a single level.
#[derive(Resource, Debug, Default)]
pub struct AppContext {
    pub selected_character: Character,
    pub selected_music: MusicTrack,
    /// Track currently looping in the background, if any
    pub playing_music: Option<MusicTrack>,
    valid_animations: HashSet<String>,
    failed_audio: HashSet<String>,
}

impl AppContext {
    pub fn is_animation_valid(&self, key: &str) -> bool {
        self.valid_animations.contains(key)
    }

    /// Replace the validated animation set (done once by the loading layer).
    pub fn set_valid_animations(&mut self, keys: impl IntoIterator<Item = String>) {
        self.valid_animations = keys.into_iter().collect();
    }

    pub fn is_audio_failed(&self, key: &str) -> bool {
        self.failed_audio.contains(key)
    }

    /// Record an unusable audio key. Returns true the first time.
    pub fn mark_audio_failed(&mut self, key: &str) -> bool {
        self.failed_audio.insert(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_selection_wraps_around() {
        assert_eq!(Character::Sheriff.next(), Character::Cowboy);
        assert_eq!(Character::Cowgirl.next(), Character::Sheriff);
        assert_eq!(Character::Cowgirl.animation("run"), "cowgirl-run");
    }

    #[test]
    fn failed_audio_is_recorded_once() {
        let mut context = AppContext::default();
        assert!(!context.is_audio_failed("jump"));
        assert!(context.mark_audio_failed("jump"));
        assert!(!context.mark_audio_failed("jump"));
        assert!(context.is_audio_failed("jump"));
    }
}
