//! Audio module - sound effects with visual fallbacks, looping music.

mod music;
mod plugin;
mod sounds;

pub use music::{music_failed, MusicChannel};
pub use plugin::GameAudioPlugin;
pub use sounds::{SoundBank, SoundEffects, SOUND_KEYS};
