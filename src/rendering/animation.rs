//! Sprite animation: a validated clip library and a safe player.
//!
//! Clips are checked against their sheet when they are registered. A clip
//! asking for frames the sheet does not have is kept as a single-frame
//! clip, so callers can always play it. Anything that still cannot be
//! resolved falls back to `default-anim`, and failing that the sprite
//! rests on frame 0. Nothing here panics on bad data.

use std::collections::HashMap;

use bevy::prelude::*;

use super::sprites::{frames_in_width, SpriteAssets, SHEETS};
use crate::core::{AnimationError, AppContext};

/// Key of the catch-all clip, frame 0 of the sheriff sheet.
pub const DEFAULT_ANIMATION: &str = "default-anim";
const DEFAULT_SHEET: &str = "sheriff";

/// A clip as requested, before validation.
#[derive(Debug, Clone, Copy)]
pub struct ClipSpec {
    pub key: &'static str,
    pub sheet: &'static str,
    pub first: usize,
    pub last: usize,
    pub fps: f32,
    pub looping: bool,
}

const fn clip(
    key: &'static str,
    sheet: &'static str,
    first: usize,
    last: usize,
    fps: f32,
    looping: bool,
) -> ClipSpec {
    ClipSpec {
        key,
        sheet,
        first,
        last,
        fps,
        looping,
    }
}

pub const CLIPS: [ClipSpec; 17] = [
    clip("sheriff-idle", "sheriff", 0, 3, 8.0, true),
    clip("sheriff-run", "sheriff", 4, 11, 12.0, true),
    clip("sheriff-jump", "sheriff", 12, 15, 8.0, false),
    clip("cowboy-idle", "cowboy", 0, 3, 8.0, true),
    clip("cowboy-run", "cowboy", 4, 11, 12.0, true),
    clip("cowboy-jump", "cowboy", 12, 15, 8.0, false),
    clip("cowgirl-idle", "cowgirl", 0, 3, 8.0, true),
    clip("cowgirl-run", "cowgirl", 4, 11, 12.0, true),
    clip("cowgirl-jump", "cowgirl", 12, 15, 8.0, false),
    clip("alien-idle", "alien-rustler", 0, 3, 8.0, true),
    clip("alien-run", "alien-rustler", 4, 11, 12.0, true),
    clip("alien-jump", "alien-rustler", 12, 15, 8.0, false),
    clip("drone-hover", "hovering-drone", 0, 3, 8.0, true),
    clip("drone-move", "hovering-drone", 4, 7, 12.0, true),
    clip("plasma-revolver-fire", "plasma-revolver", 0, 3, 14.0, false),
    clip("lasso-spin", "lasso", 0, 3, 10.0, true),
    clip("portal-spin", "portal", 0, 7, 12.0, true),
];

/// A registered clip: a contiguous range of atlas frames.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub sheet: String,
    pub first: usize,
    pub last: usize,
    pub fps: f32,
    pub looping: bool,
}

impl AnimationClip {
    pub fn frame_count(&self) -> usize {
        self.last - self.first + 1
    }
}

/// How a clip ended up registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Full,
    /// Frames were missing, frame 0 stands in for the whole clip
    SingleFrame,
}

/// Outcome of looking up a clip for playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Clip(&'a AnimationClip),
    /// The requested key was unusable, this is `default-anim`
    Fallback(&'a AnimationClip),
}

/// All registered clips, plus the frame count of every sheet.
#[derive(Resource, Debug, Default)]
pub struct AnimationLibrary {
    sheet_frames: HashMap<String, usize>,
    clips: HashMap<String, AnimationClip>,
}

impl AnimationLibrary {
    pub fn add_sheet(&mut self, key: &str, frames: usize) {
        self.sheet_frames.insert(key.to_string(), frames);
    }

    pub fn sheet_frames(&self, key: &str) -> Option<usize> {
        self.sheet_frames.get(key).copied()
    }

    /// Validate a clip against its sheet and add it.
    pub fn register(&mut self, spec: &ClipSpec) -> Result<Registration, AnimationError> {
        let available = self
            .sheet_frames(spec.sheet)
            .ok_or_else(|| AnimationError::UnknownSheet(spec.sheet.to_string()))?;
        if available == 0 {
            self.clips.remove(spec.key);
            return Err(AnimationError::EmptySheet(spec.sheet.to_string()));
        }

        let fits = spec.first <= spec.last && spec.last < available;
        let (first, last, registration) = if fits {
            (spec.first, spec.last, Registration::Full)
        } else {
            let err = AnimationError::FramesOutOfRange {
                key: spec.key.to_string(),
                last: spec.last,
                available,
            };
            warn!("{}, using a single frame", err);
            (0, 0, Registration::SingleFrame)
        };

        self.clips.insert(
            spec.key.to_string(),
            AnimationClip {
                sheet: spec.sheet.to_string(),
                first,
                last,
                fps: spec.fps,
                looping: spec.looping,
            },
        );
        Ok(registration)
    }

    /// Register every known clip plus `default-anim` from scratch.
    pub fn rebuild(&mut self) {
        self.clips.clear();
        let mut single = 0;
        for spec in &CLIPS {
            match self.register(spec) {
                Ok(Registration::Full) => {}
                Ok(Registration::SingleFrame) => single += 1,
                Err(e) => warn!("Skipping animation '{}': {}", spec.key, e),
            }
        }
        let fallback = clip(DEFAULT_ANIMATION, DEFAULT_SHEET, 0, 0, 1.0, false);
        if let Err(e) = self.register(&fallback) {
            warn!("No '{}' available: {}", DEFAULT_ANIMATION, e);
        }
        info!(
            "Registered {} animations ({} single-frame)",
            self.clips.len(),
            single
        );
    }

    pub fn get(&self, key: &str) -> Option<&AnimationClip> {
        self.clips.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }

    /// Look up a clip that passed validation.
    pub fn lookup(&self, key: &str, context: &AppContext) -> Result<&AnimationClip, AnimationError> {
        let clip = self
            .clips
            .get(key)
            .ok_or_else(|| AnimationError::UnknownClip(key.to_string()))?;
        if !context.is_animation_valid(key) {
            return Err(AnimationError::NotValidated(key.to_string()));
        }
        Ok(clip)
    }

    /// Look up a clip, falling back to `default-anim`.
    ///
    /// The error is the one for the requested key.
    pub fn resolve(&self, key: &str, context: &AppContext) -> Result<Resolved<'_>, AnimationError> {
        match self.lookup(key, context) {
            Ok(clip) => Ok(Resolved::Clip(clip)),
            Err(e) => self
                .lookup(DEFAULT_ANIMATION, context)
                .map(Resolved::Fallback)
                .map_err(|_| e),
        }
    }
}

/// Plays clips on an atlas sprite.
#[derive(Component, Debug, Default)]
pub struct SpriteAnimator {
    requested: Option<String>,
    clip: Option<AnimationClip>,
    frame: usize,
    elapsed: f32,
    paused: bool,
    finished: bool,
}

impl SpriteAnimator {
    /// Start a clip. Asking for the clip already playing changes nothing.
    ///
    /// Returns whether the requested clip itself is playing. An unusable
    /// key plays `default-anim` instead, or rests on frame 0.
    pub fn play(&mut self, key: &str, library: &AnimationLibrary, context: &AppContext) -> bool {
        if self.requested.as_deref() == Some(key) {
            return self.clip.is_some();
        }
        self.requested = Some(key.to_string());
        self.frame = 0;
        self.elapsed = 0.0;
        self.finished = false;

        match library.resolve(key, context) {
            Ok(Resolved::Clip(clip)) => {
                self.clip = Some(clip.clone());
                true
            }
            Ok(Resolved::Fallback(clip)) => {
                debug!("Animation '{}' unavailable, playing {}", key, DEFAULT_ANIMATION);
                self.clip = Some(clip.clone());
                false
            }
            Err(e) => {
                warn!("Cannot play animation: {}", e);
                self.stop_at_rest();
                false
            }
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop playback and rest on the first frame of the sheet.
    pub fn stop_at_rest(&mut self) {
        self.clip = None;
        self.frame = 0;
        self.elapsed = 0.0;
    }

    /// Atlas index to show.
    pub fn atlas_index(&self) -> usize {
        self.clip.as_ref().map_or(0, |clip| clip.first + self.frame)
    }

    /// Move the clock forward. Non-looping clips hold their last frame.
    pub fn advance(&mut self, delta_secs: f32) {
        let Some(clip) = self.clip.as_ref() else {
            return;
        };
        if self.paused || self.finished || clip.fps <= 0.0 {
            return;
        }

        let frame_time = 1.0 / clip.fps;
        let frames = clip.frame_count();
        self.elapsed += delta_secs;
        while self.elapsed >= frame_time {
            self.elapsed -= frame_time;
            if self.frame + 1 < frames {
                self.frame += 1;
            } else if clip.looping {
                self.frame = 0;
            } else {
                self.finished = true;
                break;
            }
        }
    }
}

/// Register sheets and clips and publish the valid keys.
pub fn register_animations(
    mut library: ResMut<AnimationLibrary>,
    mut context: ResMut<AppContext>,
) {
    for spec in SHEETS {
        library.add_sheet(spec.key, spec.frames as usize);
    }
    library.rebuild();
    context.set_valid_animations(library.keys().map(str::to_string));
}

/// Mark images as usable once loaded, and shrink sheets whose image
/// turned out narrower than declared.
pub fn track_loaded_images(
    mut events: EventReader<AssetEvent<Image>>,
    images: Res<Assets<Image>>,
    sprites: Option<ResMut<SpriteAssets>>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
    mut library: ResMut<AnimationLibrary>,
    mut context: ResMut<AppContext>,
) {
    let Some(mut sprites) = sprites else {
        return;
    };

    let mut changed = false;
    for event in events.read() {
        let AssetEvent::LoadedWithDependencies { id } = event else {
            continue;
        };
        if !sprites.mark_loaded(*id) {
            continue;
        }
        for spec in SHEETS {
            let Some(sheet) = sprites.sheet(spec.key) else {
                continue;
            };
            if sheet.image.id() != *id {
                continue;
            }
            let Some(image) = images.get(*id) else {
                continue;
            };

            let actual = frames_in_width(image.width(), spec.frame_size.x);
            if actual >= spec.frames {
                continue;
            }
            warn!(
                "Sheet '{}' has {} frames, expected {}",
                spec.key, actual, spec.frames
            );
            library.add_sheet(spec.key, actual as usize);
            let layout = TextureAtlasLayout::from_grid(spec.frame_size, actual.max(1), 1, None, None);
            layouts.insert(sheet.layout.id(), layout);
            changed = true;
        }
    }

    if changed {
        library.rebuild();
        context.set_valid_animations(library.keys().map(str::to_string));
    }
}

/// Advance animators and write the frame into the sprite's atlas.
///
/// A frame the atlas does not have stops the animation on frame 0.
pub fn animate_sprites(
    time: Res<Time>,
    layouts: Res<Assets<TextureAtlasLayout>>,
    mut query: Query<(Entity, &mut SpriteAnimator, &mut Sprite)>,
) {
    let dt = time.delta_secs();
    for (entity, mut animator, mut sprite) in query.iter_mut() {
        animator.advance(dt);
        let Some(atlas) = sprite.texture_atlas.as_mut() else {
            continue;
        };

        let index = animator.atlas_index();
        let available = layouts.get(&atlas.layout).map(|layout| layout.textures.len());
        match available {
            Some(count) if index >= count => {
                warn!(
                    "Frame {} out of range ({} frames) on {:?}, stopping animation",
                    index, count, entity
                );
                animator.stop_at_rest();
                atlas.index = 0;
            }
            _ => {
                if atlas.index != index {
                    atlas.index = index;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_with(sheets: &[(&str, usize)]) -> (AnimationLibrary, AppContext) {
        let mut library = AnimationLibrary::default();
        for (key, frames) in sheets {
            library.add_sheet(key, *frames);
        }
        library.rebuild();
        let mut context = AppContext::default();
        context.set_valid_animations(library.keys().map(str::to_string));
        (library, context)
    }

    #[test]
    fn clips_beyond_the_sheet_become_single_frames() {
        let mut library = AnimationLibrary::default();
        library.add_sheet("alien-rustler", 8);

        let run = clip("alien-run", "alien-rustler", 4, 11, 12.0, true);
        assert_eq!(library.register(&run), Ok(Registration::SingleFrame));
        let registered = library.get("alien-run").expect("registered");
        assert_eq!((registered.first, registered.last), (0, 0));

        let idle = clip("alien-idle", "alien-rustler", 0, 3, 8.0, true);
        assert_eq!(library.register(&idle), Ok(Registration::Full));
    }

    #[test]
    fn unknown_and_empty_sheets_are_rejected() {
        let mut library = AnimationLibrary::default();
        library.add_sheet("portal", 0);
        let spin = clip("portal-spin", "portal", 0, 7, 12.0, true);
        assert_eq!(
            library.register(&spin),
            Err(AnimationError::EmptySheet("portal".to_string()))
        );
        let lasso = clip("lasso-spin", "lasso", 0, 3, 10.0, true);
        assert_eq!(
            library.register(&lasso),
            Err(AnimationError::UnknownSheet("lasso".to_string()))
        );
    }

    #[test]
    fn unknown_key_falls_back_to_default() {
        let (library, context) = library_with(&[("sheriff", 16)]);
        let mut animator = SpriteAnimator::default();

        assert!(!animator.play("sheriff-slide", &library, &context));
        assert_eq!(animator.atlas_index(), 0);
        assert!(animator.clip.is_some());

        assert!(animator.play("sheriff-run", &library, &context));
        assert_eq!(animator.atlas_index(), 4);
    }

    #[test]
    fn without_default_the_animator_rests() {
        let (library, context) = library_with(&[("lasso", 4)]);
        let mut animator = SpriteAnimator::default();

        assert!(!animator.play("drone-hover", &library, &context));
        animator.advance(1.0);
        assert_eq!(animator.atlas_index(), 0);
        assert!(animator.clip.is_none());
    }

    #[test]
    fn unvalidated_clips_are_not_played() {
        let (library, _) = library_with(&[("sheriff", 16)]);
        let context = AppContext::default();
        assert_eq!(
            library.lookup("sheriff-run", &context),
            Err(AnimationError::NotValidated("sheriff-run".to_string()))
        );
    }

    #[test]
    fn looping_and_one_shot_playback() {
        let (library, context) = library_with(&[("sheriff", 16)]);

        let mut run = SpriteAnimator::default();
        run.play("sheriff-run", &library, &context);
        // 8 frames at 12 fps: one full loop plus one frame
        for _ in 0..9 {
            run.advance(1.0 / 12.0 + 0.0001);
        }
        assert_eq!(run.atlas_index(), 5);

        let mut jump = SpriteAnimator::default();
        jump.play("sheriff-jump", &library, &context);
        jump.advance(2.0);
        assert_eq!(jump.atlas_index(), 15);
    }

    #[test]
    fn replaying_the_same_clip_does_not_restart() {
        let (library, context) = library_with(&[("sheriff", 16)]);
        let mut animator = SpriteAnimator::default();
        animator.play("sheriff-idle", &library, &context);
        animator.advance(0.13);
        let index = animator.atlas_index();
        animator.play("sheriff-idle", &library, &context);
        assert_eq!(animator.atlas_index(), index);
    }

    #[test]
    fn paused_animator_holds_its_frame() {
        let (library, context) = library_with(&[("hovering-drone", 8)]);
        let mut animator = SpriteAnimator::default();
        animator.play("drone-hover", &library, &context);
        animator.pause();
        animator.advance(1.0);
        assert_eq!(animator.atlas_index(), 0);
        animator.resume();
        animator.advance(0.13);
        assert_eq!(animator.atlas_index(), 1);
    }

    #[test]
    fn out_of_range_frame_stops_on_frame_zero() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<TextureAtlasLayout>>()
            .add_systems(Update, animate_sprites);

        let (library, context) = library_with(&[("sheriff", 16)]);
        let mut animator = SpriteAnimator::default();
        animator.play("sheriff-jump", &library, &context);

        // The real image only holds 4 frames
        let layout = TextureAtlasLayout::from_grid(UVec2::splat(64), 4, 1, None, None);
        let layout = app
            .world_mut()
            .resource_mut::<Assets<TextureAtlasLayout>>()
            .add(layout);
        let sprite = Sprite::from_atlas_image(Handle::default(), TextureAtlas { layout, index: 0 });
        let entity = app.world_mut().spawn((animator, sprite)).id();

        app.update();

        let world = app.world();
        let sprite = world.get::<Sprite>(entity).expect("sprite");
        assert_eq!(sprite.texture_atlas.as_ref().map(|a| a.index), Some(0));
        let animator = world.get::<SpriteAnimator>(entity).expect("animator");
        assert!(animator.clip.is_none());
    }
}
