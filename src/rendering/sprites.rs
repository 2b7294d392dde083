//! Sprite sheet and image registry.
//!
//! Every sheet is a single row of equally sized frames. The grid is
//! declared here and checked against the real image once it loads, so a
//! sheet shipped with fewer frames than expected only loses the clips
//! that need the missing frames.
//!
//! Handles are only handed out once their image has finished loading.
//! Until then, and forever if the file is missing, callers get `None`
//! and draw a flat coloured placeholder instead.

use std::collections::{HashMap, HashSet};

use bevy::asset::LoadState;
use bevy::prelude::*;

/// A sprite sheet as the game expects to find it.
#[derive(Debug, Clone, Copy)]
pub struct SheetSpec {
    pub key: &'static str,
    pub frame_size: UVec2,
    pub frames: u32,
}

const fn sheet(key: &'static str, width: u32, height: u32, frames: u32) -> SheetSpec {
    SheetSpec {
        key,
        frame_size: UVec2::new(width, height),
        frames,
    }
}

pub const SHEETS: [SheetSpec; 8] = [
    sheet("sheriff", 64, 64, 16),
    sheet("cowboy", 64, 64, 16),
    sheet("cowgirl", 64, 64, 16),
    sheet("plasma-revolver", 32, 16, 4),
    sheet("lasso", 48, 48, 4),
    sheet("alien-rustler", 64, 64, 16),
    sheet("hovering-drone", 48, 48, 8),
    sheet("portal", 64, 64, 8),
];

/// Plain images: terrain, backgrounds, HUD decoration.
pub const IMAGES: [&str; 6] = [
    "ground",
    "platform",
    "bg-far",
    "bg-mid",
    "health-bar",
    "ammo-indicator",
];

fn image_path(key: &str) -> String {
    format!("images/{}.png", key)
}

/// A loaded sheet: the image and the atlas layout cutting it into frames.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub image: Handle<Image>,
    pub layout: Handle<TextureAtlasLayout>,
    pub frame_size: UVec2,
    pub frames: u32,
}

/// Handles to every sheet and image, keyed by name.
#[derive(Resource, Debug, Default)]
pub struct SpriteAssets {
    sheets: HashMap<String, SpriteSheet>,
    images: HashMap<String, Handle<Image>>,
    loaded: HashSet<AssetId<Image>>,
}

impl SpriteAssets {
    pub fn insert_sheet(&mut self, key: &str, sheet: SpriteSheet) {
        self.sheets.insert(key.to_string(), sheet);
    }

    pub fn insert_image(&mut self, key: &str, image: Handle<Image>) {
        self.images.insert(key.to_string(), image);
    }

    pub fn sheet(&self, key: &str) -> Option<&SpriteSheet> {
        self.sheets.get(key)
    }

    /// Handle of a plain image or of a sheet's image, loaded or not.
    fn handle(&self, key: &str) -> Option<&Handle<Image>> {
        self.images
            .get(key)
            .or_else(|| self.sheets.get(key).map(|sheet| &sheet.image))
    }

    /// Record that an image finished loading. Returns false for images
    /// this registry does not know.
    pub fn mark_loaded(&mut self, id: AssetId<Image>) -> bool {
        let known = self.images.values().any(|handle| handle.id() == id)
            || self.sheets.values().any(|sheet| sheet.image.id() == id);
        if known {
            self.loaded.insert(id);
        }
        known
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.handle(key)
            .is_some_and(|handle| self.loaded.contains(&handle.id()))
    }

    /// The image for `key`, only once it has finished loading.
    pub fn image(&self, key: &str) -> Option<Handle<Image>> {
        self.handle(key)
            .filter(|handle| self.loaded.contains(&handle.id()))
            .cloned()
    }

    /// A sprite showing frame 0 of a loaded sheet.
    pub fn atlas_sprite(&self, key: &str) -> Option<Sprite> {
        let sheet = self.sheets.get(key)?;
        if !self.loaded.contains(&sheet.image.id()) {
            return None;
        }
        Some(Sprite::from_atlas_image(
            sheet.image.clone(),
            TextureAtlas {
                layout: sheet.layout.clone(),
                index: 0,
            },
        ))
    }
}

/// Queue every sheet and image for loading.
pub fn load_sprite_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    let mut sprites = SpriteAssets::default();

    for spec in SHEETS {
        let layout =
            TextureAtlasLayout::from_grid(spec.frame_size, spec.frames, 1, None, None);
        sprites.insert_sheet(
            spec.key,
            SpriteSheet {
                image: asset_server.load(image_path(spec.key)),
                layout: layouts.add(layout),
                frame_size: spec.frame_size,
                frames: spec.frames,
            },
        );
    }
    for key in IMAGES {
        sprites.insert_image(key, asset_server.load(image_path(key)));
    }

    info!(
        "Queued {} sprite sheets and {} images",
        SHEETS.len(),
        IMAGES.len()
    );
    commands.insert_resource(sprites);
}

/// Frames that actually fit in an image of the given width.
pub fn frames_in_width(image_width: u32, frame_width: u32) -> u32 {
    if frame_width == 0 {
        0
    } else {
        image_width / frame_width
    }
}

/// Log images that failed to load, once everything has settled.
/// The game keeps running on fallbacks.
pub fn report_failed_images(
    sprites: Option<Res<SpriteAssets>>,
    asset_server: Res<AssetServer>,
    mut done: Local<bool>,
) {
    if *done {
        return;
    }
    let Some(sprites) = sprites else {
        return;
    };

    let keys = SHEETS.iter().map(|s| s.key).chain(IMAGES);
    let mut failed = Vec::new();
    for key in keys {
        let Some(handle) = sprites.handle(key) else {
            continue;
        };
        match asset_server.load_state(handle.id()) {
            LoadState::Loading | LoadState::NotLoaded => return,
            LoadState::Failed(err) => failed.push((key, err)),
            LoadState::Loaded => {}
        }
    }

    for (key, err) in &failed {
        warn!("Image '{}' failed to load, using fallbacks: {}", key, err);
    }
    *done = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_have_no_sprite() {
        let sprites = SpriteAssets::default();
        assert!(sprites.atlas_sprite("sheriff").is_none());
        assert!(sprites.image("ground").is_none());
    }

    fn lasso_sheet() -> SpriteSheet {
        SpriteSheet {
            image: Handle::default(),
            layout: Handle::default(),
            frame_size: UVec2::new(48, 48),
            frames: 4,
        }
    }

    #[test]
    fn sheets_are_withheld_until_loaded() {
        let mut sprites = SpriteAssets::default();
        sprites.insert_sheet("lasso", lasso_sheet());

        assert!(sprites.image("lasso").is_none());
        assert!(sprites.atlas_sprite("lasso").is_none());
        assert!(!sprites.is_loaded("lasso"));

        assert!(sprites.mark_loaded(lasso_sheet().image.id()));
        assert!(sprites.image("lasso").is_some());
        let sprite = sprites.atlas_sprite("lasso").expect("sheet loaded");
        assert_eq!(sprite.texture_atlas.map(|atlas| atlas.index), Some(0));
    }

    #[test]
    fn unknown_images_are_not_marked() {
        let mut sprites = SpriteAssets::default();
        sprites.insert_sheet("lasso", lasso_sheet());
        assert!(!sprites.mark_loaded(AssetId::<Image>::invalid()));
        assert!(!sprites.is_loaded("lasso"));
    }

    #[test]
    fn short_images_hold_fewer_frames() {
        assert_eq!(frames_in_width(1024, 64), 16);
        assert_eq!(frames_in_width(500, 64), 7);
        assert_eq!(frames_in_width(1, 64), 0);
    }
}
