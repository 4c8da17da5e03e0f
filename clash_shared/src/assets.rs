//! Asset discovery.
//!
//! Assets live under `<root>/asset/`:
//!
//! ```text
//! asset/
//!   character/        selectable player ships (any image)
//!   enemy/            enemy1.png, enemy2.png, enemy3.png (small/medium/large),
//!                     stone1.png, stone2.png (meteors), other enemy images
//!   audio/            bgmusic, button, shoot (.mp3, .ogg or .wav)
//!   cover_bg.png  game_bg.png  icon.ico
//! ```
//!
//! Nothing here is required. Missing files are logged and the game falls
//! back to placeholder sprite sizes and silent cues.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    config::{GameConfig, Size},
    entities::EnemyKind,
};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Audio containers in order of preference. Shipping more than one keeps
/// every browser covered.
pub const AUDIO_EXTENSIONS: [&str; 3] = ["mp3", "ogg", "wav"];

const METEOR_FILES: [&str; 2] = ["stone1.png", "stone2.png"];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("read asset directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolves asset paths against a root directory.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    root: PathBuf,
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(cfg: &GameConfig) -> Self {
        Self::new(&cfg.asset_root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    /// Locates a file relative to the root, then relative to `root/asset`.
    pub fn find(&self, rel: impl AsRef<Path>) -> Option<PathBuf> {
        let rel = rel.as_ref();
        [self.resolve(rel), self.root.join("asset").join(rel)]
            .into_iter()
            .find(|p| p.is_file())
    }
}

/// Looks up a sound by stem, trying each supported container.
fn find_audio(paths: &AssetPaths, stem: &str) -> Option<PathBuf> {
    AUDIO_EXTENSIONS
        .iter()
        .find_map(|ext| paths.find(format!("asset/audio/{stem}.{ext}")))
}

fn find_enemy_file(paths: &AssetPaths, file: &str) -> Option<PathBuf> {
    paths.find(format!("asset/enemy/{file}"))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by name. A missing directory is
/// an empty listing.
fn list_images(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let read_err = |source: io::Error| AssetError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut images = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() && is_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

fn note_missing(what: &str, found: &Option<PathBuf>) {
    if found.is_none() {
        info!(asset = what, "Asset not found, continuing without it");
    }
}

/// Everything found under the asset root.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    pub characters: Vec<PathBuf>,
    /// Every image in `asset/enemy/`.
    pub enemy_images: Vec<PathBuf>,
    pub small_enemy: Option<PathBuf>,
    pub medium_enemy: Option<PathBuf>,
    pub large_enemy: Option<PathBuf>,
    pub meteors: Vec<PathBuf>,
    pub music: Option<PathBuf>,
    pub button_sound: Option<PathBuf>,
    pub shoot_sound: Option<PathBuf>,
    pub cover_background: Option<PathBuf>,
    pub game_background: Option<PathBuf>,
    pub icon: Option<PathBuf>,
}

impl AssetCatalog {
    pub fn scan(paths: &AssetPaths) -> Result<Self, AssetError> {
        let catalog = Self {
            characters: list_images(&paths.resolve("asset/character"))?,
            enemy_images: list_images(&paths.resolve("asset/enemy"))?,
            small_enemy: find_enemy_file(paths, EnemyKind::Small.image_file()),
            medium_enemy: find_enemy_file(paths, EnemyKind::Medium.image_file()),
            large_enemy: find_enemy_file(paths, EnemyKind::Large.image_file()),
            meteors: METEOR_FILES
                .iter()
                .filter_map(|f| find_enemy_file(paths, f))
                .collect(),
            music: find_audio(paths, "bgmusic"),
            button_sound: find_audio(paths, "button"),
            shoot_sound: find_audio(paths, "shoot"),
            cover_background: paths.find("asset/cover_bg.png"),
            game_background: paths.find("asset/game_bg.png"),
            icon: paths.find("asset/icon.ico"),
        };

        note_missing("background music", &catalog.music);
        note_missing("button sound", &catalog.button_sound);
        note_missing("shoot sound", &catalog.shoot_sound);
        note_missing("cover background", &catalog.cover_background);
        note_missing("game background", &catalog.game_background);
        note_missing("window icon", &catalog.icon);
        if catalog.characters.is_empty() {
            info!("No character images found, using the default ship");
        }

        debug!(
            root = %paths.root().display(),
            characters = catalog.characters.len(),
            enemy_images = catalog.enemy_images.len(),
            meteors = catalog.meteors.len(),
            "Asset catalog scanned"
        );
        Ok(catalog)
    }

    pub fn enemy_image(&self, kind: EnemyKind) -> Option<&Path> {
        match kind {
            EnemyKind::Small => self.small_enemy.as_deref(),
            EnemyKind::Medium => self.medium_enemy.as_deref(),
            EnemyKind::Large => self.large_enemy.as_deref(),
        }
    }

    /// Collision sizes implied by which images are present.
    pub fn sprite_sizes(&self, cfg: &GameConfig) -> SpriteSizes {
        let enemy = |kind: EnemyKind| {
            if self.enemy_image(kind).is_some() {
                cfg.enemy_image_sizes.for_kind(kind)
            } else if !self.enemy_images.is_empty() {
                Size::new(40, 40)
            } else {
                kind.fallback_size()
            }
        };
        SpriteSizes {
            player: if self.characters.is_empty() {
                Size::new(48, 48)
            } else {
                Size::new(56, 56)
            },
            small_enemy: enemy(EnemyKind::Small),
            medium_enemy: enemy(EnemyKind::Medium),
            large_enemy: enemy(EnemyKind::Large),
            meteor: if self.meteors.is_empty() {
                Size::new(40, 40)
            } else {
                Size::new(48, 48)
            },
        }
    }
}

/// Sprite sizes for collision and drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSizes {
    pub player: Size,
    pub small_enemy: Size,
    pub medium_enemy: Size,
    pub large_enemy: Size,
    pub meteor: Size,
}

impl SpriteSizes {
    pub fn enemy(&self, kind: EnemyKind) -> Size {
        match kind {
            EnemyKind::Small => self.small_enemy,
            EnemyKind::Medium => self.medium_enemy,
            EnemyKind::Large => self.large_enemy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn empty_root_scans_to_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = AssetCatalog::scan(&AssetPaths::new(dir.path())).unwrap();
        assert!(catalog.characters.is_empty());
        assert!(catalog.music.is_none());

        let sizes = catalog.sprite_sizes(&GameConfig::default());
        assert_eq!(sizes.player, Size::new(48, 48));
        assert_eq!(sizes.enemy(EnemyKind::Large), Size::new(80, 40));
        assert_eq!(sizes.meteor, Size::new(40, 40));
    }

    #[test]
    fn scan_finds_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "asset/character/ship_b.png");
        touch(root, "asset/character/ship_a.PNG");
        touch(root, "asset/character/readme.txt");
        touch(root, "asset/enemy/enemy3.png");
        touch(root, "asset/enemy/stone2.png");
        touch(root, "asset/audio/shoot.ogg");
        touch(root, "asset/audio/button.mp3");
        touch(root, "asset/audio/button.wav");
        touch(root, "asset/cover_bg.png");

        let catalog = AssetCatalog::scan(&AssetPaths::new(root)).unwrap();
        let names: Vec<_> = catalog
            .characters
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["ship_a.PNG", "ship_b.png"]);
        assert_eq!(catalog.enemy_images.len(), 2);
        assert!(catalog.large_enemy.is_some());
        assert!(catalog.small_enemy.is_none());
        assert_eq!(catalog.meteors.len(), 1);
        assert!(catalog.shoot_sound.as_ref().unwrap().ends_with("shoot.ogg"));
        assert!(catalog.button_sound.as_ref().unwrap().ends_with("button.mp3"));
        assert!(catalog.cover_background.is_some());
        assert!(catalog.game_background.is_none());

        let sizes = catalog.sprite_sizes(&GameConfig::default());
        assert_eq!(sizes.player, Size::new(56, 56));
        assert_eq!(sizes.enemy(EnemyKind::Large), Size::new(80, 80));
        assert_eq!(sizes.enemy(EnemyKind::Small), Size::new(40, 40));
        assert_eq!(sizes.meteor, Size::new(48, 48));
    }

    #[test]
    fn find_falls_back_to_asset_dir() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "asset/icon.ico");
        let paths = AssetPaths::new(dir.path());
        assert_eq!(paths.find("icon.ico"), Some(dir.path().join("asset/icon.ico")));
        assert!(paths.find("nope.ico").is_none());
    }
}
