//! Configuration system.
//!
//! Loads game configuration from JSON strings/files. Every field has a default
//! so a partial file only overrides what it names.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::EnemyKind;

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("fps must be greater than zero")]
    ZeroFps,
    #[error("playfield must be at least 1x1, got {width}x{height}")]
    EmptyPlayfield { width: i32, height: i32 },
    #[error("player_max_xp must be greater than zero")]
    ZeroMaxXp,
    #[error("{name}: minimum {min} exceeds base {base}")]
    MinAboveBase {
        name: &'static str,
        min: u64,
        base: u64,
    },
    #[error("enemy_shoot_cooldown_ms range is inverted: {0} > {1}")]
    InvertedShootRange(u64, u64),
    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },
}

/// Sprite size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// Per-kind enemy sprite sizes, used when the kind's image is present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyImageSizes {
    pub small: Size,
    pub medium: Size,
    pub large: Size,
}

impl Default for EnemyImageSizes {
    fn default() -> Self {
        Self {
            small: Size::new(36, 36),
            medium: Size::new(56, 56),
            large: Size::new(80, 80),
        }
    }
}

impl EnemyImageSizes {
    pub fn for_kind(&self, kind: EnemyKind) -> Size {
        match kind {
            EnemyKind::Small => self.small,
            EnemyKind::Medium => self.medium,
            EnemyKind::Large => self.large,
        }
    }
}

/// Largest accepted playfield side, sprite side or per-frame speed.
pub const MAX_DIMENSION: i32 = 1 << 16;
/// Largest accepted XP amount (max XP, heal, damage).
pub const MAX_XP: i32 = 1 << 20;

fn check_range(name: &'static str, value: i32, min: i32, max: i32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

/// Root game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield width in pixels.
    pub width: i32,
    /// Playfield height in pixels.
    pub height: i32,
    /// Target frame rate.
    pub fps: u32,
    /// Player movement per frame on each axis.
    pub player_speed: i32,
    pub player_max_xp: i32,
    /// XP restored by a collected star.
    pub star_recover: i32,
    pub star_interval_ms: u64,
    pub meteor_interval_ms: u64,
    /// XP lost per meteor hit.
    pub meteor_damage: i32,
    pub enemy_base_spawn_ms: u64,
    pub enemy_min_spawn_ms: u64,
    pub enemy_spawn_decrease_per_score: u64,
    pub player_fire_cooldown_ms: u64,
    pub player_min_fire_cooldown_ms: u64,
    pub player_fire_cooldown_decrease_per_score: u64,
    /// Inclusive range between two shots of the same enemy.
    pub enemy_shoot_cooldown_ms: (u64, u64),
    pub enemy_image_sizes: EnemyImageSizes,
    /// Directory containing `asset/`.
    pub asset_root: String,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fps: 60,
            player_speed: 4,
            player_max_xp: 100,
            star_recover: 20,
            star_interval_ms: 10_000,
            meteor_interval_ms: 10_000,
            meteor_damage: 2,
            enemy_base_spawn_ms: 1200,
            enemy_min_spawn_ms: 250,
            enemy_spawn_decrease_per_score: 6,
            player_fire_cooldown_ms: 350,
            player_min_fire_cooldown_ms: 150,
            player_fire_cooldown_decrease_per_score: 1,
            enemy_shoot_cooldown_ms: (1000, 2200),
            enemy_image_sizes: EnemyImageSizes::default(),
            asset_root: ".".to_string(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::EmptyPlayfield {
                width: self.width,
                height: self.height,
            });
        }
        if self.player_max_xp <= 0 {
            return Err(ConfigError::ZeroMaxXp);
        }
        // Off-screen spawn margins and movement are plain i32 arithmetic.
        check_range("width", self.width, 1, MAX_DIMENSION)?;
        check_range("height", self.height, 1, MAX_DIMENSION)?;
        check_range("player_speed", self.player_speed, 0, MAX_DIMENSION)?;
        check_range("player_max_xp", self.player_max_xp, 1, MAX_XP)?;
        check_range("star_recover", self.star_recover, 0, MAX_XP)?;
        check_range("meteor_damage", self.meteor_damage, 0, MAX_XP)?;
        for (name, size) in [
            ("enemy_image_sizes.small", self.enemy_image_sizes.small),
            ("enemy_image_sizes.medium", self.enemy_image_sizes.medium),
            ("enemy_image_sizes.large", self.enemy_image_sizes.large),
        ] {
            check_range(name, size.w, 1, MAX_DIMENSION)?;
            check_range(name, size.h, 1, MAX_DIMENSION)?;
        }
        if self.enemy_min_spawn_ms > self.enemy_base_spawn_ms {
            return Err(ConfigError::MinAboveBase {
                name: "enemy_min_spawn_ms",
                min: self.enemy_min_spawn_ms,
                base: self.enemy_base_spawn_ms,
            });
        }
        if self.player_min_fire_cooldown_ms > self.player_fire_cooldown_ms {
            return Err(ConfigError::MinAboveBase {
                name: "player_min_fire_cooldown_ms",
                min: self.player_min_fire_cooldown_ms,
                base: self.player_fire_cooldown_ms,
            });
        }
        let (lo, hi) = self.enemy_shoot_cooldown_ms;
        if lo > hi {
            return Err(ConfigError::InvertedShootRange(lo, hi));
        }
        Ok(())
    }

    /// Milliseconds between enemy spawns at the given score.
    pub fn enemy_spawn_interval_ms(&self, score: u32) -> u64 {
        decay(
            self.enemy_base_spawn_ms,
            self.enemy_spawn_decrease_per_score,
            self.enemy_min_spawn_ms,
            score,
        )
    }

    /// Player fire cooldown at the given score.
    pub fn fire_cooldown_ms(&self, score: u32) -> u64 {
        decay(
            self.player_fire_cooldown_ms,
            self.player_fire_cooldown_decrease_per_score,
            self.player_min_fire_cooldown_ms,
            score,
        )
    }
}

/// `clamp(base - score * per_score, min, base)` without underflow.
fn decay(base: u64, per_score: u64, min: u64, score: u32) -> u64 {
    base.saturating_sub(u64::from(score).saturating_mul(per_score))
        .clamp(min.min(base), base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json_str(r#"{ "fps": 30, "seed": 7 }"#).unwrap();
        assert_eq!(cfg.fps, 30);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.enemy_shoot_cooldown_ms, (1000, 2200));
        assert_eq!(cfg.enemy_image_sizes.large, Size::new(80, 80));
    }

    #[test]
    fn spawn_interval_shrinks_with_score_and_clamps() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.enemy_spawn_interval_ms(0), 1200);
        assert_eq!(cfg.enemy_spawn_interval_ms(50), 900);
        assert_eq!(cfg.enemy_spawn_interval_ms(1000), 250);
    }

    #[test]
    fn fire_cooldown_clamps_at_minimum() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.fire_cooldown_ms(0), 350);
        assert_eq!(cfg.fire_cooldown_ms(100), 250);
        assert_eq!(cfg.fire_cooldown_ms(200), 150);
        assert_eq!(cfg.fire_cooldown_ms(u32::MAX), 150);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert_eq!(GameConfig::default().validate(), Ok(()));

        let cfg = GameConfig {
            fps: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroFps));

        let cfg = GameConfig {
            enemy_shoot_cooldown_ms: (3000, 1000),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvertedShootRange(3000, 1000)));

        let cfg = GameConfig {
            enemy_min_spawn_ms: 5000,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MinAboveBase { name: "enemy_min_spawn_ms", .. })
        ));
    }

    #[test]
    fn validate_rejects_oversized_values() {
        let cfg = GameConfig {
            width: i32::MAX,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::OutOfRange {
                name: "width",
                value: i32::MAX,
                min: 1,
                max: MAX_DIMENSION,
            })
        );

        let cfg = GameConfig {
            player_speed: i32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { name: "player_speed", .. })
        ));

        let cfg = GameConfig {
            meteor_damage: -5,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { name: "meteor_damage", .. })
        ));

        let cfg = GameConfig {
            width: MAX_DIMENSION,
            height: MAX_DIMENSION,
            player_speed: MAX_DIMENSION,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clash.json");
        std::fs::write(&path, r#"{ "width": 640, "height": 480 }"#).unwrap();
        let cfg = GameConfig::load(&path).unwrap();
        assert_eq!((cfg.width, cfg.height), (640, 480));

        let err = GameConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("read config"));
    }
}
