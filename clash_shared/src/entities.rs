//! Game entities: the player ship, bullets, enemies, stars and meteors.
//!
//! Every entity moves once per frame by a per-frame velocity. Integer rects
//! truncate fractional velocities, so a meteor with `vel.x = 0.7` never
//! drifts sideways; enemies keep a float position to avoid stalling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    collision::Bounded,
    config::{GameConfig, Size},
    input::KeySet,
    math::{truncate, Rect, Vec2},
};

/// Enemy ship class. Bigger ships are tougher, worth more and shoot back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Small,
    Medium,
    Large,
}

/// Static per-kind properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyStats {
    pub hp: i32,
    pub score: u32,
    pub can_shoot: bool,
    /// Damage of this kind's bullets.
    pub damage: i32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Small, EnemyKind::Medium, EnemyKind::Large];

    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Small => EnemyStats {
                hp: 1,
                score: 1,
                can_shoot: false,
                damage: 0,
            },
            EnemyKind::Medium => EnemyStats {
                hp: 3,
                score: 3,
                can_shoot: true,
                damage: 1,
            },
            EnemyKind::Large => EnemyStats {
                hp: 5,
                score: 5,
                can_shoot: true,
                damage: 2,
            },
        }
    }

    /// Size of the placeholder sprite drawn when no image is available.
    pub fn fallback_size(self) -> Size {
        match self {
            EnemyKind::Small => Size::new(40, 30),
            EnemyKind::Medium => Size::new(60, 30),
            EnemyKind::Large => Size::new(80, 40),
        }
    }

    /// File name of this kind's image inside `asset/enemy/`.
    pub fn image_file(self) -> &'static str {
        match self {
            EnemyKind::Small => "enemy1.png",
            EnemyKind::Medium => "enemy2.png",
            EnemyKind::Large => "enemy3.png",
        }
    }

    /// XP lost when this enemy rams the player.
    pub fn contact_damage(self) -> i32 {
        let stats = self.stats();
        if stats.can_shoot {
            stats.damage
        } else {
            1
        }
    }
}

/// Who fired a bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub xp: i32,
    pub max_xp: i32,
    pub speed: i32,
    /// Time of the last shot; `None` until the first one.
    pub last_fire_ms: Option<u64>,
}

impl Player {
    pub fn new(cfg: &GameConfig, size: Size) -> Self {
        Self {
            rect: Rect::from_center(cfg.width / 2, cfg.height - 80, size.w, size.h),
            xp: cfg.player_max_xp,
            max_xp: cfg.player_max_xp,
            speed: cfg.player_speed,
            last_fire_ms: None,
        }
    }

    /// Moves by the held keys and keeps the ship on the playfield.
    pub fn update(&mut self, held: KeySet, bounds: Rect) {
        let (vx, vy) = held.movement(self.speed);
        self.rect.translate(vx, vy);
        self.rect.clamp_within(bounds);
    }

    pub fn can_fire(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        self.last_fire_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= cooldown_ms)
    }

    pub fn fire(&mut self, now_ms: u64) {
        self.last_fire_ms = Some(now_ms);
    }

    /// Applies damage and reports whether the ship is destroyed. XP never
    /// drops below zero.
    pub fn damage(&mut self, amount: i32) -> bool {
        self.xp -= amount;
        if self.xp <= 0 {
            self.xp = 0;
            true
        } else {
            false
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.xp = (self.xp + amount).clamp(0, self.max_xp);
    }

    /// Remaining XP as a fraction of the maximum.
    pub fn xp_ratio(&self) -> f32 {
        if self.max_xp <= 0 {
            0.0
        } else {
            self.xp as f32 / self.max_xp as f32
        }
    }
}

impl Bounded for Player {
    fn rect(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub rect: Rect,
    pub vel: Vec2,
    pub owner: Owner,
    pub damage: i32,
}

impl Bullet {
    pub const SIZE: Size = Size::new(6, 12);

    pub fn new(center: (i32, i32), vel: Vec2, owner: Owner, damage: i32) -> Self {
        Self {
            rect: Rect::from_center(center.0, center.1, Self::SIZE.w, Self::SIZE.h),
            vel,
            owner,
            damage,
        }
    }

    pub fn update(&mut self) {
        self.rect.translate(truncate(self.vel.x), truncate(self.vel.y));
    }

    /// False once the bullet is entirely off the playfield.
    pub fn on_screen(&self, bounds: Rect) -> bool {
        !(self.rect.bottom() < bounds.top()
            || self.rect.top() > bounds.bottom()
            || self.rect.right() < bounds.left()
            || self.rect.left() > bounds.right())
    }
}

impl Bounded for Bullet {
    fn rect(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub rect: Rect,
    /// Sub-pixel centre.
    pub pos: Vec2,
    pub hp: i32,
    pub speed: f32,
    pub next_shot_ms: u64,
}

impl Enemy {
    pub fn new(kind: EnemyKind, rect: Rect, speed: f32, next_shot_ms: u64) -> Self {
        let (cx, cy) = rect.center();
        Self {
            kind,
            rect,
            pos: Vec2::new(cx as f32, cy as f32),
            hp: kind.stats().hp,
            speed,
            next_shot_ms,
        }
    }

    /// Steers toward `target` at constant speed.
    pub fn update(&mut self, target: (i32, i32)) {
        let dir = Vec2::new(target.0 as f32, target.1 as f32) - self.pos;
        if dir.length_squared() > 0.01 {
            self.pos += dir.normalize_or_zero() * self.speed;
            self.rect.set_center(truncate(self.pos.x), truncate(self.pos.y));
        }
    }

    /// False once the enemy has sunk well below the playfield.
    pub fn in_play(&self, bounds: Rect) -> bool {
        self.rect.top() <= bounds.bottom() + 50
    }

    /// Fires straight down when the shot timer has elapsed.
    pub fn maybe_shoot<R: Rng>(
        &mut self,
        now_ms: u64,
        rng: &mut R,
        cooldown_range: (u64, u64),
    ) -> Option<Bullet> {
        let stats = self.kind.stats();
        if !stats.can_shoot || now_ms < self.next_shot_ms {
            return None;
        }
        self.next_shot_ms = now_ms + rng.gen_range(cooldown_range.0..=cooldown_range.1);
        Some(Bullet::new(
            self.rect.midbottom(),
            Vec2::new(0.0, 4.0 + stats.damage as f32),
            Owner::Enemy,
            stats.damage,
        ))
    }

    /// Applies bullet damage and reports whether the enemy is destroyed.
    pub fn hit(&mut self, damage: i32) -> bool {
        self.hp -= damage;
        self.hp <= 0
    }
}

impl Bounded for Enemy {
    fn rect(&self) -> Rect {
        self.rect
    }
}

/// Falling pickup that restores XP.
#[derive(Debug, Clone)]
pub struct Star {
    pub rect: Rect,
    /// Alternates every `SPARK_INTERVAL_MS` for the sparkle effect.
    pub bright: bool,
    pub last_spark_ms: u64,
}

impl Star {
    pub const SIZE: Size = Size::new(32, 32);
    pub const SPEED: f32 = 1.6;
    pub const SPARK_INTERVAL_MS: u64 = 300;

    pub fn new(center: (i32, i32), now_ms: u64) -> Self {
        Self {
            rect: Rect::from_center(center.0, center.1, Self::SIZE.w, Self::SIZE.h),
            bright: false,
            last_spark_ms: now_ms,
        }
    }

    pub fn update(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_spark_ms) >= Self::SPARK_INTERVAL_MS {
            self.last_spark_ms = now_ms;
            self.bright = !self.bright;
        }
        self.rect.translate(0, truncate(Self::SPEED));
    }

    pub fn in_play(&self, bounds: Rect) -> bool {
        self.rect.top() <= bounds.bottom()
    }
}

impl Bounded for Star {
    fn rect(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone)]
pub struct Meteor {
    pub rect: Rect,
    pub vel: Vec2,
}

impl Meteor {
    pub fn new(center: (i32, i32), size: Size, vel: Vec2) -> Self {
        Self {
            rect: Rect::from_center(center.0, center.1, size.w, size.h),
            vel,
        }
    }

    pub fn update(&mut self) {
        self.rect.translate(truncate(self.vel.x), truncate(self.vel.y));
    }

    /// Meteors start off-screen, so they get a 50px margin on every side.
    pub fn in_play(&self, bounds: Rect) -> bool {
        !(self.rect.top() > bounds.bottom() + 50
            || self.rect.bottom() < bounds.top() - 50
            || self.rect.left() > bounds.right() + 50
            || self.rect.right() < bounds.left() - 50)
    }
}

impl Bounded for Meteor {
    fn rect(&self) -> Rect {
        self.rect
    }
}
