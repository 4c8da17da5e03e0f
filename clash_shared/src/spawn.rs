//! Spawning rules and difficulty curves.
//!
//! Enemy variety and speed grow with score; spawn timing lives on
//! `GameConfig` because it is tunable.

use rand::{seq::SliceRandom, Rng};

use crate::{
    config::{GameConfig, Size},
    entities::{Enemy, EnemyKind, Meteor, Star},
    math::{Rect, Vec2},
};

/// Enemy kinds that may appear at the given score.
pub fn enemy_kinds_for_score(score: u32) -> &'static [EnemyKind] {
    match score {
        0..=19 => &[EnemyKind::Small],
        20..=59 => &[EnemyKind::Small, EnemyKind::Medium],
        _ => &EnemyKind::ALL,
    }
}

/// Base enemy speed in pixels per frame.
pub fn enemy_speed_for_score(score: u32) -> f32 {
    0.6 + 0.5 * (1.0 + score as f32 / 40.0)
}

/// Creates an enemy just above the top edge.
pub fn spawn_enemy<R: Rng>(
    cfg: &GameConfig,
    score: u32,
    sizes: impl Fn(EnemyKind) -> Size,
    now_ms: u64,
    rng: &mut R,
) -> Enemy {
    let kind = *enemy_kinds_for_score(score)
        .choose(rng)
        .unwrap_or(&EnemyKind::Small);
    let speed = enemy_speed_for_score(score) * (1.0 + 0.02 * rng.gen::<f32>());
    let size = sizes(kind);
    let x = rng.gen_range(20..=(cfg.width - 20).max(20));
    let top = -rng.gen_range(10..=80);
    let (lo, hi) = cfg.enemy_shoot_cooldown_ms;
    let first_shot = now_ms + rng.gen_range(lo..=hi);
    Enemy::new(kind, Rect::from_midtop(x, top, size.w, size.h), speed, first_shot)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

const EDGES: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

/// Creates a meteor just outside a random edge, aimed into the opposite half
/// of the playfield.
pub fn spawn_meteor<R: Rng>(cfg: &GameConfig, size: Size, rng: &mut R) -> Meteor {
    let (w, h) = (cfg.width, cfg.height);
    let edge = *EDGES.choose(rng).unwrap_or(&Edge::Top);
    let speed = rng.gen_range(2.0f32..4.0);

    let (start, target) = match edge {
        Edge::Top => (
            (rng.gen_range(0..=w), -20),
            (rng.gen_range(0..=w), rng.gen_range(h / 2..=h)),
        ),
        Edge::Bottom => (
            (rng.gen_range(0..=w), h + 20),
            (rng.gen_range(0..=w), rng.gen_range(0..=h / 2)),
        ),
        Edge::Left => (
            (-20, rng.gen_range(0..=h)),
            (rng.gen_range(w / 2..=w), rng.gen_range(0..=h)),
        ),
        Edge::Right => (
            (w + 20, rng.gen_range(0..=h)),
            (rng.gen_range(0..=w / 2), rng.gen_range(0..=h)),
        ),
    };

    let dir = Vec2::new((target.0 - start.0) as f32, (target.1 - start.1) as f32);
    let dir = if dir.length_squared() == 0.0 {
        Vec2::new(0.0, 1.0)
    } else {
        dir.normalize_or_zero()
    };
    Meteor::new(start, size, dir * speed)
}

/// Creates a star pickup just above the top edge.
pub fn spawn_star<R: Rng>(cfg: &GameConfig, now_ms: u64, rng: &mut R) -> Star {
    let x = rng.gen_range(20..=(cfg.width - 20).max(20));
    Star::new((x, -10), now_ms)
}
