//! The game: scene machine, per-frame update and scene drawing.
//!
//! Flow: `Start` → (Play button) → `Select` → (Confirm) → `Play` → (XP hits
//! zero) → `GameOver` → (Play Again) → `Play`.
//!
//! Determinism notes:
//! - All randomness comes from one seeded `StdRng`.
//! - Time is whatever the caller passes to `run_frame`; nothing here reads
//!   the wall clock.
//! - Groups iterate in insertion order.

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    assets::{AssetCatalog, SpriteSizes},
    collision::{collide_one, group_collide},
    config::{ConfigError, GameConfig},
    ecs::{EntityAllocator, Group},
    entities::{Bullet, Enemy, Meteor, Owner, Player, Star},
    event::{DamageCause, EventQueue, GameEvent, SoundCue},
    input::{FrameInput, InputEvent, Key, KeySet, MouseButton},
    math::{Rect, Vec2},
    render::{Color, FontSize, RenderBackend, SpriteKind},
    spawn,
    ui::Layout,
};

/// Player bullet velocity in pixels per frame.
const PLAYER_BULLET_VEL: Vec2 = Vec2::new(0.0, -8.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scene {
    Start,
    Select,
    Play,
    GameOver,
}

/// Whether the host loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

pub struct Game {
    cfg: GameConfig,
    catalog: AssetCatalog,
    sizes: SpriteSizes,
    layout: Layout,
    bounds: Rect,
    rng: StdRng,
    ids: EntityAllocator,
    events: EventQueue,

    scene: Scene,
    selected_character: usize,
    now_ms: u64,

    player: Player,
    bullets: Group<Bullet>,
    enemy_bullets: Group<Bullet>,
    enemies: Group<Enemy>,
    stars: Group<Star>,
    meteors: Group<Meteor>,
    score: u32,
    enemy_spawn_timer: u64,
    star_timer: u64,
    meteor_timer: u64,
    game_over_at: Option<u64>,
}

impl Game {
    pub fn new(cfg: GameConfig, catalog: AssetCatalog) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let sizes = catalog.sprite_sizes(&cfg);
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let player = Player::new(&cfg, sizes.player);
        Ok(Self {
            layout: Layout::new(&cfg),
            bounds: Rect::new(0, 0, cfg.width, cfg.height),
            sizes,
            catalog,
            rng,
            ids: EntityAllocator::default(),
            events: EventQueue::default(),
            scene: Scene::Start,
            selected_character: 0,
            now_ms: 0,
            player,
            bullets: Group::new(),
            enemy_bullets: Group::new(),
            enemies: Group::new(),
            stars: Group::new(),
            meteors: Group::new(),
            score: 0,
            enemy_spawn_timer: 0,
            star_timer: 0,
            meteor_timer: 0,
            game_over_at: None,
            cfg,
        })
    }

    /// Runs one frame: input events, update (in `Play`), then drawing.
    pub fn run_frame(
        &mut self,
        input: &FrameInput,
        now_ms: u64,
        renderer: &mut dyn RenderBackend,
    ) -> FrameOutcome {
        self.now_ms = now_ms;
        for event in &input.events {
            if self.handle_event(event) == FrameOutcome::Quit {
                return FrameOutcome::Quit;
            }
        }

        match self.scene {
            Scene::Start => self.draw_start(renderer),
            Scene::Select => self.draw_select(renderer),
            Scene::Play => {
                self.update_play(input.held, now_ms);
                self.draw_play(renderer);
            }
            Scene::GameOver => self.draw_gameover(renderer),
        }
        FrameOutcome::Continue
    }

    /// Starts a fresh round with the selected ship.
    pub fn reset(&mut self) {
        let now = self.now_ms;
        self.player = Player::new(&self.cfg, self.sizes.player);
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.enemies.clear();
        self.stars.clear();
        self.meteors.clear();
        self.score = 0;
        self.enemy_spawn_timer = now;
        self.star_timer = now;
        self.meteor_timer = now;
        self.game_over_at = None;
    }

    fn set_scene(&mut self, to: Scene) {
        if self.scene != to {
            debug!(from = ?self.scene, to = ?to, "Scene change");
            self.events.push(GameEvent::SceneChanged {
                from: self.scene,
                to,
            });
            self.scene = to;
        }
    }

    fn start_round(&mut self) {
        self.events.push(GameEvent::Sound(SoundCue::Button));
        self.reset();
        self.set_scene(Scene::Play);
    }

    fn handle_event(&mut self, event: &InputEvent) -> FrameOutcome {
        let click = match *event {
            InputEvent::Quit => return FrameOutcome::Quit,
            InputEvent::MouseDown {
                x,
                y,
                button: MouseButton::Left,
            } => Some((x, y)),
            _ => None,
        };

        match self.scene {
            Scene::Start => {
                if let Some((x, y)) = click {
                    if self.layout.play.clicked(x, y) {
                        self.events.push(GameEvent::Sound(SoundCue::Button));
                        self.set_scene(Scene::Select);
                    }
                }
            }
            Scene::Select => {
                if let Some((x, y)) = click {
                    if self.layout.confirm.clicked(x, y) {
                        self.start_round();
                    }
                }
                if let InputEvent::KeyDown { key } = *event {
                    self.cycle_character(key);
                }
            }
            Scene::GameOver => {
                if let Some((x, y)) = click {
                    if self.layout.play_again.clicked(x, y) {
                        self.start_round();
                    }
                }
            }
            Scene::Play => {}
        }
        FrameOutcome::Continue
    }

    fn cycle_character(&mut self, key: Key) {
        let count = self.catalog.characters.len();
        if count == 0 {
            return;
        }
        match key {
            Key::Left | Key::A => {
                self.selected_character = (self.selected_character + count - 1) % count;
            }
            Key::Right | Key::D => {
                self.selected_character = (self.selected_character + 1) % count;
            }
            _ => {}
        }
    }

    fn update_play(&mut self, held: KeySet, now: u64) {
        self.player.update(held, self.bounds);

        if held.fire() {
            let cooldown = self.cfg.fire_cooldown_ms(self.score);
            if self.player.can_fire(now, cooldown) {
                let bullet = Bullet::new(self.player.rect.midtop(), PLAYER_BULLET_VEL, Owner::Player, 1);
                self.bullets.insert(self.ids.next(), bullet);
                self.player.fire(now);
                self.events.push(GameEvent::Sound(SoundCue::Shoot));
            }
        }

        self.run_spawn_timers(now);
        self.advance_entities(now);
        self.resolve_collisions();
    }

    fn run_spawn_timers(&mut self, now: u64) {
        let interval = self.cfg.enemy_spawn_interval_ms(self.score);
        if now.saturating_sub(self.enemy_spawn_timer) >= interval {
            let sizes = self.sizes;
            let enemy = spawn::spawn_enemy(&self.cfg, self.score, |k| sizes.enemy(k), now, &mut self.rng);
            debug!(kind = ?enemy.kind, x = enemy.rect.x, "Enemy spawned");
            self.enemies.insert(self.ids.next(), enemy);
            self.enemy_spawn_timer = now;
        }

        if now.saturating_sub(self.star_timer) >= self.cfg.star_interval_ms {
            let star = spawn::spawn_star(&self.cfg, now, &mut self.rng);
            self.stars.insert(self.ids.next(), star);
            self.star_timer = now;
        }

        if now.saturating_sub(self.meteor_timer) >= self.cfg.meteor_interval_ms {
            let meteor = spawn::spawn_meteor(&self.cfg, self.sizes.meteor, &mut self.rng);
            self.meteors.insert(self.ids.next(), meteor);
            self.meteor_timer = now;
        }
    }

    fn advance_entities(&mut self, now: u64) {
        let bounds = self.bounds;

        for (_, bullet) in self.bullets.iter_mut() {
            bullet.update();
        }
        self.bullets.retain(|b| b.on_screen(bounds));

        for (_, bullet) in self.enemy_bullets.iter_mut() {
            bullet.update();
        }
        self.enemy_bullets.retain(|b| b.on_screen(bounds));

        let target = self.player.rect.center();
        let shoot_range = self.cfg.enemy_shoot_cooldown_ms;
        for (_, enemy) in self.enemies.iter_mut() {
            enemy.update(target);
            if !enemy.in_play(bounds) {
                continue;
            }
            if let Some(shot) = enemy.maybe_shoot(now, &mut self.rng, shoot_range) {
                self.enemy_bullets.insert(self.ids.next(), shot);
            }
        }
        self.enemies.retain(|e| e.in_play(bounds));

        for (_, star) in self.stars.iter_mut() {
            star.update(now);
        }
        self.stars.retain(|s| s.in_play(bounds));

        for (_, meteor) in self.meteors.iter_mut() {
            meteor.update();
        }
        self.meteors.retain(|m| m.in_play(bounds));
    }

    /// Applies every overlap of the frame. Stops at the first fatal hit.
    fn resolve_collisions(&mut self) {
        for (bullet_id, targets) in group_collide(&self.bullets, &self.enemies) {
            let Some(bullet) = self.bullets.remove(bullet_id) else {
                continue;
            };
            for enemy_id in targets {
                // An enemy destroyed by an earlier bullet this frame is gone.
                let Some(enemy) = self.enemies.get_mut(enemy_id) else {
                    continue;
                };
                if enemy.hit(bullet.damage) {
                    let kind = enemy.kind;
                    self.enemies.remove(enemy_id);
                    self.score += kind.stats().score;
                    self.events.push(GameEvent::EnemyDestroyed {
                        kind,
                        score: self.score,
                    });
                }
            }
        }

        let player_rect = self.player.rect;

        for id in collide_one(&player_rect, &self.enemy_bullets) {
            if let Some(bullet) = self.enemy_bullets.remove(id) {
                if self.damage_player(bullet.damage, DamageCause::EnemyBullet) {
                    return;
                }
            }
        }

        for id in collide_one(&player_rect, &self.enemies) {
            if let Some(enemy) = self.enemies.remove(id) {
                let cause = DamageCause::EnemyContact(enemy.kind);
                if self.damage_player(enemy.kind.contact_damage(), cause) {
                    return;
                }
            }
        }

        for id in collide_one(&player_rect, &self.stars) {
            self.stars.remove(id);
            self.player.heal(self.cfg.star_recover);
            self.events.push(GameEvent::StarCollected {
                xp: self.player.xp,
            });
        }

        for id in collide_one(&player_rect, &self.meteors) {
            self.meteors.remove(id);
            if self.damage_player(self.cfg.meteor_damage, DamageCause::Meteor) {
                return;
            }
        }
    }

    /// Returns true when the hit ended the round.
    fn damage_player(&mut self, amount: i32, cause: DamageCause) -> bool {
        self.events.push(GameEvent::PlayerDamaged { amount, cause });
        if !self.player.damage(amount) {
            return false;
        }
        info!(score = self.score, ?cause, "Game over");
        self.game_over_at = Some(self.now_ms);
        self.events.push(GameEvent::GameOver { score: self.score });
        self.set_scene(Scene::GameOver);
        true
    }

    fn draw_backdrop(&self, r: &mut dyn RenderBackend, clear: Color, image: Option<SpriteKind>) {
        r.begin_frame(clear);
        if let Some(sprite) = image {
            r.draw_sprite(sprite, self.bounds);
        }
    }

    fn draw_overlay(&self, r: &mut dyn RenderBackend) {
        r.fill_rect(
            Rect::new(60, 60, self.cfg.width - 120, 480),
            Color::OVERLAY,
        );
    }

    fn cover(&self) -> Option<SpriteKind> {
        self.catalog
            .cover_background
            .as_ref()
            .map(|_| SpriteKind::CoverBackground)
    }

    fn draw_start(&self, r: &mut dyn RenderBackend) {
        let w = self.cfg.width;
        self.draw_backdrop(r, Color::rgb(8, 8, 20), self.cover());
        self.draw_overlay(r);
        r.draw_text("Cosmo Clash", w / 2 - 140, 80, FontSize::Big, Color::TEXT);
        let lines = [
            "Game Instructions:",
            "",
            "- Use arrow keys / WASD to move.",
            "- Press Enter key to shoot bullets.",
            "- The more enemies you kill, the higher your score.",
        ];
        for (i, line) in lines.iter().enumerate() {
            r.draw_text(line, w / 2 - 280, 180 + i as i32 * 30, FontSize::Normal, Color::TEXT);
        }
        self.layout.play.draw(r);
        r.end_frame();
    }

    fn draw_select(&self, r: &mut dyn RenderBackend) {
        let (w, h) = (self.cfg.width, self.cfg.height);
        self.draw_backdrop(r, Color::rgb(10, 10, 30), self.cover());
        self.draw_overlay(r);
        r.draw_text("Select Your Character", w / 2 - 200, 80, FontSize::Big, Color::TEXT);

        let y = 200;
        let preview = Rect::from_center(w / 2, y + 80, 120, 120);
        let count = self.catalog.characters.len();
        if count == 0 {
            r.draw_text(
                "No character images found in folder 'character'. Using default.",
                60,
                y,
                FontSize::Normal,
                Color::TEXT,
            );
            r.draw_sprite(SpriteKind::Player { character: 0 }, preview);
        } else {
            r.draw_sprite(
                SpriteKind::Player {
                    character: self.selected_character,
                },
                preview,
            );
            let counter = format!("{} / {}", self.selected_character + 1, count);
            r.draw_text(&counter, w / 2 - 20, y + 200, FontSize::Normal, Color::TEXT);
            r.draw_text("Use LEFT/RIGHT (or A/D) to preview", 80, h - 140, FontSize::Small, Color::TEXT);
            r.draw_text("Click Confirm to play", 80, h - 110, FontSize::Small, Color::TEXT);
        }
        self.layout.confirm.draw(r);
        r.end_frame();
    }

    fn draw_play(&self, r: &mut dyn RenderBackend) {
        let w = self.cfg.width;
        let background = self
            .catalog
            .game_background
            .as_ref()
            .map(|_| SpriteKind::GameBackground);
        self.draw_backdrop(r, Color::rgb(5, 5, 20), background);

        for (_, star) in self.stars.iter() {
            r.draw_sprite(SpriteKind::Star { bright: star.bright }, star.rect);
        }
        for (_, meteor) in self.meteors.iter() {
            r.draw_sprite(SpriteKind::Meteor, meteor.rect);
        }
        for (_, enemy) in self.enemies.iter() {
            r.draw_sprite(SpriteKind::Enemy(enemy.kind), enemy.rect);
        }
        for (_, bullet) in self.bullets.iter() {
            r.draw_sprite(SpriteKind::PlayerBullet, bullet.rect);
        }
        for (_, bullet) in self.enemy_bullets.iter() {
            r.draw_sprite(SpriteKind::EnemyBullet, bullet.rect);
        }
        r.draw_sprite(
            SpriteKind::Player {
                character: self.selected_character,
            },
            self.player.rect,
        );

        // HUD
        let bar = Rect::new(20, 10, w - 200, 18);
        r.fill_rect(bar, Color::BAR_BACK);
        let filled = (bar.w as f32 * self.player.xp_ratio()) as i32;
        r.fill_rect(Rect::new(bar.x, bar.y, filled, bar.h), Color::TEXT);
        r.outline_rect(bar, Color::BUTTON_BORDER);
        let xp = format!("XP: {}/{}", self.player.xp, self.player.max_xp);
        r.draw_text(&xp, w - 160, 10, FontSize::Normal, Color::TEXT);
        r.draw_text(&format!("Score: {}", self.score), 20, 36, FontSize::Normal, Color::TEXT);
        let enemies = format!("Enemies: {}", self.enemies.len());
        r.draw_text(&enemies, 180, 36, FontSize::Normal, Color::TEXT);
        r.end_frame();
    }

    fn draw_gameover(&self, r: &mut dyn RenderBackend) {
        let w = self.cfg.width;
        self.draw_backdrop(r, Color::rgb(15, 5, 5), self.cover());
        self.draw_overlay(r);
        r.draw_text("Game Over", w / 2 - 120, 160, FontSize::Big, Color::TEXT);
        r.draw_text(&format!("Score: {}", self.score), w / 2 - 60, 240, FontSize::Normal, Color::TEXT);
        self.layout.play_again.draw(r);
        r.end_frame();
    }

    /// Takes the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &Group<Enemy> {
        &self.enemies
    }

    pub fn bullets(&self) -> &Group<Bullet> {
        &self.bullets
    }

    pub fn enemy_bullets(&self) -> &Group<Bullet> {
        &self.enemy_bullets
    }

    pub fn stars(&self) -> &Group<Star> {
        &self.stars
    }

    pub fn meteors(&self) -> &Group<Meteor> {
        &self.meteors
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn selected_character(&self) -> usize {
        self.selected_character
    }

    /// When the current round ended, if it has.
    pub fn game_over_at(&self) -> Option<u64> {
        self.game_over_at
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{
        entities::EnemyKind,
        render::{DrawCmd, NullRenderer, RecordingRenderer},
    };

    fn seeded() -> Game {
        let cfg = GameConfig {
            seed: Some(11),
            ..Default::default()
        };
        Game::new(cfg, AssetCatalog::default()).unwrap()
    }

    fn click(x: i32, y: i32) -> FrameInput {
        FrameInput::idle().with_event(InputEvent::left_click(x, y))
    }

    /// Clicks through the menus into a fresh round at time `now`.
    fn playing(now: u64) -> Game {
        let mut game = seeded();
        let (px, py) = game.layout.play.click_point();
        let (cx, cy) = game.layout.confirm.click_point();
        game.run_frame(&click(px, py), now, &mut NullRenderer);
        game.run_frame(&click(cx, cy), now, &mut NullRenderer);
        assert_eq!(game.scene(), Scene::Play);
        game.drain_events();
        game
    }

    fn place_enemy(game: &mut Game, kind: EnemyKind, center: (i32, i32)) {
        let size = kind.fallback_size();
        let rect = Rect::from_center(center.0, center.1, size.w, size.h);
        let id = game.ids.next();
        // Speed zero keeps it parked where the test put it.
        game.enemies.insert(id, Enemy::new(kind, rect, 0.0, u64::MAX));
    }

    #[test]
    fn menus_lead_into_play() {
        let mut game = seeded();
        assert_eq!(game.scene(), Scene::Start);

        // Clicks outside the button are ignored.
        game.run_frame(&click(5, 5), 0, &mut NullRenderer);
        assert_eq!(game.scene(), Scene::Start);

        let (px, py) = game.layout.play.click_point();
        game.run_frame(&click(px, py), 0, &mut NullRenderer);
        assert_eq!(game.scene(), Scene::Select);
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::Sound(SoundCue::Button),
                GameEvent::SceneChanged {
                    from: Scene::Start,
                    to: Scene::Select
                },
            ]
        );

        let (cx, cy) = game.layout.confirm.click_point();
        game.run_frame(&click(cx, cy), 0, &mut NullRenderer);
        assert_eq!(game.scene(), Scene::Play);
    }

    #[test]
    fn right_click_does_nothing() {
        let mut game = seeded();
        let (px, py) = game.layout.play.click_point();
        let input = FrameInput::idle().with_event(InputEvent::MouseDown {
            x: px,
            y: py,
            button: MouseButton::Right,
        });
        game.run_frame(&input, 0, &mut NullRenderer);
        assert_eq!(game.scene(), Scene::Start);
    }

    #[test]
    fn quit_stops_immediately() {
        let mut game = seeded();
        let input = FrameInput::idle().with_event(InputEvent::Quit);
        let mut r = RecordingRenderer::new();
        assert_eq!(game.run_frame(&input, 0, &mut r), FrameOutcome::Quit);
        assert_eq!(r.frames(), 0);
    }

    #[test]
    fn character_cycling_wraps() {
        let catalog = AssetCatalog {
            characters: vec![
                PathBuf::from("a.png"),
                PathBuf::from("b.png"),
                PathBuf::from("c.png"),
            ],
            ..Default::default()
        };
        let mut game = Game::new(GameConfig::default(), catalog).unwrap();
        game.scene = Scene::Select;

        let key = |key| FrameInput::idle().with_event(InputEvent::KeyDown { key });
        game.run_frame(&key(Key::Left), 0, &mut NullRenderer);
        assert_eq!(game.selected_character(), 2);
        game.run_frame(&key(Key::D), 0, &mut NullRenderer);
        game.run_frame(&key(Key::Right), 0, &mut NullRenderer);
        assert_eq!(game.selected_character(), 1);

        let mut r = RecordingRenderer::new();
        game.run_frame(&FrameInput::idle(), 0, &mut r);
        assert!(r.texts().contains(&"2 / 3"));
    }

    #[test]
    fn character_cycling_without_images_is_noop() {
        let mut game = seeded();
        game.scene = Scene::Select;
        let input = FrameInput::idle().with_event(InputEvent::KeyDown { key: Key::Right });
        game.run_frame(&input, 0, &mut NullRenderer);
        assert_eq!(game.selected_character(), 0);
    }

    #[test]
    fn fire_respects_cooldown() {
        let mut game = playing(0);
        let fire = FrameInput::holding(KeySet::ENTER);

        game.run_frame(&fire, 0, &mut NullRenderer);
        assert_eq!(game.bullets().len(), 1);
        game.run_frame(&fire, 16, &mut NullRenderer);
        game.run_frame(&fire, 349, &mut NullRenderer);
        assert_eq!(game.bullets().len(), 1);
        game.run_frame(&fire, 350, &mut NullRenderer);
        assert_eq!(game.bullets().len(), 2);

        let shots = game
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::Sound(SoundCue::Shoot))
            .count();
        assert_eq!(shots, 2);
    }

    #[test]
    fn player_bullet_destroys_enemy_once() {
        let mut game = playing(0);
        let (px, top) = game.player.rect.midtop();
        // Bullet spawns centred on the midtop and moves 8px up before the
        // collision pass.
        place_enemy(&mut game, EnemyKind::Small, (px, top - 10));
        // A second bullet already overlapping the same enemy.
        let id = game.ids.next();
        game.bullets.insert(
            id,
            Bullet::new((px, top - 2), PLAYER_BULLET_VEL, Owner::Player, 1),
        );

        game.run_frame(&FrameInput::holding(KeySet::ENTER), 0, &mut NullRenderer);

        assert_eq!(game.score(), 1);
        assert!(game.enemies().is_empty());
        assert!(game.bullets().is_empty());
        let destroyed = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn tough_enemy_takes_several_hits() {
        let mut game = playing(0);
        let (px, top) = game.player.rect.midtop();
        place_enemy(&mut game, EnemyKind::Medium, (px, top - 200));
        for _ in 0..2 {
            let id = game.ids.next();
            game.bullets.insert(
                id,
                Bullet::new((px, top - 190), Vec2::ZERO, Owner::Player, 1),
            );
            game.run_frame(&FrameInput::idle(), 0, &mut NullRenderer);
        }
        assert_eq!(game.enemies().len(), 1);
        let id = game.ids.next();
        game.bullets
            .insert(id, Bullet::new((px, top - 190), Vec2::ZERO, Owner::Player, 1));
        game.run_frame(&FrameInput::idle(), 0, &mut NullRenderer);
        assert!(game.enemies().is_empty());
        assert_eq!(game.score(), 3);
    }

    #[test]
    fn enemy_bullet_can_end_the_round() {
        let mut game = playing(0);
        game.player.xp = 2;
        let center = game.player.rect.center();
        let id = game.ids.next();
        game.enemy_bullets
            .insert(id, Bullet::new(center, Vec2::ZERO, Owner::Enemy, 2));

        let mut r = RecordingRenderer::new();
        game.run_frame(&FrameInput::idle(), 5_000, &mut r);
        assert_eq!(game.scene(), Scene::GameOver);
        assert_eq!(game.player().xp, 0);
        assert_eq!(game.game_over_at(), Some(5_000));
        assert!(game
            .drain_events()
            .contains(&GameEvent::GameOver { score: 0 }));

        // The frame that ended the round is still drawn as Play.
        assert!(r.texts().contains(&"XP: 0/100"));
        game.run_frame(&FrameInput::idle(), 5_016, &mut r);
        assert!(r.texts().contains(&"Game Over"));
    }

    #[test]
    fn ramming_enemy_is_removed_and_hurts() {
        let mut game = playing(0);
        let center = game.player.rect.center();
        place_enemy(&mut game, EnemyKind::Large, center);
        game.run_frame(&FrameInput::idle(), 0, &mut NullRenderer);
        assert!(game.enemies().is_empty());
        assert_eq!(game.player().xp, 98);
    }

    #[test]
    fn stars_heal_up_to_max() {
        let mut game = playing(0);
        game.player.xp = 90;
        let center = game.player.rect.center();
        let id = game.ids.next();
        game.stars.insert(id, Star::new(center, 0));
        game.run_frame(&FrameInput::idle(), 0, &mut NullRenderer);
        assert_eq!(game.player().xp, 100);
        assert!(game.stars().is_empty());
    }

    #[test]
    fn meteor_costs_two_xp() {
        let mut game = playing(0);
        let center = game.player.rect.center();
        let id = game.ids.next();
        game.meteors
            .insert(id, Meteor::new(center, game.sizes.meteor, Vec2::ZERO));
        game.run_frame(&FrameInput::idle(), 0, &mut NullRenderer);
        assert_eq!(game.player().xp, 98);
        assert!(game.meteors().is_empty());
    }

    #[test]
    fn timers_spawn_enemies_stars_and_meteors() {
        let mut game = playing(0);
        game.run_frame(&FrameInput::idle(), 1_199, &mut NullRenderer);
        assert!(game.enemies().is_empty());
        game.run_frame(&FrameInput::idle(), 1_200, &mut NullRenderer);
        assert_eq!(game.enemies().len(), 1);

        game.run_frame(&FrameInput::idle(), 10_000, &mut NullRenderer);
        assert_eq!(game.stars().len(), 1);
        assert_eq!(game.meteors().len(), 1);
    }

    #[test]
    fn play_again_resets_round() {
        let mut game = playing(0);
        game.score = 42;
        game.player.xp = 1;
        let center = game.player.rect.center();
        let id = game.ids.next();
        game.meteors
            .insert(id, Meteor::new(center, game.sizes.meteor, Vec2::ZERO));
        game.run_frame(&FrameInput::idle(), 100, &mut NullRenderer);
        assert_eq!(game.scene(), Scene::GameOver);

        let (x, y) = game.layout.play_again.click_point();
        game.run_frame(&click(x, y), 200, &mut NullRenderer);
        assert_eq!(game.scene(), Scene::Play);
        assert_eq!(game.score(), 0);
        assert_eq!(game.player().xp, 100);
        assert_eq!(game.game_over_at(), None);
        assert_eq!(game.enemy_spawn_timer, 200);
    }

    #[test]
    fn play_frame_draws_world_then_player() {
        let mut game = playing(0);
        place_enemy(&mut game, EnemyKind::Medium, (200, 100));
        let mut r = RecordingRenderer::new();
        game.run_frame(&FrameInput::idle(), 0, &mut r);

        assert!(matches!(r.last_frame().first(), Some(DrawCmd::Clear(_))));
        let sprites: Vec<_> = r.sprites().map(|(kind, _)| kind).collect();
        assert_eq!(
            sprites,
            vec![
                SpriteKind::Enemy(EnemyKind::Medium),
                SpriteKind::Player { character: 0 },
            ]
        );
    }

    #[test]
    fn select_hints_use_small_font() {
        let catalog = AssetCatalog {
            characters: vec![PathBuf::from("a.png")],
            ..Default::default()
        };
        let mut game = Game::new(GameConfig::default(), catalog).unwrap();
        game.scene = Scene::Select;
        let mut r = RecordingRenderer::new();
        game.run_frame(&FrameInput::idle(), 0, &mut r);

        let small: Vec<_> = r
            .last_frame()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Text {
                    text,
                    font: FontSize::Small,
                    ..
                } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(small, vec!["Use LEFT/RIGHT (or A/D) to preview", "Click Confirm to play"]);
    }

    #[test]
    fn hud_shows_score_and_xp() {
        let mut game = playing(0);
        let mut r = RecordingRenderer::new();
        game.run_frame(&FrameInput::idle(), 0, &mut r);
        let texts = r.texts();
        assert!(texts.contains(&"XP: 100/100"));
        assert!(texts.contains(&"Score: 0"));
        assert!(texts.contains(&"Enemies: 0"));
    }

    #[test]
    fn same_seed_same_round() {
        let run = || {
            let mut game = playing(0);
            let mut now = 0;
            for frame in 0..2_000u64 {
                now += 16;
                let held = if frame % 40 < 20 {
                    KeySet::ENTER | KeySet::LEFT
                } else {
                    KeySet::ENTER | KeySet::RIGHT
                };
                game.run_frame(&FrameInput::holding(held), now, &mut NullRenderer);
            }
            (game.score(), game.player().xp, game.enemies().len(), game.scene())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn oversized_playfield_is_rejected_before_play() {
        let cfg = GameConfig {
            width: i32::MAX,
            meteor_interval_ms: 0,
            seed: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            Game::new(cfg, AssetCatalog::default()),
            Err(ConfigError::OutOfRange { name: "width", .. })
        ));
    }

    #[test]
    fn largest_accepted_playfield_runs() {
        let cfg = GameConfig {
            width: crate::config::MAX_DIMENSION,
            height: crate::config::MAX_DIMENSION,
            player_speed: crate::config::MAX_DIMENSION,
            meteor_interval_ms: 0,
            star_interval_ms: 0,
            seed: Some(1),
            ..Default::default()
        };
        let mut game = Game::new(cfg, AssetCatalog::default()).unwrap();
        let (px, py) = game.layout.play.click_point();
        game.run_frame(&click(px, py), 0, &mut NullRenderer);
        let (cx, cy) = game.layout.confirm.click_point();
        game.run_frame(&click(cx, cy), 0, &mut NullRenderer);
        assert_eq!(game.scene(), Scene::Play);

        let held = KeySet::LEFT | KeySet::UP | KeySet::ENTER;
        for frame in 1..=60u64 {
            game.run_frame(&FrameInput::holding(held), frame * 16, &mut NullRenderer);
        }
        assert_eq!(game.player().rect.left(), 0);
        assert!(!game.meteors().is_empty());
    }
}
