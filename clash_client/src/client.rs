//! Client implementation.
//!
//! The client owns:
//! - The `Game` and the renderer it draws into
//! - An input source (script, autopilot, or a real device)
//! - Session statistics built from the game's event stream
//!
//! It knows nothing about pacing; `runner` decides when `step` is called.

use clash_shared::prelude::*;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::input::InputSource;

/// How a session was driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Yielded to the async runtime between frames.
    Cooperative,
    /// Plain blocking loop.
    Blocking,
}

/// What happened during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub frames: u64,
    pub rounds: u32,
    pub best_score: u32,
    pub last_score: u32,
    pub enemies_destroyed: u32,
    pub shots_fired: u32,
    pub stars_collected: u32,
    pub mode: Option<RunMode>,
}

impl SessionSummary {
    fn record(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::SceneChanged { to: Scene::Play, .. } => {
                self.rounds += 1;
                self.last_score = 0;
            }
            GameEvent::SceneChanged { .. } => {}
            GameEvent::Sound(SoundCue::Shoot) => self.shots_fired += 1,
            GameEvent::Sound(SoundCue::Button) => {}
            GameEvent::EnemyDestroyed { score, .. } => {
                self.enemies_destroyed += 1;
                self.note_score(score);
            }
            GameEvent::PlayerDamaged { .. } => {}
            GameEvent::StarCollected { .. } => self.stars_collected += 1,
            GameEvent::GameOver { score } => self.note_score(score),
        }
    }

    fn note_score(&mut self, score: u32) {
        self.last_score = score;
        self.best_score = self.best_score.max(score);
    }
}

/// High-level game client.
pub struct GameClient {
    game: Game,
    renderer: Box<dyn RenderBackend>,
    input: Box<dyn InputSource>,
    frame: u64,
    summary: SessionSummary,
}

impl GameClient {
    pub fn new(game: Game, renderer: Box<dyn RenderBackend>, input: Box<dyn InputSource>) -> Self {
        Self {
            game,
            renderer,
            input,
            frame: 0,
            summary: SessionSummary::default(),
        }
    }

    /// Scans assets under the configured root and builds a headless client.
    pub fn from_config(cfg: GameConfig, input: Box<dyn InputSource>) -> anyhow::Result<Self> {
        let paths = AssetPaths::from_config(&cfg);
        let catalog = AssetCatalog::scan(&paths)?;
        if let Some(music) = &catalog.music {
            info!(path = %music.display(), "Background music available");
        }
        if let Some(icon) = &catalog.icon {
            debug!(path = %icon.display(), "Window icon available");
        }
        let game = Game::new(cfg, catalog)?;
        Ok(Self::new(game, Box::new(NullRenderer), input))
    }

    /// Runs one frame at time `now_ms`.
    pub fn step(&mut self, now_ms: u64) -> anyhow::Result<FrameOutcome> {
        let Some(input) = self.input.poll(&self.game)? else {
            info!(frame = self.frame, "Input source exhausted");
            return Ok(FrameOutcome::Quit);
        };

        let outcome = self.game.run_frame(&input, now_ms, self.renderer.as_mut());
        self.frame += 1;
        self.summary.frames = self.frame;

        for event in self.game.drain_events() {
            match &event {
                GameEvent::Sound(cue) => trace!(?cue, "Sound cue"),
                GameEvent::SceneChanged { from, to } => {
                    debug!(?from, ?to, frame = self.frame, "Scene changed")
                }
                GameEvent::GameOver { score } => {
                    info!(score, frame = self.frame, "Round over")
                }
                other => trace!(event = ?other, "Game event"),
            }
            self.summary.record(&event);
        }

        if outcome == FrameOutcome::Quit {
            info!(frame = self.frame, "Quit requested");
        }
        Ok(outcome)
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    pub fn into_summary(self, mode: RunMode) -> SessionSummary {
        SessionSummary {
            mode: Some(mode),
            ..self.summary
        }
    }
}
