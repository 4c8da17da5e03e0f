//! Input sources.
//!
//! A windowed host would sample the keyboard and mouse here. Headless
//! sessions get their input from a script file or from the autopilot bot,
//! which reads the game state the same way a player reads the screen.

use std::{collections::BTreeMap, path::Path};

use anyhow::Context;
use clash_shared::{
    game::{Game, Scene},
    input::{FrameInput, InputEvent, KeySet},
};
use serde::Deserialize;
use tracing::debug;

/// Produces the input for each frame.
pub trait InputSource {
    /// `Ok(None)` means the source is exhausted and the session should end.
    fn poll(&mut self, game: &Game) -> anyhow::Result<Option<FrameInput>>;
}

/// Never presses anything and never ends.
#[derive(Default)]
pub struct IdleInput;

impl InputSource for IdleInput {
    fn poll(&mut self, _game: &Game) -> anyhow::Result<Option<FrameInput>> {
        Ok(Some(FrameInput::idle()))
    }
}

#[derive(Debug, Deserialize)]
struct ScriptFrame {
    frame: u64,
    #[serde(flatten)]
    input: FrameInput,
}

/// Replays input from a JSON list of frames:
///
/// ```json
/// [
///   { "frame": 0, "events": [{ "type": "mouse_down", "x": 400, "y": 405, "button": "left" }] },
///   { "frame": 30, "held": ["left", "enter"] }
/// ]
/// ```
///
/// Frames not listed are idle. The source ends after the last listed frame.
pub struct ScriptedInput {
    frames: BTreeMap<u64, FrameInput>,
    cursor: u64,
}

impl ScriptedInput {
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let raw: Vec<ScriptFrame> = serde_json::from_str(s).context("parse input script")?;
        let mut frames = BTreeMap::new();
        for entry in raw {
            if frames.insert(entry.frame, entry.input).is_some() {
                anyhow::bail!("input script lists frame {} twice", entry.frame);
            }
        }
        Ok(Self { frames, cursor: 0 })
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read input script {}", path.display()))?;
        Self::from_json_str(&text)
    }

    fn last_frame(&self) -> Option<u64> {
        self.frames.keys().next_back().copied()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _game: &Game) -> anyhow::Result<Option<FrameInput>> {
        match self.last_frame() {
            Some(last) if self.cursor <= last => {}
            _ => return Ok(None),
        }
        let input = self
            .frames
            .get(&self.cursor)
            .cloned()
            .unwrap_or_default();
        self.cursor += 1;
        Ok(Some(input))
    }
}

/// Horizontal distance within which the bot considers itself lined up.
const DEAD_ZONE: i32 = 4;
/// How far above the ship an enemy bullet counts as a threat.
const THREAT_RANGE: i32 = 140;

/// What the autopilot looks at during play.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Situation {
    pub player_center: (i32, i32),
    pub player_width: i32,
    pub hurt: bool,
    /// Lowest y the ship settles at.
    pub rest_y: i32,
    pub enemy_bullets: Vec<(i32, i32)>,
    pub stars: Vec<(i32, i32)>,
    pub enemies: Vec<(i32, i32)>,
}

impl Situation {
    pub fn observe(game: &Game) -> Self {
        let player = game.player();
        Self {
            player_center: player.rect.center(),
            player_width: player.rect.w,
            hurt: player.xp < player.max_xp,
            rest_y: game.config().height - 80,
            enemy_bullets: game.enemy_bullets().iter().map(|(_, b)| b.rect.center()).collect(),
            stars: game.stars().iter().map(|(_, s)| s.rect.center()).collect(),
            enemies: game.enemies().iter().map(|(_, e)| e.rect.center()).collect(),
        }
    }

    /// The closest enemy bullet coming down on the ship, if any.
    fn threat(&self) -> Option<(i32, i32)> {
        let (px, py) = self.player_center;
        let reach = self.player_width / 2 + 4;
        self.enemy_bullets
            .iter()
            .copied()
            .filter(|&(bx, by)| (bx - px).abs() < reach && by < py && py - by < THREAT_RANGE)
            .min_by_key(|&(_, by)| py - by)
    }

    /// The first star while hurt, otherwise the horizontally nearest enemy.
    fn target_x(&self) -> Option<i32> {
        let px = self.player_center.0;
        self.stars
            .iter()
            .filter(|_| self.hurt)
            .map(|&(x, _)| x)
            .next()
            .or_else(|| {
                self.enemies
                    .iter()
                    .map(|&(x, _)| x)
                    .min_by_key(|x| (x - px).abs())
            })
    }

    /// Keys to hold this frame. Fire is always held.
    pub fn plan(&self) -> KeySet {
        let (px, py) = self.player_center;
        let mut held = KeySet::ENTER;

        if let Some((bx, _)) = self.threat() {
            held |= if bx >= px { KeySet::LEFT } else { KeySet::RIGHT };
            return held;
        }

        if let Some(tx) = self.target_x() {
            if tx < px - DEAD_ZONE {
                held |= KeySet::LEFT;
            } else if tx > px + DEAD_ZONE {
                held |= KeySet::RIGHT;
            }
        }

        // Stay low to have the most time to react.
        if py < self.rest_y {
            held |= KeySet::DOWN;
        }
        held
    }
}

/// Plays the game: clicks through menus, lines up under the nearest enemy
/// (or a star when hurt), sidesteps incoming bullets and keeps firing. Ends
/// after `max_rounds` rounds.
pub struct Autopilot {
    max_rounds: u32,
    rounds_started: u32,
}

impl Autopilot {
    pub fn new(max_rounds: u32) -> Self {
        Self {
            max_rounds: max_rounds.max(1),
            rounds_started: 0,
        }
    }

    pub fn rounds_started(&self) -> u32 {
        self.rounds_started
    }

    fn click(&self, point: (i32, i32)) -> FrameInput {
        FrameInput::idle().with_event(InputEvent::left_click(point.0, point.1))
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, game: &Game) -> anyhow::Result<Option<FrameInput>> {
        let layout = game.layout();
        let input = match game.scene() {
            Scene::Start => self.click(layout.play.click_point()),
            Scene::Select => {
                self.rounds_started += 1;
                debug!(round = self.rounds_started, "Autopilot starting round");
                self.click(layout.confirm.click_point())
            }
            Scene::GameOver if self.rounds_started >= self.max_rounds => {
                FrameInput::idle().with_event(InputEvent::Quit)
            }
            Scene::GameOver => {
                self.rounds_started += 1;
                debug!(round = self.rounds_started, "Autopilot starting round");
                self.click(layout.play_again.click_point())
            }
            Scene::Play => FrameInput::holding(Situation::observe(game).plan()),
        };
        Ok(Some(input))
    }
}
