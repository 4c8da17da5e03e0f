//! Gameplay events.
//!
//! The game pushes what happened during a frame; the client drains the queue
//! after each frame for logging, sound cues and session statistics.

use serde::{Deserialize, Serialize};

use crate::{entities::EnemyKind, game::Scene};

/// Short sound effects. Playback belongs to the host; the game only cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Button,
    Shoot,
}

/// What dealt damage to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCause {
    EnemyBullet,
    EnemyContact(EnemyKind),
    Meteor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    SceneChanged { from: Scene, to: Scene },
    Sound(SoundCue),
    EnemyDestroyed { kind: EnemyKind, score: u32 },
    PlayerDamaged { amount: i32, cause: DamageCause },
    StarCollected { xp: i32 },
    GameOver { score: u32 },
}

/// FIFO of events produced since the last drain.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
