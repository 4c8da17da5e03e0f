//! `clash_shared`
//!
//! Game core for Cosmo Clash, a vertical space shooter.
//!
//! Design goals:
//! - Deterministic for a given seed and frame times.
//! - No windowing, audio or GPU dependencies; hosts plug in through
//!   `render::RenderBackend` and drain `event::GameEvent`s.
//! - No `unsafe`.

pub mod assets;
pub mod collision;
pub mod config;
pub mod ecs;
pub mod entities;
pub mod event;
pub mod game;
pub mod input;
pub mod math;
pub mod render;
pub mod spawn;
pub mod ui;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::assets::{AssetCatalog, AssetPaths};
    pub use crate::config::*;
    pub use crate::event::*;
    pub use crate::game::{FrameOutcome, Game, Scene};
    pub use crate::input::*;
    pub use crate::math::*;
    pub use crate::render::{NullRenderer, RecordingRenderer, RenderBackend};
}
