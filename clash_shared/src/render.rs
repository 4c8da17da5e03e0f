//! Rendering abstraction.
//!
//! This crate intentionally does not depend on a graphics backend. Scenes
//! describe a frame through `RenderBackend`; a windowed host implements it,
//! headless runs use `NullRenderer` or `RecordingRenderer`.

use crate::{entities::EnemyKind, math::Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Default text and HUD accent.
    pub const TEXT: Color = Color::rgb(185, 240, 230);
    pub const BUTTON_FILL: Color = Color::rgb(50, 50, 50);
    pub const BUTTON_BORDER: Color = Color::rgb(200, 200, 200);
    pub const OVERLAY: Color = Color::rgba(0, 0, 0, 180);
    pub const BAR_BACK: Color = Color::rgb(60, 60, 60);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Normal,
    Big,
}

/// What a sprite depicts. The backend maps these to images or placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    /// Player ship; the index selects the character image.
    Player { character: usize },
    Enemy(EnemyKind),
    PlayerBullet,
    EnemyBullet,
    Star { bright: bool },
    Meteor,
    CoverBackground,
    GameBackground,
}

/// A minimal 2D drawing API.
pub trait RenderBackend {
    fn begin_frame(&mut self, clear: Color);
    fn draw_sprite(&mut self, sprite: SpriteKind, rect: Rect);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn outline_rect(&mut self, rect: Rect, color: Color);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, font: FontSize, color: Color);
    fn end_frame(&mut self);
}

/// A no-op renderer useful for headless runs.
#[derive(Default)]
pub struct NullRenderer;

impl RenderBackend for NullRenderer {
    fn begin_frame(&mut self, _clear: Color) {}
    fn draw_sprite(&mut self, _sprite: SpriteKind, _rect: Rect) {}
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    fn outline_rect(&mut self, _rect: Rect, _color: Color) {}
    fn draw_text(&mut self, _text: &str, _x: i32, _y: i32, _font: FontSize, _color: Color) {}
    fn end_frame(&mut self) {}
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    Sprite(SpriteKind, Rect),
    Fill(Rect, Color),
    Outline(Rect, Color),
    Text {
        text: String,
        x: i32,
        y: i32,
        font: FontSize,
    },
}

/// Keeps the draw calls of the last completed frame.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    frames: u64,
    current: Vec<DrawCmd>,
    last: Vec<DrawCmd>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> &[DrawCmd] {
        &self.last
    }

    /// Text drawn in the last frame, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.last
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn sprites(&self) -> impl Iterator<Item = (SpriteKind, Rect)> + '_ {
        self.last.iter().filter_map(|cmd| match cmd {
            DrawCmd::Sprite(kind, rect) => Some((*kind, *rect)),
            _ => None,
        })
    }
}

impl RenderBackend for RecordingRenderer {
    fn begin_frame(&mut self, clear: Color) {
        self.current.clear();
        self.current.push(DrawCmd::Clear(clear));
    }

    fn draw_sprite(&mut self, sprite: SpriteKind, rect: Rect) {
        self.current.push(DrawCmd::Sprite(sprite, rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.current.push(DrawCmd::Fill(rect, color));
    }

    fn outline_rect(&mut self, rect: Rect, color: Color) {
        self.current.push(DrawCmd::Outline(rect, color));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font: FontSize, _color: Color) {
        self.current.push(DrawCmd::Text {
            text: text.to_string(),
            x,
            y,
            font,
        });
    }

    fn end_frame(&mut self) {
        self.last = std::mem::take(&mut self.current);
        self.frames += 1;
    }
}
