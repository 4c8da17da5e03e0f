//! Menu buttons and their placement.

use crate::{
    config::GameConfig,
    math::Rect,
    render::{Color, FontSize, RenderBackend},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub rect: Rect,
    pub label: &'static str,
}

impl Button {
    pub fn new(rect: Rect, label: &'static str) -> Self {
        Self { rect, label }
    }

    pub fn clicked(&self, x: i32, y: i32) -> bool {
        self.rect.contains_point(x, y)
    }

    pub fn draw(&self, r: &mut dyn RenderBackend) {
        r.fill_rect(self.rect, Color::BUTTON_FILL);
        r.outline_rect(self.rect, Color::BUTTON_BORDER);
        // Rough centring; the backend owns glyph metrics.
        let (cx, cy) = self.rect.center();
        let half_width = self.label.len() as i32 * 6;
        r.draw_text(self.label, cx - half_width, cy - 13, FontSize::Normal, Color::TEXT);
    }

    /// A point inside the button, for scripted clicks.
    pub fn click_point(&self) -> (i32, i32) {
        self.rect.center()
    }
}

/// Buttons of every menu scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub play: Button,
    pub confirm: Button,
    pub play_again: Button,
}

impl Layout {
    pub fn new(cfg: &GameConfig) -> Self {
        let (w, h) = (cfg.width, cfg.height);
        Self {
            play: Button::new(Rect::new(w / 2 - 70, h / 2 + 80, 140, 50), "Play"),
            confirm: Button::new(Rect::new(w - 240, h - 130, 150, 45), "Confirm"),
            play_again: Button::new(Rect::new(w / 2 - 80, h / 2 + 80, 160, 50), "Play Again"),
        }
    }
}
