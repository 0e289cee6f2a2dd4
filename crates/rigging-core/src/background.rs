//! Background image scale and navigation between backgrounds.

use glam::Vec2;

/// Where the background image sits inside the canvas and how much it is scaled.
///
/// The background is laid out at full height, so the scale is the ratio of
/// displayed to natural height. Percentage coordinates from layouts map onto
/// the displayed image rectangle, offset by its position in the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundFrame {
    pub natural_size: Vec2,
    pub displayed_size: Vec2,
    /// Top-left of the displayed image relative to the canvas.
    pub offset: Vec2,
}

impl Default for BackgroundFrame {
    fn default() -> Self {
        Self {
            natural_size: Vec2::ONE,
            displayed_size: Vec2::ONE,
            offset: Vec2::ZERO,
        }
    }
}

impl BackgroundFrame {
    pub fn new(natural_size: Vec2, displayed_size: Vec2, offset: Vec2) -> Self {
        Self {
            natural_size,
            displayed_size,
            offset,
        }
    }

    /// Displayed ÷ natural. Falls back to 1 while the image has no natural size yet.
    pub fn scale(&self) -> f32 {
        if self.natural_size.y > 0.0 && self.displayed_size.y.is_finite() {
            self.displayed_size.y / self.natural_size.y
        } else {
            1.0
        }
    }

    /// Canvas position of a point given as percentages of the displayed image.
    /// Percentages are clamped to \[0, 100\].
    pub fn percent_to_canvas(&self, percent: Vec2) -> Vec2 {
        let p = percent.clamp(Vec2::ZERO, Vec2::splat(100.0)) / 100.0;
        self.offset + self.displayed_size * p
    }
}

/// Current background index and the highest index known to exist (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundCursor {
    pub current: u32,
    pub max: u32,
}

impl Default for BackgroundCursor {
    fn default() -> Self {
        Self { current: 1, max: 1 }
    }
}

impl BackgroundCursor {
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.max(1),
            max: max.max(1),
        }
    }

    /// Step back, wrapping to the last background. No-op with a single background.
    pub fn previous(&mut self) -> bool {
        if self.max <= 1 {
            return false;
        }
        self.current = if self.current <= 1 { self.max } else { self.current - 1 };
        true
    }

    /// Step forward, wrapping to the first background. No-op with a single background.
    pub fn next(&mut self) -> bool {
        if self.max <= 1 {
            return false;
        }
        self.current = if self.current >= self.max { 1 } else { self.current + 1 };
        true
    }

    /// Overlay layouts are only defined from `min_background` on.
    pub fn has_layout(&self, min_background: u32) -> bool {
        self.current >= min_background
    }

    pub fn image_path(&self) -> String {
        background_path(self.current)
    }
}

pub fn background_path(index: u32) -> String {
    format!("ImageFond/fond{index}.png")
}

/// Parse the `fond` parameter out of a query string such as `?fond=3&x=1`.
pub fn background_from_query(query: &str) -> Option<u32> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == "fond")
        .and_then(|(_, v)| v.trim().parse::<u32>().ok())
        .filter(|i| *i >= 1)
}
