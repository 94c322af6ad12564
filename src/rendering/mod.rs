//! # Rendering Module
//!
//! The simulation never draws anything itself. It hands glyphs and light
//! sources to a [`Canvas`], which the binary implements on top of macroquad
//! and tests implement with [`TextBuffer`].

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;

use serde::{Deserialize, Serialize};

/// A 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GREY: Rgb = Rgb::new(150, 150, 150);
    pub const DARK_GREY: Rgb = Rgb::new(70, 70, 70);
    pub const RED: Rgb = Rgb::new(200, 40, 40);
    pub const GREEN: Rgb = Rgb::new(80, 190, 60);
    pub const DARK_GREEN: Rgb = Rgb::new(30, 110, 40);
    pub const BROWN: Rgb = Rgb::new(140, 90, 40);
    pub const ORANGE: Rgb = Rgb::new(255, 150, 40);
    pub const YELLOW: Rgb = Rgb::new(240, 220, 80);
    pub const BLUE: Rgb = Rgb::new(70, 110, 220);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scales each channel by `factor`, clamped to `[0, 1]`.
    pub fn scaled(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f32 * factor).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// A light on the current screen, in pixels from the screen's top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: Rgb,
}

impl LightSource {
    /// Brightness this light contributes at a pixel: 1 at the centre fading
    /// linearly to 0 at the radius.
    pub fn intensity_at(&self, x: f32, y: f32) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        let distance = ((x - self.x).powi(2) + (y - self.y).powi(2)).sqrt();
        (1.0 - distance / self.radius).max(0.0)
    }
}

/// Brightest contribution of any light at a pixel, with its colour.
pub fn light_level(lights: &[LightSource], x: f32, y: f32) -> Option<(f32, Rgb)> {
    lights
        .iter()
        .map(|light| (light.intensity_at(x, y), light.color))
        .filter(|(intensity, _)| *intensity > 0.0)
        .max_by(|a, b| a.0.total_cmp(&b.0))
}

/// Where the core draws to.
pub trait Canvas {
    /// Draws `glyph` in cell `(x, y)`.
    fn draw(&mut self, glyph: char, x: i32, y: i32, fg: Rgb, bg: Option<Rgb>);

    /// Darkens the map by `background_alpha`, lifted around each light.
    fn draw_lightmap(&mut self, lights: &[LightSource], background_alpha: f32);

    /// Draws a string left to right starting at cell `(x, y)`.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, fg: Rgb) {
        for (offset, ch) in text.chars().enumerate() {
            self.draw(ch, x + offset as i32, y, fg, None);
        }
    }
}

/// A plain character grid, mostly useful for testing what got drawn.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    width: i32,
    height: i32,
    cells: Vec<char>,
    /// Background alpha of the last lightmap pass
    pub darkness: f32,
    /// Lights of the last lightmap pass
    pub lights: Vec<LightSource>,
}

impl TextBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; (width.max(0) * height.max(0)) as usize],
            darkness: 0.0,
            lights: Vec::new(),
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get((y * self.width + x) as usize).copied()
    }

    /// One row as a string, trailing spaces trimmed.
    pub fn row(&self, y: i32) -> String {
        let row: String = (0..self.width).filter_map(|x| self.get(x, y)).collect();
        row.trim_end().to_string()
    }

    /// Whether any row contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row(y).contains(needle))
    }
}

impl Canvas for TextBuffer {
    fn draw(&mut self, glyph: char, x: i32, y: i32, _fg: Rgb, _bg: Option<Rgb>) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        let index = (y * self.width + x) as usize;
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = glyph;
        }
    }

    fn draw_lightmap(&mut self, lights: &[LightSource], background_alpha: f32) {
        self.darkness = background_alpha;
        self.lights = lights.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_buffer_clips() {
        let mut buffer = TextBuffer::new(4, 2);
        buffer.draw_text("hello", 1, 1, Rgb::WHITE);
        buffer.draw('x', -1, 0, Rgb::WHITE, None);
        assert_eq!(buffer.row(1), " hel");
        assert_eq!(buffer.row(0), "");
        assert!(buffer.contains("hel"));
    }

    #[test]
    fn test_light_fades_to_radius() {
        let light = LightSource {
            x: 0.0,
            y: 0.0,
            radius: 10.0,
            color: Rgb::ORANGE,
        };
        assert_eq!(light.intensity_at(0.0, 0.0), 1.0);
        assert!((light.intensity_at(5.0, 0.0) - 0.5).abs() < f32::EPSILON);
        assert_eq!(light.intensity_at(20.0, 0.0), 0.0);
        assert_eq!(light_level(&[light], 30.0, 0.0), None);
    }

    #[test]
    fn test_scaled_colour() {
        assert_eq!(Rgb::WHITE.scaled(0.0), Rgb::BLACK);
        assert_eq!(Rgb::new(100, 50, 0).scaled(0.5), Rgb::new(50, 25, 0));
    }
}
