//! # Display Management
//!
//! The macroquad implementation of [`Canvas`]: one monospace cell per glyph,
//! and a per-cell darkening pass for the lightmap.

use crate::game::Point;
use crate::rendering::{light_level, Canvas, LightSource, Rgb};
use macroquad::prelude::*;

/// Tint strength of a light's colour at full intensity.
const LIGHT_TINT: f32 = 0.25;

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.r, rgb.g, rgb.b, 255)
}

/// Macroquad display for the game.
///
/// Cell `(x, y)` covers the pixels starting at `(x * cell_size, y * cell_size)`.
pub struct MacroquadDisplay {
    /// Cell size in pixels
    pub cell_size: f32,
    /// Font size used for glyphs
    pub font_size: f32,
    /// Map area in cells; the lightmap only covers this
    pub map_size: Point,
}

impl MacroquadDisplay {
    pub fn new(cell_size: f32, map_size: Point) -> Self {
        Self {
            cell_size,
            font_size: cell_size * 1.2,
            map_size,
        }
    }

    /// Clears the window for a new frame.
    pub fn begin_frame(&self) {
        clear_background(BLACK);
    }
}

impl Canvas for MacroquadDisplay {
    fn draw(&mut self, glyph: char, x: i32, y: i32, fg: Rgb, bg: Option<Rgb>) {
        let px = x as f32 * self.cell_size;
        let py = y as f32 * self.cell_size;
        if let Some(bg) = bg {
            draw_rectangle(px, py, self.cell_size, self.cell_size, to_color(bg));
        }
        if glyph == ' ' {
            return;
        }
        let mut buffer = [0u8; 4];
        let text: &str = glyph.encode_utf8(&mut buffer);
        let dims = measure_text(text, None, self.font_size as u16, 1.0);
        let offset_x = (self.cell_size - dims.width) / 2.0;
        draw_text(
            text,
            px + offset_x,
            py + self.cell_size * 0.8,
            self.font_size,
            to_color(fg),
        );
    }

    fn draw_lightmap(&mut self, lights: &[LightSource], background_alpha: f32) {
        if background_alpha <= 0.0 {
            return;
        }
        let half = self.cell_size / 2.0;
        for y in 0..self.map_size.y {
            for x in 0..self.map_size.x {
                let px = x as f32 * self.cell_size;
                let py = y as f32 * self.cell_size;
                let (alpha, tint) = match light_level(lights, px + half, py + half) {
                    Some((intensity, colour)) => {
                        (background_alpha * (1.0 - intensity), Some((intensity, colour)))
                    }
                    None => (background_alpha, None),
                };
                if let Some((intensity, colour)) = tint {
                    let mut c = to_color(colour);
                    c.a = LIGHT_TINT * intensity * background_alpha;
                    draw_rectangle(px, py, self.cell_size, self.cell_size, c);
                }
                if alpha > 0.0 {
                    draw_rectangle(
                        px,
                        py,
                        self.cell_size,
                        self.cell_size,
                        Color::new(0.0, 0.0, 0.05, alpha),
                    );
                }
            }
        }
    }
}
