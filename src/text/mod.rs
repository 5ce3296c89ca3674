//! Wireframe-extruded 3D text.
//!
//! Layout model:
//! - One baseline through y = 0, glyph origins on the x axis.
//! - Fixed advance (`letter_spacing`) per character, recognized or not.
//! - The whole string is shifted left by half its total advance.
//!
//! Each recognized glyph becomes:
//! - its polyline at z = 0 (front face)
//! - the same polyline at z = `depth` (back face)
//! - one edge per polyline vertex joining the two faces

pub mod glyphs;

use glam::Vec3;

use crate::scene::{DrawList, Rgba, SceneVertex};

/// An immutable string laid out for drawing.
#[derive(Debug, Clone)]
pub struct Text3D {
    text: String,
    letter_spacing: f32,
    depth: f32,
    color: Rgba,
}

impl Text3D {
    pub fn new(text: impl Into<String>, letter_spacing: f32, depth: f32) -> Self {
        Self {
            text: text.into(),
            letter_spacing,
            depth,
            color: Rgba::WHITE,
        }
    }

    #[inline]
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Total advance of the string.
    #[inline]
    pub fn total_width(&self) -> f32 {
        self.text.chars().count() as f32 * self.letter_spacing
    }

    /// X origin of every character (including ones without a glyph).
    pub fn glyph_origins(&self) -> Vec<f32> {
        let start = -0.5 * self.total_width();
        (0..self.text.chars().count())
            .map(|i| start + i as f32 * self.letter_spacing)
            .collect()
    }

    /// Append the text's line geometry to `out`.
    pub fn draw(&self, out: &mut DrawList) {
        let origins = self.glyph_origins();
        for (c, x0) in self.text.chars().zip(origins) {
            let Some(points) = glyphs::glyph(c) else {
                continue;
            };

            let front = |p: &[f32; 2]| Vec3::new(x0 + p[0], p[1], 0.0);
            let back = |p: &[f32; 2]| Vec3::new(x0 + p[0], p[1], self.depth);
            let vertex = |pos: Vec3| SceneVertex::line(pos, self.color, true);

            out.line_strip(points.iter().map(front).map(vertex));
            out.line_strip(points.iter().map(back).map(vertex));
            for p in points {
                out.line(vertex(front(p)), vertex(back(p)));
            }
        }
    }
}
