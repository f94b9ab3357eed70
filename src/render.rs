//! Drawing surface abstraction
//!
//! Games describe a frame with a handful of 2D primitives. The browser host
//! backs `Surface` with a canvas context; tests and the headless runner use
//! `DisplayList`, which just records the calls.

use glam::Vec2;
use serde::Serialize;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const PINK: Color = Color::rgb(255, 184, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const ORANGE: Color = Color::rgb(255, 184, 82);
    pub const BLUE: Color = Color::rgb(33, 33, 222);
    pub const GREEN: Color = Color::rgb(0, 220, 90);
    pub const GRAY: Color = Color::rgb(120, 120, 120);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS color string for canvas fill/stroke styles
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A fixed-size 2D drawing target
pub trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32);
    /// Closed outline through `points`
    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, width: f32);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Color);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear { color: Color },
    FillRect { min: Vec2, size: Vec2, color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, color: Color, width: f32 },
    StrokePolygon { points: Vec<Vec2>, color: Color, width: f32 },
    FillPolygon { points: Vec<Vec2>, color: Color },
    Text { pos: Vec2, text: String, size: f32, color: Color },
}

/// Surface that records draw calls instead of rasterizing
#[derive(Debug, Clone, Serialize)]
pub struct DisplayList {
    pub size: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { color });
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect { min, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            width,
        });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            color,
            width,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            size,
            color,
        });
    }
}

/// Transform a local-space outline by rotation then translation
pub fn transform_outline(outline: &[Vec2], pos: Vec2, rotation: f32) -> Vec<Vec2> {
    let rot = Vec2::from_angle(rotation);
    outline.iter().map(|p| pos + rot.rotate(*p)).collect()
}

/// Standard score/lives/level strip along the top of the surface
pub fn draw_hud(surface: &mut dyn Surface, score: u64, lives: u32, level_label: &str) {
    let width = surface.size().x;
    surface.text(Vec2::new(10.0, 20.0), &format!("SCORE {score}"), 16.0, Color::WHITE);
    surface.text(
        Vec2::new(width * 0.5 - 40.0, 20.0),
        level_label,
        16.0,
        Color::WHITE,
    );
    surface.text(
        Vec2::new(width - 110.0, 20.0),
        &format!("LIVES {lives}"),
        16.0,
        Color::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_starts_a_new_frame() {
        let mut list = DisplayList::new(Vec2::new(100.0, 100.0));
        list.fill_circle(Vec2::ZERO, 1.0, Color::RED);
        list.clear(Color::BLACK);
        assert_eq!(list.commands, vec![DrawCommand::Clear { color: Color::BLACK }]);
    }

    #[test]
    fn test_transform_outline_rotates_then_translates() {
        let outline = [Vec2::new(1.0, 0.0)];
        let out = transform_outline(&outline, Vec2::new(10.0, 10.0), std::f32::consts::FRAC_PI_2);
        assert!((out[0] - Vec2::new(10.0, 11.0)).length() < 1e-5);
    }

    #[test]
    fn test_css_color() {
        assert_eq!(Color::rgb(255, 16, 0).css(), "#ff1000");
    }
}
