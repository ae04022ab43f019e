//! Headless surface that records draw calls instead of rasterizing them

use glam::Vec2;

use super::{Color, LineDash, Surface};
use crate::sim::Rect;

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f32,
        height: f32,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    Gradient {
        rect: Rect,
        top: Color,
        bottom: Color,
    },
    Glow {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Polygon {
        points: Vec<Vec2>,
        color: Color,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        color: Color,
        /// `Some(width)` for an outline, `None` for a fill
        stroke: Option<f32>,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
        dash: Option<LineDash>,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f32, height: f32) {
        // A clear starts a new frame
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color) {
        self.commands
            .push(DrawCommand::Gradient { rect, top, bottom });
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Glow {
            center,
            radius,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radii,
            color,
            stroke: None,
        });
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radii,
            color,
            stroke: Some(width),
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, dash: Option<LineDash>) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
            dash,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            pos,
            size,
            color,
        });
    }
}
