//! Browser canvas backend

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, LineDash, Surface};
use crate::sim::Rect;

use std::f64::consts::TAU;

/// [`Surface`] over a 2D canvas context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Grab the `2d` context of a canvas element
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self::new(ctx))
    }

    fn report(result: Result<(), JsValue>) {
        if let Err(e) = result {
            log::warn!("Canvas call failed: {:?}", e);
        }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color) {
        let gradient = self.ctx.create_linear_gradient(
            rect.x as f64,
            rect.y as f64,
            rect.x as f64,
            rect.bottom() as f64,
        );
        Self::report(gradient.add_color_stop(0.0, &top.to_css()));
        Self::report(gradient.add_color_stop(1.0, &bottom.to_css()));
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, color: Color) {
        let (x, y, r) = (center.x as f64, center.y as f64, radius as f64);
        let gradient = match self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) {
            Ok(g) => g,
            Err(e) => {
                log::warn!("Radial gradient failed: {:?}", e);
                return;
            }
        };
        Self::report(gradient.add_color_stop(0.0, &color.to_css()));
        Self::report(gradient.add_color_stop(1.0, &color.with_alpha(0.0).to_css()));
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(x - r, y - r, r * 2.0, r * 2.0);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color) {
        self.ctx.begin_path();
        Self::report(self.ctx.ellipse(
            center.x as f64,
            center.y as f64,
            radii.x as f64,
            radii.y as f64,
            0.0,
            0.0,
            TAU,
        ));
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, width: f32, color: Color) {
        self.ctx.begin_path();
        Self::report(self.ctx.ellipse(
            center.x as f64,
            center.y as f64,
            radii.x as f64,
            radii.y as f64,
            0.0,
            0.0,
            TAU,
        ));
        self.ctx.set_line_width(width as f64);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.stroke();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, dash: Option<LineDash>) {
        let segments = js_sys::Array::new();
        if let Some(d) = dash {
            segments.push(&JsValue::from_f64(d.dash as f64));
            segments.push(&JsValue::from_f64(d.gap as f64));
            self.ctx.set_line_dash_offset(d.offset as f64);
        }
        Self::report(self.ctx.set_line_dash(&segments));

        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_line_width(width as f64);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.stroke();

        if dash.is_some() {
            Self::report(self.ctx.set_line_dash(&js_sys::Array::new()));
            self.ctx.set_line_dash_offset(0.0);
        }
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.ctx.set_font(&format!("bold {}px Arial", size));
        self.ctx.set_fill_style_str(&color.to_css());
        Self::report(self.ctx.fill_text(text, pos.x as f64, pos.y as f64));
    }
}
