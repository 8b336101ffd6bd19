//! Canvas 2D painter for [`FrameGeometry`]

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::*;
use crate::error::{Error, Result};

pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| Error::SurfaceUnavailable("canvas has no 2d context".into()))?;
        Ok(Self { canvas, ctx })
    }

    /// Logical (CSS pixel) size of the canvas
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
        )
    }

    /// Match the backing store to the device pixel ratio
    pub fn resize(&self, dpr: f64) {
        let (w, h) = self.logical_size();
        self.canvas.set_width((w as f64 * dpr) as u32);
        self.canvas.set_height((h as f64 * dpr) as u32);
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }

    pub fn paint(&self, frame: &FrameGeometry) {
        let ctx = &self.ctx;
        let (w, h) = self.logical_size();

        ctx.set_fill_style_str(&css_color(BACKGROUND));
        ctx.fill_rect(0.0, 0.0, w as f64, h as f64);

        if frame.is_empty() {
            return;
        }

        ctx.set_stroke_style_str(&css_color(CURVE_COLOR));
        ctx.set_line_width(CURVE_WIDTH as f64);
        ctx.begin_path();
        for (i, p) in frame.curve.iter().enumerate() {
            if i == 0 {
                ctx.move_to(p.x as f64, p.y as f64);
            } else {
                ctx.line_to(p.x as f64, p.y as f64);
            }
        }
        ctx.stroke();

        ctx.set_stroke_style_str(&css_color(TANGENT_COLOR));
        ctx.set_line_width(TANGENT_WIDTH as f64);
        for (start, end) in &frame.tangents {
            ctx.begin_path();
            ctx.move_to(start.x as f64, start.y as f64);
            ctx.line_to(end.x as f64, end.y as f64);
            ctx.stroke();
        }

        for marker in &frame.markers {
            ctx.set_fill_style_str(&css_color(marker.kind.color()));
            ctx.begin_path();
            let _ = ctx.arc(
                marker.pos.x as f64,
                marker.pos.y as f64,
                marker.radius as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }
    }
}
