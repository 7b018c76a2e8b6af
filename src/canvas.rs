//! `web-sys` implementations of the drawing seams.

use crate::input::effective_dpr;
use glam::DVec2;
use mascot_core::{CanvasElement, DrawContext, ElementTransform, MascotError};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn context_2d(
    canvas: &web::HtmlCanvasElement,
) -> Result<web::CanvasRenderingContext2d, MascotError> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<web::CanvasRenderingContext2d>().ok())
        .ok_or(MascotError::NoContext)
}

pub struct Canvas2d {
    ctx: web::CanvasRenderingContext2d,
}

impl Canvas2d {
    pub fn new(ctx: web::CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn disc(&self, center: DVec2, radius: f64) {
        self.ctx.begin_path();
        _ = self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
        self.ctx.fill();
    }
}

impl DrawContext for Canvas2d {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, fill: &str) {
        self.ctx.set_fill_style_str(fill);
        self.disc(center, radius);
    }

    fn fill_radial_glow(
        &mut self,
        center: DVec2,
        inner: f64,
        outer: f64,
        inner_color: &str,
        outer_color: &str,
    ) {
        let gradient = match self.ctx.create_radial_gradient(
            center.x,
            center.y,
            inner.max(0.0),
            center.x,
            center.y,
            outer.max(0.0),
        ) {
            Ok(g) => g,
            Err(e) => {
                log::warn!("[canvas] radial gradient rejected: {:?}", e);
                return;
            }
        };
        _ = gradient.add_color_stop(0.0, inner_color);
        _ = gradient.add_color_stop(1.0, outer_color);
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.disc(center, outer);
    }

    fn stroke_closed_path(&mut self, points: &[DVec2], stroke: &str, line_width: f64) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_stroke_style_str(stroke);
        self.ctx.set_line_width(line_width);
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.stroke();
    }

    fn set_shadow(&mut self, color: &str, blur: f64) {
        self.ctx.set_shadow_color(color);
        self.ctx.set_shadow_blur(blur);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        _ = self.ctx.translate(x, y);
    }

    fn rotate(&mut self, radians: f64) {
        _ = self.ctx.rotate(radians);
    }

    fn scale(&mut self, x: f64, y: f64) {
        _ = self.ctx.scale(x, y);
    }
}

pub struct HtmlCanvas {
    canvas: web::HtmlCanvasElement,
}

impl HtmlCanvas {
    pub fn new(canvas: web::HtmlCanvasElement) -> Self {
        Self { canvas }
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(e) = self.canvas.style().set_property(property, value) {
            log::warn!("[canvas] could not set {}: {:?}", property, e);
        }
    }
}

impl CanvasElement for HtmlCanvas {
    fn client_size(&self) -> DVec2 {
        DVec2::new(
            self.canvas.client_width() as f64,
            self.canvas.client_height() as f64,
        )
    }

    fn device_pixel_ratio(&self) -> f64 {
        effective_dpr(web::window().map_or(1.0, |w| w.device_pixel_ratio()))
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_visible(&mut self, visible: bool) {
        self.set_style("display", if visible { "block" } else { "none" });
    }

    fn set_transform(&mut self, transform: Option<ElementTransform>) {
        match transform {
            Some(t) => self.set_style("transform", &t.to_string()),
            None => self.set_style("transform", ""),
        }
    }
}
