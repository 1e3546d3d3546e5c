use std::f64::consts::TAU;

use glam::Vec2;
use orbfield_core::lifecycle::SurfaceHost;
use orbfield_core::math::Rgb;
use orbfield_core::{FieldError, Surface, SurfaceError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

fn rgba(c: Rgb, alpha: f32) -> String {
    format!("rgba({},{},{},{:.3})", c[0], c[1], c[2], alpha.clamp(0.0, 1.0))
}

fn draw_err(e: JsValue) -> SurfaceError {
    SurfaceError(format!("{e:?}"))
}

/// A full-bleed `<canvas>` layered behind the container's content.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    fn full_rect(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn disc(&self, center: Vec2, radius: f32) -> Result<(), SurfaceError> {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .map_err(draw_err)?;
        self.ctx.fill();
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, background: Rgb) -> Result<(), SurfaceError> {
        let (w, h) = self.full_rect();
        self.ctx.set_fill_style_str(&rgba(background, 1.0));
        self.ctx.fill_rect(0.0, 0.0, w, h);
        Ok(())
    }

    fn fade(&mut self, color: Rgb, alpha: f32) -> Result<(), SurfaceError> {
        let (w, h) = self.full_rect();
        self.ctx.set_fill_style_str(&rgba(color, alpha));
        self.ctx.fill_rect(0.0, 0.0, w, h);
        Ok(())
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32) -> Result<(), SurfaceError> {
        self.ctx.set_stroke_style_str(&rgba(color, alpha));
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
        Ok(())
    }

    fn glow(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) -> Result<(), SurfaceError> {
        let (x, y) = (center.x as f64, center.y as f64);
        let gradient = self
            .ctx
            .create_radial_gradient(x, y, 0.0, x, y, radius as f64)
            .map_err(draw_err)?;
        gradient.add_color_stop(0.0, &rgba(color, alpha)).map_err(draw_err)?;
        gradient.add_color_stop(1.0, &rgba(color, 0.0)).map_err(draw_err)?;
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.disc(center, radius)
    }

    fn dot(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) -> Result<(), SurfaceError> {
        self.ctx.set_fill_style_str(&rgba(color, alpha));
        self.disc(center, radius)
    }
}

/// Owns the container element the canvas is mounted into.
pub struct CanvasHost {
    container: HtmlElement,
}

impl CanvasHost {
    pub fn attach(container_id: &str) -> Result<Self, FieldError> {
        let unavailable = |what: &str| FieldError::SurfaceUnavailable(what.to_string());
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| unavailable("no document"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| unavailable(&format!("missing #{container_id}")))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| unavailable(&format!("#{container_id} is not an HTML element")))?;
        Ok(Self { container })
    }
}

impl SurfaceHost for CanvasHost {
    type Surface = CanvasSurface;

    fn acquire(&mut self) -> Result<CanvasSurface, FieldError> {
        let unavailable = |e: JsValue| FieldError::SurfaceUnavailable(format!("{e:?}"));
        let document = self
            .container
            .owner_document()
            .ok_or_else(|| FieldError::SurfaceUnavailable("container is detached".to_string()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(unavailable)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| FieldError::SurfaceUnavailable("canvas element rejected".to_string()))?;
        canvas
            .set_attribute(
                "style",
                "position:absolute;inset:0;width:100%;height:100%;pointer-events:none;z-index:0",
            )
            .map_err(unavailable)?;

        let ctx = canvas
            .get_context("2d")
            .map_err(unavailable)?
            .ok_or_else(|| FieldError::SurfaceUnavailable("2d context not supported".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FieldError::SurfaceUnavailable("unexpected context type".to_string()))?;

        self.container.append_child(&canvas).map_err(unavailable)?;
        Ok(CanvasSurface { canvas, ctx })
    }

    fn container_size(&self) -> (f32, f32) {
        (
            self.container.client_width() as f32,
            self.container.client_height() as f32,
        )
    }

    fn resize_surface(&mut self, surface: &mut CanvasSurface, width: f32, height: f32) {
        surface.canvas.set_width(width as u32);
        surface.canvas.set_height(height as u32);
    }

    fn release(&mut self, surface: CanvasSurface) {
        surface.canvas.remove();
    }
}
