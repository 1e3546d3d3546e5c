//! Acquires the drawing surface, keeps it sized to its container and
//! releases it only after the render loop has stopped.

use crate::error::FieldError;
use crate::field::{Bounds, Field};
use crate::render_loop::{FrameScheduler, RenderLoop};
use crate::surface::Surface;

/// Whatever owns the container the surface lives in.
pub trait SurfaceHost {
    type Surface: Surface;

    fn acquire(&mut self) -> Result<Self::Surface, FieldError>;
    /// Current container size in pixels, as observed by the host.
    fn container_size(&self) -> (f32, f32);
    fn resize_surface(&mut self, surface: &mut Self::Surface, width: f32, height: f32);
    fn release(&mut self, surface: Self::Surface);
}

pub struct SurfaceManager<H: SurfaceHost> {
    host: H,
    surface: Option<H::Surface>,
    pending: Option<(f32, f32)>,
}

impl<H: SurfaceHost> SurfaceManager<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            surface: None,
            pending: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn surface(&self) -> Option<&H::Surface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut H::Surface> {
        self.surface.as_mut()
    }

    pub fn has_pending_resize(&self) -> bool {
        self.pending.is_some()
    }

    /// The container size after clamping, or `None` if the host reports garbage.
    pub fn container_extent(&self) -> Option<(f32, f32)> {
        let (w, h) = self.host.container_size();
        Bounds::clamp_extent(w, h)
    }

    /// Acquire the surface if not yet held, sized to the container.
    pub fn ensure_surface(&mut self, field: &mut Field) -> Result<(), FieldError> {
        if self.surface.is_some() {
            return Ok(());
        }
        let mut surface = self.host.acquire()?;
        let bounds = field.bounds();
        let (w, h) = self
            .container_extent()
            .unwrap_or((bounds.width, bounds.height));
        self.host.resize_surface(&mut surface, w, h);
        field.resize(w, h);
        self.surface = Some(surface);
        log::info!("surface acquired at {w}x{h}");
        Ok(())
    }

    /// Queue a new size. Applied at the start of the next tick; a later
    /// notification before that replaces an earlier one.
    pub fn notify_resize(&mut self, width: f32, height: f32) {
        match Bounds::clamp_extent(width, height) {
            Some(extent) => self.pending = Some(extent),
            None => log::debug!("ignoring non-finite container size {width}x{height}"),
        }
    }

    /// Re-read the container size from the host and queue it.
    pub fn observe_container(&mut self) {
        let (w, h) = self.host.container_size();
        self.notify_resize(w, h);
    }

    /// Push a queued size into the surface and the field. Returns whether
    /// anything changed.
    pub fn apply_pending(&mut self, field: &mut Field) -> bool {
        let Some((w, h)) = self.pending.take() else {
            return false;
        };
        if let Some(surface) = self.surface.as_mut() {
            self.host.resize_surface(surface, w, h);
        }
        field.resize(w, h);
        log::debug!("field resized to {w}x{h}");
        true
    }

    /// Stop the loop, then hand the surface back to the host.
    pub fn release<S: FrameScheduler>(&mut self, render_loop: &mut RenderLoop<S>) {
        render_loop.stop();
        self.pending = None;
        if let Some(surface) = self.surface.take() {
            self.host.release(surface);
            log::info!("surface released");
        }
    }
}
