use rand::Rng;

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::field::{Field, FrameInput};
use crate::lifecycle::{SurfaceHost, SurfaceManager};
use crate::render_loop::{FrameScheduler, FrameToken, LoopState, RenderLoop};
use crate::stats::TickStats;

/// A mounted field: the handle the page drives.
///
/// Per frame: render loop -> pending resize -> `Field::tick` -> surface.
pub struct Engine<H: SurfaceHost, S: FrameScheduler> {
    field: Field,
    surfaces: SurfaceManager<H>,
    render_loop: RenderLoop<S>,
    last_stats: Option<TickStats>,
}

impl<H: SurfaceHost, S: FrameScheduler> Engine<H, S> {
    /// Validate the config and populate the field at the container's
    /// current size. The surface is not acquired until `start()`.
    pub fn mount<R: Rng + ?Sized>(
        config: FieldConfig,
        host: H,
        scheduler: S,
        rng: &mut R,
    ) -> Result<Self, FieldError> {
        config.validate()?;
        let surfaces = SurfaceManager::new(host);
        let (width, height) = surfaces.container_extent().unwrap_or((1.0, 1.0));
        let field = Field::new(config, width, height, rng)?;
        log::info!(
            "mounted field: {} particles, {}x{}",
            field.particles().len(),
            width,
            height
        );

        Ok(Self {
            field,
            surfaces,
            render_loop: RenderLoop::new(scheduler),
            last_stats: None,
        })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn surfaces(&self) -> &SurfaceManager<H> {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut SurfaceManager<H> {
        &mut self.surfaces
    }

    pub fn render_loop(&self) -> &RenderLoop<S> {
        &self.render_loop
    }

    pub fn state(&self) -> LoopState {
        self.render_loop.state()
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    pub fn last_stats(&self) -> Option<TickStats> {
        self.last_stats
    }

    pub fn start(&mut self) -> Result<(), FieldError> {
        if let Err(e) = self.surfaces.ensure_surface(&mut self.field) {
            log::warn!("start refused: {e}");
            return Err(e);
        }
        if let Err(e) = self.render_loop.start(self.surfaces.surface()) {
            log::warn!("start refused: {e}");
            self.surfaces.release(&mut self.render_loop);
            return Err(e);
        }
        Ok(())
    }

    pub fn stop(&mut self) {
        self.render_loop.stop();
    }

    /// Forward a container size change; it lands before the next tick.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surfaces.notify_resize(width, height);
    }

    /// Like [`Engine::resize`], reading the size from the host.
    pub fn sync_to_container(&mut self) {
        self.surfaces.observe_container();
    }

    /// Body of the host's frame callback for the callback `fired`. Returns
    /// `None` for a stale callback, which leaves every piece of state
    /// untouched.
    pub fn on_frame(&mut self, fired: FrameToken, input: FrameInput) -> Option<TickStats> {
        if !self.render_loop.begin_frame(fired) {
            return None;
        }
        self.surfaces.apply_pending(&mut self.field);
        let stats = self
            .surfaces
            .surface_mut()
            .map(|surface| self.field.tick(surface, input));
        self.render_loop.end_frame();

        if stats.is_some() {
            self.last_stats = stats;
        }
        stats
    }

    /// Stop, then release the surface. Idempotent; also runs on drop.
    pub fn unmount(&mut self) {
        self.surfaces.release(&mut self.render_loop);
    }
}

impl<H: SurfaceHost, S: FrameScheduler> Drop for Engine<H, S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
