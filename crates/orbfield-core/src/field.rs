use glam::Vec2;
use rand::Rng;

use crate::config::{FieldConfig, MAX_DIMENSION};
use crate::connections::{all_pairs, grid_pairs, Connection, LinkParams};
use crate::error::{FieldError, SurfaceError};
use crate::particle::Particle;
use crate::spatial::{PairGrid, GRID_MIN_PARTICLES};
use crate::stats::TickStats;
use crate::surface::Surface;

/// Halo opacity relative to the body it surrounds.
const GLOW_ALPHA: f32 = 0.4;

/// Surface extent plus the wrap margin around it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Bounds {
    /// Clamp a container size to `[1, MAX_DIMENSION]`. Non-finite sizes are rejected.
    pub fn clamp_extent(width: f32, height: f32) -> Option<(f32, f32)> {
        if !(width.is_finite() && height.is_finite()) {
            return None;
        }
        Some((width.clamp(1.0, MAX_DIMENSION), height.clamp(1.0, MAX_DIMENSION)))
    }

    /// True when `position` lies inside the wrapped rectangle.
    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= -self.margin
            && position.x <= self.width + self.margin
            && position.y >= -self.margin
            && position.y <= self.height + self.margin
    }
}

/// Per-frame input from the page, passed in rather than captured.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer parallax in pixels. Near particles are drawn shifted by the
    /// full amount, far ones by less; simulation state is unaffected.
    pub parallax: Vec2,
}

/// A fixed population of particles plus the per-tick update, link and draw passes.
pub struct Field {
    config: FieldConfig,
    particles: Vec<Particle>,
    bounds: Bounds,
    connections: Vec<Connection>,
    grid: Option<PairGrid>,
    positions: Vec<Vec2>,
    frame: u64,
}

impl Field {
    pub fn new<R: Rng + ?Sized>(
        config: FieldConfig,
        width: f32,
        height: f32,
        rng: &mut R,
    ) -> Result<Self, FieldError> {
        config.validate()?;
        let bounds = initial_bounds(&config, width, height)?;
        let particles = (0..config.particle_count)
            .map(|_| Particle::spawn(rng, &config, &bounds))
            .collect();
        Ok(Self::assemble(config, bounds, particles))
    }

    /// Build around an explicit population; `particle_count` follows `particles.len()`.
    pub fn with_particles(
        mut config: FieldConfig,
        width: f32,
        height: f32,
        particles: Vec<Particle>,
    ) -> Result<Self, FieldError> {
        config.particle_count = particles.len();
        config.validate()?;
        let bounds = initial_bounds(&config, width, height)?;
        Ok(Self::assemble(config, bounds, particles))
    }

    fn assemble(config: FieldConfig, bounds: Bounds, particles: Vec<Particle>) -> Self {
        let capacity = particles.len() * particles.len().saturating_sub(1) / 2;
        Self {
            connections: Vec::with_capacity(capacity.min(4096)),
            positions: Vec::with_capacity(particles.len()),
            grid: None,
            frame: 0,
            config,
            particles,
            bounds,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Links found by the last [`Field::compute_connections`].
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn max_depth(&self) -> Option<f32> {
        self.config.depth_enabled.then_some(self.config.max_depth)
    }

    /// Adopt new surface bounds. Particles are not moved; anything now
    /// outside wraps in at its next boundary crossing.
    pub fn resize(&mut self, width: f32, height: f32) {
        match Bounds::clamp_extent(width, height) {
            Some((width, height)) => {
                self.bounds.width = width;
                self.bounds.height = height;
            }
            None => log::debug!("ignoring non-finite resize {width}x{height}"),
        }
    }

    /// Advance every particle one tick and apply the wrap boundary.
    pub fn update(&mut self) {
        let max_depth = self.max_depth();
        for p in &mut self.particles {
            p.advance();
            p.wrap(&self.bounds, max_depth);
        }
    }

    /// Farthest first, so nearer particles paint over them. Stable, and a
    /// no-op when depth is not modelled.
    pub fn sort_by_depth(&mut self) {
        if self.config.depth_enabled {
            self.particles.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        }
    }

    pub fn compute_connections(&mut self) -> &[Connection] {
        let params = LinkParams {
            radius: self.config.connection_radius,
            max_depth: self.max_depth(),
            line_opacity: self.config.line_opacity,
        };
        let n = self.particles.len();
        if n > GRID_MIN_PARTICLES && params.radius.is_finite() && params.radius > 0.0 {
            let grid = self
                .grid
                .get_or_insert_with(|| PairGrid::for_population(params.radius, n));
            grid_pairs(&self.particles, &params, grid, &mut self.positions, &mut self.connections);
        } else {
            all_pairs(&self.particles, &params, &mut self.connections);
        }
        &self.connections
    }

    /// Background, then links, then bodies (halo under core).
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, input: &FrameInput) -> Result<(), SurfaceError> {
        let cfg = &self.config;
        let max_depth = self.max_depth();

        if cfg.trail_fade <= 0.0 {
            surface.clear(cfg.background)?;
        } else if cfg.trail_fade < 1.0 {
            surface.fade(cfg.background, 1.0 - cfg.trail_fade)?;
        }

        let screen = |p: &Particle| p.position + input.parallax * p.nearness(max_depth);

        for c in &self.connections {
            let (pa, pb) = (&self.particles[c.a], &self.particles[c.b]);
            let color = cfg.link_color.unwrap_or(pa.color);
            surface.line(screen(pa), screen(pb), color, c.opacity, cfg.line_width)?;
        }

        for p in &self.particles {
            let size = p.render_size(cfg.pulse_amplitude, max_depth);
            let alpha = p.opacity(cfg.opacity_scale, max_depth);
            if size <= 0.0 || alpha <= 0.0 {
                continue;
            }
            let center = screen(p);
            if cfg.glow_scale > 0.0 {
                surface.glow(center, size * cfg.glow_scale, p.color, alpha * GLOW_ALPHA)?;
            }
            surface.dot(center, size, p.color, alpha)?;
        }
        Ok(())
    }

    /// One frame: advance, depth sort, link, draw.
    ///
    /// A failed draw is logged and the frame counted as not drawn; the
    /// simulation state has already advanced and the next tick draws again.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S, input: FrameInput) -> TickStats {
        self.update();
        self.sort_by_depth();
        let connection_count = self.compute_connections().len();
        self.frame += 1;

        let drawn = match self.draw(surface, &input) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("frame {} not drawn: {}", self.frame, e);
                false
            }
        };

        TickStats {
            frame: self.frame,
            particle_count: self.particles.len() as u32,
            connection_count: connection_count as u32,
            drawn,
        }
    }
}

fn initial_bounds(config: &FieldConfig, width: f32, height: f32) -> Result<Bounds, FieldError> {
    let (width, height) = Bounds::clamp_extent(width, height).ok_or_else(|| {
        FieldError::InvalidConfiguration(format!("surface size {width}x{height} is not finite"))
    })?;
    Ok(Bounds { width, height, margin: config.margin })
}
