use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::config::FieldConfig;
use crate::field::Bounds;
use crate::math::{depth_factor, wrap, Rgb};

/// One drifting point. Velocity and colour are fixed for its lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Distance from the viewer in [0, max_depth]; stays 0 when depth is off.
    pub depth: f32,
    pub depth_velocity: f32,
    pub base_size: f32,
    pub pulse_phase: f32,
    pub pulse_speed: f32,
    pub color: Rgb,
}

impl Particle {
    /// Draw every parameter independently and uniformly from the configured ranges.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, config: &FieldConfig, bounds: &Bounds) -> Self {
        let position = Vec2::new(
            rng.gen_range(0.0..=bounds.width),
            rng.gen_range(0.0..=bounds.height),
        );
        let heading = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(config.speed_min..=config.speed_max);
        let (depth, depth_velocity) = if config.depth_enabled {
            (
                rng.gen_range(0.0..=config.max_depth),
                rng.gen_range(-config.depth_speed..=config.depth_speed),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            position,
            velocity: Vec2::from_angle(heading) * speed,
            depth,
            depth_velocity,
            base_size: rng.gen_range(config.size_min..=config.size_max),
            pulse_phase: rng.gen_range(0.0..TAU),
            pulse_speed: rng.gen_range(config.pulse_speed_min..=config.pulse_speed_max),
            color: config.color_palette[rng.gen_range(0..config.color_palette.len())],
        }
    }

    /// Advance one tick. No acceleration: velocity never changes.
    pub fn advance(&mut self) {
        self.position += self.velocity;
        self.depth += self.depth_velocity;
        // Kept in [0, TAU) so the phase stays precise over long runs.
        self.pulse_phase = (self.pulse_phase + self.pulse_speed).rem_euclid(TAU);
    }

    /// Apply the wrap boundary against the current bounds.
    pub fn wrap(&mut self, bounds: &Bounds, max_depth: Option<f32>) {
        self.position.x = wrap(self.position.x, -bounds.margin, bounds.width + bounds.margin);
        self.position.y = wrap(self.position.y, -bounds.margin, bounds.height + bounds.margin);
        if let Some(max_depth) = max_depth {
            self.depth = wrap(self.depth, 0.0, max_depth);
        }
    }

    /// 1 for the nearest particle, 0 at the far plane, 1 when depth is off.
    #[inline]
    pub fn nearness(&self, max_depth: Option<f32>) -> f32 {
        match max_depth {
            Some(d) => depth_factor(self.depth, d),
            None => 1.0,
        }
    }

    pub fn render_size(&self, pulse_amplitude: f32, max_depth: Option<f32>) -> f32 {
        self.base_size * (1.0 + self.pulse_phase.sin() * pulse_amplitude) * self.nearness(max_depth)
    }

    pub fn opacity(&self, opacity_scale: f32, max_depth: Option<f32>) -> f32 {
        self.nearness(max_depth) * opacity_scale
    }
}
