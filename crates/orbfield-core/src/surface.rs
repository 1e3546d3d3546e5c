//! Immediate-mode 2D drawing seam. Nothing is ever read back.

use glam::Vec2;

use crate::error::SurfaceError;
use crate::math::Rgb;

pub trait Surface {
    /// Opaque fill of the whole surface.
    fn clear(&mut self, background: Rgb) -> Result<(), SurfaceError>;
    /// Translucent fill over the previous frame, leaving trails.
    fn fade(&mut self, color: Rgb, alpha: f32) -> Result<(), SurfaceError>;
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32) -> Result<(), SurfaceError>;
    /// Radial halo from `color` at the centre to transparent at `radius`.
    fn glow(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) -> Result<(), SurfaceError>;
    fn dot(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) -> Result<(), SurfaceError>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear { background: Rgb },
    Fade { color: Rgb, alpha: f32 },
    Line { from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32 },
    Glow { center: Vec2, radius: f32, color: Rgb, alpha: f32 },
    Dot { center: Vec2, radius: f32, color: Rgb, alpha: f32 },
}

/// Headless surface that keeps every draw call in order.
#[derive(Default, Debug)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything recorded so far, e.g. between frames.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, background: Rgb) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Clear { background });
        Ok(())
    }

    fn fade(&mut self, color: Rgb, alpha: f32) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Fade { color, alpha });
        Ok(())
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Line { from, to, color, alpha, width });
        Ok(())
    }

    fn glow(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Glow { center, radius, color, alpha });
        Ok(())
    }

    fn dot(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Dot { center, radius, color, alpha });
        Ok(())
    }
}
