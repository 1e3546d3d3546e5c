//! Ambient particle field engine: drifting points, proximity links and
//! pseudo-3D depth cues, driven one frame at a time by a host scheduler.

pub mod config;
pub mod connections;
pub mod engine;
pub mod error;
pub mod field;
pub mod lifecycle;
pub mod math;
pub mod particle;
pub mod render_loop;
pub mod spatial;
pub mod stats;
pub mod surface;

pub use config::FieldConfig;
pub use engine::Engine;
pub use error::{FieldError, SurfaceError};
pub use field::{Bounds, Field, FrameInput};
pub use lifecycle::{SurfaceHost, SurfaceManager};
pub use particle::Particle;
pub use render_loop::{FrameScheduler, FrameToken, LoopState, RenderLoop};
pub use stats::TickStats;
pub use surface::{DrawCommand, RecordingSurface, Surface};
