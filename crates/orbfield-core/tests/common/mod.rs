#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use orbfield_core::lifecycle::SurfaceHost;
use orbfield_core::math::Rgb;
use orbfield_core::{FieldError, FrameScheduler, FrameToken, Particle, RecordingSurface, Surface, SurfaceError};
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub type EventLog = Rc<RefCell<Vec<String>>>;

pub fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

pub fn particle_at(x: f32, y: f32) -> Particle {
    Particle {
        position: Vec2::new(x, y),
        velocity: Vec2::ZERO,
        depth: 0.0,
        depth_velocity: 0.0,
        base_size: 2.0,
        pulse_phase: 0.0,
        pulse_speed: 0.0,
        color: [200, 200, 255],
    }
}

/// Scheduler the test fires by hand.
#[derive(Default)]
pub struct ManualScheduler {
    next: i32,
    pub queued: Vec<FrameToken>,
    pub cancelled: Vec<FrameToken>,
    pub fail: bool,
    pub log: EventLog,
}

impl ManualScheduler {
    pub fn with_log(log: EventLog) -> Self {
        Self { log, ..Self::default() }
    }

    pub fn requests(&self) -> usize {
        self.next as usize
    }

    /// Most recently queued callback, as the host would fire it.
    pub fn latest(&self) -> FrameToken {
        *self.queued.last().expect("a queued frame")
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameToken, FieldError> {
        if self.fail {
            return Err(FieldError::Scheduler("refused".to_string()));
        }
        self.next += 1;
        let token = FrameToken(self.next);
        self.queued.push(token);
        self.log.borrow_mut().push(format!("request {}", self.next));
        Ok(token)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.queued.retain(|t| *t != token);
        self.cancelled.push(token);
        self.log.borrow_mut().push(format!("cancel {}", token.0));
    }
}

/// In-memory container backed by a `RecordingSurface`.
pub struct MemoryHost {
    pub size: (f32, f32),
    pub available: bool,
    pub log: EventLog,
}

impl MemoryHost {
    pub fn new(width: f32, height: f32, log: EventLog) -> Self {
        Self { size: (width, height), available: true, log }
    }
}

impl SurfaceHost for MemoryHost {
    type Surface = RecordingSurface;

    fn acquire(&mut self) -> Result<RecordingSurface, FieldError> {
        if !self.available {
            return Err(FieldError::SurfaceUnavailable("no 2d context".to_string()));
        }
        self.log.borrow_mut().push("acquire".to_string());
        Ok(RecordingSurface::new())
    }

    fn container_size(&self) -> (f32, f32) {
        self.size
    }

    fn resize_surface(&mut self, _surface: &mut RecordingSurface, width: f32, height: f32) {
        self.log.borrow_mut().push(format!("resize {width}x{height}"));
    }

    fn release(&mut self, _surface: RecordingSurface) {
        self.log.borrow_mut().push("release".to_string());
    }
}

/// Rejects every draw call.
#[derive(Default)]
pub struct BrokenSurface {
    pub attempts: usize,
}

impl BrokenSurface {
    fn fail(&mut self) -> Result<(), SurfaceError> {
        self.attempts += 1;
        Err(SurfaceError("context lost".to_string()))
    }
}

impl Surface for BrokenSurface {
    fn clear(&mut self, _: Rgb) -> Result<(), SurfaceError> {
        self.fail()
    }
    fn fade(&mut self, _: Rgb, _: f32) -> Result<(), SurfaceError> {
        self.fail()
    }
    fn line(&mut self, _: Vec2, _: Vec2, _: Rgb, _: f32, _: f32) -> Result<(), SurfaceError> {
        self.fail()
    }
    fn glow(&mut self, _: Vec2, _: f32, _: Rgb, _: f32) -> Result<(), SurfaceError> {
        self.fail()
    }
    fn dot(&mut self, _: Vec2, _: f32, _: Rgb, _: f32) -> Result<(), SurfaceError> {
        self.fail()
    }
}
