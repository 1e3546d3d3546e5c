//! Frame-callback state machine: `Stopped -> Running -> Stopped`.
//!
//! The host calls back once per display refresh on a single thread. Each
//! callback runs to completion and only then queues the next one, so ticks
//! never overlap.

use crate::error::FieldError;

/// Host handle for one queued frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(pub i32);

/// Queues and cancels display-refresh callbacks.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameToken, FieldError>;
    fn cancel_frame(&mut self, token: FrameToken);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

pub struct RenderLoop<S: FrameScheduler> {
    scheduler: S,
    state: LoopState,
    pending: Option<FrameToken>,
    frames: u64,
}

impl<S: FrameScheduler> RenderLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: LoopState::Stopped,
            pending: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Callbacks serviced since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Begin ticking once per refresh. Without a surface nothing is queued
    /// and the loop stays stopped. Starting a running loop does nothing.
    pub fn start<T: ?Sized>(&mut self, surface: Option<&T>) -> Result<(), FieldError> {
        if self.is_running() {
            return Ok(());
        }
        if surface.is_none() {
            return Err(FieldError::SurfaceUnavailable(
                "no drawing surface at start".to_string(),
            ));
        }
        self.pending = Some(self.scheduler.request_frame()?);
        self.state = LoopState::Running;
        log::info!("render loop started");
        Ok(())
    }

    /// Cancel the queued callback. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel_frame(token);
        }
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
            log::info!("render loop stopped after {} frames", self.frames);
        }
    }

    /// The callback the loop is currently waiting on, if any.
    pub fn pending(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Called at the top of a frame callback with the token that fired.
    /// False means the callback is stale (fired after `stop()`, belongs to
    /// an earlier run, or was never queued) and must do nothing.
    pub fn begin_frame(&mut self, fired: FrameToken) -> bool {
        if self.state != LoopState::Running || self.pending != Some(fired) {
            return false;
        }
        self.pending = None;
        self.frames += 1;
        true
    }

    /// Called once the frame's work is done; queues the next callback.
    pub fn end_frame(&mut self) {
        if self.state != LoopState::Running || self.pending.is_some() {
            return;
        }
        match self.scheduler.request_frame() {
            Ok(token) => self.pending = Some(token),
            Err(e) => {
                log::error!("{e}; render loop halted");
                self.state = LoopState::Stopped;
            }
        }
    }
}
