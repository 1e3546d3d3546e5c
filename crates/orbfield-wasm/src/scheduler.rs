use std::cell::{Cell, RefCell};
use std::rc::Rc;

use orbfield_core::{FieldError, FrameScheduler, FrameToken};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Slot for the per-frame closure. Filled after the engine exists, since the
/// closure needs a handle back to it.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Token of the request the shared closure will answer next. The closure
/// takes it when it fires, so each request is serviced at most once.
pub type ArmedFrame = Rc<Cell<Option<FrameToken>>>;

/// `requestAnimationFrame` / `cancelAnimationFrame` on the page's window.
pub struct RafScheduler {
    callback: FrameCallback,
    armed: ArmedFrame,
}

impl RafScheduler {
    pub fn new(callback: FrameCallback, armed: ArmedFrame) -> Self {
        Self { callback, armed }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<FrameToken, FieldError> {
        let window = web_sys::window().ok_or_else(|| FieldError::Scheduler("no window".to_string()))?;
        let slot = self.callback.borrow();
        let callback = slot
            .as_ref()
            .ok_or_else(|| FieldError::Scheduler("frame callback not installed".to_string()))?;
        let token = window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameToken)
            .map_err(|e| FieldError::Scheduler(format!("{e:?}")))?;
        self.armed.set(Some(token));
        Ok(token)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.armed.get() == Some(token) {
            self.armed.set(None);
        }
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.cancel_animation_frame(token.0) {
                log::warn!("cancelAnimationFrame failed: {e:?}");
            }
        }
    }
}
