use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;
use orbfield_core::{Engine, FieldConfig, FieldError, FrameInput};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

mod canvas;
mod scheduler;

use canvas::CanvasHost;
use scheduler::{ArmedFrame, FrameCallback, RafScheduler};

type CanvasEngine = Engine<CanvasHost, RafScheduler>;

/// Per-particle record for page-side overlays: 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct OrbInstance {
    position: [f32; 2], //  8 bytes
    depth: f32,         //  4 bytes
    size: f32,          //  4 bytes
    color: [f32; 3],    // 12 bytes
    opacity: f32,       //  4 bytes
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

fn to_js(e: FieldError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Handle returned to the page for one mounted field.
#[wasm_bindgen]
pub struct ParticleField {
    engine: Rc<RefCell<CanvasEngine>>,
    frame: FrameCallback,
    armed: ArmedFrame,
    on_resize: Option<Closure<dyn FnMut()>>,
    input: Rc<Cell<FrameInput>>,
    instances: Rc<RefCell<Vec<OrbInstance>>>,
    last_frame_ms: Rc<Cell<f64>>,
    destroyed: bool,
}

#[wasm_bindgen]
impl ParticleField {
    /// Mount into `#container_id`. `config_json` uses the camelCase keys of
    /// `FieldConfig`; an empty string mounts the default network.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, config_json: &str) -> Result<ParticleField, JsValue> {
        let config = if config_json.trim().is_empty() {
            FieldConfig::default()
        } else {
            FieldConfig::from_json(config_json).map_err(to_js)?
        };
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let host = CanvasHost::attach(container_id).map_err(to_js)?;
        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let armed: ArmedFrame = Rc::new(Cell::new(None));
        let scheduler = RafScheduler::new(frame.clone(), armed.clone());
        let engine = Engine::mount(config, host, scheduler, &mut rng).map_err(to_js)?;
        log::info!(
            "ParticleField mounted in #{}: {} particles",
            container_id,
            engine.field().particles().len()
        );

        let mut field = ParticleField {
            engine: Rc::new(RefCell::new(engine)),
            frame,
            armed,
            on_resize: None,
            input: Rc::new(Cell::new(FrameInput::default())),
            instances: Rc::new(RefCell::new(Vec::new())),
            last_frame_ms: Rc::new(Cell::new(0.0)),
            destroyed: false,
        };
        field.install_frame_callback();
        field.install_resize_listener()?;
        field.write_instances();
        Ok(field)
    }

    /// Begin animating. Fails if no 2D context can be had or the field
    /// was destroyed.
    pub fn start(&self) -> Result<(), JsValue> {
        if self.destroyed {
            return Err(JsValue::from_str("field destroyed"));
        }
        self.engine.borrow_mut().start().map_err(to_js)
    }

    pub fn stop(&self) {
        self.engine.borrow_mut().stop();
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.engine.borrow().is_running()
    }

    /// Re-read the container size; applied before the next frame.
    pub fn resize(&self) {
        self.engine.borrow_mut().sync_to_container();
    }

    /// Pointer parallax in pixels, used from the next frame on.
    pub fn set_parallax(&self, x: f32, y: f32) {
        self.input.set(FrameInput { parallax: Vec2::new(x, y) });
    }

    pub fn particle_count(&self) -> usize {
        self.engine.borrow().field().particles().len()
    }

    pub fn connection_count(&self) -> usize {
        self.engine.borrow().field().connections().len()
    }

    /// Wall time spent in the last frame callback, in milliseconds.
    pub fn last_frame_ms(&self) -> f64 {
        self.last_frame_ms.get()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.borrow().as_ptr() as *const f32
    }

    pub fn instances_byte_length(&self) -> usize {
        let instances = self.instances.borrow();
        bytemuck::cast_slice::<OrbInstance, u8>(&instances).len()
    }

    /// Stop, release the canvas and detach listeners. Safe to call twice.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.engine.borrow_mut().unmount();
        if let Some(listener) = self.on_resize.take() {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window
                    .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
                {
                    log::warn!("removing resize listener failed: {e:?}");
                }
            }
        }
        self.armed.set(None);
        self.frame.borrow_mut().take();
    }
}

impl ParticleField {
    fn install_frame_callback(&mut self) {
        let engine: Weak<RefCell<CanvasEngine>> = Rc::downgrade(&self.engine);
        let input = self.input.clone();
        let armed = self.armed.clone();
        let instances = Rc::downgrade(&self.instances);
        let last_frame_ms = self.last_frame_ms.clone();

        let tick = Closure::wrap(Box::new(move |_timestamp: f64| {
            let Some(engine) = engine.upgrade() else {
                return;
            };
            let Ok(mut engine) = engine.try_borrow_mut() else {
                return;
            };
            let Some(fired) = armed.take() else {
                return;
            };
            let start = js_sys::Date::now();
            if engine.on_frame(fired, input.get()).is_some() {
                if let Some(instances) = instances.upgrade() {
                    fill_instances(&engine, &mut instances.borrow_mut());
                }
            }
            last_frame_ms.set(js_sys::Date::now() - start);
        }) as Box<dyn FnMut(f64)>);

        *self.frame.borrow_mut() = Some(tick);
    }

    fn install_resize_listener(&mut self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let engine = Rc::downgrade(&self.engine);
        let listener = Closure::wrap(Box::new(move || {
            if let Some(engine) = engine.upgrade() {
                if let Ok(mut engine) = engine.try_borrow_mut() {
                    engine.sync_to_container();
                }
            }
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;
        self.on_resize = Some(listener);
        Ok(())
    }

    fn write_instances(&self) {
        fill_instances(&self.engine.borrow(), &mut self.instances.borrow_mut());
    }
}

impl Drop for ParticleField {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn fill_instances(engine: &CanvasEngine, out: &mut Vec<OrbInstance>) {
    let field = engine.field();
    let cfg = field.config();
    let max_depth = cfg.depth_enabled.then_some(cfg.max_depth);
    out.clear();
    out.extend(field.particles().iter().map(|p| OrbInstance {
        position: p.position.to_array(),
        depth: p.depth,
        size: p.render_size(cfg.pulse_amplitude, max_depth),
        color: p.color.map(|c| c as f32 / 255.0),
        opacity: p.opacity(cfg.opacity_scale, max_depth),
    }));
}
