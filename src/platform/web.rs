//! Browser bindings
//!
//! `requestAnimationFrame` wrapped as a [`FrameSource`] and a 2d canvas
//! context wrapped as a [`DrawSurface`], plus [`mount`] to wire a whole
//! field onto a canvas element. Only compiled for wasm targets.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::frame::{FrameCallback, FrameScheduler, FrameSource, RequestId, TickFlow};
use crate::sim::{DrawSurface, Simulation, SimulationParams};

/// Route `log` records to the browser console and panic messages to
/// `console.error`.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    console_log::init_with_level(level).expect("failed to init console logger");
}

struct RafRequest {
    raf_id: i32,
    _closure: Closure<dyn FnMut(f64)>,
}

/// `requestAnimationFrame` as a [`FrameSource`].
///
/// Each request registers its own one-shot browser callback; cancel maps
/// straight onto `cancelAnimationFrame`.
pub struct RafSource {
    window: web_sys::Window,
    next_id: Cell<RequestId>,
    pending: Rc<RefCell<HashMap<RequestId, RafRequest>>>,
}

impl RafSource {
    pub fn new() -> Self {
        Self {
            window: web_sys::window().expect("no window"),
            next_id: Cell::new(0),
            pending: Rc::new(RefCell::new(HashMap::new())),
        }
    }
}

impl Default for RafSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for RafSource {
    fn request(&self, callback: FrameCallback) -> RequestId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let pending = Rc::clone(&self.pending);
        let mut callback = Some(callback);
        let closure = Closure::wrap(Box::new(move |timestamp: f64| {
            // Retire the map entry before dispatch so a request made from
            // inside the callback is a fresh entry, not this one.
            pending.borrow_mut().remove(&id);
            if let Some(callback) = callback.take() {
                callback(timestamp);
            }
        }) as Box<dyn FnMut(f64)>);

        let raf_id = self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .expect("requestAnimationFrame failed");
        self.pending.borrow_mut().insert(
            id,
            RafRequest {
                raf_id,
                _closure: closure,
            },
        );
        id
    }

    fn cancel(&self, id: RequestId) {
        if let Some(request) = self.pending.borrow_mut().remove(&id) {
            self.window
                .cancel_animation_frame(request.raf_id)
                .expect("cancelAnimationFrame failed");
        }
    }
}

/// A canvas 2d context as a [`DrawSurface`].
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wrap an existing canvas element.
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let context = canvas
            .get_context("2d")
            .expect("2d context request failed")
            .expect("no 2d context")
            .dyn_into::<CanvasRenderingContext2d>()
            .expect("not a 2d context");
        Self { canvas, context }
    }

    /// Look the canvas up by element id.
    pub fn from_element_id(id: &str) -> Self {
        let document = web_sys::window()
            .expect("no window")
            .document()
            .expect("no document");
        let canvas = document
            .get_element_by_id(id)
            .expect("no canvas")
            .dyn_into::<HtmlCanvasElement>()
            .expect("not a canvas");
        Self::new(canvas)
    }

    /// The wrapped element, for host-side sizing and styling.
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawSurface for CanvasSurface {
    fn width(&self) -> f64 {
        f64::from(self.canvas.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.canvas.height())
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.context.clear_rect(x, y, width, height);
    }

    fn set_fill(&mut self, color: &str) {
        self.context.set_fill_style_str(color);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.context.begin_path();
        self.context
            .arc(x, y, radius, 0.0, std::f64::consts::TAU)
            .expect("canvas arc failed");
        self.context.fill();
    }
}

/// Build a field on the canvas with the given element id and start it.
///
/// Returns the driving scheduler; dropping it stops the animation, so hosts
/// that want the field to run for the page lifetime should hold on to it (or
/// `mem::forget` it).
pub fn mount(canvas_id: &str, params: SimulationParams) -> FrameScheduler {
    let frames: Rc<dyn FrameSource> = Rc::new(RafSource::new());
    let surface = Rc::new(RefCell::new(CanvasSurface::from_element_id(canvas_id)));
    let sim = Rc::new(RefCell::new(Simulation::new(params, Rc::clone(&frames))));

    let driver = FrameScheduler::new(frames, move |tick, _: &()| {
        let mut sim = sim.borrow_mut();
        let mut surface = surface.borrow_mut();
        sim.update(tick.delta_time, &*surface);
        sim.draw(&mut *surface);
        TickFlow::Continue
    });
    driver.start();
    driver
}

/// Stop the field while the page is hidden and restart it once visible
/// again. Restarting opens a fresh delta chain, so time spent in a
/// background tab never lands as one giant tick.
pub fn pause_when_hidden(driver: Rc<FrameScheduler>) {
    let document = web_sys::window()
        .expect("no window")
        .document()
        .expect("no document");

    let document_for_listener = document.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        if document_for_listener.visibility_state() == web_sys::VisibilityState::Hidden {
            driver.stop();
            log::info!("field paused (tab hidden)");
        } else {
            driver.start();
            log::info!("field resumed");
        }
    });
    let _ = document
        .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
    closure.forget();
}
