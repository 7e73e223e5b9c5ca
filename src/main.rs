//! Goo Field entry point
//!
//! On wasm, mounts the field onto the page's canvas and lets it run. On
//! native, drives a short headless run against an in-memory surface so the
//! engine can be exercised and profiled without a browser.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_field {
    use std::rc::Rc;

    use goo_field::platform::web;
    use goo_field::sim::SimulationParams;

    /// Canvas element id the field mounts onto.
    const CANVAS_ID: &str = "goo-field";

    pub fn run() {
        web::init_logging(log::Level::Info);

        let params = canvas_params().unwrap_or_default();
        log::info!("mounting field on #{CANVAS_ID}: {params:?}");
        let driver = Rc::new(web::mount(CANVAS_ID, params));
        web::pause_when_hidden(Rc::clone(&driver));
        // The field runs for the page lifetime.
        std::mem::forget(driver);
    }

    /// Optional overrides from the canvas's `data-params` JSON attribute.
    fn canvas_params() -> Option<SimulationParams> {
        let json = web_sys::window()?
            .document()?
            .get_element_by_id(CANVAS_ID)?
            .get_attribute("data-params")?;
        match serde_json::from_str(&json) {
            Ok(params) => Some(params),
            Err(err) => {
                log::warn!("ignoring malformed data-params: {err}");
                None
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_field::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use goo_field::frame::{FrameScheduler, FrameSource, ManualFrameSource, TickFlow};
    use goo_field::sim::{RecordingSurface, Simulation, SimulationParams};

    env_logger::init();

    let params: SimulationParams = match std::env::args().nth(1) {
        Some(json) => serde_json::from_str(&json).expect("invalid params JSON"),
        None => SimulationParams::default(),
    };
    log::info!("Goo Field headless demo: {params:?}");

    let source = Rc::new(ManualFrameSource::new());
    let frames: Rc<dyn FrameSource> = source.clone();
    let surface = Rc::new(RefCell::new(RecordingSurface::new(800.0, 600.0)));
    let sim = Rc::new(RefCell::new(Simulation::new(params, frames.clone())));

    let sim_for_tick = Rc::clone(&sim);
    let surface_for_tick = Rc::clone(&surface);
    let driver = FrameScheduler::new(frames, move |tick, _: &()| {
        let mut sim = sim_for_tick.borrow_mut();
        let mut surface = surface_for_tick.borrow_mut();
        sim.update(tick.delta_time, &*surface);
        sim.draw(&mut *surface);
        TickFlow::Continue
    });
    driver.start();

    // Ten seconds of 60 fps frames.
    let frame_ms = 1000.0 / 60.0;
    for frame in 0..600u32 {
        source.run_frame(f64::from(frame) * frame_ms);
    }
    driver.stop();

    let sim = sim.borrow();
    let radii: Vec<f64> = sim.circles().iter().map(|c| c.radius().round()).collect();
    let ops = surface.borrow_mut().take_ops();
    log::info!(
        "after 600 frames: {} circles, radii {radii:?}, {} draw ops recorded",
        sim.circles().len(),
        ops.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
