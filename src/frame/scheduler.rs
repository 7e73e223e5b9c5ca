//! Per-refresh callback scheduling with elapsed-time tracking
//!
//! Wraps a [`FrameSource`] into a start/stop tick chain: the next frame is
//! requested *before* the current callback runs, delta time is tracked per
//! instance, and the chain tears down when stopped, dropped, or told to by
//! the callback's return value.

use std::cell::RefCell;
use std::rc::Rc;

use super::source::{FrameSource, RequestId};

/// Timing info passed to every tick callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Frame timestamp in milliseconds (monotonic, source-defined origin).
    pub timestamp: f64,
    /// Milliseconds since this scheduler's previous tick; 0.0 on the first
    /// tick after a (re)start.
    pub delta_time: f64,
}

/// What the tick callback wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    /// Keep the chain running.
    Continue,
    /// Cancel the already-scheduled next tick and stop.
    Stop,
}

type TickCallback<D> = Box<dyn FnMut(FrameTick, &D) -> TickFlow>;

struct SchedulerState<D> {
    callback: Option<TickCallback<D>>,
    request: Option<RequestId>,
    last_timestamp: Option<f64>,
}

/// Repeating frame callback with per-instance delta timing.
///
/// `D` is an optional payload forwarded to the callback by shared reference
/// on every tick; payload-free schedulers use `FrameScheduler<()>` and plain
/// [`FrameScheduler::start`].
///
/// At most one frame request is pending per scheduler. `start*` while
/// running and `stop` while stopped are no-ops. Dropping the scheduler
/// cancels its pending request.
pub struct FrameScheduler<D = ()> {
    source: Rc<dyn FrameSource>,
    state: Rc<RefCell<SchedulerState<D>>>,
}

impl<D: 'static> FrameScheduler<D> {
    pub fn new(
        source: Rc<dyn FrameSource>,
        callback: impl FnMut(FrameTick, &D) -> TickFlow + 'static,
    ) -> Self {
        Self {
            source,
            state: Rc::new(RefCell::new(SchedulerState {
                callback: Some(Box::new(callback)),
                request: None,
                last_timestamp: None,
            })),
        }
    }

    /// Begin ticking, passing `data` to the callback on every tick. No-op
    /// while already running; a running chain keeps its original payload.
    pub fn start_with(&self, data: D) {
        if self.is_running() {
            return;
        }
        let data = Rc::new(data);
        let first = schedule(&self.source, &self.state, &data);
        self.state.borrow_mut().request = Some(first);
    }
}

impl<D> FrameScheduler<D> {
    /// Whether a tick is currently pending.
    pub fn is_running(&self) -> bool {
        self.state.borrow().request.is_some()
    }

    /// Cancel the pending tick, if any, and forget the previous timestamp so
    /// the next start begins a fresh delta chain.
    pub fn stop(&self) {
        halt(&self.source, &self.state);
    }
}

impl FrameScheduler {
    /// Begin ticking a payload-free scheduler.
    pub fn start(&self) {
        self.start_with(());
    }
}

impl<D> Drop for FrameScheduler<D> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Request the next frame for this chain.
fn schedule<D: 'static>(
    source: &Rc<dyn FrameSource>,
    state: &Rc<RefCell<SchedulerState<D>>>,
    data: &Rc<D>,
) -> RequestId {
    let source_for_tick = Rc::clone(source);
    let state_for_tick = Rc::clone(state);
    let data_for_tick = Rc::clone(data);
    source.request(Box::new(move |timestamp| {
        run_tick(&source_for_tick, &state_for_tick, &data_for_tick, timestamp);
    }))
}

fn run_tick<D: 'static>(
    source: &Rc<dyn FrameSource>,
    state_rc: &Rc<RefCell<SchedulerState<D>>>,
    data: &Rc<D>,
    timestamp: f64,
) {
    // Schedule the follow-up before dispatching so the callback can cancel
    // the whole chain via TickFlow::Stop.
    let next = schedule(source, state_rc, data);
    let (tick, callback) = {
        let mut state = state_rc.borrow_mut();
        let delta_time = state
            .last_timestamp
            .map_or(0.0, |previous| timestamp - previous);
        state.last_timestamp = Some(timestamp);
        state.request = Some(next);
        let tick = FrameTick {
            timestamp,
            delta_time,
        };
        (tick, state.callback.take())
    };

    // The callback is moved out for the call; the RefCell stays unborrowed
    // while user code runs.
    let Some(mut callback) = callback else { return };
    let flow = callback(tick, data);
    state_rc.borrow_mut().callback = Some(callback);

    if flow == TickFlow::Stop {
        halt(source, state_rc);
    }
}

fn halt<D>(source: &Rc<dyn FrameSource>, state_rc: &Rc<RefCell<SchedulerState<D>>>) {
    let request = {
        let mut state = state_rc.borrow_mut();
        state.last_timestamp = None;
        state.request.take()
    };
    if let Some(id) = request {
        source.cancel(id);
    }
}
