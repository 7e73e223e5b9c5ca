//! Frame-callback sources
//!
//! A `FrameSource` hands out one-shot frame callbacks: request one, get an
//! id back, cancel via the id. The browser adapter lives in `platform::web`;
//! `ManualFrameSource` drives frames with synthetic timestamps for tests and
//! headless runs.

use std::cell::RefCell;

/// Identifies one pending frame request.
pub type RequestId = u64;

/// One-shot callback invoked with the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// One-shot frame-callback capability.
///
/// Implementations deliver each requested callback at most once, and never
/// after `cancel` was called with its id.
pub trait FrameSource {
    /// Register a callback for the next frame and return its request id.
    fn request(&self, callback: FrameCallback) -> RequestId;

    /// Cancel a pending request. Unknown or already-fired ids are ignored.
    fn cancel(&self, id: RequestId);
}

/// Frame source driven by explicit `run_frame` calls.
///
/// Mirrors the browser contract: `run_frame` fires the callbacks that were
/// pending when the frame began, in registration order, skipping any that
/// were canceled mid-frame. Callbacks registered during a frame run on the
/// next one.
#[derive(Default)]
pub struct ManualFrameSource {
    state: RefCell<ManualState>,
}

#[derive(Default)]
struct ManualState {
    next_id: RequestId,
    pending: Vec<(RequestId, FrameCallback)>,
}

impl ManualFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests currently waiting for a frame.
    pub fn pending_requests(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Fire one frame at `timestamp` (milliseconds since an arbitrary
    /// origin). Returns how many callbacks ran.
    pub fn run_frame(&self, timestamp: f64) -> usize {
        let batch: Vec<RequestId> = self
            .state
            .borrow()
            .pending
            .iter()
            .map(|(id, _)| *id)
            .collect();

        let mut fired = 0;
        for id in batch {
            let callback = {
                let mut state = self.state.borrow_mut();
                let index = state
                    .pending
                    .iter()
                    .position(|(pending_id, _)| *pending_id == id);
                index.map(|index| state.pending.remove(index).1)
            };
            // Gone from pending means a cancel earlier in this same frame.
            let Some(callback) = callback else { continue };
            callback(timestamp);
            fired += 1;
        }
        fired
    }
}

impl FrameSource for ManualFrameSource {
    fn request(&self, callback: FrameCallback) -> RequestId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.pending.push((id, callback));
        id
    }

    fn cancel(&self, id: RequestId) {
        self.state
            .borrow_mut()
            .pending
            .retain(|(pending_id, _)| *pending_id != id);
    }
}
