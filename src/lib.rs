//! Goo Field - an animated field of soft merging circles
//!
//! Decorative canvas background: circles drift across the surface, ease
//! toward their target radii, and are replaced when they wander off screen.
//! A host-side blur/contrast filter over the canvas turns the overlapping
//! fills into the gooey look.
//!
//! Core modules:
//! - `sim`: Circle field engine (drift physics, cull/spawn, radius easing)
//! - `frame`: Frame-callback scheduling over a pluggable frame source
//! - `platform`: Browser bindings (`requestAnimationFrame`, canvas 2d)

pub mod frame;
pub mod platform;
pub mod sim;

pub use frame::{FrameScheduler, FrameSource, FrameTick, ManualFrameSource, TickFlow};
pub use sim::{Circle, DrawSurface, RadiusPolicy, RecordingSurface, Simulation, SimulationParams};

use rand::Rng;

/// Field tuning constants
pub mod consts {
    /// Upper velocity clamp per axis, pixels per millisecond. There is no
    /// lower clamp; leftward/upward drift can keep accumulating.
    pub const MAX_AXIS_VELOCITY: f64 = 0.025;
    /// Drift nudge divisor: a full-strength nudge sustained for this many
    /// milliseconds adds one px/ms of velocity.
    pub const DRIFT_WINDOW_MS: f64 = 10_000.0;
    /// A circle is culled once its center is this many radii off the surface.
    pub const CULL_MARGIN_FACTOR: f64 = 2.0;
    /// Radius easing snaps to the target once within this distance, pixels.
    pub const RADIUS_SNAP_DISTANCE: f64 = 1.0;
    /// Radius easing window: one tick steps the remaining gap by delta time
    /// over this, with long ticks capped to close the gap exactly.
    pub const RADIUS_EASE_WINDOW_MS: f64 = 1_000.0;
}

/// Uniform sample in [-1, 1).
#[inline]
pub fn signed_random<R: Rng>(rng: &mut R) -> f64 {
    rng.random::<f64>() * 2.0 - 1.0
}

/// Suggested blur radius for the host's goo filter, an eighth of the
/// dominant circle radius.
#[inline]
pub fn goo_blur_radius(circle_radius: f64) -> f64 {
    circle_radius / 8.0
}
