//! The circle-field engine
//!
//! Owns the circle collection and advances it each tick: cull circles that
//! drifted off the surface, spawn replacements up to the desired count, then
//! integrate drift physics. Drawing is a flat fill pass over the live
//! circles; the gooey merging look comes from a host-side blur filter, not
//! from anything here.

use std::rc::Rc;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::circle::{Circle, CircleParams};
use super::surface::DrawSurface;
use crate::consts::{CULL_MARGIN_FACTOR, DRIFT_WINDOW_MS, MAX_AXIS_VELOCITY};
use crate::frame::FrameSource;
use crate::signed_random;

/// Where spawned (and retargeted) circles get their radius from.
pub enum RadiusPolicy {
    /// Every circle gets the same target radius.
    Fixed(f64),
    /// Sampled once per circle on spawn and on policy change.
    Generator(Box<dyn FnMut() -> f64>),
}

impl RadiusPolicy {
    /// Policy from a sampling closure.
    pub fn generator(sample: impl FnMut() -> f64 + 'static) -> Self {
        Self::Generator(Box::new(sample))
    }

    /// Draw the next target radius.
    fn sample(&mut self) -> f64 {
        match self {
            Self::Fixed(radius) => *radius,
            Self::Generator(sample) => sample(),
        }
    }
}

impl From<f64> for RadiusPolicy {
    fn from(radius: f64) -> Self {
        Self::Fixed(radius)
    }
}

impl std::fmt::Debug for RadiusPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(radius) => f.debug_tuple("Fixed").field(radius).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// Initial engine configuration.
///
/// Mirrors the knobs an embedding host exposes; every field has a default so
/// hosts can deserialize partial JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Desired number of live circles.
    pub circle_count: usize,
    /// Initial fixed target radius in pixels. Generator policies are set at
    /// runtime via [`Simulation::set_radius_policy`].
    pub circle_radius: f64,
    /// Fill color (any CSS color string).
    pub circle_color: String,
    /// Scales position integration without changing drift statistics.
    pub speed_multiplier: f64,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            circle_count: 10,
            circle_radius: 50.0,
            circle_color: "pink".to_owned(),
            speed_multiplier: 1.0,
            seed: None,
        }
    }
}

/// The circle field.
///
/// Generic over the RNG so tests can pin the random stream; hosts use the
/// default `Pcg32`. All mutation happens on the single cooperative thread
/// that drives ticks.
pub struct Simulation<R = Pcg32> {
    /// Desired number of live circles, read each tick.
    pub circle_count: usize,
    /// Fill color, read each draw.
    pub circle_color: String,
    /// Position integration scale, read each tick.
    pub speed_multiplier: f64,
    radius_policy: RadiusPolicy,
    circles: Vec<Circle>,
    frames: Rc<dyn FrameSource>,
    rng: R,
}

impl Simulation {
    /// Engine with the default RNG, seeded per `params.seed`.
    pub fn new(params: SimulationParams, frames: Rc<dyn FrameSource>) -> Self {
        let rng = match params.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        Self::with_rng(params, frames, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Engine over a caller-supplied RNG.
    pub fn with_rng(params: SimulationParams, frames: Rc<dyn FrameSource>, rng: R) -> Self {
        Self {
            circle_count: params.circle_count,
            circle_color: params.circle_color,
            speed_multiplier: params.speed_multiplier,
            radius_policy: RadiusPolicy::Fixed(params.circle_radius),
            circles: Vec::new(),
            frames,
            rng,
        }
    }

    /// Live circles, oldest first.
    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    /// Replace the radius policy and retarget every live circle with a fresh
    /// sample from the new policy.
    pub fn set_radius_policy(&mut self, policy: impl Into<RadiusPolicy>) {
        self.radius_policy = policy.into();
        let policy = &mut self.radius_policy;
        for circle in &self.circles {
            circle.set_target_radius(policy.sample());
        }
    }

    /// Advance one tick: cull, spawn, physics. `dt` is milliseconds since
    /// the previous tick; surface dimensions are read fresh on every call.
    pub fn update(&mut self, dt: f64, surface: &impl DrawSurface) {
        let width = surface.width();
        let height = surface.height();

        // Cull circles whose margin box no longer overlaps the surface.
        self.circles
            .retain(|circle| within_cull_bounds(circle.pos, circle.radius(), width, height));

        // Refill the population at random positions with zero velocity; the
        // radius target comes from the policy, one sample per circle.
        while self.circles.len() < self.circle_count {
            let pos = DVec2::new(
                self.rng.random::<f64>() * width,
                self.rng.random::<f64>() * height,
            );
            let radius = self.radius_policy.sample();
            self.circles.push(Circle::new(
                CircleParams {
                    pos,
                    vel: DVec2::ZERO,
                    radius,
                },
                Rc::clone(&self.frames),
            ));
        }

        // Drift: random walk on velocity, clamped above only (velocities may
        // go arbitrarily negative), then integrate.
        for circle in &mut self.circles {
            let nudge = DVec2::new(
                signed_random(&mut self.rng),
                signed_random(&mut self.rng),
            ) * dt
                / DRIFT_WINDOW_MS;
            circle.vel = (circle.vel + nudge).min(DVec2::splat(MAX_AXIS_VELOCITY));
            circle.pos += circle.vel * dt * self.speed_multiplier;
        }
    }

    /// Draw the field: clear everything, set the fill color once, then fill
    /// every circle at its interpolated radius.
    pub fn draw(&self, surface: &mut impl DrawSurface) {
        let width = surface.width();
        let height = surface.height();
        surface.clear_rect(0.0, 0.0, width, height);
        surface.set_fill(&self.circle_color);
        for circle in &self.circles {
            surface.fill_circle(circle.pos.x, circle.pos.y, circle.radius());
        }
    }
}

/// Keep predicate for the cull pass: the circle's margin box (2x its current
/// radius) must still overlap the surface rectangle on both axes.
fn within_cull_bounds(pos: DVec2, radius: f64, width: f64, height: f64) -> bool {
    let margin = CULL_MARGIN_FACTOR * radius;
    pos.x - margin < width
        && pos.y - margin < height
        && pos.x + margin > 0.0
        && pos.y + margin > 0.0
}
