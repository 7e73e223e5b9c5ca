//! Circle entities and their radius transitions
//!
//! A circle's radius is never written directly: retargeting starts a smooth
//! transition driven by the circle's own frame-scheduler subscription, so
//! radius changes animate independently of the engine's update loop.

use std::cell::Cell;
use std::rc::Rc;

use glam::DVec2;

use crate::consts::{RADIUS_EASE_WINDOW_MS, RADIUS_SNAP_DISTANCE};
use crate::frame::{FrameScheduler, FrameSource, TickFlow};

/// Smooth scalar approach toward a target value.
///
/// Two states: interpolating (a tick chain is running) and settled (no
/// pending ticks). Each tick closes a fraction of the remaining distance
/// proportional to elapsed time, with the elapsed time capped at one easing
/// window so a huge delta after a backgrounded tab lands exactly on the
/// target instead of overshooting. Within [`RADIUS_SNAP_DISTANCE`] of the
/// target the value snaps there and the chain stops.
pub struct RadiusTransition {
    value: Rc<Cell<f64>>,
    scheduler: FrameScheduler<f64>,
}

impl RadiusTransition {
    /// New settled transition holding 0.0.
    pub fn new(frames: Rc<dyn FrameSource>) -> Self {
        let value = Rc::new(Cell::new(0.0));
        let shared = Rc::clone(&value);
        let scheduler = FrameScheduler::new(frames, move |tick, target: &f64| {
            let current = shared.get();
            let delta = *target - current;
            if delta.abs() > RADIUS_SNAP_DISTANCE {
                let step = delta / RADIUS_EASE_WINDOW_MS
                    * tick.delta_time.min(RADIUS_EASE_WINDOW_MS);
                shared.set(current + step);
                TickFlow::Continue
            } else {
                shared.set(*target);
                TickFlow::Stop
            }
        });
        Self { value, scheduler }
    }

    /// Live interpolated value.
    pub fn current(&self) -> f64 {
        self.value.get()
    }

    /// Abandon any in-flight transition and head for `target` from the
    /// current value.
    pub fn retarget(&self, target: f64) {
        self.scheduler.stop();
        self.scheduler.start_with(target);
    }

    /// True when no transition is running.
    pub fn is_settled(&self) -> bool {
        !self.scheduler.is_running()
    }
}

/// Initial state for a spawned circle.
#[derive(Debug, Clone, Copy)]
pub struct CircleParams {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Target radius; the circle grows toward it from 0.
    pub radius: f64,
}

/// One drifting circle.
///
/// Position and velocity are plain data the engine integrates; the radius
/// lives behind the owned [`RadiusTransition`].
pub struct Circle {
    pub pos: DVec2,
    pub vel: DVec2,
    transition: RadiusTransition,
}

impl Circle {
    pub fn new(params: CircleParams, frames: Rc<dyn FrameSource>) -> Self {
        let transition = RadiusTransition::new(frames);
        transition.retarget(params.radius);
        Self {
            pos: params.pos,
            vel: params.vel,
            transition,
        }
    }

    /// Current rendered radius.
    pub fn radius(&self) -> f64 {
        self.transition.current()
    }

    /// Start a transition toward `target` from the current radius.
    pub fn set_target_radius(&self, target: f64) {
        self.transition.retarget(target);
    }

    /// True once the radius has reached its target.
    pub fn radius_settled(&self) -> bool {
        self.transition.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ManualFrameSource;

    fn frames() -> (Rc<ManualFrameSource>, Rc<dyn FrameSource>) {
        let source = Rc::new(ManualFrameSource::new());
        let as_dyn: Rc<dyn FrameSource> = source.clone();
        (source, as_dyn)
    }

    #[test]
    fn test_radius_converges_then_settles() {
        let (source, as_dyn) = frames();
        let transition = RadiusTransition::new(as_dyn);
        transition.retarget(50.0);
        assert!(!transition.is_settled());

        let mut timestamp = 0.0;
        let mut ticks = 0;
        while !transition.is_settled() {
            source.run_frame(timestamp);
            timestamp += 100.0;
            ticks += 1;
            assert!(ticks < 100, "transition failed to settle");
        }

        assert_eq!(transition.current(), 50.0);
        assert_eq!(source.pending_requests(), 0);

        // Terminal state is idempotent: nothing pending, value stays put.
        assert_eq!(source.run_frame(timestamp), 0);
        assert_eq!(transition.current(), 50.0);
        assert!(transition.is_settled());
    }

    #[test]
    fn test_single_huge_delta_lands_exactly_on_target() {
        let (source, as_dyn) = frames();
        let transition = RadiusTransition::new(as_dyn);
        transition.retarget(80.0);

        source.run_frame(0.0);
        source.run_frame(5000.0);
        assert_eq!(transition.current(), 80.0);
        // The snap branch runs on the following tick.
        assert!(!transition.is_settled());
        source.run_frame(5016.0);
        assert!(transition.is_settled());
        assert_eq!(transition.current(), 80.0);
    }

    #[test]
    fn test_retarget_mid_flight_switches_target() {
        let (source, as_dyn) = frames();
        let transition = RadiusTransition::new(as_dyn);
        transition.retarget(50.0);
        for frame in 0..6 {
            source.run_frame(frame as f64 * 100.0);
        }
        let mid_flight = transition.current();
        assert!(mid_flight > 0.0 && mid_flight < 50.0);

        transition.retarget(80.0);
        let mut timestamp = 600.0;
        while !transition.is_settled() {
            source.run_frame(timestamp);
            timestamp += 100.0;
            assert!(timestamp < 20_000.0, "retargeted transition failed to settle");
        }
        assert_eq!(transition.current(), 80.0);
    }

    #[test]
    fn test_circle_grows_from_zero() {
        let (source, as_dyn) = frames();
        let circle = Circle::new(
            CircleParams {
                pos: DVec2::new(10.0, 20.0),
                vel: DVec2::ZERO,
                radius: 40.0,
            },
            as_dyn,
        );

        assert_eq!(circle.radius(), 0.0);
        source.run_frame(0.0);
        source.run_frame(160.0);
        assert!(circle.radius() > 0.0);
        assert!(circle.radius() < 40.0);
        assert!(!circle.radius_settled());
    }

    #[test]
    fn test_dropped_circle_releases_its_subscription() {
        let (source, as_dyn) = frames();
        let circle = Circle::new(
            CircleParams {
                pos: DVec2::ZERO,
                vel: DVec2::ZERO,
                radius: 30.0,
            },
            as_dyn,
        );

        assert_eq!(source.pending_requests(), 1);
        drop(circle);
        assert_eq!(source.pending_requests(), 0);
    }

    #[test]
    fn test_zero_delta_ticks_hold_the_radius() {
        let (source, as_dyn) = frames();
        let transition = RadiusTransition::new(as_dyn);
        transition.retarget(64.0);

        // Frames with no elapsed time advance nothing and settle nothing.
        for _ in 0..5 {
            source.run_frame(0.0);
        }
        assert_eq!(transition.current(), 0.0);
        assert!(!transition.is_settled());
    }

    #[test]
    fn test_radius_approach_is_monotone_across_large_ticks() {
        for dt in [999.0, 1000.0, 1001.0, 5000.0] {
            let (source, as_dyn) = frames();
            let transition = RadiusTransition::new(as_dyn);
            transition.retarget(64.0);

            let mut timestamp = 0.0;
            let mut previous = transition.current();
            for _ in 0..200 {
                if transition.is_settled() {
                    break;
                }
                source.run_frame(timestamp);
                timestamp += dt;
                let current = transition.current();
                assert!(current >= previous, "approach reversed at dt {dt}");
                assert!(current <= 64.0, "overshot the target at dt {dt}");
                previous = current;
            }
            assert!(transition.is_settled(), "failed to settle at dt {dt}");
            assert_eq!(transition.current(), 64.0);
        }
    }
}
