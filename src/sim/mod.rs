//! Core simulation
//!
//! Platform-free field logic. Everything here runs against the [`DrawSurface`]
//! and [`crate::frame::FrameSource`] seams, so the same engine drives a real
//! canvas on wasm and an in-memory surface in tests and the headless demo.

pub mod circle;
pub mod engine;
pub mod surface;

pub use circle::{Circle, CircleParams, RadiusTransition};
pub use engine::{RadiusPolicy, Simulation, SimulationParams};
pub use surface::{DrawOp, DrawSurface, RecordingSurface};
