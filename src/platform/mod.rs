//! Platform adapters
//!
//! Browser bindings for the two seams the engine is written against:
//! - `requestAnimationFrame` as a [`crate::frame::FrameSource`]
//! - a 2d canvas context as a [`crate::sim::DrawSurface`]
//!
//! Native builds have no adapter module; the headless demo binary drives the
//! engine with [`crate::frame::ManualFrameSource`] instead.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{CanvasSurface, RafSource, init_logging, mount, pause_when_hidden};
