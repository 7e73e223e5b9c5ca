//! Frame scheduling module
//!
//! The display-refresh loop split into an injected capability and a reusable
//! tick chain:
//! - `FrameSource`: request/cancel one-shot frame callbacks
//! - `FrameScheduler`: start/stop repetition with per-instance delta timing
//!
//! Simulation code never touches the platform's animation-frame API
//! directly; hosts hand it a source instead.

pub mod scheduler;
pub mod source;

pub use scheduler::{FrameScheduler, FrameTick, TickFlow};
pub use source::{FrameCallback, FrameSource, ManualFrameSource, RequestId};
