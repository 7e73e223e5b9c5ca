//! Drawing-surface contract
//!
//! The engine draws through this trait so the same code runs against a
//! browser canvas (`platform::web::CanvasSurface`) or an in-memory recorder.

/// 2D raster target for the circle field.
///
/// Dimensions are owned by the host and may change between ticks; callers
/// read them fresh on every update/draw and never cache them.
pub trait DrawSurface {
    /// Current width in pixels.
    fn width(&self) -> f64;
    /// Current height in pixels.
    fn height(&self) -> f64;
    /// Clear an axis-aligned rectangle back to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Set the fill color for subsequent fills (any CSS color string).
    fn set_fill(&mut self, color: &str);
    /// Fill a full circle centered at (x, y).
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    SetFill(String),
    FillCircle { x: f64, y: f64, radius: f64 },
}

/// In-memory surface that records every drawing call, for tests and
/// headless runs.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    /// Reported width; mutate to simulate a host resize.
    pub width: f64,
    /// Reported height.
    pub height: f64,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Calls recorded since the last take, oldest first.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Recorded calls, oldest first.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::ClearRect { x, y, width, height });
    }

    fn set_fill(&mut self, color: &str) {
        self.ops.push(DrawOp::SetFill(color.to_owned()));
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.ops.push(DrawOp::FillCircle { x, y, radius });
    }
}
