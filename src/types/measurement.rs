//! Per-pass measurement values.

use std::ops::Range;

use super::WIDTH_MARGIN_PX;

/// Visible row bounds reported by the grid. `bottom` is exclusive.
///
/// Signed because some grids report a negative `top` while overscrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportRows {
    pub top: i64,
    pub bottom: i64,
}

impl ViewportRows {
    pub fn new(top: i64, bottom: i64) -> Self {
        Self { top, bottom }
    }
}

/// Contiguous range of sampled row indices, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleWindow {
    pub start: usize,
    pub end: usize,
}

impl SampleWindow {
    /// Number of rows in the window.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row indices in ascending order.
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end.max(self.start)
    }
}

/// Raw measurements for one column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasurementResult {
    /// Rendered header width.
    pub header_width: f64,
    /// Rendered width of the widest sampled value.
    pub max_content_width: f64,
    /// Extra header padding from the options.
    pub extra_padding: f64,
}

impl MeasurementResult {
    /// Unclamped applied width: the larger of header (plus padding) and
    /// content, plus the one pixel margin.
    pub fn unclamped_width(&self) -> f64 {
        (self.header_width + self.extra_padding).max(self.max_content_width) + WIDTH_MARGIN_PX
    }
}
