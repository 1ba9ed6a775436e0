//! Text and probe measurement.
//!
//! Two strategies produce pixel widths:
//! - Synthetic text metrics (`measure_text`): a shared offscreen 2D context
//!   configured with a font string, used for every sampled value
//! - Probe elements (`insert_probe` / `probe_width` / `remove_probe`):
//!   hidden, absolutely positioned nodes inserted into the live surface, used
//!   for header cells and for the winning formatted value of each column
//!
//! The sizer only talks to a [`MeasurementSurface`], so the algorithm runs the
//! same against the browser DOM, a headless monospace grid, or a test double.

mod cache;
pub mod markup;
mod monospace;
mod text;

#[cfg(target_arch = "wasm32")]
mod dom;

pub use cache::LruCache;
pub use monospace::MonospaceSurface;
pub use text::TextMeasurer;

#[cfg(target_arch = "wasm32")]
pub use dom::DomSurface;

use crate::error::Result;
use crate::types::{Column, Representation};

/// Opaque handle to a probe element owned by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeHandle(usize);

impl ProbeHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// What a probe element should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeContent {
    /// A deep clone of the column's rendered header cell.
    HeaderClone { column_id: String, label: String },
    /// A hidden, non-wrapping grid cell holding a value.
    Cell(Representation),
}

impl ProbeContent {
    /// Header probe for a column.
    pub fn header(column: &Column) -> Self {
        Self::HeaderClone {
            column_id: column.id.clone(),
            label: column.name.clone(),
        }
    }
}

/// A rendering surface that can report pixel widths.
///
/// Probe operations are split into a write step (`insert_probe`) and a read
/// step (`probe_width`) so callers can batch all writes before any read; see
/// [`crate::probe::ProbeBatch`].
pub trait MeasurementSurface {
    /// Width of `text` rendered in `font`, or `None` when no font metrics are
    /// available.
    fn measure_text(&mut self, text: &str, font: &str) -> Option<f64>;

    /// Font string (`"<size> <family>"`) of a hidden, non-wrapping grid cell.
    fn cell_font(&mut self) -> Option<String>;

    /// Create a hidden probe element and attach it to the live surface.
    ///
    /// # Errors
    /// Returns an error when the element cannot be created or attached; no
    /// element is left attached in that case.
    fn insert_probe(&mut self, content: &ProbeContent) -> Result<ProbeHandle>;

    /// Rendered outer width of an attached probe.
    ///
    /// # Errors
    /// Returns an error for unknown or already removed handles.
    fn probe_width(&mut self, probe: ProbeHandle) -> Result<f64>;

    /// Detach and drop a probe. Unknown handles are ignored.
    fn remove_probe(&mut self, probe: ProbeHandle);

    /// Plain text a representation renders as (empty when it renders no
    /// text). The scanner and every probe cell read text through here.
    fn text_content(&self, representation: &Representation) -> String {
        match representation {
            Representation::Text(text) => text.clone(),
            Representation::Markup(html) => markup::text_content(html),
        }
    }
}
