//! autosize-grid - column auto-sizing for virtualized data grids
//!
//! Computes the width each grid column needs to show its header and the
//! widest value in a bounded sample of rows:
//! - Samples at least 50 rows around the viewport, even right after load
//! - Runs cell formatters and measures the text they render
//! - Measures header cells and formatted values with hidden probe elements,
//!   all writes first and all reads after, so the page lays out once
//! - Commits a new column snapshot only when a width actually changes
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { AutoColumnSize } from 'autosize-grid';
//! await init();
//! const plugin = new AutoColumnSize({ autoSizeOnRender: true, maxWidth: 400 });
//! plugin.init(grid);
//! ```
//!
//! # Usage (Rust)
//!
//! Implement [`ColumnLayoutHost`] for the grid and [`MeasurementSurface`] for
//! the rendering surface (or use [`MemoryGrid`] and [`MonospaceSurface`]),
//! then drive an [`AutoColumnSizer`] from the grid's render and double-click
//! callbacks.

pub mod error;
pub mod host;
pub mod layout;
pub mod measure;
pub mod probe;
pub mod scanner;
pub mod sizer;
pub mod telemetry;
pub mod types;

mod clock;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use error::{AutosizeError, Result};
pub use host::{ColumnLayoutHost, MemoryGrid, RowSource};
pub use measure::{MeasurementSurface, MonospaceSurface, ProbeContent, ProbeHandle, TextMeasurer};
pub use sizer::{AutoColumnSizer, SizingOutcome, SkipReason};
pub use types::*;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
