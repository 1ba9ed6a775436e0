//! Row sampling for content measurement.
//!
//! This module decides which rows a measurement pass looks at:
//! - Start from the rows the viewport currently shows
//! - Widen to a minimum scan size so a freshly loaded grid still gets a
//!   representative sample
//! - Never step outside the data source

mod sample_window;

pub use sample_window::select_window;
