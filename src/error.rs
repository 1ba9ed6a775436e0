//! Structured error types for autosize-grid.
//!
//! Errors never cross into the host grid: the sizer turns them into
//! zero-width signals or skipped passes. They exist so each measurement step
//! can report *why* it produced no signal.

/// All errors that can occur while measuring and sizing columns.
#[derive(Debug, thiserror::Error)]
pub enum AutosizeError {
    /// A host-supplied cell formatter failed for one value.
    #[error("Formatter failed for row {row}, column {column}: {message}")]
    Formatter {
        row: usize,
        column: usize,
        message: String,
    },

    /// The rendering surface rejected a probe operation.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Formatter markup could not be read as XML/HTML fragment.
    #[error("Markup parsing: {0}")]
    Markup(#[from] quick_xml::Error),

    /// Options JSON could not be decoded.
    #[error("Invalid options: {0}")]
    Config(#[from] serde_json::Error),

    /// Telemetry sink rejected an event.
    #[error("Telemetry: {0}")]
    Telemetry(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AutosizeError>;

impl From<String> for AutosizeError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for AutosizeError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<AutosizeError> for wasm_bindgen::JsValue {
    fn from(e: AutosizeError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
