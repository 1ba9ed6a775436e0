//! Plugin configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default clamp ceiling for any computed column width (pixels).
pub const MAX_COLUMN_WIDTH_PX: f64 = 400.0;

/// Minimum number of rows sampled per pass when the data source has them,
/// however few rows the viewport currently shows.
pub const NUM_COLUMNS_TO_SCAN: usize = 50;

/// Fudge factor added on top of the measured width so fractional pixel
/// rounding never clips the widest value with an ellipsis.
pub const WIDTH_MARGIN_PX: f64 = 1.0;

/// Options recognised by the auto-size plugin.
///
/// Field names follow the JavaScript spelling (`maxWidth`,
/// `autoSizeOnRender`, `extraColumnHeaderWidth`) so the same JSON object can
/// configure both the wasm binding and native hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoSizeOptions {
    /// Clamp ceiling for computed widths; `None` disables clamping.
    pub max_width: Option<f64>,
    /// Whether render-completion notifications trigger auto-sizing.
    pub auto_size_on_render: bool,
    /// Extra padding added to every measured header width.
    pub extra_column_header_width: f64,
}

impl Default for AutoSizeOptions {
    fn default() -> Self {
        Self {
            max_width: Some(MAX_COLUMN_WIDTH_PX),
            auto_size_on_render: false,
            extra_column_header_width: 0.0,
        }
    }
}

impl AutoSizeOptions {
    /// Parse options from a JSON object. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns [`crate::AutosizeError::Config`] when the JSON is malformed or
    /// a key has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = AutoSizeOptions::default();
        assert_eq!(opts.max_width, Some(MAX_COLUMN_WIDTH_PX));
        assert!(!opts.auto_size_on_render);
        assert_eq!(opts.extra_column_header_width, 0.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let opts = AutoSizeOptions::from_json(r#"{"autoSizeOnRender": true}"#).unwrap();
        assert!(opts.auto_size_on_render);
        assert_eq!(opts.max_width, Some(MAX_COLUMN_WIDTH_PX));
    }

    #[test]
    fn test_null_max_width_disables_clamp() {
        let opts =
            AutoSizeOptions::from_json(r#"{"maxWidth": null, "extraColumnHeaderWidth": 8}"#)
                .unwrap();
        assert_eq!(opts.max_width, None);
        assert_eq!(opts.extra_column_header_width, 8.0);
    }

    #[test]
    fn test_bad_type_is_config_error() {
        let err = AutoSizeOptions::from_json(r#"{"maxWidth": "wide"}"#).unwrap_err();
        assert!(matches!(err, crate::error::AutosizeError::Config(_)));
    }
}
