//! Headless measurement surface for fixed-pitch grids.
//!
//! Terminal tables and server-side layout have no font metrics API; every
//! glyph occupies a whole number of cells. Widths here are display columns
//! (East Asian wide glyphs count twice) times the pixel width of one cell.

use unicode_width::UnicodeWidthStr;

use super::{MeasurementSurface, ProbeContent, ProbeHandle};
use crate::error::{AutosizeError, Result};

const DEFAULT_FONT: &str = "12px monospace";

/// Fixed-pitch [`MeasurementSurface`].
pub struct MonospaceSurface {
    char_width: f64,
    cell_padding: f64,
    font: Option<String>,
    probes: Vec<Option<String>>,
}

impl MonospaceSurface {
    /// Surface where each display column is `char_width` pixels wide.
    pub fn new(char_width: f64) -> Self {
        Self {
            char_width,
            cell_padding: 0.0,
            font: Some(DEFAULT_FONT.to_string()),
            probes: Vec::new(),
        }
    }

    /// Horizontal padding added to every probe cell (both sides combined).
    #[must_use]
    pub fn with_cell_padding(mut self, padding: f64) -> Self {
        self.cell_padding = padding;
        self
    }

    /// Font reported for probe cells; `None` simulates missing metrics.
    #[must_use]
    pub fn with_font(mut self, font: Option<String>) -> Self {
        self.font = font;
        self
    }

    /// Probes currently attached.
    pub fn attached_probes(&self) -> usize {
        self.probes.iter().filter(|p| p.is_some()).count()
    }

    fn text_width(&self, text: &str) -> f64 {
        text.width() as f64 * self.char_width
    }
}

impl MeasurementSurface for MonospaceSurface {
    fn measure_text(&mut self, text: &str, font: &str) -> Option<f64> {
        if font.is_empty() {
            return None;
        }
        Some(self.text_width(text))
    }

    fn cell_font(&mut self) -> Option<String> {
        self.font.clone()
    }

    fn insert_probe(&mut self, content: &ProbeContent) -> Result<ProbeHandle> {
        let text = match content {
            ProbeContent::HeaderClone { label, .. } => label.clone(),
            ProbeContent::Cell(representation) => {
                self.text_content(representation)
            }
        };
        // Reuse a free slot so long sessions don't grow the table.
        let index = match self.probes.iter().position(Option::is_none) {
            Some(free) => {
                if let Some(slot) = self.probes.get_mut(free) {
                    *slot = Some(text);
                }
                free
            }
            None => {
                self.probes.push(Some(text));
                self.probes.len() - 1
            }
        };
        Ok(ProbeHandle::new(index))
    }

    fn probe_width(&mut self, probe: ProbeHandle) -> Result<f64> {
        match self.probes.get(probe.index()) {
            Some(Some(text)) => Ok(self.text_width(text) + self.cell_padding),
            _ => Err(AutosizeError::Surface(format!(
                "probe {} is not attached",
                probe.index()
            ))),
        }
    }

    fn remove_probe(&mut self, probe: ProbeHandle) {
        if let Some(slot) = self.probes.get_mut(probe.index()) {
            *slot = None;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::Representation;

    #[test]
    fn test_wide_glyphs_count_double() {
        let mut surface = MonospaceSurface::new(8.0);
        assert_eq!(surface.measure_text("ab", DEFAULT_FONT), Some(16.0));
        assert_eq!(surface.measure_text("日本", DEFAULT_FONT), Some(32.0));
    }

    #[test]
    fn test_header_probe_uses_label() {
        let mut surface = MonospaceSurface::new(10.0).with_cell_padding(6.0);
        let probe = surface
            .insert_probe(&ProbeContent::HeaderClone {
                column_id: "c1".to_string(),
                label: "Name".to_string(),
            })
            .unwrap();
        assert_eq!(surface.probe_width(probe).unwrap(), 46.0);
        surface.remove_probe(probe);
        assert!(surface.probe_width(probe).is_err());
    }

    #[test]
    fn test_markup_cell_measures_text_nodes() {
        let mut surface = MonospaceSurface::new(10.0);
        let probe = surface
            .insert_probe(&ProbeContent::Cell(Representation::Markup(
                "<i>abc</i>".to_string(),
            )))
            .unwrap();
        assert_eq!(surface.probe_width(probe).unwrap(), 30.0);
    }

    #[test]
    fn test_slots_are_reused() {
        let mut surface = MonospaceSurface::new(1.0);
        let content = ProbeContent::Cell(Representation::Text("x".to_string()));
        let a = surface.insert_probe(&content).unwrap();
        surface.remove_probe(a);
        let b = surface.insert_probe(&content).unwrap();
        assert_eq!(a, b);
        assert_eq!(surface.attached_probes(), 1);
    }

    #[test]
    fn test_no_font() {
        let mut surface = MonospaceSurface::new(1.0).with_font(None);
        assert_eq!(surface.cell_font(), None);
    }
}
