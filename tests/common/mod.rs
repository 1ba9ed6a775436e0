//! Shared test doubles for the sizing tests.
//!
//! - [`FakeSurface`]: deterministic widths (10px per character), an
//!   operation log for checking write-then-read ordering, and an attached
//!   probe counter for cleanup checks
//! - [`RecordingTelemetry`]: keeps every telemetry event
//! - row/column builders
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use autosize_grid::measure::{MeasurementSurface, ProbeContent, ProbeHandle};
use autosize_grid::telemetry::{AutoSizeTelemetry, TelemetrySink};
use autosize_grid::{AutosizeError, Result, RowRecord};

/// Pixels per character for every fake measurement.
pub const CHAR_PX: f64 = 10.0;

/// One surface call, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    MeasureText(String),
    Insert(usize),
    Read(usize),
    Remove(usize),
}

/// Deterministic [`MeasurementSurface`].
pub struct FakeSurface {
    pub font: Option<String>,
    /// Header width by column id; unset headers measure their label.
    pub header_widths: HashMap<String, f64>,
    /// Column ids whose header probe fails to attach.
    pub failing_headers: HashSet<String>,
    pub ops: Vec<Op>,
    probes: Vec<Option<String>>,
}

impl Default for FakeSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            font: Some("12px test".to_string()),
            header_widths: HashMap::new(),
            failing_headers: HashSet::new(),
            ops: Vec::new(),
            probes: Vec::new(),
        }
    }

    pub fn with_header_width(mut self, column_id: &str, width: f64) -> Self {
        self.header_widths.insert(column_id.to_string(), width);
        self
    }

    pub fn attached_probes(&self) -> usize {
        self.probes.iter().filter(|p| p.is_some()).count()
    }

    /// Probe operations only (text measurements filtered out).
    pub fn probe_ops(&self) -> Vec<Op> {
        self.ops
            .iter()
            .filter(|op| !matches!(op, Op::MeasureText(_)))
            .cloned()
            .collect()
    }

    /// Assert that within every batch, all inserts precede all reads and all
    /// reads precede all removes. Batches are delimited by the surface
    /// becoming empty again.
    pub fn assert_batched(&self) {
        let mut phase = 0; // 0 = writing, 1 = reading, 2 = removing
        let mut attached = 0usize;
        for op in self.probe_ops() {
            match op {
                Op::Insert(_) => {
                    assert_eq!(phase, 0, "insert after a read in the same batch");
                    attached += 1;
                }
                Op::Read(_) => {
                    assert!(phase <= 1, "read after a remove in the same batch");
                    phase = 1;
                }
                Op::Remove(_) => {
                    phase = 2;
                    attached -= 1;
                    if attached == 0 {
                        phase = 0;
                    }
                }
                Op::MeasureText(_) => {}
            }
        }
        assert_eq!(attached, 0, "probes left attached");
    }

    fn width_of(text: &str) -> f64 {
        text.chars().count() as f64 * CHAR_PX
    }
}

impl MeasurementSurface for FakeSurface {
    fn measure_text(&mut self, text: &str, _font: &str) -> Option<f64> {
        self.ops.push(Op::MeasureText(text.to_string()));
        Some(Self::width_of(text))
    }

    fn cell_font(&mut self) -> Option<String> {
        self.font.clone()
    }

    fn insert_probe(&mut self, content: &ProbeContent) -> Result<ProbeHandle> {
        let rendered = match content {
            ProbeContent::HeaderClone { column_id, label } => {
                if self.failing_headers.contains(column_id) {
                    return Err(AutosizeError::Surface(format!("no header {column_id}")));
                }
                match self.header_widths.get(column_id) {
                    Some(width) => format!("#{width}"),
                    None => label.clone(),
                }
            }
            ProbeContent::Cell(representation) => {
                self.text_content(representation)
            }
        };
        self.probes.push(Some(rendered));
        let index = self.probes.len() - 1;
        self.ops.push(Op::Insert(index));
        Ok(ProbeHandle::new(index))
    }

    fn probe_width(&mut self, probe: ProbeHandle) -> Result<f64> {
        self.ops.push(Op::Read(probe.index()));
        match self.probes.get(probe.index()) {
            Some(Some(text)) => match text.strip_prefix('#') {
                Some(fixed) => Ok(fixed.parse().unwrap()),
                None => Ok(Self::width_of(text)),
            },
            _ => Err(AutosizeError::Surface("detached".to_string())),
        }
    }

    fn remove_probe(&mut self, probe: ProbeHandle) {
        self.ops.push(Op::Remove(probe.index()));
        if let Some(slot) = self.probes.get_mut(probe.index()) {
            *slot = None;
        }
    }
}

/// Telemetry sink that records every event.
#[derive(Clone, Default)]
pub struct RecordingTelemetry {
    pub events: Rc<RefCell<Vec<AutoSizeTelemetry>>>,
}

impl TelemetrySink for RecordingTelemetry {
    fn send(&self, event: &AutoSizeTelemetry) -> Result<()> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}

/// Telemetry sink whose transport is always down.
pub struct BrokenTelemetry;

impl TelemetrySink for BrokenTelemetry {
    fn send(&self, _event: &AutoSizeTelemetry) -> Result<()> {
        Err(AutosizeError::Telemetry("transport closed".to_string()))
    }
}

/// Rows from a JSON array of objects.
pub fn rows(value: serde_json::Value) -> Vec<RowRecord> {
    serde_json::from_value(value).expect("rows must be an array of objects")
}

/// `count` rows where field `field` holds `"x" * width_chars(i)`.
pub fn rows_with_lengths(field: &str, lengths: &[usize]) -> Vec<RowRecord> {
    lengths
        .iter()
        .map(|&len| {
            let mut row = RowRecord::new();
            row.insert(field, serde_json::Value::String("x".repeat(len)));
            row
        })
        .collect()
}
