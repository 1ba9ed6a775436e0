//! Content scan: find the widest rendered value per column.
//!
//! For every sampled row the raw field value is run through the column's
//! formatter (if any), reduced to the text the cell would show, and measured
//! with synthetic text metrics in the grid cell font. The widest value and
//! the representation that produced it are kept; the sizer later renders
//! that single representation in a probe cell to get its true width.

use serde_json::Value;
use tracing::debug;

use crate::clock::now_ms;
use crate::measure::{MeasurementSurface, TextMeasurer};
use crate::telemetry::{self, AutoSizeTelemetry, TelemetrySink, AUTO_COLUMN_SIZE_ACTION};
use crate::types::{
    is_empty_value, value_text, Column, FormatContext, Representation, RowRecord, SampleWindow,
};

/// A column to scan and its index in the grid's column list.
#[derive(Debug, Clone, Copy)]
pub struct ScanTarget<'a> {
    pub column_index: usize,
    pub column: &'a Column,
}

/// Widest value found for one column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanCandidate {
    /// Synthetic text width of the winning value (0 when nothing measured).
    pub width: f64,
    /// What the winning cell renders; `None` when every value was empty.
    pub representation: Option<Representation>,
}

/// Result of scanning a set of columns over one sample window.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// One candidate per target, in target order.
    pub candidates: Vec<ScanCandidate>,
    pub rows_sampled: usize,
    pub columns_scanned: usize,
    pub elapsed_ms: f64,
}

/// Scans sampled rows for each column's widest rendered value.
pub struct ColumnContentScanner<'m> {
    measurer: &'m mut TextMeasurer,
    telemetry: &'m dyn TelemetrySink,
    view: &'m str,
}

impl<'m> ColumnContentScanner<'m> {
    pub fn new(
        measurer: &'m mut TextMeasurer,
        telemetry: &'m dyn TelemetrySink,
        view: &'m str,
    ) -> Self {
        Self {
            measurer,
            telemetry,
            view,
        }
    }

    /// Scan `targets` over the rows of `window`.
    ///
    /// `rows` holds the records for `window.rows()` in order (`None` for rows
    /// the provider could not supply). Formatter failures are isolated to the
    /// value that raised them.
    pub fn scan<S>(
        &mut self,
        surface: &mut S,
        targets: &[ScanTarget<'_>],
        window: SampleWindow,
        rows: &[Option<RowRecord>],
    ) -> ScanReport
    where
        S: MeasurementSurface + ?Sized,
    {
        let started = now_ms();

        let candidates = match surface.cell_font() {
            Some(font) => targets
                .iter()
                .map(|target| self.scan_column(surface, *target, window, rows, &font))
                .collect(),
            None => {
                debug!("no cell font available, content measures as zero");
                vec![ScanCandidate::default(); targets.len()]
            }
        };

        let report = ScanReport {
            candidates,
            rows_sampled: window.len(),
            columns_scanned: targets.len(),
            elapsed_ms: (now_ms() - started).max(0.0),
        };

        telemetry::emit(
            self.telemetry,
            &AutoSizeTelemetry {
                view: self.view.to_string(),
                action: AUTO_COLUMN_SIZE_ACTION,
                elapsed_ms: report.elapsed_ms,
                rows_sampled: report.rows_sampled,
                columns_scanned: report.columns_scanned,
            },
        );
        report
    }

    fn scan_column<S>(
        &mut self,
        surface: &mut S,
        target: ScanTarget<'_>,
        window: SampleWindow,
        rows: &[Option<RowRecord>],
        font: &str,
    ) -> ScanCandidate
    where
        S: MeasurementSurface + ?Sized,
    {
        let column = target.column;
        let mut best = ScanCandidate::default();

        for (row_index, record) in window.rows().zip(rows.iter()) {
            let record = record.as_ref();
            let raw = record
                .and_then(|r| r.get(&column.field))
                .unwrap_or(&Value::Null);

            let (text, representation) = match &column.formatter {
                Some(formatter) => {
                    let ctx = FormatContext {
                        row: row_index,
                        column_index: target.column_index,
                        value: raw,
                        column,
                        record,
                    };
                    match formatter(&ctx) {
                        Ok(rendered) => {
                            let text = Some(surface.text_content(&rendered))
                                .filter(|t| !t.is_empty());
                            (text, Some(rendered))
                        }
                        Err(err) => {
                            debug!(column = %column.id, row = row_index, %err, "formatter failed");
                            continue;
                        }
                    }
                }
                None => (None, None),
            };

            let width = match text {
                Some(text) => self.measurer.measure_text(surface, &text, font),
                None if is_empty_value(raw) => 0.0,
                None => self.measurer.measure_text(surface, &value_text(raw), font),
            };

            if width > best.width {
                best = ScanCandidate {
                    width,
                    representation: Some(
                        representation.unwrap_or_else(|| Representation::Text(value_text(raw))),
                    ),
                };
            }
        }

        best
    }
}
