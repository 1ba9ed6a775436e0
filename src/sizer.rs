//! Column auto-sizing orchestration.
//!
//! Two triggers drive a sizing pass:
//! - [`AutoColumnSizer::on_post_render`]: the grid finished rendering; size
//!   every rendered column (only when `auto_size_on_render` is set)
//! - [`AutoColumnSizer::on_double_click_resize_handle`]: the user asked to fit
//!   one column
//!
//! Each pass measures header widths and the widest sampled content, computes
//! the applied width, and commits a new column snapshot back to the host.
//! Nothing fails loudly: missing data, a detached grid, or a non-resizable
//! target are reported as [`SizingOutcome::Skipped`].

use std::cell::{Cell, RefCell};

use tracing::{debug, trace};

use crate::host::ColumnLayoutHost;
use crate::layout::select_window;
use crate::measure::{MeasurementSurface, ProbeContent, TextMeasurer};
use crate::probe::ProbeBatch;
use crate::scanner::{ColumnContentScanner, ScanTarget};
use crate::telemetry::{TelemetrySink, TracingTelemetry, DEFAULT_TELEMETRY_VIEW};
use crate::types::{AutoSizeOptions, Column, MeasurementResult, RowRecord, NUM_COLUMNS_TO_SCAN};

/// Widths closer than this are considered unchanged.
const WIDTH_EPSILON: f64 = 1e-3;

/// Why a pass did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Plugin not initialised, or render trigger disabled.
    Inactive,
    /// A pass is already committing; the notification came from that commit.
    InProgress,
    /// The grid container is not attached to the live surface.
    Detached,
    /// The first row is missing or holds only empty values.
    NoData,
    /// No rendered header resolved to a column definition.
    NoHeaders,
    /// The double-clicked header has no column definition.
    UnknownColumn,
    /// The double-clicked column is not resizable.
    NotResizable,
}

/// Result of one trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum SizingOutcome {
    Skipped(SkipReason),
    /// Measured, but every width was already right. Nothing committed.
    Unchanged,
    /// A new snapshot was committed; ids of the columns whose width changed.
    Resized { columns: Vec<String> },
}

impl SizingOutcome {
    /// Whether the triggering gesture's default action should be prevented.
    ///
    /// True once a valid resize target was found, so a double-click doesn't
    /// also select header text.
    pub fn suppresses_default(&self) -> bool {
        !matches!(self, Self::Skipped(_))
    }
}

/// Clamp a width to `[0, max_width]`; no ceiling when `max_width` is `None`.
pub fn clamp_width(width: f64, max_width: Option<f64>) -> f64 {
    let width = width.max(0.0);
    match max_width {
        Some(max) if width > max => max.max(0.0),
        _ => width,
    }
}

/// Final width for a column. The column's own `max_width` wins over the
/// plugin-wide one; both triggers clamp through here.
pub fn applied_width(
    measurement: &MeasurementResult,
    column_max: Option<f64>,
    option_max: Option<f64>,
) -> f64 {
    clamp_width(measurement.unclamped_width(), column_max.or(option_max))
}

fn width_changed(current: Option<f64>, next: f64) -> bool {
    current.map_or(true, |w| (w - next).abs() > WIDTH_EPSILON)
}

/// Clears the in-progress flag when the commit finishes.
struct PassGuard<'a>(&'a Cell<bool>);

impl<'a> PassGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// The auto-size plugin.
///
/// Entry points take `&self`: a host that synchronously re-renders inside
/// `set_columns` may call [`on_post_render`](Self::on_post_render) again
/// from within the commit, and that nested call must see the in-progress
/// flag rather than start a second pass.
pub struct AutoColumnSizer {
    options: AutoSizeOptions,
    measurer: RefCell<TextMeasurer>,
    telemetry: Box<dyn TelemetrySink>,
    view: String,
    initialised: Cell<bool>,
    in_progress: Cell<bool>,
}

impl AutoColumnSizer {
    pub fn new(options: AutoSizeOptions) -> Self {
        Self {
            options,
            measurer: RefCell::new(TextMeasurer::new()),
            telemetry: Box::new(TracingTelemetry),
            view: DEFAULT_TELEMETRY_VIEW.to_string(),
            initialised: Cell::new(false),
            in_progress: Cell::new(false),
        }
    }

    /// Route scan telemetry to `sink`, tagged with `view`.
    #[must_use]
    pub fn with_telemetry(mut self, view: impl Into<String>, sink: Box<dyn TelemetrySink>) -> Self {
        self.view = view.into();
        self.telemetry = sink;
        self
    }

    pub fn options(&self) -> &AutoSizeOptions {
        &self.options
    }

    /// Register the triggers. Until then every entry point is a no-op.
    pub fn init(&self) {
        self.initialised.set(true);
        debug!(
            auto_size_on_render = self.options.auto_size_on_render,
            "auto column size initialised"
        );
    }

    /// Unregister the triggers and drop cached measurements.
    pub fn destroy(&self) {
        self.initialised.set(false);
        if let Ok(mut measurer) = self.measurer.try_borrow_mut() {
            measurer.clear();
        }
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised.get()
    }

    /// Whether the render-completion trigger is currently live.
    pub fn render_hook_active(&self) -> bool {
        self.initialised.get() && self.options.auto_size_on_render && !self.in_progress.get()
    }

    /// Render-completion trigger: size every rendered column.
    pub fn on_post_render<H, S>(&self, host: &mut H, surface: &mut S) -> SizingOutcome
    where
        H: ColumnLayoutHost + ?Sized,
        S: MeasurementSurface + ?Sized,
    {
        if self.in_progress.get() {
            trace!("render notification during commit ignored");
            return SizingOutcome::Skipped(SkipReason::InProgress);
        }
        if !self.initialised.get() || !self.options.auto_size_on_render {
            return SizingOutcome::Skipped(SkipReason::Inactive);
        }
        if !host.is_attached() {
            return SizingOutcome::Skipped(SkipReason::Detached);
        }
        if !host.row(0).is_some_and(|row| row.has_any_value()) {
            return SizingOutcome::Skipped(SkipReason::NoData);
        }

        let mut snapshot = host.columns();
        let targets: Vec<usize> = host
            .rendered_headers()
            .iter()
            .filter_map(|id| host.column_index(id))
            .filter(|&index| index < snapshot.len())
            .collect();
        if targets.is_empty() {
            return SizingOutcome::Skipped(SkipReason::NoHeaders);
        }

        let measurements = self.measure_columns(host, surface, &snapshot, &targets);

        let mut changed = Vec::new();
        for (index, measurement) in targets.iter().zip(measurements.iter()) {
            let Some(column) = snapshot.get_mut(*index) else {
                continue;
            };
            let width = applied_width(measurement, column.max_width, self.options.max_width);
            if width_changed(column.width, width) {
                column.width = Some(width);
                changed.push(column.id.clone());
            }
        }

        if changed.is_empty() {
            trace!("auto size found no width changes");
            return SizingOutcome::Unchanged;
        }

        self.commit(host, snapshot);
        debug!(columns = ?changed, "auto sized columns");
        SizingOutcome::Resized { columns: changed }
    }

    /// Double-click trigger: fit the column behind the clicked resize handle.
    pub fn on_double_click_resize_handle<H, S>(
        &self,
        host: &mut H,
        surface: &mut S,
        column_id: &str,
    ) -> SizingOutcome
    where
        H: ColumnLayoutHost + ?Sized,
        S: MeasurementSurface + ?Sized,
    {
        if !self.initialised.get() {
            return SizingOutcome::Skipped(SkipReason::Inactive);
        }
        if self.in_progress.get() {
            return SizingOutcome::Skipped(SkipReason::InProgress);
        }

        let mut snapshot = host.columns();
        let Some(index) = host.column_index(column_id) else {
            return SizingOutcome::Skipped(SkipReason::UnknownColumn);
        };
        match snapshot.get(index) {
            None => return SizingOutcome::Skipped(SkipReason::UnknownColumn),
            Some(column) if !column.resizable => {
                return SizingOutcome::Skipped(SkipReason::NotResizable)
            }
            Some(_) => {}
        }

        let measurement = self
            .measure_columns(host, surface, &snapshot, &[index])
            .into_iter()
            .next()
            .unwrap_or_default();

        let Some(column) = snapshot.get_mut(index) else {
            return SizingOutcome::Skipped(SkipReason::UnknownColumn);
        };
        column.width = Some(applied_width(
            &measurement,
            column.max_width,
            self.options.max_width,
        ));
        let id = column.id.clone();

        self.commit(host, snapshot);
        debug!(column = %id, "resized column to fit");
        SizingOutcome::Resized { columns: vec![id] }
    }

    /// Header and content measurements for `targets` (indices into
    /// `columns`), in target order.
    fn measure_columns<H, S>(
        &self,
        host: &H,
        surface: &mut S,
        columns: &[Column],
        targets: &[usize],
    ) -> Vec<MeasurementResult>
    where
        H: ColumnLayoutHost + ?Sized,
        S: MeasurementSurface + ?Sized,
    {
        let resolved: Vec<(usize, &Column)> = targets
            .iter()
            .filter_map(|&index| columns.get(index).map(|column| (index, column)))
            .collect();

        // Headers: clone every header cell, then read every width.
        let header_widths = {
            let mut batch = ProbeBatch::begin(&mut *surface);
            for (_, column) in &resolved {
                batch.stage(&ProbeContent::header(column));
            }
            batch.commit_reads()
        };

        // Content: pick the widest value per column from the sample window.
        let window = select_window(host.viewport(), host.data_len(), NUM_COLUMNS_TO_SCAN);
        let rows: Vec<Option<RowRecord>> = window.rows().map(|i| host.row(i)).collect();
        let scan_targets: Vec<ScanTarget<'_>> = resolved
            .iter()
            .map(|&(column_index, column)| ScanTarget {
                column_index,
                column,
            })
            .collect();
        let report = {
            let mut measurer = self.measurer.borrow_mut();
            ColumnContentScanner::new(&mut measurer, self.telemetry.as_ref(), &self.view)
                .scan(&mut *surface, &scan_targets, window, &rows)
        };

        // Render each winning value in a probe cell to account for markup.
        let content_widths = {
            let mut batch = ProbeBatch::begin(&mut *surface);
            for candidate in &report.candidates {
                match &candidate.representation {
                    Some(representation) => {
                        batch.stage(&ProbeContent::Cell(representation.clone()));
                    }
                    None => batch.skip(),
                }
            }
            batch.commit_reads()
        };

        header_widths
            .iter()
            .zip(content_widths.iter())
            .map(|(&header_width, &max_content_width)| MeasurementResult {
                header_width,
                max_content_width,
                extra_padding: self.options.extra_column_header_width,
            })
            .collect()
    }

    /// Hand the snapshot to the host with the render trigger suspended.
    fn commit<H>(&self, host: &mut H, snapshot: Vec<Column>)
    where
        H: ColumnLayoutHost + ?Sized,
    {
        let _guard = PassGuard::enter(&self.in_progress);
        host.set_columns(snapshot);
        host.notify_columns_resized();
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn measured(header: f64, content: f64) -> MeasurementResult {
        MeasurementResult {
            header_width: header,
            max_content_width: content,
            extra_padding: 0.0,
        }
    }

    #[test]
    fn test_clamp_width() {
        assert_eq!(clamp_width(150.0, Some(100.0)), 100.0);
        assert_eq!(clamp_width(50.0, Some(100.0)), 50.0);
        assert_eq!(clamp_width(-5.0, None), 0.0);
        assert_eq!(clamp_width(900.0, None), 900.0);
    }

    #[test]
    fn test_applied_width_adds_margin() {
        assert_eq!(applied_width(&measured(80.0, 120.0), None, None), 121.0);
        assert_eq!(applied_width(&measured(80.0, 120.0), None, Some(100.0)), 100.0);
    }

    #[test]
    fn test_column_max_overrides_option() {
        assert_eq!(
            applied_width(&measured(80.0, 120.0), Some(90.0), Some(100.0)),
            90.0
        );
        assert_eq!(
            applied_width(&measured(80.0, 120.0), Some(300.0), Some(100.0)),
            121.0
        );
    }

    #[test]
    fn test_width_changed() {
        assert!(width_changed(None, 10.0));
        assert!(width_changed(Some(10.0), 11.0));
        assert!(!width_changed(Some(10.0), 10.0));
    }

    #[test]
    fn test_skip_does_not_suppress_default() {
        assert!(!SizingOutcome::Skipped(SkipReason::NotResizable).suppresses_default());
        assert!(SizingOutcome::Unchanged.suppresses_default());
        assert!(SizingOutcome::Resized { columns: vec![] }.suppresses_default());
    }
}
