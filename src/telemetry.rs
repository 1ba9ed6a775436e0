//! Best-effort telemetry for measurement passes.
//!
//! One event per content scan. Sinks may fail; the scanner logs and moves on.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;

/// Action name reported for every scan.
pub const AUTO_COLUMN_SIZE_ACTION: &str = "AutoColumnSize";

/// Default view name when the host doesn't set one.
pub const DEFAULT_TELEMETRY_VIEW: &str = "QueryResult";

/// Timing observation for one content scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSizeTelemetry {
    pub view: String,
    pub action: &'static str,
    pub elapsed_ms: f64,
    pub rows_sampled: usize,
    pub columns_scanned: usize,
}

/// Receiver for scan telemetry.
pub trait TelemetrySink {
    /// Deliver one event.
    ///
    /// # Errors
    /// Any error is logged and otherwise ignored by the caller.
    fn send(&self, event: &AutoSizeTelemetry) -> Result<()>;
}

/// Drops every event.
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn send(&self, _event: &AutoSizeTelemetry) -> Result<()> {
        Ok(())
    }
}

/// Logs events at debug level through `tracing`.
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn send(&self, event: &AutoSizeTelemetry) -> Result<()> {
        debug!(
            view = %event.view,
            action = event.action,
            elapsed_ms = event.elapsed_ms,
            rows = event.rows_sampled,
            columns = event.columns_scanned,
            "telemetry"
        );
        Ok(())
    }
}

/// Send an event, swallowing failures.
pub(crate) fn emit(sink: &dyn TelemetrySink, event: &AutoSizeTelemetry) {
    if let Err(err) = sink.send(event) {
        debug!(%err, "telemetry dropped");
    }
}
