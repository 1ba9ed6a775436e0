//! Sample window selection.

use crate::types::{SampleWindow, ViewportRows};

/// Pick the rows to scan for a column's widest value.
///
/// Starts from the viewport (`top` clamped at 0, `bottom` clamped to the
/// data length). When that covers fewer than `min_scan` rows the window
/// grows downwards to `min_scan` rows, then upwards if it hit the end of the
/// data. At the top of the grid this is `0..min(min_scan, data_len)`.
pub fn select_window(viewport: ViewportRows, data_len: usize, min_scan: usize) -> SampleWindow {
    let top = usize::try_from(viewport.top.max(0)).unwrap_or(usize::MAX);
    let bottom = usize::try_from(viewport.bottom.max(0)).unwrap_or(usize::MAX);

    let mut start = top.min(data_len);
    let mut end = data_len.min(bottom).max(start);
    if end - start < min_scan {
        end = start.saturating_add(min_scan).min(data_len);
        start = start.min(end.saturating_sub(min_scan));
    }

    SampleWindow { start, end }
}
