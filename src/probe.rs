//! Batched probe measurement.
//!
//! Interleaving DOM writes and layout reads forces a synchronous reflow per
//! element. A [`ProbeBatch`] makes the ordering explicit:
//!
//! ```text
//! ProbeBatch::begin(surface)   // nothing attached yet
//!     .stage(..) / .skip()     // writes only: insert + style every probe
//!     .commit_reads()          // reads every width, then removes every probe
//! ```
//!
//! Probes still attached when a batch is dropped (early return, unwinding)
//! are removed in `Drop`, so no pass leaks offscreen nodes.

use tracing::{debug, trace};

use crate::measure::{MeasurementSurface, ProbeContent, ProbeHandle};

/// Write phase of a probe batch.
pub struct ProbeBatch<'s, S: MeasurementSurface + ?Sized> {
    surface: &'s mut S,
    staged: Vec<Option<ProbeHandle>>,
}

impl<'s, S: MeasurementSurface + ?Sized> ProbeBatch<'s, S> {
    pub fn begin(surface: &'s mut S) -> Self {
        Self {
            surface,
            staged: Vec::new(),
        }
    }

    /// Insert and style one probe. A probe that fails to attach reads as 0.
    pub fn stage(&mut self, content: &ProbeContent) {
        match self.surface.insert_probe(content) {
            Ok(probe) => self.staged.push(Some(probe)),
            Err(err) => {
                debug!(%err, "probe insert failed, measuring as zero");
                self.staged.push(None);
            }
        }
    }

    /// Reserve a slot that reads as 0 without touching the surface.
    pub fn skip(&mut self) {
        self.staged.push(None);
    }

    /// Number of staged slots (including skipped ones).
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Read phase: read every width, then remove every probe.
    ///
    /// Widths come back in staging order.
    pub fn commit_reads(mut self) -> Vec<f64> {
        let staged = std::mem::take(&mut self.staged);

        let widths: Vec<f64> = staged
            .iter()
            .map(|slot| match slot {
                Some(probe) => self.surface.probe_width(*probe).unwrap_or_else(|err| {
                    debug!(%err, "probe read failed, measuring as zero");
                    0.0
                }),
                None => 0.0,
            })
            .collect();

        for probe in staged.into_iter().flatten() {
            self.surface.remove_probe(probe);
        }
        trace!(count = widths.len(), "probe batch committed");
        widths
    }
}

impl<S: MeasurementSurface + ?Sized> Drop for ProbeBatch<'_, S> {
    fn drop(&mut self) {
        for probe in self.staged.drain(..).flatten() {
            self.surface.remove_probe(probe);
        }
    }
}

/// Measure every target in one write-then-read batch.
pub fn measure_batch<S>(surface: &mut S, targets: &[ProbeContent]) -> Vec<f64>
where
    S: MeasurementSurface + ?Sized,
{
    let mut batch = ProbeBatch::begin(surface);
    for target in targets {
        batch.stage(target);
    }
    batch.commit_reads()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::measure::MonospaceSurface;
    use crate::types::Representation;

    fn cell(text: &str) -> ProbeContent {
        ProbeContent::Cell(Representation::Text(text.to_string()))
    }

    #[test]
    fn test_widths_in_staging_order() {
        let mut surface = MonospaceSurface::new(10.0);
        let widths = measure_batch(&mut surface, &[cell("aaa"), cell("a"), cell("aa")]);
        assert_eq!(widths, vec![30.0, 10.0, 20.0]);
        assert_eq!(surface.attached_probes(), 0);
    }

    #[test]
    fn test_skip_reads_zero() {
        let mut surface = MonospaceSurface::new(10.0);
        let mut batch = ProbeBatch::begin(&mut surface);
        batch.stage(&cell("ab"));
        batch.skip();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.commit_reads(), vec![20.0, 0.0]);
    }

    #[test]
    fn test_dropped_batch_removes_probes() {
        let mut surface = MonospaceSurface::new(10.0);
        {
            let mut batch = ProbeBatch::begin(&mut surface);
            batch.stage(&cell("ab"));
            batch.stage(&cell("cd"));
        }
        assert_eq!(surface.attached_probes(), 0);
    }
}
