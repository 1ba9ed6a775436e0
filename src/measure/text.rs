//! Cached text measurement on top of a [`MeasurementSurface`].

use tracing::trace;

use super::{LruCache, MeasurementSurface, ProbeContent};

/// Default number of `(font, text)` widths kept between passes.
const TEXT_MEASURE_CACHE_CAPACITY: usize = 4096;

/// Measures text widths, memoising results per font.
///
/// A width of `0.0` means "no signal" (empty text or no font metrics), not an
/// error. Missing metrics are never cached so a later pass can still succeed.
pub struct TextMeasurer {
    cache: LruCache<String, f64>,
    scratch: String,
}

impl Default for TextMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer {
    pub fn new() -> Self {
        Self::with_capacity(TEXT_MEASURE_CACHE_CAPACITY)
    }

    /// A capacity of 0 disables the cache.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity),
            scratch: String::new(),
        }
    }

    /// Synthetic measurement: width of `text` in `font` via the surface's
    /// shared font-metrics context.
    pub fn measure_text<S>(&mut self, surface: &mut S, text: &str, font: &str) -> f64
    where
        S: MeasurementSurface + ?Sized,
    {
        if text.is_empty() {
            return 0.0;
        }

        self.scratch.clear();
        self.scratch.push_str(font);
        self.scratch.push('\0');
        self.scratch.push_str(text);
        if let Some(width) = self.cache.get(self.scratch.as_str()) {
            return *width;
        }

        match surface.measure_text(text, font) {
            Some(width) if width.is_finite() && width >= 0.0 => {
                self.cache.insert(self.scratch.clone(), width);
                width
            }
            _ => {
                trace!(font, "no font metrics, measuring as zero");
                0.0
            }
        }
    }

    /// Clone measurement: attach a single probe, read its width, remove it.
    ///
    /// For batches use [`crate::probe::ProbeBatch`], which orders all writes
    /// before all reads.
    pub fn measure_cloned_element<S>(surface: &mut S, content: &ProbeContent) -> f64
    where
        S: MeasurementSurface + ?Sized,
    {
        let probe = match surface.insert_probe(content) {
            Ok(probe) => probe,
            Err(err) => {
                trace!(%err, "probe insert failed");
                return 0.0;
            }
        };
        let width = surface.probe_width(probe).unwrap_or(0.0);
        surface.remove_probe(probe);
        width
    }

    /// Number of cached widths.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
