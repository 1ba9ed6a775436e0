//! Sample window selection tests
//!
//! The window must always reach the minimum scan size when the data allows
//! it, whatever the viewport currently shows.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use autosize_grid::layout::select_window;
use autosize_grid::{SampleWindow, ViewportRows, NUM_COLUMNS_TO_SCAN};
use test_case::test_case;

#[test_case(0, 20, 1000 => (0, 50); "initial load shows few rows")]
#[test_case(0, 80, 1000 => (0, 80); "viewport larger than minimum")]
#[test_case(0, 20, 30 => (0, 30); "data shorter than minimum")]
#[test_case(0, 20, 0 => (0, 0); "no data")]
#[test_case(-5, 10, 1000 => (0, 50); "negative top")]
#[test_case(200, 230, 1000 => (200, 250); "scrolled short viewport")]
#[test_case(990, 1000, 1000 => (950, 1000); "bottom of data")]
#[test_case(400, 430, 100 => (50, 100); "viewport past the data")]
fn test_select_window(top: i64, bottom: i64, len: usize) -> (usize, usize) {
    let window = select_window(ViewportRows::new(top, bottom), len, NUM_COLUMNS_TO_SCAN);
    (window.start, window.end)
}

#[test]
fn test_minimum_sample_always_met() {
    for len in [50usize, 51, 120, 5000] {
        for top in [0i64, 1, 17, 49, 100, 4990] {
            for visible in [0i64, 1, 10, 49, 200] {
                let window =
                    select_window(ViewportRows::new(top, top + visible), len, NUM_COLUMNS_TO_SCAN);
                assert!(
                    window.len() >= NUM_COLUMNS_TO_SCAN.min(len),
                    "len={len} top={top} visible={visible} -> {window:?}"
                );
                assert!(window.end <= len);
            }
        }
    }
}

#[test]
fn test_window_never_exceeds_data() {
    let window = select_window(ViewportRows::new(0, 10_000), 70, NUM_COLUMNS_TO_SCAN);
    assert_eq!(window, SampleWindow { start: 0, end: 70 });
}
