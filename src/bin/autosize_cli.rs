//! CLI tool for autosize-grid - fits column widths to a JSON row set
//!
//! Usage:
//!   autosize_cli <rows.json>                    # Widths as JSON on stdout
//!   autosize_cli <rows.json> --max-width 300    # Clamp every column
//!   autosize_cli <rows.json> --char-width 8     # Pixels per display column
//!
//! `rows.json` is an array of objects. Columns are taken from the keys of the
//! first row, in order. Like a grid scrolled to the top, only the first rows
//! are sampled.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use autosize_grid::{
    AutoColumnSizer, AutoSizeOptions, MemoryGrid, MonospaceSurface, RowRecord, SizingOutcome,
};

/// Cell padding (both sides) of a typical grid cell, in pixels.
const CELL_PADDING: f64 = 8.0;

/// Rows a freshly opened grid shows; the sample widens from here.
const VISIBLE_ROWS: i64 = 30;

fn usage() -> ! {
    eprintln!("Usage: autosize_cli <rows.json> [--max-width N] [--char-width PX]");
    std::process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let input_path = &args[1];
    let mut options = AutoSizeOptions {
        auto_size_on_render: true,
        ..AutoSizeOptions::default()
    };
    let mut char_width = 7.0;

    let mut rest = args[2..].iter();
    while let Some(flag) = rest.next() {
        let value = rest.next().and_then(|v| v.parse::<f64>().ok());
        match (flag.as_str(), value) {
            ("--max-width", Some(v)) => options.max_width = Some(v),
            ("--char-width", Some(v)) => char_width = v,
            _ => usage(),
        }
    }

    // Read input file
    let data = match fs::read_to_string(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let rows: Vec<RowRecord> = match serde_json::from_str(&data) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error parsing rows: {}", e);
            std::process::exit(1);
        }
    };

    let mut grid = MemoryGrid::from_rows(rows, VISIBLE_ROWS);
    let mut surface = MonospaceSurface::new(char_width).with_cell_padding(CELL_PADDING);

    let sizer = AutoColumnSizer::new(options);
    sizer.init();
    if let SizingOutcome::Skipped(reason) = sizer.on_post_render(&mut grid, &mut surface) {
        eprintln!("Nothing to size: {:?}", reason);
    }

    let widths: serde_json::Map<String, serde_json::Value> = grid
        .columns
        .iter()
        .map(|c| (c.id.clone(), serde_json::json!(c.width)))
        .collect();
    let json = serde_json::to_string_pretty(&widths).expect("serialize widths");

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json).expect("write stdout");
}
