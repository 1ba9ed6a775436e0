//! The grid as seen by the sizer.
//!
//! [`ColumnLayoutHost`] is the narrow set of capabilities the sizer needs
//! from a grid widget. [`MemoryGrid`] implements it over plain vectors for
//! headless use (CLI, benches, tests).

use crate::types::{Column, RowRecord, ViewportRows};

/// Row access for content scans.
pub trait RowSource {
    /// Number of rows in the data source.
    fn data_len(&self) -> usize;

    /// Row at `index`, fetched on demand.
    fn row(&self, index: usize) -> Option<RowRecord>;
}

/// Capabilities the sizer consumes from a host grid.
pub trait ColumnLayoutHost: RowSource {
    /// Snapshot of the current column list. Mutating it must not affect
    /// the grid until passed to [`set_columns`](Self::set_columns).
    fn columns(&self) -> Vec<Column>;

    /// Replace the grid's column list.
    fn set_columns(&mut self, columns: Vec<Column>);

    /// Index of the column with `id` in the column list.
    fn column_index(&self, id: &str) -> Option<usize>;

    /// Visible row bounds.
    fn viewport(&self) -> ViewportRows;

    /// Whether the grid container is attached to the live surface.
    fn is_attached(&self) -> bool;

    /// Column ids of the header cells currently rendered, left to right.
    fn rendered_headers(&self) -> Vec<String>;

    /// Tell the grid (and its listeners) that column widths changed.
    fn notify_columns_resized(&mut self);
}

/// Column id of a rendered header cell.
///
/// SlickGrid gives each header the DOM id `<grid uid><column id>`. Only an
/// exact match counts: with numeric ids a plain suffix test would resolve
/// the header of column `1` in grid `slickgrid_12345` to column `51`.
pub fn header_column_id<'a>(grid_uid: &str, dom_id: &str, ids: &'a [String]) -> Option<&'a str> {
    let column_id = dom_id.strip_prefix(grid_uid)?;
    ids.iter()
        .map(String::as_str)
        .find(|id| !id.is_empty() && *id == column_id)
}

/// In-memory grid: every column rendered, viewport over the first rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryGrid {
    pub columns: Vec<Column>,
    pub rows: Vec<RowRecord>,
    pub viewport: ViewportRows,
    pub attached: bool,
    /// Times `notify_columns_resized` was called.
    pub resize_notifications: usize,
}

impl MemoryGrid {
    /// Attached grid whose viewport shows the first `visible_rows` rows.
    pub fn new(columns: Vec<Column>, rows: Vec<RowRecord>, visible_rows: i64) -> Self {
        Self {
            columns,
            rows,
            viewport: ViewportRows::new(0, visible_rows),
            attached: true,
            resize_notifications: 0,
        }
    }

    /// Grid whose columns are the keys of the first row, in document order.
    pub fn from_rows(rows: Vec<RowRecord>, visible_rows: i64) -> Self {
        let columns = rows
            .first()
            .map(|row| row.0.keys().map(|key| Column::new(key, key)).collect())
            .unwrap_or_default();
        Self::new(columns, rows, visible_rows)
    }

    /// Width of column `id`, if set.
    pub fn width_of(&self, id: &str) -> Option<f64> {
        self.columns.iter().find(|c| c.id == id).and_then(|c| c.width)
    }
}

impl RowSource for MemoryGrid {
    fn data_len(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Option<RowRecord> {
        self.rows.get(index).cloned()
    }
}

impl ColumnLayoutHost for MemoryGrid {
    fn columns(&self) -> Vec<Column> {
        self.columns.clone()
    }

    fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
    }

    fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    fn viewport(&self) -> ViewportRows {
        self.viewport
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn rendered_headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.id.clone()).collect()
    }

    fn notify_columns_resized(&mut self) {
        self.resize_notifications += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_header_id_exact_match() {
        let columns = ids(&["1", "51"]);
        let uid = "slickgrid_123455";
        assert_eq!(header_column_id(uid, "slickgrid_1234551", &columns), Some("1"));
        assert_eq!(header_column_id(uid, "slickgrid_12345551", &columns), Some("51"));
    }

    #[test]
    fn test_header_id_other_grid_or_unknown() {
        let columns = ids(&["name", "age"]);
        assert_eq!(header_column_id("slickgrid_1", "slickgrid_2name", &columns), None);
        assert_eq!(header_column_id("slickgrid_1", "slickgrid_1email", &columns), None);
        assert_eq!(header_column_id("slickgrid_1", "slickgrid_1", &ids(&["", "a"])), None);
    }

    #[test]
    fn test_from_rows_keeps_key_order() {
        let rows: Vec<RowRecord> =
            serde_json::from_str(r#"[{"zeta": 1, "alpha": 2, "mid": 3}]"#).unwrap();
        let grid = MemoryGrid::from_rows(rows, 30);
        let order: Vec<&str> = grid.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
        assert_eq!(grid.viewport, ViewportRows::new(0, 30));
    }

    #[test]
    fn test_from_rows_empty() {
        let grid = MemoryGrid::from_rows(Vec::new(), 30);
        assert!(grid.columns.is_empty());
        assert_eq!(grid.data_len(), 0);
    }
}
