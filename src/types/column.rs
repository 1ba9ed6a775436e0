//! Column definitions as seen by the sizer.
//!
//! The host grid owns the live column objects. The sizer only ever works on
//! an owned snapshot (`Vec<Column>`) and hands a new snapshot back on commit.
//! Formatters and post-render hooks are shared by reference between the live
//! columns and the snapshot, like the rest of the host's callbacks.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::RowRecord;
use crate::error::Result;

/// Arguments handed to a cell formatter.
pub struct FormatContext<'a> {
    /// 0-based row index of the value being formatted.
    pub row: usize,
    /// Index of the column in the grid's column list.
    pub column_index: usize,
    /// Raw field value (`Value::Null` when the row has no such field).
    pub value: &'a Value,
    /// Column definition the value belongs to.
    pub column: &'a Column,
    /// Full row record, when the data provider returned one.
    pub record: Option<&'a RowRecord>,
}

/// Renderable output of a formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representation {
    /// Plain text, rendered as-is.
    Text(String),
    /// An HTML fragment produced by a formatter.
    Markup(String),
}

/// Host-supplied cell formatter. Treated as opaque and fallible.
pub type Formatter = Rc<dyn Fn(&FormatContext<'_>) -> Result<Representation>>;

/// Host hook run after a row renders. The sizer only carries it through.
pub type PostRenderHook = Rc<dyn Fn(usize, &Column)>;

/// A grid column definition.
#[derive(Clone)]
pub struct Column {
    /// Unique column identifier.
    pub id: String,
    /// Field name looked up in each [`RowRecord`].
    pub field: String,
    /// Header label.
    pub name: String,
    /// Current display width in pixels.
    pub width: Option<f64>,
    /// Per-column clamp ceiling, overrides the plugin-wide `max_width`.
    pub max_width: Option<f64>,
    /// Whether the user may resize this column.
    pub resizable: bool,
    pub formatter: Option<Formatter>,
    pub post_render: Option<PostRenderHook>,
}

impl Column {
    /// Create a resizable column with no formatter; the header label
    /// defaults to the identifier.
    pub fn new(id: impl Into<String>, field: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            field: field.into(),
            width: None,
            max_width: None,
            resizable: true,
            formatter: None,
            post_render: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = Some(max_width);
        self
    }

    #[must_use]
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    #[must_use]
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&FormatContext<'_>) -> Result<Representation> + 'static,
    {
        self.formatter = Some(Rc::new(formatter));
        self
    }

    #[must_use]
    pub fn with_post_render<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize, &Column) + 'static,
    {
        self.post_render = Some(Rc::new(hook));
        self
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("name", &self.name)
            .field("width", &self.width)
            .field("max_width", &self.max_width)
            .field("resizable", &self.resizable)
            .field("formatter", &self.formatter.is_some())
            .field("post_render", &self.post_render.is_some())
            .finish()
    }
}
