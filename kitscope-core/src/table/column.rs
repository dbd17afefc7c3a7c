//! Column descriptors

use crate::table::Row;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Display override for a column: raw value + whole row in, display text out
pub type CellRenderer = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

/// Describes how one field is sorted and displayed across all rows
///
/// Sorting always reads the raw [`Value`]; `render` only affects display.
#[derive(Clone)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub numeric: bool,
    /// Relative width weight used by fixed-width renderers
    pub flex: f64,
    pub render: Option<CellRenderer>,
}

impl Column {
    /// Text column with flex 1
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Column {
            key: key.into(),
            label: label.into(),
            numeric: false,
            flex: 1.0,
            render: None,
        }
    }

    /// Numeric column with flex 1
    pub fn numeric(key: impl Into<String>, label: impl Into<String>) -> Self {
        Column {
            numeric: true,
            ..Column::new(key, label)
        }
    }

    pub fn flex(mut self, flex: f64) -> Self {
        self.flex = if flex.is_finite() { flex.max(0.0) } else { 1.0 };
        self
    }

    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Display text for this column's cell in `row`
    pub fn display(&self, row: &Row) -> String {
        let value = row.value(&self.key);
        match &self.render {
            Some(render) => render(value, row),
            None => value.to_string(),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("numeric", &self.numeric)
            .field("flex", &self.flex)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Find a column by key
pub fn find_column<'a>(columns: &'a [Column], key: &str) -> Option<&'a Column> {
    columns.iter().find(|c| c.key == key)
}
