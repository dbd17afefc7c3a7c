//! Sortable, truncatable, pageable table views
//!
//! The engine takes rows and column descriptors and produces an ordered,
//! optionally truncated projection. It never reorders or mutates the caller's
//! rows and has no failure modes: missing and malformed values are coerced
//! (see [`crate::value`]) rather than rejected.
//!
//! Ordering invariants:
//! - No active key: input order
//! - Numeric columns compare as `f64`, other columns as lower-cased text
//! - Equal keys keep their input order in both directions (stable)

pub mod column;
pub mod page;
pub mod row;

pub use column::{find_column, CellRenderer, Column};
pub use page::Page;
pub use row::Row;

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Defaults applied when a view is created and when a new column is clicked
#[derive(Debug, Clone, PartialEq)]
pub struct SortOptions {
    /// Initial sort column; the first column is used when unset
    pub default_key: Option<String>,
    pub default_descending: bool,
    /// Direction a column starts in the first time it becomes active
    pub first_click_descending: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        SortOptions {
            default_key: None,
            default_descending: true,
            first_click_descending: true,
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub active_key: Option<String>,
    pub descending: bool,
}

impl SortState {
    /// Unsorted state: rows stay in input order
    pub fn unsorted() -> Self {
        SortState {
            active_key: None,
            descending: true,
        }
    }

    pub fn by(key: impl Into<String>, descending: bool) -> Self {
        SortState {
            active_key: Some(key.into()),
            descending,
        }
    }

    /// Initial state for a column set: the configured key, else the first column
    pub fn initial(columns: &[Column], options: &SortOptions) -> Self {
        let active_key = options
            .default_key
            .clone()
            .or_else(|| columns.first().map(|c| c.key.clone()));
        SortState {
            active_key,
            descending: options.default_descending,
        }
    }

    pub fn direction(&self) -> SortDirection {
        SortDirection::from_descending(self.descending)
    }

    /// Apply a "sort by column" request
    ///
    /// The active column flips direction; any other column becomes active in
    /// the `first_click_descending` direction.
    pub fn select(&mut self, key: &str, first_click_descending: bool) -> SortChanged {
        if self.active_key.as_deref() == Some(key) {
            self.descending = !self.descending;
        } else {
            self.active_key = Some(key.to_string());
            self.descending = first_click_descending;
        }
        SortChanged {
            key: key.to_string(),
            direction: self.direction(),
        }
    }
}

/// Notification emitted after the sort column or direction changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortChanged {
    pub key: String,
    pub direction: SortDirection,
}

/// Sorted, possibly truncated rows plus the total sorted count
#[derive(Debug, Clone)]
pub struct ViewProjection<'a> {
    pub rows: Vec<&'a Row>,
    pub total: usize,
}

impl<'a> ViewProjection<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when `max_rows` cut rows off the end
    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.total
    }

    /// One page of the visible rows (1-based page numbers)
    pub fn page(&self, number: usize, page_size: usize) -> Page<'a> {
        Page::slice(&self.rows, number, page_size)
    }
}

/// Per-row comparison key
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            // Keys within one column are always the same variant
            _ => Ordering::Equal,
        }
    }
}

/// Indices of `rows` in display order
fn sorted_order(rows: &[Row], columns: &[Column], sort: &SortState) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    let Some(key) = sort.active_key.as_deref() else {
        return order;
    };

    // Unknown keys sort as text; every row reads Null so order is preserved
    let numeric = find_column(columns, key).is_some_and(|c| c.numeric);
    let keys: Vec<SortKey> = rows
        .iter()
        .map(|row| {
            let value = row.value(key);
            if numeric {
                SortKey::Number(value.as_number())
            } else {
                SortKey::Text(value.as_sort_text())
            }
        })
        .collect();

    // slice::sort_by is stable, so ties keep input order in both directions
    order.sort_by(|&a, &b| {
        let cmp = keys[a].compare(&keys[b]);
        if sort.descending {
            cmp.reverse()
        } else {
            cmp
        }
    });
    order
}

/// Compute the view projection for `rows`
///
/// Pure: the input slice is only borrowed. When `max_rows` is set the result
/// holds at most that many rows while `total` still counts every row.
pub fn compute_view<'a>(
    rows: &'a [Row],
    columns: &[Column],
    sort: &SortState,
    max_rows: Option<usize>,
) -> ViewProjection<'a> {
    project(rows, &sorted_order(rows, columns, sort), max_rows)
}

fn project<'a>(rows: &'a [Row], order: &[usize], max_rows: Option<usize>) -> ViewProjection<'a> {
    let total = order.len();
    let shown = max_rows.map_or(total, |max| max.min(total));
    ViewProjection {
        rows: order[..shown].iter().map(|&i| &rows[i]).collect(),
        total,
    }
}

/// A table instance: rows, columns, sort state and a cached display order
///
/// The cached order is dropped whenever rows, columns, or sort state change.
#[derive(Debug)]
pub struct TableView {
    columns: Vec<Column>,
    rows: Vec<Row>,
    sort: SortState,
    options: SortOptions,
    max_rows: Option<usize>,
    order: OnceCell<Vec<usize>>,
}

impl TableView {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self::with_options(columns, rows, SortOptions::default())
    }

    pub fn with_options(columns: Vec<Column>, rows: Vec<Row>, options: SortOptions) -> Self {
        let sort = SortState::initial(&columns, &options);
        TableView {
            columns,
            rows,
            sort,
            options,
            max_rows: None,
            order: OnceCell::new(),
        }
    }

    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn options(&self) -> &SortOptions {
        &self.options
    }

    pub fn max_rows(&self) -> Option<usize> {
        self.max_rows
    }

    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.order.take();
    }

    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.order.take();
    }

    pub fn set_max_rows(&mut self, max_rows: Option<usize>) {
        self.max_rows = max_rows;
    }

    /// Request a sort by `key` (e.g. a header click)
    pub fn set_sort_column(&mut self, key: &str) -> SortChanged {
        let changed = self
            .sort
            .select(key, self.options.first_click_descending);
        self.order.take();
        tracing::debug!(key = %changed.key, direction = changed.direction.as_str(), "sort changed");
        changed
    }

    pub fn view(&self) -> ViewProjection<'_> {
        let order = self
            .order
            .get_or_init(|| sorted_order(&self.rows, &self.columns, &self.sort));
        project(&self.rows, order, self.max_rows)
    }

    /// One page of the current view
    pub fn page(&self, number: usize, page_size: usize) -> Page<'_> {
        self.view().page(number, page_size)
    }
}
