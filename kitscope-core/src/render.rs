//! Text and JSON rendering of table views
//!
//! Global invariants enforced:
//! - Cells display through the column's render override; ordering is already
//!   fixed by the view and never consults rendered text
//! - Identical input yields byte-for-byte identical output

use crate::aggregates::{RankedEntry, Summary};
use crate::table::{Column, Page, Row, SortState, ViewProjection};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Default target width for text tables
pub const DEFAULT_WIDTH: usize = 100;

const COLUMN_GAP: &str = "  ";
const MIN_COLUMN_WIDTH: usize = 4;
const BAR_WIDTH: usize = 20;

/// Split `width` across columns in proportion to their flex
fn column_widths(columns: &[Column], width: usize) -> Vec<usize> {
    if columns.is_empty() {
        return Vec::new();
    }
    let gaps = COLUMN_GAP.len() * (columns.len() - 1);
    let available = width.saturating_sub(gaps);
    let total_flex: f64 = columns.iter().map(|c| c.flex).sum();

    columns
        .iter()
        .map(|c| {
            let share = if total_flex > 0.0 {
                c.flex / total_flex
            } else {
                1.0 / columns.len() as f64
            };
            ((available as f64 * share).floor() as usize).max(MIN_COLUMN_WIDTH)
        })
        .collect()
}

/// Truncate or pad string to fixed width (counted in chars)
fn truncate_or_pad(s: &str, width: usize, right_align: bool) -> String {
    let len = s.chars().count();
    if len > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else if right_align {
        format!("{:>width$}", s, width = width)
    } else {
        format!("{:<width$}", s, width = width)
    }
}

fn header_label(column: &Column, sort: &SortState) -> String {
    if sort.active_key.as_deref() == Some(column.key.as_str()) {
        format!("{} {}", column.label, sort.direction().arrow())
    } else {
        column.label.clone()
    }
}

fn render_line(cells: &[String]) -> String {
    let mut line = cells.join(COLUMN_GAP);
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

fn render_rows(columns: &[Column], rows: &[&Row], sort: &SortState, width: usize) -> String {
    let widths = column_widths(columns, width);
    let mut output = String::new();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| truncate_or_pad(&header_label(c, sort), *w, c.numeric))
        .collect();
    output.push_str(&render_line(&header));

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&render_line(&rule));

    if rows.is_empty() {
        output.push_str("(no rows)\n");
        return output;
    }

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| truncate_or_pad(&c.display(row), *w, c.numeric))
            .collect();
        output.push_str(&render_line(&cells));
    }
    output
}

/// Render a view as a fixed-width text table
pub fn render_text(
    columns: &[Column],
    view: &ViewProjection<'_>,
    sort: &SortState,
    width: usize,
) -> String {
    let mut output = render_rows(columns, &view.rows, sort, width);
    if view.is_truncated() {
        output.push_str(&format!("showing {} of {} rows\n", view.len(), view.total));
    }
    output
}

/// Render one page of a view as a text table with a page footer
pub fn render_page_text(
    columns: &[Column],
    page: &Page<'_>,
    sort: &SortState,
    width: usize,
) -> String {
    let mut output = render_rows(columns, &page.rows, sort, width);
    if !page.rows.is_empty() {
        output.push_str(&format!(
            "page {}/{} (rows {}-{} of {})\n",
            page.number,
            page.total_pages,
            page.offset() + 1,
            page.offset() + page.rows.len(),
            page.total
        ));
    }
    output
}

/// A horizontal percentage bar, `width` cells wide
pub fn percentage_bar(pct: f64, width: usize) -> String {
    let pct = if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 };
    let filled = ((pct / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn render_ranked(title: &str, entries: &[RankedEntry], output: &mut String) {
    if entries.is_empty() {
        return;
    }
    output.push_str(&format!("\n{}\n", title));
    let name_width = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(30);
    for entry in entries {
        output.push_str(&format!(
            "  {}  {}  {:>6.1}%  {}\n",
            truncate_or_pad(&entry.name, name_width, false),
            percentage_bar(entry.share, BAR_WIDTH),
            entry.share,
            entry.usages
        ));
    }
}

/// Render summary stat cards and top-N lists as text
pub fn render_summary_text(summary: &Summary) -> String {
    let mut output = String::new();
    let cards = [
        ("Codebases", summary.codebases as u64),
        ("Components used", summary.distinct_components as u64),
        ("Component usages", summary.component_usages),
        ("Components with props", summary.components_with_props as u64),
        ("HTML tags used", summary.distinct_tags as u64),
        ("HTML tag usages", summary.tag_usages),
        ("Style customizations", summary.style_customizations),
        ("Customized components", summary.customized_components as u64),
    ];
    for (label, value) in cards {
        output.push_str(&format!("{:<24}{:>10}\n", label, value));
    }

    if !summary.customizations_by_kind.is_empty() {
        output.push_str("\nCustomizations by kind\n");
        for (kind, count) in &summary.customizations_by_kind {
            output.push_str(&format!("  {:<12}{:>10}\n", kind, count));
        }
    }

    render_ranked("Top components", &summary.top_components, &mut output);
    render_ranked("Top HTML tags", &summary.top_tags, &mut output);
    output
}

/// Render summary as JSON
pub fn render_summary_json(summary: &Summary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
}

/// A row restricted to a column set, serialized as `{key: raw value}`
struct ProjectedCells<'a> {
    row: &'a Row,
    columns: &'a [Column],
}

impl Serialize for ProjectedCells<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            map.serialize_entry(&column.key, self.row.value(&column.key))?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct JsonSort<'a> {
    key: &'a str,
    direction: &'static str,
}

#[derive(Serialize)]
struct JsonView<'a> {
    sort: Option<JsonSort<'a>>,
    total: usize,
    shown: usize,
    rows: Vec<ProjectedCells<'a>>,
}

/// Render a view as JSON with raw (unrendered) values
pub fn render_json(columns: &[Column], view: &ViewProjection<'_>, sort: &SortState) -> String {
    let json = JsonView {
        sort: sort.active_key.as_deref().map(|key| JsonSort {
            key,
            direction: sort.direction().as_str(),
        }),
        total: view.total,
        shown: view.len(),
        rows: view
            .rows
            .iter()
            .map(|row| ProjectedCells { row, columns })
            .collect(),
    };
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string())
}
