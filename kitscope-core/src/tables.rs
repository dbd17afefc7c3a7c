//! Projection of usage reports into table rows
//!
//! Each report kind maps to a fixed column set. Usage counts honour the
//! codebase filter; shares are percentages of the filtered totals.

use crate::aggregates::{codebase_spread, filtered_usages, percentage};
use crate::config::{CodebaseFilter, ResolvedConfig};
use crate::report::{ComponentUsage, ReportBundle};
use crate::table::{find_column, Column, Row, SortChanged, TableView};
use crate::value::Value;
use anyhow::{Context, Result};
use std::fmt;

/// The tables a report bundle can be viewed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    Components,
    Props,
    Tags,
    Styles,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Components,
        TableKind::Props,
        TableKind::Tags,
        TableKind::Styles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Components => "components",
            TableKind::Props => "props",
            TableKind::Tags => "tags",
            TableKind::Styles => "styles",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.as_str()).collect()
    }

    pub fn title(self) -> &'static str {
        match self {
            TableKind::Components => "Component usage",
            TableKind::Props => "Prop usage",
            TableKind::Tags => "HTML tag usage",
            TableKind::Styles => "Style customizations",
        }
    }

    pub fn default_sort_key(self) -> &'static str {
        "usages"
    }

    pub fn columns(self) -> Vec<Column> {
        match self {
            TableKind::Components => vec![
                Column::new("name", "Component").flex(3.0),
                Column::numeric("usages", "Usages"),
                share_column(),
                Column::numeric("codebases", "Codebases"),
            ],
            TableKind::Props => vec![
                Column::new("component", "Component").flex(2.0),
                Column::new("prop", "Prop").flex(2.0),
                Column::numeric("usages", "Usages"),
                share_column(),
                Column::new("top_value", "Most common value").flex(2.0),
            ],
            TableKind::Tags => vec![
                Column::new("tag", "Tag").flex(2.0),
                Column::numeric("usages", "Usages"),
                share_column(),
                Column::numeric("codebases", "Codebases"),
            ],
            TableKind::Styles => vec![
                Column::new("component", "Component").flex(2.0),
                Column::new("kind", "Kind"),
                Column::new("property", "Property").flex(2.0),
                Column::numeric("usages", "Usages"),
            ],
        }
    }

    pub fn column_keys(self) -> Vec<String> {
        self.columns().into_iter().map(|c| c.key).collect()
    }

    pub fn has_column(self, key: &str) -> bool {
        find_column(&self.columns(), key).is_some()
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn share_column() -> Column {
    Column::numeric("share", "Share").render(|value, _| format_share(value))
}

/// `12.3%`, or empty for a missing share
pub fn format_share(value: &Value) -> String {
    if value.is_null() {
        String::new()
    } else {
        format!("{:.1}%", value.as_number())
    }
}

/// Rows for one table kind
///
/// Fails when the report backing `kind` was not loaded.
pub fn build_rows(bundle: &ReportBundle, kind: TableKind, filter: &CodebaseFilter) -> Result<Vec<Row>> {
    let missing = || format!("{} report not loaded from {}", kind, bundle.root.display());
    match kind {
        TableKind::Components => {
            let report = bundle.components.as_ref().with_context(missing)?;
            let usages: Vec<u64> = report
                .components
                .iter()
                .map(|c| filtered_usages(c.usages, &c.by_codebase, filter))
                .collect();
            let total: u64 = usages.iter().sum();
            Ok(report
                .components
                .iter()
                .zip(usages)
                .map(|(c, n)| {
                    Row::with_id(c.name.as_str())
                        .cell("name", c.name.as_str())
                        .cell("usages", n)
                        .cell("share", percentage(n as f64, total as f64))
                        .cell("codebases", codebase_spread(&c.by_codebase, filter))
                })
                .collect())
        }
        TableKind::Props => {
            let report = bundle.props.as_ref().with_context(missing)?;
            let mut rows = Vec::new();
            for component in &report.components {
                let total: u64 = component.props.iter().map(|p| p.usages).sum();
                for prop in &component.props {
                    let top_value = most_common(&prop.values);
                    rows.push(
                        Row::with_id(format!("{}.{}", component.component, prop.name))
                            .cell("component", component.component.as_str())
                            .cell("prop", prop.name.as_str())
                            .cell("usages", prop.usages)
                            .cell("share", percentage(prop.usages as f64, total as f64))
                            .cell("top_value", top_value),
                    );
                }
            }
            Ok(rows)
        }
        TableKind::Tags => {
            let report = bundle.tags.as_ref().with_context(missing)?;
            let usages: Vec<u64> = report
                .tags
                .iter()
                .map(|t| filtered_usages(t.usages, &t.by_codebase, filter))
                .collect();
            let total: u64 = usages.iter().sum();
            Ok(report
                .tags
                .iter()
                .zip(usages)
                .map(|(t, n)| {
                    Row::with_id(t.tag.as_str())
                        .cell("tag", t.tag.as_str())
                        .cell("usages", n)
                        .cell("share", percentage(n as f64, total as f64))
                        .cell("codebases", codebase_spread(&t.by_codebase, filter))
                })
                .collect())
        }
        TableKind::Styles => {
            let report = bundle.styles.as_ref().with_context(missing)?;
            Ok(report
                .customizations
                .iter()
                .map(|s| {
                    let property = s.property.as_deref().unwrap_or("");
                    Row::with_id(format!("{}:{}:{}", s.component, s.kind.as_str(), property))
                        .cell("component", s.component.as_str())
                        .cell("kind", s.kind.as_str())
                        .cell("property", s.property.as_deref())
                        .cell("usages", filtered_usages(s.usages, &s.by_codebase, filter))
                })
                .collect())
        }
    }
}

/// Most frequent literal; ties go to the alphabetically first literal
fn most_common(values: &std::collections::BTreeMap<String, u64>) -> Option<String> {
    let mut best: Option<(&String, u64)> = None;
    for (value, count) in values {
        if best.map_or(true, |(_, n)| *count > n) {
            best = Some((value, *count));
        }
    }
    best.map(|(value, _)| value.clone())
}

/// A ready-to-view table for one report kind, configured from `config`
pub fn build_table(bundle: &ReportBundle, kind: TableKind, config: &ResolvedConfig) -> Result<TableView> {
    let rows = build_rows(bundle, kind, &config.codebases)?;
    tracing::debug!(table = %kind, rows = rows.len(), "built table");
    Ok(
        TableView::with_options(kind.columns(), rows, config.sort_options(kind))
            .with_max_rows(config.max_rows(kind)),
    )
}

/// Apply a command-line sort request to a configured table
///
/// `key` behaves like a header click: a new column starts in the
/// first-click direction and the active column flips. `ascending` then forces
/// the active column ascending. Returns the final sort when anything changed.
pub fn apply_sort_request(
    table: &mut TableView,
    key: Option<&str>,
    ascending: bool,
) -> Option<SortChanged> {
    let mut changed = key.map(|key| table.set_sort_column(key));
    if ascending && table.sort_state().descending {
        if let Some(active) = table.sort_state().active_key.clone() {
            changed = Some(table.set_sort_column(&active));
        }
    }
    changed
}

/// Columns of a component reference list
pub fn reference_columns() -> Vec<Column> {
    vec![
        Column::new("codebase", "Codebase"),
        Column::new("file", "File").flex(4.0),
        Column::numeric("line", "Line"),
    ]
}

/// One row per place `component` is used, in report order
pub fn reference_rows(component: &ComponentUsage, filter: &CodebaseFilter) -> Vec<Row> {
    component
        .references
        .iter()
        .filter(|r| filter.allows(&r.codebase))
        .map(|r| {
            let line = r.line.map(|l| l.to_string()).unwrap_or_default();
            Row::with_id(format!("{}:{}:{}", r.codebase, r.file, line))
                .cell("codebase", r.codebase.as_str())
                .cell("file", r.file.as_str())
                .cell("line", r.line)
        })
        .collect()
}
