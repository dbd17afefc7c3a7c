//! Kitscope core library - sortable views over UI-kit usage reports

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Caller-supplied rows are never reordered or mutated
// - Sorting is stable; ties keep input order in both directions
// - Missing or malformed cell values are coerced, never rejected
// - No global mutable state, randomness, clocks, threads, or async
// - Identical input yields byte-for-byte identical output

pub mod aggregates;
pub mod config;
pub mod html;
pub mod render;
pub mod report;
pub mod table;
pub mod tables;
pub mod value;

pub use config::ResolvedConfig;
pub use report::{load_bundle, ReportBundle};
pub use table::{
    compute_view, Column, Page, Row, SortChanged, SortDirection, SortOptions, SortState,
    TableView, ViewProjection,
};
pub use tables::TableKind;
pub use value::Value;

use anyhow::Result;
use std::path::Path;

/// Load the reports in `dir` together with the config that applies to them
///
/// The config is taken from `config_path` when given, else discovered in `dir`.
pub fn open_reports(dir: &Path, config_path: Option<&Path>) -> Result<(ReportBundle, ResolvedConfig)> {
    let config = config::load_and_resolve(dir, config_path)?;
    let bundle = load_bundle(dir)?;
    Ok((bundle, config))
}
