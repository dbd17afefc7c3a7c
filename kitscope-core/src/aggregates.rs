//! Summary statistics over a report bundle
//!
//! Computes derived numbers for stat cards and top-N lists.
//!
//! Global invariants enforced:
//! - Aggregates are strictly derived (never stored, always computed)
//! - Deterministic ordering: ties keep report order
//! - Report data is never modified

use crate::config::CodebaseFilter;
use crate::report::{CodebaseCounts, ReportBundle};
use serde::Serialize;
use std::collections::BTreeMap;

/// `part` as a percentage of `whole`; 0 when `whole` is 0
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// The `n` items with the largest key, largest first
///
/// Items with equal keys keep their input order.
pub fn top_n<T, F>(items: &[T], n: usize, key: F) -> Vec<&T>
where
    F: Fn(&T) -> f64,
{
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by(|a, b| {
        key(b)
            .partial_cmp(&key(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}

/// Usage count after applying the codebase filter
///
/// Entries without a per-codebase breakdown cannot be filtered and keep
/// their reported total.
pub fn filtered_usages(total: u64, by_codebase: &CodebaseCounts, filter: &CodebaseFilter) -> u64 {
    if filter.is_pass_through() || by_codebase.is_empty() {
        return total;
    }
    by_codebase
        .iter()
        .filter(|(name, _)| filter.allows(name))
        .map(|(_, count)| *count)
        .sum()
}

/// Number of allowed codebases with at least one usage, `None` without a breakdown
pub fn codebase_spread(by_codebase: &CodebaseCounts, filter: &CodebaseFilter) -> Option<usize> {
    if by_codebase.is_empty() {
        return None;
    }
    Some(
        by_codebase
            .iter()
            .filter(|(name, count)| **count > 0 && filter.allows(name))
            .count(),
    )
}

/// One entry of a top-N list
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedEntry {
    pub name: String,
    pub usages: u64,
    /// Percentage of all usages of the same kind
    pub share: f64,
}

/// Stat-card numbers for a bundle
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub codebases: usize,
    pub distinct_components: usize,
    pub component_usages: u64,
    pub components_with_props: usize,
    pub distinct_tags: usize,
    pub tag_usages: u64,
    pub style_customizations: u64,
    pub customized_components: usize,
    pub customizations_by_kind: BTreeMap<String, u64>,
    pub top_components: Vec<RankedEntry>,
    pub top_tags: Vec<RankedEntry>,
}

/// Top entries by usage; entries with no (filtered) usage are left out
fn rank(entries: &[(String, u64)], top: usize) -> Vec<RankedEntry> {
    let used: Vec<&(String, u64)> = entries.iter().filter(|(_, n)| *n > 0).collect();
    let total: u64 = used.iter().map(|(_, n)| n).sum();
    top_n(&used, top, |(_, n)| *n as f64)
        .into_iter()
        .map(|(name, usages)| RankedEntry {
            name: name.clone(),
            usages: *usages,
            share: percentage(*usages as f64, total as f64),
        })
        .collect()
}

/// Compute summary statistics for a bundle
pub fn compute_summary(bundle: &ReportBundle, filter: &CodebaseFilter, top: usize) -> Summary {
    let codebases = bundle
        .codebases()
        .iter()
        .filter(|name| filter.allows(name))
        .count();

    let component_entries: Vec<(String, u64)> = bundle
        .components
        .as_ref()
        .map(|r| {
            r.components
                .iter()
                .map(|c| (c.name.clone(), filtered_usages(c.usages, &c.by_codebase, filter)))
                .collect()
        })
        .unwrap_or_default();

    let tag_entries: Vec<(String, u64)> = bundle
        .tags
        .as_ref()
        .map(|r| {
            r.tags
                .iter()
                .map(|t| (t.tag.clone(), filtered_usages(t.usages, &t.by_codebase, filter)))
                .collect()
        })
        .unwrap_or_default();

    let mut customizations_by_kind: BTreeMap<String, u64> = BTreeMap::new();
    let mut customized: Vec<&str> = Vec::new();
    let mut style_customizations = 0u64;
    if let Some(styles) = &bundle.styles {
        for s in &styles.customizations {
            let usages = filtered_usages(s.usages, &s.by_codebase, filter);
            if usages == 0 {
                continue;
            }
            style_customizations += usages;
            *customizations_by_kind
                .entry(s.kind.as_str().to_string())
                .or_insert(0) += usages;
            customized.push(&s.component);
        }
    }
    customized.sort_unstable();
    customized.dedup();

    let components_with_props = bundle
        .props
        .as_ref()
        .map_or(0, |r| r.components.iter().filter(|c| !c.props.is_empty()).count());

    Summary {
        codebases,
        distinct_components: component_entries.iter().filter(|(_, n)| *n > 0).count(),
        component_usages: component_entries.iter().map(|(_, n)| n).sum(),
        components_with_props,
        distinct_tags: tag_entries.iter().filter(|(_, n)| *n > 0).count(),
        tag_usages: tag_entries.iter().map(|(_, n)| n).sum(),
        style_customizations,
        customized_components: customized.len(),
        customizations_by_kind,
        top_components: rank(&component_entries, top),
        top_tags: rank(&tag_entries, top),
    }
}
