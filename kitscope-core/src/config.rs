//! Configuration file support for kitscope
//!
//! Loads dashboard configuration from JSON files.
//!
//! Search order (relative to the report directory):
//! 1. Explicit path (--config CLI flag)
//! 2. `.kitscoperc.json`
//! 3. `kitscope.config.json`
//! 4. `"kitscope"` key in `package.json`
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::table::SortOptions;
use crate::tables::TableKind;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DEFAULT_PAGE_SIZE: usize = 25;
const MAX_PAGE_SIZE: usize = 1000;
const DEFAULT_TOP: usize = 10;

/// kitscope configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KitscopeConfig {
    /// Initial sort direction of every table (default: descending)
    #[serde(default)]
    pub default_descending: Option<bool>,

    /// Direction a column starts in when first selected (default: descending)
    #[serde(default)]
    pub first_click_descending: Option<bool>,

    /// Maximum rows shown per table (default: all)
    #[serde(default)]
    pub max_rows: Option<usize>,

    /// Rows per page for reference lists (default: 25)
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Length of summary top-N lists (default: 10)
    #[serde(default)]
    pub top: Option<usize>,

    /// Glob patterns for codebases to count (default: all)
    #[serde(default)]
    pub include_codebases: Vec<String>,

    /// Glob patterns for codebases to ignore
    #[serde(default)]
    pub exclude_codebases: Vec<String>,

    /// Per-table overrides keyed by table name
    #[serde(default)]
    pub tables: BTreeMap<String, TableConfig>,
}

/// Per-table overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// Initial sort column key
    pub sort: Option<String>,
    /// Initial sort direction
    pub descending: Option<bool>,
    /// Maximum rows shown
    pub max_rows: Option<usize>,
}

/// Which codebases contribute usage counts
#[derive(Debug, Clone, Default)]
pub struct CodebaseFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl CodebaseFilter {
    /// Filter that allows every codebase
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_pass_through(&self) -> bool {
        self.include.is_none() && self.exclude.is_none()
    }

    /// Check if a codebase should be counted based on include/exclude patterns
    pub fn allows(&self, codebase: &str) -> bool {
        // Check exclude first
        if let Some(ref exclude) = self.exclude {
            if exclude.is_match(codebase) {
                return false;
            }
        }

        // If include patterns exist, codebase must match at least one
        if let Some(ref include) = self.include {
            return include.is_match(codebase);
        }

        true
    }
}

/// Resolved configuration with defaults applied and patterns compiled
#[derive(Debug)]
pub struct ResolvedConfig {
    pub default_descending: bool,
    pub first_click_descending: bool,
    pub max_rows: Option<usize>,
    pub page_size: usize,
    pub top: usize,
    pub codebases: CodebaseFilter,
    pub tables: BTreeMap<TableKind, TableConfig>,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(Some(builder.build()?))
}

impl KitscopeConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(max) = self.max_rows {
            if max == 0 {
                anyhow::bail!("max_rows must be positive (got {})", max);
            }
        }

        if let Some(size) = self.page_size {
            if size == 0 || size > MAX_PAGE_SIZE {
                anyhow::bail!(
                    "page_size must be between 1 and {} (got {})",
                    MAX_PAGE_SIZE,
                    size
                );
            }
        }

        if let Some(top) = self.top {
            if top == 0 {
                anyhow::bail!("top must be positive (got {})", top);
            }
        }

        // Validate glob patterns compile
        for pattern in &self.include_codebases {
            Glob::new(pattern)
                .with_context(|| format!("invalid include_codebases pattern: {}", pattern))?;
        }
        for pattern in &self.exclude_codebases {
            Glob::new(pattern)
                .with_context(|| format!("invalid exclude_codebases pattern: {}", pattern))?;
        }

        // Validate table names and sort keys
        for (name, table) in &self.tables {
            let kind = TableKind::from_name(name).with_context(|| {
                format!(
                    "unknown table in tables.{} (expected one of: {})",
                    name,
                    TableKind::names().join(", ")
                )
            })?;
            if let Some(ref key) = table.sort {
                if !kind.has_column(key) {
                    anyhow::bail!(
                        "tables.{}.sort: unknown column '{}' (expected one of: {})",
                        name,
                        key,
                        kind.column_keys().join(", ")
                    );
                }
            }
            if table.max_rows == Some(0) {
                anyhow::bail!("tables.{}.max_rows must be positive", name);
            }
        }

        Ok(())
    }

    /// Resolve config into compiled form ready for use
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let codebases = CodebaseFilter {
            include: build_globset(&self.include_codebases)?,
            exclude: build_globset(&self.exclude_codebases)?,
        };

        let mut tables = BTreeMap::new();
        for (name, table) in &self.tables {
            if let Some(kind) = TableKind::from_name(name) {
                tables.insert(kind, table.clone());
            }
        }

        Ok(ResolvedConfig {
            default_descending: self.default_descending.unwrap_or(true),
            first_click_descending: self.first_click_descending.unwrap_or(true),
            max_rows: self.max_rows,
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            top: self.top.unwrap_or(DEFAULT_TOP),
            codebases,
            tables,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        KitscopeConfig::default().resolve()
    }

    /// Sort options for a table: per-table overrides, then global values
    pub fn sort_options(&self, kind: TableKind) -> SortOptions {
        let table = self.tables.get(&kind);
        SortOptions {
            default_key: Some(
                table
                    .and_then(|t| t.sort.clone())
                    .unwrap_or_else(|| kind.default_sort_key().to_string()),
            ),
            default_descending: table
                .and_then(|t| t.descending)
                .unwrap_or(self.default_descending),
            first_click_descending: self.first_click_descending,
        }
    }

    pub fn max_rows(&self, kind: TableKind) -> Option<usize> {
        self.tables
            .get(&kind)
            .and_then(|t| t.max_rows)
            .or(self.max_rows)
    }
}

/// Discover and load a config file from the report directory
///
/// Search order:
/// 1. `.kitscoperc.json`
/// 2. `kitscope.config.json`
/// 3. `"kitscope"` key in `package.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(root: &Path) -> Result<Option<(KitscopeConfig, PathBuf)>> {
    for name in [".kitscoperc.json", "kitscope.config.json"] {
        let path = root.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }

    let pkg_path = root.join("package.json");
    if pkg_path.exists() {
        if let Some(config) = load_from_package_json(&pkg_path)? {
            return Ok(Some((config, pkg_path)));
        }
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<KitscopeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: KitscopeConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load kitscope config from the "kitscope" key in package.json
fn load_from_package_json(path: &Path) -> Result<Option<KitscopeConfig>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let pkg: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match pkg.get("kitscope") {
        Some(value) => {
            let config: KitscopeConfig = serde_json::from_value(value.clone())
                .with_context(|| format!("invalid kitscope config in {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("invalid kitscope config in {}", path.display()))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

/// Load and resolve config for a report directory
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from `root`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(root)? {
            Some((config, path)) => (config, Some(path)),
            None => (KitscopeConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}
