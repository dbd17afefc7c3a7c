//! Usage report models and loading
//!
//! Reports are produced by external analyzers and dropped into one
//! directory. Each kind lives in its own file and any of them may be missing;
//! a directory with none of them is an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const COMPONENTS_FILE: &str = "components.json";
pub const PROPS_FILE: &str = "props.json";
pub const TAGS_FILE: &str = "html-tags.json";
pub const STYLES_FILE: &str = "styles.json";

/// Usage counts keyed by codebase name
pub type CodebaseCounts = BTreeMap<String, u64>;

/// Where a component is used
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reference {
    pub codebase: String,
    pub file: String,
    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentUsage {
    pub name: String,
    pub usages: u64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub by_codebase: CodebaseCounts,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

/// `components.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentReport {
    #[serde(default)]
    pub codebases: Vec<String>,
    #[serde(default)]
    pub components: Vec<ComponentUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropUsage {
    pub name: String,
    pub usages: u64,
    /// Literal values passed for this prop and how often
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentProps {
    pub component: String,
    #[serde(default)]
    pub props: Vec<PropUsage>,
}

/// `props.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PropReport {
    #[serde(default)]
    pub components: Vec<ComponentProps>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagUsage {
    pub tag: String,
    pub usages: u64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub by_codebase: CodebaseCounts,
}

/// `html-tags.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TagReport {
    #[serde(default)]
    pub tags: Vec<TagUsage>,
}

/// How a component's styling was overridden
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CustomizationKind {
    Inline,
    ClassName,
    Styled,
    Theme,
    Other,
}

impl CustomizationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CustomizationKind::Inline => "inline",
            CustomizationKind::ClassName => "class_name",
            CustomizationKind::Styled => "styled",
            CustomizationKind::Theme => "theme",
            CustomizationKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StyleCustomization {
    pub component: String,
    pub kind: CustomizationKind,
    #[serde(default)]
    pub property: Option<String>,
    pub usages: u64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub by_codebase: CodebaseCounts,
}

/// `styles.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StyleReport {
    #[serde(default)]
    pub customizations: Vec<StyleCustomization>,
}

/// All reports found in one directory
#[derive(Debug, Clone, Default)]
pub struct ReportBundle {
    pub root: PathBuf,
    pub components: Option<ComponentReport>,
    pub props: Option<PropReport>,
    pub tags: Option<TagReport>,
    pub styles: Option<StyleReport>,
}

impl ReportBundle {
    /// Every codebase named anywhere in the bundle, sorted
    pub fn codebases(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        if let Some(components) = &self.components {
            names.extend(components.codebases.iter().cloned());
            for c in &components.components {
                names.extend(c.by_codebase.keys().cloned());
            }
        }
        if let Some(tags) = &self.tags {
            for t in &tags.tags {
                names.extend(t.by_codebase.keys().cloned());
            }
        }
        if let Some(styles) = &self.styles {
            for s in &styles.customizations {
                names.extend(s.by_codebase.keys().cloned());
            }
        }
        names.sort();
        names.dedup();
        names
    }

    pub fn component(&self, name: &str) -> Option<&ComponentUsage> {
        self.components
            .as_ref()?
            .components
            .iter()
            .find(|c| c.name == name)
    }

    fn is_empty(&self) -> bool {
        self.components.is_none()
            && self.props.is_none()
            && self.tags.is_none()
            && self.styles.is_none()
    }
}

/// Load every report present in `dir`
pub fn load_bundle(dir: &Path) -> Result<ReportBundle> {
    if !dir.is_dir() {
        anyhow::bail!("report directory does not exist: {}", dir.display());
    }

    let bundle = ReportBundle {
        root: dir.to_path_buf(),
        components: load_optional(&dir.join(COMPONENTS_FILE))?,
        props: load_optional(&dir.join(PROPS_FILE))?,
        tags: load_optional(&dir.join(TAGS_FILE))?,
        styles: load_optional(&dir.join(STYLES_FILE))?,
    };

    if bundle.is_empty() {
        anyhow::bail!(
            "no reports found in {} (expected one of {}, {}, {}, {})",
            dir.display(),
            COMPONENTS_FILE,
            PROPS_FILE,
            TAGS_FILE,
            STYLES_FILE
        );
    }

    tracing::info!(
        dir = %dir.display(),
        components = bundle.components.as_ref().map_or(0, |r| r.components.len()),
        props = bundle.props.as_ref().map_or(0, |r| r.components.len()),
        tags = bundle.tags.as_ref().map_or(0, |r| r.tags.len()),
        styles = bundle.styles.as_ref().map_or(0, |r| r.customizations.len()),
        "loaded report bundle"
    );

    Ok(bundle)
}

/// Load one report file, `None` when the file does not exist
pub fn load_optional<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "report file missing, skipping");
        return Ok(None);
    }
    load_report(path).map(Some)
}

/// Load and parse one report file
pub fn load_report<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse report: {}", path.display()))
}
