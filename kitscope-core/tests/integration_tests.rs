//! Integration tests over the report fixtures

use kitscope_core::aggregates::compute_summary;
use kitscope_core::config::CodebaseFilter;
use kitscope_core::render::{render_json, render_page_text, render_summary_json, render_text};
use kitscope_core::tables::{build_rows, build_table, reference_columns, reference_rows};
use kitscope_core::{compute_view, html, open_reports, ResolvedConfig, SortState, TableKind};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join("reports")
        .join(name)
}

fn ids(rows: &[&kitscope_core::Row]) -> Vec<String> {
    rows.iter().map(|r| r.id().unwrap_or("").to_string()).collect()
}

#[test]
fn test_components_default_sort() {
    let (bundle, config) = open_reports(&fixture_path("basic"), None).unwrap();
    assert!(config.config_path.is_none());

    let table = build_table(&bundle, TableKind::Components, &config).unwrap();
    let view = table.view();
    assert_eq!(view.total, 5);
    // Card and Modal tie on 17 and keep report order
    assert_eq!(ids(&view.rows), vec!["Button", "Card", "Modal", "Tooltip", "Badge"]);
}

#[test]
fn test_components_header_clicks() {
    let (bundle, config) = open_reports(&fixture_path("basic"), None).unwrap();
    let mut table = build_table(&bundle, TableKind::Components, &config).unwrap();

    let changed = table.set_sort_column("name");
    assert!(changed.direction.is_descending());
    assert_eq!(
        ids(&table.view().rows),
        vec!["Tooltip", "Modal", "Card", "Button", "Badge"]
    );

    let changed = table.set_sort_column("name");
    assert!(!changed.direction.is_descending());
    assert_eq!(
        ids(&table.view().rows),
        vec!["Badge", "Button", "Card", "Modal", "Tooltip"]
    );

    // Badge has no codebase breakdown and sorts as 0
    table.set_sort_column("codebases");
    assert_eq!(
        ids(&table.view().rows),
        vec!["Button", "Card", "Modal", "Tooltip", "Badge"]
    );
}

#[test]
fn test_component_shares_render_as_percent() {
    let (bundle, config) = open_reports(&fixture_path("basic"), None).unwrap();
    let table = build_table(&bundle, TableKind::Components, &config).unwrap();
    let view = table.view();

    let text = render_text(table.columns(), &view, table.sort_state(), 80);
    assert!(text.contains("Usages ↓"));
    assert!(text.contains("53.2%"));

    // JSON keeps the raw share
    let json: serde_json::Value =
        serde_json::from_str(&render_json(table.columns(), &view, table.sort_state())).unwrap();
    let share = json["rows"][0]["share"].as_f64().unwrap();
    assert!((share - 42.0 / 79.0 * 100.0).abs() < 1e-9);
    assert!(json["rows"][4]["codebases"].is_null());
}

#[test]
fn test_props_table() {
    let (bundle, config) = open_reports(&fixture_path("basic"), None).unwrap();
    let table = build_table(&bundle, TableKind::Props, &config).unwrap();
    let view = table.view();

    assert_eq!(ids(&view.rows), vec!["Button.variant", "Button.size", "Card.padding"]);
    assert_eq!(view.rows[0].value("top_value").to_string(), "primary");
    // sm and lg tie; the alphabetically first wins
    assert_eq!(view.rows[1].value("top_value").to_string(), "lg");
    assert!(view.rows[2].value("top_value").is_null());
    assert_eq!(view.rows[2].value("share").as_number(), 100.0);
}

#[test]
fn test_styles_table() {
    let (bundle, config) = open_reports(&fixture_path("basic"), None).unwrap();
    let mut table = build_table(&bundle, TableKind::Styles, &config).unwrap();
    assert_eq!(
        ids(&table.view().rows),
        vec!["Button:class_name:", "Card:styled:", "Button:inline:margin", "Modal:theme:zIndex"]
    );

    table.set_sort_column("kind");
    table.set_sort_column("kind");
    let kinds: Vec<String> = table
        .view()
        .rows
        .iter()
        .map(|r| r.value("kind").to_string())
        .collect();
    assert_eq!(kinds, vec!["class_name", "inline", "styled", "theme"]);
}

#[test]
fn test_html_fragment_from_fixture() {
    let (bundle, config) = open_reports(&fixture_path("basic"), None).unwrap();
    let table = build_table(&bundle, TableKind::Tags, &config).unwrap();
    let view = table.view();
    let fragment = html::render_html_table(
        TableKind::Tags.title(),
        table.columns(),
        &view,
        table.sort_state(),
    );

    assert!(fragment.contains(r#"data-column="usages""#));
    assert!(fragment.contains("sortable numeric desc"));
    assert!(fragment.contains(r#"<tr data-key="div">"#));
    assert!(fragment.contains("<caption>HTML tag usage</caption>"));
}

#[test]
fn test_configured_bundle() {
    let dir = fixture_path("configured");
    let (bundle, config) = open_reports(&dir, None).unwrap();
    assert_eq!(config.config_path, Some(dir.join(".kitscoperc.json")));
    assert_eq!(config.max_rows, Some(3));

    let table = build_table(&bundle, TableKind::Components, &config).unwrap();
    let view = table.view();
    assert_eq!(view.len(), 3);
    assert_eq!(view.total, 5);
    assert!(view.is_truncated());
    // docs is excluded: Button's share is of the 76 remaining usages
    let share = view.rows[0].value("share").as_number();
    assert!((share - 42.0 / 76.0 * 100.0).abs() < 1e-9);

    let text = render_text(table.columns(), &view, table.sort_state(), 80);
    assert!(text.ends_with("showing 3 of 5 rows\n"));

    let tags = build_table(&bundle, TableKind::Tags, &config).unwrap();
    assert_eq!(tags.sort_state(), &SortState::by("tag", false));
    assert_eq!(ids(&tags.view().rows), vec!["a", "button", "div"]);
    assert_eq!(tags.view().rows[0].value("usages").as_number(), 0.0);
}

#[test]
fn test_partial_bundle() {
    let (bundle, config) = open_reports(&fixture_path("partial"), None).unwrap();

    let err = build_table(&bundle, TableKind::Components, &config).unwrap_err();
    assert!(err.to_string().contains("components report not loaded"));

    let mut table = build_table(&bundle, TableKind::Tags, &config).unwrap();
    assert_eq!(ids(&table.view().rows), vec!["section", "Article", "nav"]);

    table.set_sort_column("tag");
    table.set_sort_column("tag");
    assert_eq!(ids(&table.view().rows), vec!["Article", "nav", "section"]);
}

#[test]
fn test_reference_pages() {
    let (bundle, config) = open_reports(&fixture_path("basic"), None).unwrap();
    let button = bundle.component("Button").unwrap();
    let rows = reference_rows(button, &config.codebases);
    let columns = reference_columns();

    let view = compute_view(&rows, &columns, &SortState::unsorted(), None);
    let last = view.page(3, 2);
    assert_eq!(last.total_pages, 3);
    assert_eq!(last.rows.len(), 1);
    assert_eq!(last.rows[0].value("file").to_string(), "src/pages/Users.tsx");

    // Past the end clamps to the last page
    assert_eq!(view.page(9, 2).number, 3);

    let sort = SortState::by("line", true);
    let view = compute_view(&rows, &columns, &sort, None);
    let files: Vec<String> = view.rows.iter().map(|r| r.value("file").to_string()).collect();
    assert_eq!(
        files,
        vec![
            "src/pages/Settings.tsx",
            "src/App.tsx",
            "src/components/Footer.tsx",
            "src/pages/Users.tsx",
            "src/components/Nav.tsx",
        ]
    );

    let text = render_page_text(&columns, &view.page(1, 2), &sort, 80);
    assert!(text.contains("Line ↓"));
    assert!(text.ends_with("page 1/3 (rows 1-2 of 5)\n"));
}

#[test]
fn test_summary_of_basic_bundle() {
    let (bundle, config) = open_reports(&fixture_path("basic"), None).unwrap();
    let summary = compute_summary(&bundle, &config.codebases, 3);

    assert_eq!(summary.codebases, 3);
    assert_eq!(summary.distinct_components, 4);
    assert_eq!(summary.component_usages, 79);
    assert_eq!(summary.components_with_props, 2);
    assert_eq!(summary.distinct_tags, 4);
    assert_eq!(summary.tag_usages, 210);
    assert_eq!(summary.style_customizations, 16);
    assert_eq!(summary.customized_components, 3);
    assert_eq!(summary.customizations_by_kind["class_name"], 9);

    let top: Vec<&str> = summary.top_components.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(top, vec!["Button", "Card", "Modal"]);
    let tags: Vec<&str> = summary.top_tags.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(tags, vec!["div", "span", "a"]);

    let json: serde_json::Value = serde_json::from_str(&render_summary_json(&summary)).unwrap();
    assert_eq!(json["component_usages"], 79);
}

#[test]
fn test_rows_ignore_unfiltered_breakdown() {
    let (bundle, _) = open_reports(&fixture_path("basic"), None).unwrap();
    let rows = build_rows(&bundle, TableKind::Components, &CodebaseFilter::all()).unwrap();
    assert_eq!(rows[0].value("usages").as_number(), 42.0);
    assert_eq!(rows[0].value("codebases").as_number(), 2.0);
}

#[test]
fn test_explicit_config_path_overrides_discovery() {
    let dir = fixture_path("configured");
    let explicit = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(explicit.path(), r#"{"max_rows": 1}"#).unwrap();

    let (bundle, config) = open_reports(&dir, Some(explicit.path())).unwrap();
    assert_eq!(config.max_rows, Some(1));
    assert!(config.codebases.is_pass_through());

    let table = build_table(&bundle, TableKind::Components, &config).unwrap();
    assert_eq!(table.view().len(), 1);

    let defaults = ResolvedConfig::defaults().unwrap();
    assert_eq!(defaults.page_size, 25);
}
