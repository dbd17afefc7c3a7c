//! HTML table generation
//!
//! Produces a static `<table>` fragment for a view, ready to drop into a page.
//! Headers carry `data-column` keys and the active one an `asc`/`desc` class
//! so a host page can style the sort indicator and wire up clicks.

use crate::table::{Column, SortState, ViewProjection};

/// Render a view as an HTML table fragment
pub fn render_html_table(
    title: &str,
    columns: &[Column],
    view: &ViewProjection<'_>,
    sort: &SortState,
) -> String {
    let headers: String = columns
        .iter()
        .map(|c| render_header_cell(c, sort))
        .collect::<Vec<_>>()
        .join("\n                ");

    let rows = if view.is_empty() {
        format!(
            r#"<tr class="empty"><td colspan="{span}">No rows</td></tr>"#,
            span = columns.len().max(1)
        )
    } else {
        view.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cells: String = columns
                    .iter()
                    .map(|c| {
                        let class = if c.numeric { r#" class="numeric""# } else { "" };
                        format!("<td{}>{}</td>", class, html_escape(&c.display(row)))
                    })
                    .collect();
                format!(
                    r#"<tr data-key="{key}">{cells}</tr>"#,
                    key = html_escape(&row.render_key(i)),
                    cells = cells
                )
            })
            .collect::<Vec<_>>()
            .join("\n            ")
    };

    let caption = if view.is_truncated() {
        format!(
            r#"
        <caption>{title} <span class="truncated">showing {shown} of {total}</span></caption>"#,
            title = html_escape(title),
            shown = view.len(),
            total = view.total
        )
    } else {
        format!(
            r#"
        <caption>{title}</caption>"#,
            title = html_escape(title)
        )
    };

    format!(
        r#"<table class="kitscope-table">{caption}
        <thead>
            <tr>
                {headers}
            </tr>
        </thead>
        <tbody>
            {rows}
        </tbody>
    </table>
"#,
        caption = caption,
        headers = headers,
        rows = rows,
    )
}

fn render_header_cell(column: &Column, sort: &SortState) -> String {
    let mut class = String::from("sortable");
    if column.numeric {
        class.push_str(" numeric");
    }
    if sort.active_key.as_deref() == Some(column.key.as_str()) {
        class.push(' ');
        class.push_str(sort.direction().as_str());
    }
    format!(
        r#"<th class="{class}" data-column="{key}">{label}</th>"#,
        class = class,
        key = html_escape(&column.key),
        label = html_escape(&column.label)
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{compute_view, Row};

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name"),
            Column::numeric("count", "Count"),
        ]
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_headers_mark_active_column() {
        let rows = vec![Row::with_id("a").cell("name", "A").cell("count", 1.0)];
        let sort = SortState::by("count", false);
        let view = compute_view(&rows, &columns(), &sort, None);
        let html = render_html_table("Usage", &columns(), &view, &sort);

        assert!(html.contains(r#"<th class="sortable" data-column="name">Name</th>"#));
        assert!(html.contains(r#"<th class="sortable numeric asc" data-column="count">Count</th>"#));
        assert!(html.contains(r#"<tr data-key="a">"#));
        assert!(html.contains("<caption>Usage</caption>"));
    }

    #[test]
    fn test_cells_are_escaped() {
        let rows = vec![Row::new().cell("name", "<Button/>").cell("count", 2.0)];
        let sort = SortState::unsorted();
        let view = compute_view(&rows, &columns(), &sort, None);
        let html = render_html_table("T", &columns(), &view, &sort);

        assert!(html.contains("<td>&lt;Button/&gt;</td>"));
        assert!(html.contains(r#"<td class="numeric">2</td>"#));
        assert!(!html.contains("<Button/>"));
    }

    #[test]
    fn test_rows_follow_view_order() {
        let rows = vec![
            Row::with_id("low").cell("count", 1.0),
            Row::with_id("high").cell("count", 9.0),
        ];
        let sort = SortState::by("count", true);
        let view = compute_view(&rows, &columns(), &sort, None);
        let html = render_html_table("T", &columns(), &view, &sort);

        let high = html.find(r#"data-key="high""#).unwrap();
        let low = html.find(r#"data-key="low""#).unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_truncated_caption() {
        let rows: Vec<Row> = (0..5).map(|i| Row::new().cell("count", i as f64)).collect();
        let sort = SortState::by("count", true);
        let view = compute_view(&rows, &columns(), &sort, Some(2));
        let html = render_html_table("T", &columns(), &view, &sort);
        assert!(html.contains("showing 2 of 5"));
        assert_eq!(html.matches("<tr data-key=").count(), 2);
    }

    #[test]
    fn test_empty_view() {
        let rows: Vec<Row> = Vec::new();
        let sort = SortState::unsorted();
        let view = compute_view(&rows, &columns(), &sort, None);
        let html = render_html_table("T", &columns(), &view, &sort);
        assert!(html.contains(r#"<td colspan="2">No rows</td>"#));
    }
}
