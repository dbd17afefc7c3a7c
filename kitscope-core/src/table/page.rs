//! Pagination over a view projection

use crate::table::Row;

/// One page of rows
///
/// Page numbers are 1-based. Out-of-range requests clamp to the nearest
/// valid page; an empty view still has one (empty) page.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub rows: Vec<&'a Row>,
    pub number: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// Rows across all pages
    pub total: usize,
}

impl<'a> Page<'a> {
    pub fn slice(rows: &[&'a Row], number: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total = rows.len();
        let total_pages = total.div_ceil(page_size).max(1);
        let number = number.clamp(1, total_pages);

        let start = ((number - 1) * page_size).min(total);
        let end = (start + page_size).min(total);

        Page {
            rows: rows[start..end].to_vec(),
            number,
            page_size,
            total_pages,
            total,
        }
    }

    /// Zero-based offset of the first row on this page
    pub fn offset(&self) -> usize {
        (self.number - 1) * self.page_size
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}
