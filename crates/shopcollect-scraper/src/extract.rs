//! Row extraction for the shop ranking table.
//!
//! The table is an Element UI `el-table`. Column layout (0-based `td` index):
//!
//! | idx | content |
//! |-----|---------|
//! | 2   | shop name (`.src-css-product-storeTit-39uz`, or `.eh-hover-text` when rendered in the iframe build) |
//! | 3   | total sales in an inline-block `div`, weekly delta in `.weekly_data` |
//! | 4   | total reviews / weekly delta, same shape as sales |
//! | 6   | active listings (`.cell div`) |
//! | 7   | open date (`.cell div`) |
//!
//! Rows with fewer than nine cells are layout rows (expanders, spacers) and
//! are skipped, as are rows without a shop name.

use scraper::Selector;
use shopcollect_core::ShopRecord;
use thiserror::Error;

use crate::dom::{parse_selector, Element, Page, SourceKind};
use crate::error::ScraperError;

/// Matches once the table has rendered at least one body row.
pub const TABLE_READY: &str = ".el-table__body-wrapper table tbody tr";

const TABLE_WRAPPER: &str = ".el-table__body-wrapper";
const PRIMARY_ROWS: &str = "tr.el-table__row";
const EMBEDDED_ROWS: &str = ".el-table__body tr";
const CELL: &str = "td";
const SHOP_NAME: &str = ".src-css-product-storeTit-39uz";
const SHOP_NAME_FALLBACK: &str = ".eh-hover-text";
const TOTAL_VALUE: &str = r#"div[style*="display: inline-block"]"#;
const WEEKLY_VALUE: &str = ".weekly_data";
const CELL_CONTENT: &str = ".cell div";

const MIN_CELLS: usize = 9;
const NAME_COL: usize = 2;
const SALES_COL: usize = 3;
const REVIEWS_COL: usize = 4;
const LISTINGS_COL: usize = 6;
const OPEN_DATE_COL: usize = 7;

const TREND_ARROW: char = '↑';

/// The located table body wrapper and the kind of document it lives in.
#[derive(Debug, Clone)]
pub struct TableContext {
    pub root: Element,
    pub source: SourceKind,
}

#[derive(Debug, Error)]
enum RowError {
    #[error("row has {found} cells, expected at least 9")]
    TooFewCells { found: usize },

    #[error("row has no shop name")]
    MissingShopName,
}

/// Compiled selectors for the ranking table.
#[derive(Debug)]
pub struct RowExtractor {
    wrapper: Selector,
    primary_rows: Selector,
    embedded_rows: Selector,
    cell: Selector,
    shop_name: Selector,
    shop_name_fallback: Selector,
    total_value: Selector,
    weekly_value: Selector,
    cell_content: Selector,
}

impl RowExtractor {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] if a built-in selector fails
    /// to compile.
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self {
            wrapper: parse_selector(TABLE_WRAPPER)?,
            primary_rows: parse_selector(PRIMARY_ROWS)?,
            embedded_rows: parse_selector(EMBEDDED_ROWS)?,
            cell: parse_selector(CELL)?,
            shop_name: parse_selector(SHOP_NAME)?,
            shop_name_fallback: parse_selector(SHOP_NAME_FALLBACK)?,
            total_value: parse_selector(TOTAL_VALUE)?,
            weekly_value: parse_selector(WEEKLY_VALUE)?,
            cell_content: parse_selector(CELL_CONTENT)?,
        })
    }

    /// Finds the table wrapper in the primary document, else in the first
    /// readable embedded document that has one.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::EmbeddedDocumentAccess`] when no table was
    /// found and at least one embedded document could not be read.
    pub fn find_table<P: Page + ?Sized>(&self, page: &P) -> Result<Option<TableContext>, ScraperError> {
        let mut access_error = None;
        for source in page.sources() {
            match source.query(&self.wrapper) {
                Ok(Some(root)) => {
                    return Ok(Some(TableContext {
                        root,
                        source: source.kind(),
                    }))
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "table lookup skipped a document");
                    access_error = Some(e);
                }
            }
        }
        match access_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    /// Extracts every recognizable row of one page. Malformed rows are skipped.
    #[must_use]
    pub fn extract_page(&self, table: &TableContext) -> Vec<ShopRecord> {
        let row_selector = match table.source {
            SourceKind::Primary => &self.primary_rows,
            SourceKind::Embedded => &self.embedded_rows,
        };
        let rows = table.root.select_all(row_selector);
        tracing::debug!(rows = rows.len(), source = %table.source, "scanning table rows");

        let mut shops = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match self.parse_row(row) {
                Ok(shop) => shops.push(shop),
                Err(e) => tracing::debug!(row = index, reason = %e, "skipping row"),
            }
        }
        shops
    }

    fn parse_row(&self, row: &Element) -> Result<ShopRecord, RowError> {
        let cells = row.select_all(&self.cell);
        if cells.len() < MIN_CELLS {
            return Err(RowError::TooFewCells { found: cells.len() });
        }

        let name_cell = &cells[NAME_COL];
        let shop_name = name_cell
            .select_first(&self.shop_name)
            .or_else(|| name_cell.select_first(&self.shop_name_fallback))
            .map(|el| el.text().trim().to_owned())
            .unwrap_or_default();
        if shop_name.is_empty() {
            return Err(RowError::MissingShopName);
        }

        let (total_sales, weekly_sales) = self.total_and_weekly(&cells[SALES_COL]);
        let (total_reviews, weekly_reviews) = self.total_and_weekly(&cells[REVIEWS_COL]);

        Ok(ShopRecord {
            shop_name,
            total_sales,
            weekly_sales,
            total_reviews,
            weekly_reviews,
            active_listings: trimmed_text(&cells[LISTINGS_COL], &self.cell_content),
            open_date: trimmed_text(&cells[OPEN_DATE_COL], &self.cell_content),
        })
    }

    fn total_and_weekly(&self, cell: &Element) -> (String, String) {
        let total = trimmed_text(cell, &self.total_value);
        let weekly = cell
            .select_first(&self.weekly_value)
            .map(|el| strip_trend_arrow(&el.text()))
            .unwrap_or_default();
        (total, weekly)
    }
}

fn trimmed_text(cell: &Element, selector: &Selector) -> String {
    cell.select_first(selector)
        .map(|el| el.text().trim().to_owned())
        .unwrap_or_default()
}

/// Removes the first upward trend arrow and trims.
fn strip_trend_arrow(text: &str) -> String {
    text.replacen(TREND_ARROW, "", 1).trim().to_owned()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
