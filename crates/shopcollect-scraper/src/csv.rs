//! CSV export of collected shop records.
//!
//! Output is UTF-8 with a leading byte-order mark so spreadsheet tools pick
//! the right encoding. Rows are separated by `\n` with no trailing newline.
//! A field is quoted only when it contains a comma, a double quote or a
//! newline; embedded quotes are doubled.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use shopcollect_core::{ShopRecord, CSV_HEADERS};

pub const BOM: char = '\u{feff}';

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n')
}

#[must_use]
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if needs_quotes(field) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape_field(field));
    }
}

/// Serializes `records` under the fixed header row.
///
/// Returns `None` for an empty slice; there is nothing worth exporting.
#[must_use]
pub fn serialize(records: &[ShopRecord]) -> Option<Vec<u8>> {
    if records.is_empty() {
        return None;
    }

    let mut out = String::new();
    out.push(BOM);
    write_row(&mut out, CSV_HEADERS);
    for record in records {
        out.push('\n');
        write_row(&mut out, record.fields());
    }
    Some(out.into_bytes())
}

/// `etsy_shops_2024_05_01T12_34_56.csv` for the given instant.
#[must_use]
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("etsy_shops_{}.csv", at.format("%Y_%m_%dT%H_%M_%S"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record(name: &str) -> ShopRecord {
        ShopRecord {
            shop_name: name.into(),
            total_sales: "1,204".into(),
            weekly_sales: "18".into(),
            total_reviews: "311".into(),
            weekly_reviews: "4".into(),
            active_listings: "97".into(),
            open_date: "2020-01-15".into(),
        }
    }

    #[test]
    fn quotes_and_doubles_embedded_quotes() {
        assert_eq!(escape_field(r#"He said "hi", ok"#), r#""He said ""hi"", ok""#);
    }

    #[test]
    fn quotes_fields_with_newlines() {
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn plain_fields_are_borrowed() {
        assert!(matches!(escape_field("PaperMoth"), Cow::Borrowed("PaperMoth")));
        assert!(matches!(escape_field(""), Cow::Borrowed("")));
    }

    #[test]
    fn empty_input_produces_nothing() {
        assert!(serialize(&[]).is_none());
    }

    #[test]
    fn payload_starts_with_bom_and_header() {
        let bytes = serialize(&[record("PaperMoth")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('\u{feff}'));
        let lines: Vec<&str> = text.trim_start_matches(BOM).split('\n').collect();
        assert_eq!(
            lines,
            [
                "Shop Name,Total Sales,Weekly Sales,Total Reviews,Weekly Reviews,Active Listings,Open Date",
                "PaperMoth,\"1,204\",18,311,4,97,2020-01-15",
            ]
        );
    }

    #[test]
    fn serialize_is_deterministic() {
        let records = vec![record("A"), record("B \"the\" shop")];
        assert_eq!(serialize(&records), serialize(&records));
    }

    #[test]
    fn filename_replaces_separators() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap();
        assert_eq!(export_filename(at), "etsy_shops_2024_05_01T12_34_56.csv");
    }
}
