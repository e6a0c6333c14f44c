//! Shop-performance rows as extracted from the ranking table.

use serde::{Deserialize, Serialize};

/// Header row written ahead of every exported record, in field order.
pub const CSV_HEADERS: [&str; 7] = [
    "Shop Name",
    "Total Sales",
    "Weekly Sales",
    "Total Reviews",
    "Weekly Reviews",
    "Active Listings",
    "Open Date",
];

/// One row of the shop ranking table.
///
/// Every field is display text exactly as the table renders it; numbers are
/// not parsed. Missing cells become empty strings, never absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopRecord {
    pub shop_name: String,
    pub total_sales: String,
    /// Seven-day sales delta with the trend arrow removed.
    pub weekly_sales: String,
    pub total_reviews: String,
    /// Seven-day review delta with the trend arrow removed.
    pub weekly_reviews: String,
    pub active_listings: String,
    pub open_date: String,
}

impl ShopRecord {
    /// Field values in [`CSV_HEADERS`] order.
    #[must_use]
    pub fn fields(&self) -> [&str; 7] {
        [
            self.shop_name.as_str(),
            self.total_sales.as_str(),
            self.weekly_sales.as_str(),
            self.total_reviews.as_str(),
            self.weekly_reviews.as_str(),
            self.active_listings.as_str(),
            self.open_date.as_str(),
        ]
    }
}
