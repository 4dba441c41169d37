use chrono::{DateTime, Utc};
use csmarket::{Currency, Market};
use serde::{Deserialize, Serialize};

/// One immutable timestamped aggregate-value record for an index.
/// `value` is the decimal rendering of `value_cents`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub value_cents: i64,
    pub currency: Currency,
    pub item_count: i32,
    pub markets_used: Vec<Market>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PriceHistory {
    pub index_id: i32,
    pub index_name: String,
    pub currency: Currency,
    pub points: Vec<PricePoint>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CalculationResult {
    pub index_id: i32,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub value_cents: i64,
    pub currency: Currency,
    pub item_count: i32,
    pub items_succeeded: i32,
    pub items_failed: i32,
    pub markets_used: Vec<Market>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LatestPrice {
    pub index_id: i32,
    pub latest: Option<PricePoint>,
    pub has_data: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ListingsHistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub value_cents: i64,
}

/// Aggregated min-price sums fetched live from the provider, as opposed to
/// the locally recorded price points.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ListingsHistory {
    pub index_id: i32,
    pub index_name: String,
    pub currency: Currency,
    pub days: u32,
    pub item_count: usize,
    pub markets_used: Vec<Market>,
    pub points: Vec<ListingsHistoryPoint>,
}
