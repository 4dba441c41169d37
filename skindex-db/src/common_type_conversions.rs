use crate::entity::{item, price_index, price_point};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use csmarket::{Currency, Market};
use skindex_api_types::{IndexItemSummary, IndexSummary, IndexType, Item, PricePoint};
use std::str::FromStr;

fn utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&naive)
}

/// Markets are stored as a JSON array of market names. A row written by this
/// crate always parses; anything else falls back to empty.
pub fn parse_markets(text: &str) -> Vec<Market> {
    serde_json::from_str(text).unwrap_or_default()
}

pub fn parse_currency(text: &str) -> Currency {
    Currency::from_str(text).unwrap_or(Currency::Usd)
}

impl From<item::Model> for Item {
    fn from(model: item::Model) -> Self {
        let item::Model {
            id,
            market_hash_name,
            hash_name,
            nameid,
            classid,
            exterior,
            category,
            weapon,
            item_type,
            quality,
            collection,
            min_float,
            max_float,
            icon_url,
            created_at,
            updated_at,
        } = model;
        Item {
            id,
            market_hash_name,
            hash_name,
            nameid,
            classid,
            exterior,
            category,
            weapon,
            item_type,
            quality,
            collection,
            min_float,
            max_float,
            icon_url,
            created_at: Some(utc(created_at)),
            updated_at: Some(utc(updated_at)),
        }
    }
}

impl From<item::Model> for IndexItemSummary {
    fn from(model: item::Model) -> Self {
        let item::Model {
            id,
            market_hash_name,
            exterior,
            category,
            weapon,
            item_type,
            icon_url,
            ..
        } = model;
        IndexItemSummary {
            id,
            market_hash_name,
            item_type,
            category,
            weapon,
            exterior,
            icon_url,
        }
    }
}

impl From<price_point::Model> for PricePoint {
    fn from(model: price_point::Model) -> Self {
        let price_point::Model {
            timestamp,
            value_cents,
            currency,
            item_count,
            markets_used,
            ..
        } = model;
        PricePoint {
            timestamp: utc(timestamp),
            value: value_cents as f64 / 100.0,
            value_cents,
            currency: parse_currency(&currency),
            item_count,
            markets_used: parse_markets(&markets_used),
        }
    }
}

/// An index row with its item count and most recent recorded value.
pub struct IndexSummaryReturn(pub price_index::Model, pub u64, pub Option<f64>);

impl From<IndexSummaryReturn> for IndexSummary {
    fn from(value: IndexSummaryReturn) -> Self {
        let IndexSummaryReturn(model, item_count, latest_value) = value;
        let price_index::Model {
            id,
            name,
            description,
            kind,
            category,
            selected_markets,
            currency,
            created_at,
            updated_at,
        } = model;
        IndexSummary {
            id,
            name,
            description,
            kind: IndexType::parse(&kind).unwrap_or(IndexType::Custom),
            category,
            selected_markets: parse_markets(&selected_markets),
            currency: parse_currency(&currency),
            item_count,
            created_at: utc(created_at),
            updated_at: utc(updated_at),
            latest_value,
        }
    }
}
