use chrono::{DateTime, Utc};
use csmarket::{Currency, Market};
use serde::{Deserialize, Serialize};

/// Whether an index was assembled by the user or generated from a fixed
/// category table.
#[derive(Debug, Deserialize, Serialize, Copy, Clone, PartialEq, Eq)]
pub enum IndexType {
    #[serde(rename = "CUSTOM")]
    Custom,
    #[serde(rename = "PREBUILT")]
    Prebuilt,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::Custom => "CUSTOM",
            IndexType::Prebuilt => "PREBUILT",
        }
    }

    pub fn parse(value: &str) -> Option<IndexType> {
        match value {
            "CUSTOM" => Some(IndexType::Custom),
            "PREBUILT" => Some(IndexType::Prebuilt),
            _ => None,
        }
    }
}

fn default_currency() -> Currency {
    Currency::Usd
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreateIndex {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: IndexType,
    pub category: Option<String>,
    pub selected_markets: Vec<Market>,
    #[serde(default = "default_currency")]
    pub currency: Currency,
    pub item_ids: Vec<i32>,
}

fn default_kind() -> IndexType {
    IndexType::Custom
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct UpdateIndex {
    pub name: Option<String>,
    pub description: Option<String>,
    pub selected_markets: Option<Vec<Market>>,
    pub currency: Option<Currency>,
    pub item_ids: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IndexSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: IndexType,
    pub category: Option<String>,
    pub selected_markets: Vec<Market>,
    pub currency: Currency,
    pub item_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub latest_value: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct IndexItemSummary {
    pub id: i32,
    pub market_hash_name: String,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub category: Option<String>,
    pub weapon: Option<String>,
    pub exterior: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IndexDetail {
    #[serde(flatten)]
    pub summary: IndexSummary,
    pub items: Vec<IndexItemSummary>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct IndexList {
    pub indices: Vec<IndexSummary>,
    pub total: usize,
}
