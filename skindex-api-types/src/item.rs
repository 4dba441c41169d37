use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Item {
    pub id: i32,
    pub market_hash_name: String,
    pub hash_name: String,
    pub nameid: Option<i32>,
    pub classid: Option<String>,
    pub exterior: Option<String>,
    pub category: Option<String>,
    pub weapon: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub quality: Option<String>,
    pub collection: Option<String>,
    pub min_float: Option<f64>,
    pub max_float: Option<f64>,
    pub icon_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ItemsPage {
    pub items: Vec<Item>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ItemSearchResults {
    pub items: Vec<Item>,
    pub query: String,
    pub count: usize,
}
