use crate::catalog_service;
use crate::market_service::MarketPriceService;
use crate::web::error::ApiError;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use skindex_api_types::{Item, ItemSearchResults, ItemsPage};
use skindex_db::{IndexError, ItemFilter, SkindexDb};

#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub category: Option<String>,
    pub weapon: Option<String>,
    pub exterior: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    50
}

pub async fn list_items(
    State(db): State<SkindexDb>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<ItemsPage>, ApiError> {
    let filter = ItemFilter {
        item_type: query.item_type,
        category: query.category,
        weapon: query.weapon,
        exterior: query.exterior,
    };
    let page = db
        .get_items_paginated(&filter, query.page, query.limit)
        .await?;
    Ok(Json(ItemsPage {
        pages: page.total.div_ceil(page.limit),
        items: page.items.into_iter().map(Into::into).collect(),
        total: page.total,
        page: page.page,
        limit: page.limit,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_search_limit")]
    pub limit: u64,
}

fn default_search_limit() -> u64 {
    25
}

pub async fn search_items(
    State(db): State<SkindexDb>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ItemSearchResults>, ApiError> {
    let term = query.q.trim();
    if term.is_empty() {
        return Err(IndexError::Validation("search query must not be empty".into()).into());
    }
    let items = db.search_items(term, query.limit).await?;
    Ok(Json(ItemSearchResults {
        count: items.len(),
        items: items.into_iter().map(Into::into).collect(),
        query: term.to_string(),
    }))
}

/// On-demand catalog refresh from the provider.
pub async fn sync_items(
    State(db): State<SkindexDb>,
    State(market): State<MarketPriceService>,
) -> Result<Json<Value>, ApiError> {
    let count = catalog_service::sync_catalog(&db, &market).await?;
    Ok(Json(json!({ "synced": count })))
}

pub async fn get_item(
    State(db): State<SkindexDb>,
    Path(item_id): Path<i32>,
) -> Result<Json<Item>, ApiError> {
    let item = db
        .get_item_by_id(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("item {item_id} not found")))?;
    Ok(Json(item.into()))
}
