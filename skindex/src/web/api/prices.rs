use crate::price_service::PriceService;
use crate::web::error::ApiError;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use skindex_api_types::{CalculationResult, LatestPrice, ListingsHistory, PriceHistory};

pub async fn calculate_index(
    State(prices): State<PriceService>,
    Path(index_id): Path<i32>,
) -> Result<Json<CalculationResult>, ApiError> {
    Ok(Json(prices.calculate(index_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
}

pub async fn price_history(
    State(prices): State<PriceService>,
    Path(index_id): Path<i32>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<PriceHistory>, ApiError> {
    let history = prices
        .history(
            index_id,
            query.start.map(|t| t.naive_utc()),
            query.end.map(|t| t.naive_utc()),
            query.limit,
        )
        .await?;
    Ok(Json(history))
}

pub async fn latest_price(
    State(prices): State<PriceService>,
    Path(index_id): Path<i32>,
) -> Result<Json<LatestPrice>, ApiError> {
    Ok(Json(prices.latest(index_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ListingsHistoryQuery {
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    30
}

pub async fn listings_history(
    State(prices): State<PriceService>,
    Path(index_id): Path<i32>,
    Query(query): Query<ListingsHistoryQuery>,
) -> Result<Json<ListingsHistory>, ApiError> {
    let days = query.days.clamp(1, 365);
    Ok(Json(prices.listings_history(index_id, days).await?))
}
