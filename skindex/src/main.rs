mod catalog_service;
mod market_service;
mod price_service;
mod web;

use crate::market_service::MarketPriceService;
use crate::price_service::PriceService;
use crate::web::WebState;
use anyhow::{Context, Result};
use csmarket::CsMarketClient;
use skindex_db::SkindexDb;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!("starting skindex");

    let db = SkindexDb::connect().await?;
    let api_key =
        std::env::var("CSMARKET_API_KEY").context("CSMARKET_API_KEY must be set")?;
    let market = MarketPriceService::new(Arc::new(CsMarketClient::new(&api_key)));

    // a failed sync is tolerated; the stored catalog keeps serving
    match catalog_service::sync_catalog(&db, &market).await {
        Ok(count) => info!("catalog ready with {count} items"),
        Err(error) => error!("catalog sync failed, using stored catalog: {error}"),
    }
    if let Err(error) = db.generate_prebuilt_indices().await {
        error!("prebuilt index generation failed: {error}");
    }

    let prices = PriceService::new(db.clone(), market.clone());
    web::start_web(WebState { db, market, prices }).await
}
