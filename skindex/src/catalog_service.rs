use crate::market_service::MarketPriceService;
use anyhow::Result;
use skindex_db::SkindexDb;
use tracing::{info, instrument};

/// Pulls the full item dump from the provider and upserts it into the local
/// catalog. Existing rows keep their ids, so index memberships survive.
#[instrument(skip(db, market))]
pub async fn sync_catalog(db: &SkindexDb, market: &MarketPriceService) -> Result<usize> {
    let catalog = market.fetch_catalog().await?;
    let count = db.upsert_catalog_items(&catalog.items).await?;
    info!("catalog sync stored {count} items");
    Ok(count)
}
