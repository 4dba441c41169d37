use async_trait::async_trait;
use csmarket::{
    CsMarketClient, Currency, Error, ItemsView, ListingsAggregatedView, ListingsHistoryView,
    Market,
};
use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::warn;

/// Upper bound on in-flight provider requests during a batch fetch.
pub const MAX_CONCURRENT_PRICE_REQUESTS: usize = 10;

/// Seam over the listings provider so price calculations can run against a
/// stub in tests.
#[async_trait]
pub trait MarketDataSource {
    async fn fetch_catalog(&self) -> Result<ItemsView, Error>;

    async fn latest_listings(
        &self,
        market_hash_name: &str,
        markets: &[Market],
        currency: Currency,
    ) -> Result<ListingsAggregatedView, Error>;

    async fn listing_history(
        &self,
        market_hash_name: &str,
        markets: &[Market],
        currency: Currency,
    ) -> Result<ListingsHistoryView, Error>;
}

#[async_trait]
impl MarketDataSource for CsMarketClient {
    async fn fetch_catalog(&self) -> Result<ItemsView, Error> {
        self.get_items().await
    }

    async fn latest_listings(
        &self,
        market_hash_name: &str,
        markets: &[Market],
        currency: Currency,
    ) -> Result<ListingsAggregatedView, Error> {
        self.get_listings_latest_aggregated(market_hash_name, markets, currency)
            .await
    }

    async fn listing_history(
        &self,
        market_hash_name: &str,
        markets: &[Market],
        currency: Currency,
    ) -> Result<ListingsHistoryView, Error> {
        self.get_listings_history_aggregated(market_hash_name, markets, currency)
            .await
    }
}

/// Cheapest live listing found for one item, along with which marketplaces
/// had stock.
#[derive(Debug, Clone)]
pub struct ItemQuote {
    pub min_price_cents: i64,
    pub markets_with_listings: Vec<Market>,
}

#[derive(Clone)]
pub struct MarketPriceService {
    source: Arc<dyn MarketDataSource + Send + Sync>,
}

impl MarketPriceService {
    pub fn new(source: Arc<dyn MarketDataSource + Send + Sync>) -> Self {
        Self { source }
    }

    pub async fn fetch_catalog(&self) -> Result<ItemsView, Error> {
        self.source.fetch_catalog().await
    }

    /// Fetches the minimum listed price for every item, bounded to
    /// [`MAX_CONCURRENT_PRICE_REQUESTS`] requests at a time. An item whose
    /// fetch fails, or that has no live listing anywhere, yields `None`.
    /// A rejected API key aborts the whole batch.
    pub async fn batch_min_prices(
        &self,
        market_hash_names: &[String],
        markets: &[Market],
        currency: Currency,
    ) -> Result<Vec<(String, Option<ItemQuote>)>, Error> {
        stream::iter(market_hash_names.iter().cloned().map(|name| async move {
            match self.source.latest_listings(&name, markets, currency).await {
                Ok(view) => Ok((name, quote_from_listings(&view))),
                Err(Error::Unauthorized(status)) => Err(Error::Unauthorized(status)),
                Err(error) => {
                    warn!("price lookup failed for {name}: {error}");
                    Ok((name, None))
                }
            }
        }))
        .buffer_unordered(MAX_CONCURRENT_PRICE_REQUESTS)
        .try_collect()
        .await
    }

    /// Same failure policy as [`Self::batch_min_prices`], for the daily
    /// history endpoint.
    pub async fn batch_listing_histories(
        &self,
        market_hash_names: &[String],
        markets: &[Market],
        currency: Currency,
    ) -> Result<Vec<(String, Option<ListingsHistoryView>)>, Error> {
        stream::iter(market_hash_names.iter().cloned().map(|name| async move {
            match self.source.listing_history(&name, markets, currency).await {
                Ok(view) => Ok((name, Some(view))),
                Err(Error::Unauthorized(status)) => Err(Error::Unauthorized(status)),
                Err(error) => {
                    warn!("listing history lookup failed for {name}: {error}");
                    Ok((name, None))
                }
            }
        }))
        .buffer_unordered(MAX_CONCURRENT_PRICE_REQUESTS)
        .try_collect()
        .await
    }
}

fn quote_from_listings(view: &ListingsAggregatedView) -> Option<ItemQuote> {
    let markets_with_listings: Vec<Market> = view
        .listings
        .iter()
        .filter(|listing| listing.min_price_cents().is_some())
        .map(|listing| listing.market)
        .collect();
    let min_price_cents = view
        .listings
        .iter()
        .filter_map(|listing| listing.min_price_cents())
        .min()?;
    Some(ItemQuote {
        min_price_cents,
        markets_with_listings,
    })
}
