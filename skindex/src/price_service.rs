use crate::market_service::MarketPriceService;
use chrono::{Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use csmarket::Market;
use skindex_api_types::{
    CalculationResult, LatestPrice, ListingsHistory, ListingsHistoryPoint, PriceHistory,
    PricePoint,
};
use skindex_db::common_type_conversions::{parse_currency, parse_markets};
use skindex_db::{IndexError, NewPricePoint, SkindexDb};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum CalculateError {
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Market(#[from] csmarket::Error),
}

/// Computes and records aggregate index values from live listings data.
#[derive(Clone)]
pub struct PriceService {
    db: SkindexDb,
    market: MarketPriceService,
}

impl PriceService {
    pub fn new(db: SkindexDb, market: MarketPriceService) -> Self {
        Self { db, market }
    }

    /// Sums the cheapest live listing of every member item and records the
    /// total as a new price point. Items without a reachable listing count
    /// as failed and contribute nothing to the sum.
    #[instrument(skip(self))]
    pub async fn calculate(&self, index_id: i32) -> Result<CalculationResult, CalculateError> {
        let (index, items) = self.db.get_index_with_items(index_id).await?;
        let markets = parse_markets(&index.selected_markets);
        let currency = parse_currency(&index.currency);
        let names: Vec<String> = items
            .iter()
            .map(|item| item.market_hash_name.clone())
            .collect();
        let quotes = self
            .market
            .batch_min_prices(&names, &markets, currency)
            .await?;
        let mut value_cents = 0i64;
        let mut items_succeeded = 0i32;
        let mut markets_used = BTreeSet::new();
        for (_, quote) in &quotes {
            if let Some(quote) = quote {
                value_cents += quote.min_price_cents;
                items_succeeded += 1;
                markets_used.extend(quote.markets_with_listings.iter().copied());
            }
        }
        let markets_used: Vec<Market> = markets_used.into_iter().collect();
        let items_failed = items.len() as i32 - items_succeeded;
        let point = self
            .db
            .record_price_point(NewPricePoint {
                index_id: index.id,
                timestamp: Utc::now().naive_utc(),
                value_cents,
                currency,
                item_count: items.len() as i32,
                items_succeeded,
                items_failed,
                markets_used: markets_used.clone(),
            })
            .await?;
        info!(
            "index {index_id} valued at {value_cents} cents ({items_succeeded} ok, {items_failed} failed)"
        );
        Ok(CalculationResult {
            index_id: index.id,
            timestamp: Utc.from_utc_datetime(&point.timestamp),
            value: point.value_cents as f64 / 100.0,
            value_cents: point.value_cents,
            currency,
            item_count: point.item_count,
            items_succeeded: point.items_succeeded,
            items_failed: point.items_failed,
            markets_used,
        })
    }

    pub async fn history(
        &self,
        index_id: i32,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        limit: Option<u64>,
    ) -> Result<PriceHistory, IndexError> {
        let index = self.db.get_index(index_id).await?;
        let points = self.db.get_price_history(index_id, start, end, limit).await?;
        Ok(PriceHistory {
            index_id: index.id,
            index_name: index.name,
            currency: parse_currency(&index.currency),
            points: points.into_iter().map(PricePoint::from).collect(),
        })
    }

    pub async fn latest(&self, index_id: i32) -> Result<LatestPrice, IndexError> {
        self.db.get_index(index_id).await?;
        let latest = self
            .db
            .get_latest_price_point(index_id)
            .await?
            .map(PricePoint::from);
        Ok(LatestPrice {
            index_id,
            has_data: latest.is_some(),
            latest,
        })
    }

    /// Daily aggregate values computed live from provider history rather
    /// than the recorded price points. Each day's value sums the minimum
    /// listed price of every item that has data for that day.
    #[instrument(skip(self))]
    pub async fn listings_history(
        &self,
        index_id: i32,
        days: u32,
    ) -> Result<ListingsHistory, CalculateError> {
        let (index, items) = self.db.get_index_with_items(index_id).await?;
        let markets = parse_markets(&index.selected_markets);
        let currency = parse_currency(&index.currency);
        let names: Vec<String> = items
            .iter()
            .map(|item| item.market_hash_name.clone())
            .collect();
        let histories = self
            .market
            .batch_listing_histories(&names, &markets, currency)
            .await?;
        let cutoff = Utc::now() - Duration::days(days as i64);
        let mut buckets: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for (_, history) in histories.iter() {
            let Some(history) = history else { continue };
            for point in &history.items {
                if point.timestamp < cutoff {
                    continue;
                }
                if let Some(min) = point
                    .listings
                    .iter()
                    .filter_map(|listing| listing.min_price_cents())
                    .min()
                {
                    *buckets.entry(point.timestamp.date_naive()).or_default() += min;
                }
            }
        }
        let points = buckets
            .into_iter()
            .map(|(date, value_cents)| ListingsHistoryPoint {
                timestamp: Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default()),
                value: value_cents as f64 / 100.0,
                value_cents,
            })
            .collect();
        Ok(ListingsHistory {
            index_id: index.id,
            index_name: index.name,
            currency,
            days,
            item_count: items.len(),
            markets_used: markets,
            points,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::market_service::{MarketDataSource, MarketPriceService};
    use async_trait::async_trait;
    use csmarket::{
        Currency, Error, ItemView, ItemsView, ListingsAggregatedView, ListingsHistoryView,
        Market, MarketListingView,
    };
    use skindex_api_types::IndexType;
    use skindex_db::CreateIndexData;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Fixed per-item listings; names missing from the map simulate a failed
    /// provider request, names in `unauthorized` simulate a rejected API key.
    struct StubSource {
        listings: HashMap<String, Vec<(Market, Option<f64>)>>,
        unauthorized: Vec<String>,
    }

    #[async_trait]
    impl MarketDataSource for StubSource {
        async fn fetch_catalog(&self) -> Result<ItemsView, Error> {
            Ok(ItemsView { items: vec![] })
        }

        async fn latest_listings(
            &self,
            market_hash_name: &str,
            _markets: &[Market],
            currency: Currency,
        ) -> Result<ListingsAggregatedView, Error> {
            if self.unauthorized.iter().any(|name| name == market_hash_name) {
                return Err(Error::Unauthorized(csmarket::StatusCode::UNAUTHORIZED));
            }
            let listings = self
                .listings
                .get(market_hash_name)
                .ok_or_else(broken_response)?;
            Ok(ListingsAggregatedView {
                market_hash_name: market_hash_name.to_string(),
                currency,
                listings: listings
                    .iter()
                    .map(|(market, min_price)| MarketListingView {
                        market: *market,
                        min_price: *min_price,
                        max_price: None,
                        count: min_price.map(|_| 1),
                    })
                    .collect(),
            })
        }

        async fn listing_history(
            &self,
            market_hash_name: &str,
            _markets: &[Market],
            currency: Currency,
        ) -> Result<ListingsHistoryView, Error> {
            Ok(ListingsHistoryView {
                market_hash_name: market_hash_name.to_string(),
                currency,
                items: vec![],
            })
        }
    }

    fn broken_response() -> Error {
        serde_json::from_str::<ItemsView>("not json").unwrap_err().into()
    }

    fn catalog_item(name: &str) -> ItemView {
        ItemView {
            market_hash_name: name.to_string(),
            hash_name: name.to_string(),
            nameid: None,
            classid: None,
            exterior: None,
            category: None,
            weapon: None,
            item_type: Some("Rifle".to_string()),
            quality: None,
            collection: None,
            min_float: None,
            max_float: None,
            cloudflare_icon_url: None,
            akamai_icon_url: None,
        }
    }

    async fn service_with(
        names: &[&str],
        listings: HashMap<String, Vec<(Market, Option<f64>)>>,
        currency: Currency,
    ) -> (PriceService, i32) {
        service_with_source(
            names,
            StubSource {
                listings,
                unauthorized: vec![],
            },
            currency,
        )
        .await
    }

    async fn service_with_source(
        names: &[&str],
        source: StubSource,
        currency: Currency,
    ) -> (PriceService, i32) {
        let db = SkindexDb::connect_to("sqlite::memory:").await.unwrap();
        let views: Vec<_> = names.iter().map(|n| catalog_item(n)).collect();
        db.upsert_catalog_items(&views).await.unwrap();
        let page = db
            .get_items_paginated(&Default::default(), 1, 100)
            .await
            .unwrap();
        let index = db
            .create_index(CreateIndexData {
                name: "Test".to_string(),
                description: None,
                kind: IndexType::Custom,
                category: None,
                selected_markets: vec![Market::SteamCommunity, Market::Skinport],
                currency,
                item_ids: page.items.iter().map(|i| i.id).collect(),
            })
            .await
            .unwrap();
        let market = MarketPriceService::new(Arc::new(source));
        (PriceService::new(db, market), index.id)
    }

    #[tokio::test]
    async fn sums_min_prices_in_cents() {
        let listings = HashMap::from([
            (
                "a".to_string(),
                vec![
                    (Market::SteamCommunity, Some(10.50)),
                    (Market::Skinport, Some(12.00)),
                ],
            ),
            ("b".to_string(), vec![(Market::SteamCommunity, Some(25.00))]),
            ("c".to_string(), vec![(Market::Skinport, Some(5.25))]),
        ]);
        let (service, index_id) = service_with(&["a", "b", "c"], listings, Currency::Usd).await;
        let result = service.calculate(index_id).await.unwrap();
        assert_eq!(result.value_cents, 4075);
        assert_eq!(result.value, 40.75);
        assert_eq!(result.item_count, 3);
        assert_eq!(result.items_succeeded, 3);
        assert_eq!(result.items_failed, 0);
        assert_eq!(
            result.markets_used,
            vec![Market::SteamCommunity, Market::Skinport]
        );
    }

    #[tokio::test]
    async fn failed_item_contributes_nothing() {
        // "b" is missing from the stub, so its fetch errors out
        let listings = HashMap::from([
            ("a".to_string(), vec![(Market::SteamCommunity, Some(10.00))]),
            ("c".to_string(), vec![(Market::SteamCommunity, None)]),
        ]);
        let (service, index_id) = service_with(&["a", "b", "c"], listings, Currency::Usd).await;
        let result = service.calculate(index_id).await.unwrap();
        assert_eq!(result.value_cents, 1000);
        assert_eq!(result.items_succeeded, 1);
        assert_eq!(result.items_failed, 2);
        assert_eq!(result.markets_used, vec![Market::SteamCommunity]);
    }

    #[tokio::test]
    async fn rejected_api_key_aborts_without_recording() {
        // "a" resolves fine, but "b" hits the auth rejection
        let source = StubSource {
            listings: HashMap::from([(
                "a".to_string(),
                vec![(Market::SteamCommunity, Some(10.00))],
            )]),
            unauthorized: vec!["b".to_string()],
        };
        let (service, index_id) = service_with_source(&["a", "b"], source, Currency::Usd).await;
        let err = service.calculate(index_id).await.unwrap_err();
        assert!(matches!(
            err,
            CalculateError::Market(Error::Unauthorized(_))
        ));
        let history = service.history(index_id, None, None, None).await.unwrap();
        assert!(history.points.is_empty(), "no partial point may be written");
    }

    #[tokio::test]
    async fn empty_index_records_a_zero_point() {
        let (service, index_id) = service_with(&[], HashMap::new(), Currency::Usd).await;
        let result = service.calculate(index_id).await.unwrap();
        assert_eq!(result.value_cents, 0);
        assert_eq!(result.item_count, 0);
        assert!(result.markets_used.is_empty());
        let history = service.history(index_id, None, None, None).await.unwrap();
        assert_eq!(history.points.len(), 1);
    }

    #[tokio::test]
    async fn repeated_calculations_append_history() {
        let listings =
            HashMap::from([("a".to_string(), vec![(Market::SteamCommunity, Some(1.00))])]);
        let (service, index_id) = service_with(&["a"], listings, Currency::Usd).await;
        for _ in 0..3 {
            service.calculate(index_id).await.unwrap();
        }
        let history = service.history(index_id, None, None, None).await.unwrap();
        assert_eq!(history.points.len(), 3);
        let mut timestamps: Vec<_> = history.points.iter().map(|p| p.timestamp).collect();
        let sorted = timestamps.clone();
        timestamps.sort();
        assert_eq!(timestamps, sorted);
        let latest = service.latest(index_id).await.unwrap();
        assert!(latest.has_data);
    }

    #[tokio::test]
    async fn result_snapshots_index_currency() {
        let listings =
            HashMap::from([("a".to_string(), vec![(Market::SteamCommunity, Some(2.50))])]);
        let (service, index_id) = service_with(&["a"], listings, Currency::Eur).await;
        let result = service.calculate(index_id).await.unwrap();
        assert_eq!(result.currency, Currency::Eur);
        let latest = service.latest(index_id).await.unwrap();
        assert_eq!(latest.latest.unwrap().currency, Currency::Eur);
    }

    #[tokio::test]
    async fn unknown_index_is_not_found() {
        let (service, _) = service_with(&[], HashMap::new(), Currency::Usd).await;
        let err = service.calculate(404).await.unwrap_err();
        assert!(matches!(
            err,
            CalculateError::Index(IndexError::NotFound(404))
        ));
    }
}
