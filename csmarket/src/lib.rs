use chrono::{DateTime, Utc};
use log::info;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, Request, Url};
pub use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_with::{formats::Flexible, serde_as, TimestampSeconds};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("HTTP Error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("API key rejected with status {0}")]
    Unauthorized(StatusCode),
    #[error("Unknown market name: {0}")]
    UnknownMarket(String),
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// Marketplaces CSMarketAPI aggregates listings from.
#[derive(Hash, Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq, PartialOrd, Ord)]
pub enum Market {
    #[serde(rename = "STEAMCOMMUNITY")]
    SteamCommunity,
    #[serde(rename = "BUFFMARKET")]
    BuffMarket,
    #[serde(rename = "SKINS")]
    Skins,
    #[serde(rename = "SKINPORT")]
    Skinport,
    #[serde(rename = "MARKETCSGO")]
    MarketCsgo,
    #[serde(rename = "DMARKET")]
    DMarket,
    #[serde(rename = "GAMERPAYGG")]
    GamerPayGg,
    #[serde(rename = "CSDEALS")]
    CsDeals,
    #[serde(rename = "SKINBARON")]
    SkinBaron,
    #[serde(rename = "CSFLOAT")]
    CsFloat,
    #[serde(rename = "CSMONEY")]
    CsMoney,
    #[serde(rename = "WHITEMARKET")]
    WhiteMarket,
}

impl Market {
    pub const ALL: [Market; 12] = [
        Market::SteamCommunity,
        Market::BuffMarket,
        Market::Skins,
        Market::Skinport,
        Market::MarketCsgo,
        Market::DMarket,
        Market::GamerPayGg,
        Market::CsDeals,
        Market::SkinBaron,
        Market::CsFloat,
        Market::CsMoney,
        Market::WhiteMarket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::SteamCommunity => "STEAMCOMMUNITY",
            Market::BuffMarket => "BUFFMARKET",
            Market::Skins => "SKINS",
            Market::Skinport => "SKINPORT",
            Market::MarketCsgo => "MARKETCSGO",
            Market::DMarket => "DMARKET",
            Market::GamerPayGg => "GAMERPAYGG",
            Market::CsDeals => "CSDEALS",
            Market::SkinBaron => "SKINBARON",
            Market::CsFloat => "CSFLOAT",
            Market::CsMoney => "CSMONEY",
            Market::WhiteMarket => "WHITEMARKET",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Market::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| Error::UnknownMarket(s.to_string()))
    }
}

#[derive(Hash, Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq, PartialOrd, Ord)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "CNY")]
    Cny,
    #[serde(rename = "RUB")]
    Rub,
    #[serde(rename = "INR")]
    Inr,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Cny,
        Currency::Rub,
        Currency::Inr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Cny => "CNY",
            Currency::Rub => "RUB",
            Currency::Inr => "INR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.as_str() == upper)
            .ok_or_else(|| Error::UnknownCurrency(s.to_string()))
    }
}

/// One catalog entry from the full item dump.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ItemView {
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
    pub cloudflare_icon_url: Option<String>,
    pub akamai_icon_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ItemsView {
    pub items: Vec<ItemView>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MarketInfoView {
    pub market: Market,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MarketsView {
    pub items: Vec<MarketInfoView>,
}

/// Lowest currently-listed price on a single marketplace.
/// `min_price` is absent when the marketplace has no live listing.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MarketListingView {
    pub market: Market,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub count: Option<u32>,
}

impl MarketListingView {
    /// Prices come over the wire as decimal currency units; everything
    /// downstream works in integer cents.
    pub fn min_price_cents(&self) -> Option<i64> {
        self.min_price.map(|price| (price * 100.0).round() as i64)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListingsAggregatedView {
    pub market_hash_name: String,
    pub currency: Currency,
    pub listings: Vec<MarketListingView>,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HistoryPointView {
    #[serde_as(as = "TimestampSeconds<i64, Flexible>")]
    pub timestamp: DateTime<Utc>,
    pub listings: Vec<MarketListingView>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListingsHistoryView {
    pub market_hash_name: String,
    pub currency: Currency,
    pub items: Vec<HistoryPointView>,
}

pub struct CsMarketClient {
    client: Client,
}

impl CsMarketClient {
    const CSMARKET_BASE_URL: &'static str = "https://csmarketapi.com/api/v1";

    pub fn new(api_key: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).expect("API key must be a valid header value"),
        );
        let client = Client::builder().default_headers(headers).build().unwrap();

        CsMarketClient { client }
    }

    /// Fetches the full item catalog dump.
    pub async fn get_items(&self) -> Result<ItemsView, Error> {
        let items = Request::new(
            Method::GET,
            Url::parse(&format!("{}/items", Self::CSMARKET_BASE_URL))?,
        );
        info!("Getting item catalog: {}", items.url());
        let response = self.client.execute(items).await?;
        Ok(Self::check_auth(response)?.json().await?)
    }

    /// Fetches the marketplace directory.
    pub async fn get_markets(&self) -> Result<MarketsView, Error> {
        let markets = Request::new(
            Method::GET,
            Url::parse(&format!("{}/markets", Self::CSMARKET_BASE_URL))?,
        );
        Ok(Self::check_auth(self.client.execute(markets).await?)?
            .json()
            .await?)
    }

    /// Gets the lowest currently-listed price for an item on each of the
    /// requested marketplaces.
    pub async fn get_listings_latest_aggregated(
        &self,
        market_hash_name: &str,
        markets: &[Market],
        currency: Currency,
    ) -> Result<ListingsAggregatedView, Error> {
        let url = format!("{}/listings/latest/aggregated", Self::CSMARKET_BASE_URL);
        info!("Getting latest aggregated listings: {url} {market_hash_name}");
        let response = self
            .client
            .get(url)
            .query(&[
                ("market_hash_name", market_hash_name),
                ("markets", &Self::markets_to_string(markets)),
                ("currency", currency.as_str()),
            ])
            .send()
            .await?;
        Ok(Self::check_auth(response)?.json().await?)
    }

    /// Gets daily aggregated listing history for an item across marketplaces.
    pub async fn get_listings_history_aggregated(
        &self,
        market_hash_name: &str,
        markets: &[Market],
        currency: Currency,
    ) -> Result<ListingsHistoryView, Error> {
        let url = format!("{}/listings/history/aggregated", Self::CSMARKET_BASE_URL);
        info!("Getting aggregated listing history: {url} {market_hash_name}");
        let response = self
            .client
            .get(url)
            .query(&[
                ("market_hash_name", market_hash_name),
                ("markets", &Self::markets_to_string(markets)),
                ("currency", currency.as_str()),
            ])
            .send()
            .await?;
        Ok(Self::check_auth(response)?.json().await?)
    }

    fn check_auth(response: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Unauthorized(status));
        }
        Ok(response.error_for_status()?)
    }

    fn markets_to_string(markets: &[Market]) -> String {
        let market_strs: Vec<_> = markets.iter().map(|m| m.as_str()).collect();
        market_strs.join(",")
    }
}

#[cfg(test)]
mod test {
    use crate::{Currency, ItemsView, ListingsAggregatedView, ListingsHistoryView, Market};

    #[test]
    fn test_parse_items() {
        let data = r#"{
            "items": [
                {
                    "market_hash_name": "AK-47 | Redline (Field-Tested)",
                    "hash_name": "AK-47 | Redline",
                    "nameid": 33865,
                    "classid": "310777928",
                    "exterior": "Field-Tested",
                    "category": "Normal",
                    "weapon": "AK-47",
                    "type": "Rifle",
                    "quality": "Classified",
                    "collection": "The Phoenix Collection",
                    "min_float": 0.15,
                    "max_float": 0.38,
                    "cloudflare_icon_url": "https://example.com/icon.png",
                    "akamai_icon_url": null
                }
            ]
        }"#;
        let items: ItemsView = serde_json::from_str(data).unwrap();
        assert_eq!(items.items.len(), 1);
        let item = &items.items[0];
        assert_eq!(item.item_type.as_deref(), Some("Rifle"));
        assert_eq!(item.weapon.as_deref(), Some("AK-47"));
    }

    #[test]
    fn test_parse_listings_aggregated() {
        let data = r#"{
            "market_hash_name": "AK-47 | Redline (Field-Tested)",
            "currency": "USD",
            "listings": [
                {"market": "STEAMCOMMUNITY", "min_price": 10.5, "max_price": 44.1, "count": 321},
                {"market": "SKINPORT", "min_price": null, "max_price": null, "count": 0}
            ]
        }"#;
        let listings: ListingsAggregatedView = serde_json::from_str(data).unwrap();
        assert_eq!(listings.currency, Currency::Usd);
        assert_eq!(listings.listings[0].market, Market::SteamCommunity);
        assert_eq!(listings.listings[0].min_price_cents(), Some(1050));
        assert_eq!(listings.listings[1].min_price_cents(), None);
    }

    #[test]
    fn test_parse_listings_history() {
        let data = r#"{
            "market_hash_name": "M4A4 | Howl (Factory New)",
            "currency": "EUR",
            "items": [
                {
                    "timestamp": 1700000000,
                    "listings": [{"market": "CSFLOAT", "min_price": 4100.0, "max_price": null, "count": 2}]
                }
            ]
        }"#;
        let history: ListingsHistoryView = serde_json::from_str(data).unwrap();
        assert_eq!(history.items.len(), 1);
        assert_eq!(history.items[0].listings[0].min_price_cents(), Some(410000));
    }

    #[test]
    fn test_market_from_str() {
        assert_eq!("skinport".parse::<Market>().unwrap(), Market::Skinport);
        assert_eq!(
            "STEAMCOMMUNITY".parse::<Market>().unwrap(),
            Market::SteamCommunity
        );
        assert!("NOT_A_MARKET".parse::<Market>().is_err());
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("GBP".parse::<Currency>().is_err());
    }

    #[test]
    fn test_cent_rounding() {
        let listing = crate::MarketListingView {
            market: Market::SteamCommunity,
            min_price: Some(25.99),
            max_price: None,
            count: None,
        };
        // 25.99 * 100.0 lands just below 2599.0 in f64; truncation would lose a cent
        assert_eq!(listing.min_price_cents(), Some(2599));
    }
}
