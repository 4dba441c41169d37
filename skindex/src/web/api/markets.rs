use axum::Json;
use csmarket::{Currency, Market};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SupportedOptions {
    pub markets: Vec<Market>,
    pub currencies: Vec<Currency>,
}

/// The marketplaces and currencies an index can be configured with.
pub async fn list_markets() -> Json<SupportedOptions> {
    Json(SupportedOptions {
        markets: Market::ALL.to_vec(),
        currencies: Currency::ALL.to_vec(),
    })
}
