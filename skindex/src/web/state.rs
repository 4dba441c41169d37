use crate::market_service::MarketPriceService;
use crate::price_service::PriceService;
use axum::extract::FromRef;
use skindex_db::SkindexDb;

#[derive(Clone)]
pub struct WebState {
    pub db: SkindexDb,
    pub market: MarketPriceService,
    pub prices: PriceService,
}

impl FromRef<WebState> for SkindexDb {
    fn from_ref(state: &WebState) -> Self {
        state.db.clone()
    }
}

impl FromRef<WebState> for MarketPriceService {
    fn from_ref(state: &WebState) -> Self {
        state.market.clone()
    }
}

impl FromRef<WebState> for PriceService {
    fn from_ref(state: &WebState) -> Self {
        state.prices.clone()
    }
}
