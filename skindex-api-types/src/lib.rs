mod index;
mod item;
mod price;

pub mod result;

pub use index::{
    CreateIndex, IndexDetail, IndexItemSummary, IndexList, IndexSummary, IndexType, UpdateIndex,
};
pub use item::{Item, ItemSearchResults, ItemsPage};
pub use price::{
    CalculationResult, LatestPrice, ListingsHistory, ListingsHistoryPoint, PriceHistory, PricePoint,
};
