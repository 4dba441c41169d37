pub mod index_item;
pub mod item;
pub mod price_index;
pub mod price_point;
