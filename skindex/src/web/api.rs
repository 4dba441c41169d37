pub mod indices;
pub mod items;
pub mod markets;
pub mod prebuilt;
pub mod prices;
