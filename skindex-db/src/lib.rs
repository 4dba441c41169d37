pub mod common_type_conversions;
pub mod entity;
mod error;
mod indices;
mod items;
mod price_points;

pub use error::IndexError;
pub use indices::CreateIndexData;
pub use items::{ItemFilter, ItemsPageResult};
pub use price_points::NewPricePoint;

use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

#[derive(Clone, Debug)]
pub struct SkindexDb {
    db: DatabaseConnection,
}

impl SkindexDb {
    pub async fn connect() -> Result<Self> {
        let url = std::env::var("DATABASE_URL")?;
        Self::connect_to(&url).await
    }

    pub async fn connect_to(url: &str) -> Result<Self> {
        let mut opt = ConnectOptions::new(url.to_string());
        if url.contains(":memory:") {
            // every pooled connection to an in-memory sqlite gets its own
            // database, so the pool has to stay at a single connection
            opt.max_connections(1);
        } else {
            opt.max_connections(90).min_connections(0);
        }
        let db = Database::connect(opt).await?;
        info!("applying pending migrations");
        Migrator::up(&db, None).await?;
        Ok(Self { db })
    }
}
