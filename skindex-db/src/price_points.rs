use crate::entity::price_point;
use crate::{IndexError, SkindexDb};
use chrono::NaiveDateTime;
use csmarket::{Currency, Market};
use metrics::histogram;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use std::time::Instant;
use tracing::instrument;

/// A freshly calculated aggregate value ready to be recorded.
#[derive(Debug, Clone)]
pub struct NewPricePoint {
    pub index_id: i32,
    pub timestamp: NaiveDateTime,
    pub value_cents: i64,
    pub currency: Currency,
    pub item_count: i32,
    pub items_succeeded: i32,
    pub items_failed: i32,
    pub markets_used: Vec<Market>,
}

impl SkindexDb {
    #[instrument(skip(self, point))]
    pub async fn record_price_point(
        &self,
        point: NewPricePoint,
    ) -> Result<price_point::Model, IndexError> {
        let started = Instant::now();
        let model = price_point::ActiveModel {
            index_id: Set(point.index_id),
            timestamp: Set(point.timestamp),
            value_cents: Set(point.value_cents),
            currency: Set(point.currency.as_str().to_string()),
            item_count: Set(point.item_count),
            items_succeeded: Set(point.items_succeeded),
            items_failed: Set(point.items_failed),
            markets_used: Set(serde_json::to_string(&point.markets_used)?),
            ..Default::default()
        };
        let inserted = price_point::Entity::insert(model)
            .exec_with_returning(&self.db)
            .await?;
        histogram!("skindex_db_record_price_point_duration_seconds").record(started.elapsed());
        Ok(inserted)
    }

    /// History points for an index in chronological order. Ties on timestamp
    /// fall back to insertion order so the sequence is stable.
    #[instrument(skip(self))]
    pub async fn get_price_history(
        &self,
        index_id: i32,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        limit: Option<u64>,
    ) -> Result<Vec<price_point::Model>, IndexError> {
        // surface NotFound rather than an empty history for unknown ids
        self.get_index(index_id).await?;
        let mut query = price_point::Entity::find()
            .filter(price_point::Column::IndexId.eq(index_id))
            .order_by_asc(price_point::Column::Timestamp)
            .order_by_asc(price_point::Column::Id);
        if let Some(start) = start {
            query = query.filter(price_point::Column::Timestamp.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(price_point::Column::Timestamp.lte(end));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        Ok(query.all(&self.db).await?)
    }

    pub async fn get_latest_price_point(
        &self,
        index_id: i32,
    ) -> Result<Option<price_point::Model>, IndexError> {
        Ok(price_point::Entity::find()
            .filter(price_point::Column::IndexId.eq(index_id))
            .order_by_desc(price_point::Column::Timestamp)
            .order_by_desc(price_point::Column::Id)
            .one(&self.db)
            .await?)
    }
}
