use crate::entity::item;
use crate::SkindexDb;
use anyhow::Result;
use chrono::Utc;
use csmarket::ItemView;
use metrics::histogram;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use sea_query::{Expr, Func, OnConflict};
use std::time::Instant;
use tracing::{info, instrument};

/// Optional exact-match filters for the paginated catalog listing.
#[derive(Debug, Default, Clone)]
pub struct ItemFilter {
    pub item_type: Option<String>,
    pub category: Option<String>,
    pub weapon: Option<String>,
    pub exterior: Option<String>,
}

#[derive(Debug)]
pub struct ItemsPageResult {
    pub items: Vec<item::Model>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl SkindexDb {
    /// Inserts or refreshes catalog entries keyed by `market_hash_name`.
    /// Rows that already exist keep their id and created_at.
    #[instrument(skip(self, views))]
    pub async fn upsert_catalog_items(&self, views: &[ItemView]) -> Result<usize> {
        let started = Instant::now();
        let now = Utc::now().naive_utc();
        for chunk in views.chunks(500) {
            let models = chunk.iter().map(|view| item::ActiveModel {
                market_hash_name: Set(view.market_hash_name.clone()),
                hash_name: Set(view.hash_name.clone()),
                nameid: Set(view.nameid),
                classid: Set(view.classid.clone()),
                exterior: Set(view.exterior.clone()),
                category: Set(view.category.clone()),
                weapon: Set(view.weapon.clone()),
                item_type: Set(view.item_type.clone()),
                quality: Set(view.quality.clone()),
                collection: Set(view.collection.clone()),
                min_float: Set(view.min_float),
                max_float: Set(view.max_float),
                icon_url: Set(view
                    .cloudflare_icon_url
                    .clone()
                    .or_else(|| view.akamai_icon_url.clone())),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            });
            item::Entity::insert_many(models)
                .on_conflict(
                    OnConflict::column(item::Column::MarketHashName)
                        .update_columns([
                            item::Column::HashName,
                            item::Column::Nameid,
                            item::Column::Classid,
                            item::Column::Exterior,
                            item::Column::Category,
                            item::Column::Weapon,
                            item::Column::ItemType,
                            item::Column::Quality,
                            item::Column::Collection,
                            item::Column::MinFloat,
                            item::Column::MaxFloat,
                            item::Column::IconUrl,
                            item::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .on_empty_do_nothing()
                .exec(&self.db)
                .await?;
        }
        histogram!("skindex_db_upsert_catalog_duration_seconds").record(started.elapsed());
        info!("synced {} catalog items", views.len());
        Ok(views.len())
    }

    #[instrument(skip(self))]
    pub async fn get_item_by_id(&self, item_id: i32) -> Result<Option<item::Model>> {
        Ok(item::Entity::find_by_id(item_id).one(&self.db).await?)
    }

    pub async fn get_items_by_ids(&self, item_ids: &[i32]) -> Result<Vec<item::Model>> {
        if item_ids.is_empty() {
            return Ok(vec![]);
        }
        Ok(item::Entity::find()
            .filter(item::Column::Id.is_in(item_ids.iter().copied()))
            .all(&self.db)
            .await?)
    }

    /// Pages through the catalog in id order. `page` starts at 1.
    #[instrument(skip(self))]
    pub async fn get_items_paginated(
        &self,
        filter: &ItemFilter,
        page: u64,
        limit: u64,
    ) -> Result<ItemsPageResult> {
        let page = page.max(1);
        let limit = limit.clamp(1, 500);
        let mut query = item::Entity::find();
        if let Some(item_type) = &filter.item_type {
            query = query.filter(item::Column::ItemType.eq(item_type));
        }
        if let Some(category) = &filter.category {
            query = query.filter(item::Column::Category.eq(category));
        }
        if let Some(weapon) = &filter.weapon {
            query = query.filter(item::Column::Weapon.eq(weapon));
        }
        if let Some(exterior) = &filter.exterior {
            query = query.filter(item::Column::Exterior.eq(exterior));
        }
        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_asc(item::Column::Id)
            .offset((page - 1) * limit)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(ItemsPageResult {
            items,
            total,
            page,
            limit,
        })
    }

    /// Case-insensitive substring search over both name columns.
    /// Prefix matches sort ahead of the rest; the ranking happens in the
    /// query so a prefix match is never cut off by the limit.
    #[instrument(skip(self))]
    pub async fn search_items(&self, query: &str, limit: u64) -> Result<Vec<item::Model>> {
        let pattern = format!("%{}%", query.to_lowercase());
        let prefix_pattern = format!("{}%", query.to_lowercase());
        let items = item::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col((
                            item::Entity,
                            item::Column::MarketHashName,
                        ))))
                        .like(pattern.as_str()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col((item::Entity, item::Column::HashName))))
                            .like(pattern.as_str()),
                    ),
            )
            .order_by_desc(
                Expr::expr(Func::lower(Expr::col((
                    item::Entity,
                    item::Column::MarketHashName,
                ))))
                .like(prefix_pattern.as_str()),
            )
            .order_by_asc(item::Column::MarketHashName)
            .limit(limit.clamp(1, 100))
            .all(&self.db)
            .await?;
        Ok(items)
    }
}
