use crate::entity::{index_item, item, price_index};
use crate::{IndexError, SkindexDb};
use chrono::Utc;
use csmarket::{Currency, Market};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use skindex_api_types::{IndexType, UpdateIndex};
use std::collections::HashSet;
use tracing::{info, instrument};

/// Everything needed to create a new index.
#[derive(Debug, Clone)]
pub struct CreateIndexData {
    pub name: String,
    pub description: Option<String>,
    pub kind: IndexType,
    pub category: Option<String>,
    pub selected_markets: Vec<Market>,
    pub currency: Currency,
    pub item_ids: Vec<i32>,
}

/// Prebuilt index definitions, keyed by the catalog `item_type` value each
/// one tracks.
const PREBUILT_CATEGORIES: [(&str, &str, &str); 7] = [
    ("RIFLES", "Rifles Index", "Rifle"),
    ("PISTOLS", "Pistols Index", "Pistol"),
    ("SMGS", "SMGs Index", "SMG"),
    ("KNIVES", "Knives Index", "Knife"),
    ("GLOVES", "Gloves Index", "Gloves"),
    ("CASES", "Cases Index", "Container"),
    ("STICKERS", "Stickers Index", "Sticker"),
];

impl SkindexDb {
    #[instrument(skip(self, data))]
    pub async fn create_index(
        &self,
        data: CreateIndexData,
    ) -> Result<price_index::Model, IndexError> {
        if data.name.trim().is_empty() {
            return Err(IndexError::Validation("index name must not be empty".into()));
        }
        if data.selected_markets.is_empty() {
            return Err(IndexError::Validation(
                "at least one market must be selected".into(),
            ));
        }
        let item_ids = dedupe(&data.item_ids);
        self.ensure_items_exist(&item_ids).await?;
        let now = Utc::now().naive_utc();
        let index = price_index::ActiveModel {
            name: Set(data.name),
            description: Set(data.description),
            kind: Set(data.kind.as_str().to_string()),
            category: Set(data.category),
            selected_markets: Set(serde_json::to_string(&data.selected_markets)?),
            currency: Set(data.currency.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        self.replace_index_items(index.id, &item_ids).await?;
        info!("created index {} with {} items", index.id, item_ids.len());
        Ok(index)
    }

    pub async fn get_index(&self, index_id: i32) -> Result<price_index::Model, IndexError> {
        price_index::Entity::find_by_id(index_id)
            .one(&self.db)
            .await?
            .ok_or(IndexError::NotFound(index_id))
    }

    #[instrument(skip(self))]
    pub async fn get_index_with_items(
        &self,
        index_id: i32,
    ) -> Result<(price_index::Model, Vec<item::Model>), IndexError> {
        price_index::Entity::find_by_id(index_id)
            .find_with_related(item::Entity)
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .next()
            .ok_or(IndexError::NotFound(index_id))
    }

    /// All indices newest-first, each with its member items.
    #[instrument(skip(self))]
    pub async fn get_all_indices(
        &self,
        kind: Option<IndexType>,
    ) -> Result<Vec<(price_index::Model, Vec<item::Model>)>, IndexError> {
        let mut query = price_index::Entity::find();
        if let Some(kind) = kind {
            query = query.filter(price_index::Column::Kind.eq(kind.as_str()));
        }
        Ok(query
            .find_with_related(item::Entity)
            .order_by_desc(price_index::Column::CreatedAt)
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Applies only the fields present on `update`.
    #[instrument(skip(self, update))]
    pub async fn update_index(
        &self,
        index_id: i32,
        update: UpdateIndex,
    ) -> Result<price_index::Model, IndexError> {
        let index = self.get_index(index_id).await?;
        let mut active = index.into_active_model();
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(IndexError::Validation("index name must not be empty".into()));
            }
            active.name = Set(name);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(markets) = update.selected_markets {
            if markets.is_empty() {
                return Err(IndexError::Validation(
                    "at least one market must be selected".into(),
                ));
            }
            active.selected_markets = Set(serde_json::to_string(&markets)?);
        }
        if let Some(currency) = update.currency {
            active.currency = Set(currency.as_str().to_string());
        }
        active.updated_at = Set(Utc::now().naive_utc());
        let index = active.update(&self.db).await?;
        if let Some(item_ids) = update.item_ids {
            let item_ids = dedupe(&item_ids);
            self.ensure_items_exist(&item_ids).await?;
            self.replace_index_items(index.id, &item_ids).await?;
        }
        Ok(index)
    }

    /// Removes the index along with its memberships and price history.
    /// Deletes are explicit rather than relying on cascading foreign keys.
    #[instrument(skip(self))]
    pub async fn delete_index(&self, index_id: i32) -> Result<(), IndexError> {
        let index = self.get_index(index_id).await?;
        crate::entity::price_point::Entity::delete_many()
            .filter(crate::entity::price_point::Column::IndexId.eq(index.id))
            .exec(&self.db)
            .await?;
        index_item::Entity::delete_many()
            .filter(index_item::Column::IndexId.eq(index.id))
            .exec(&self.db)
            .await?;
        price_index::Entity::delete_by_id(index.id)
            .exec(&self.db)
            .await?;
        info!("deleted index {index_id}");
        Ok(())
    }

    /// Creates or refreshes one prebuilt index per item category. Existing
    /// prebuilt indices keep their id and price history; only the membership
    /// set is rebuilt from the current catalog.
    #[instrument(skip(self))]
    pub async fn generate_prebuilt_indices(&self) -> Result<Vec<price_index::Model>, IndexError> {
        let mut generated = Vec::with_capacity(PREBUILT_CATEGORIES.len());
        for (category, name, item_type) in PREBUILT_CATEGORIES {
            let item_ids: Vec<i32> = item::Entity::find()
                .filter(item::Column::ItemType.eq(item_type))
                .order_by_asc(item::Column::Id)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|i| i.id)
                .collect();
            let existing = price_index::Entity::find()
                .filter(price_index::Column::Kind.eq(IndexType::Prebuilt.as_str()))
                .filter(price_index::Column::Category.eq(category))
                .one(&self.db)
                .await?;
            let index = match existing {
                Some(index) => {
                    let mut active = index.into_active_model();
                    active.updated_at = Set(Utc::now().naive_utc());
                    active.update(&self.db).await?
                }
                None => {
                    let now = Utc::now().naive_utc();
                    price_index::ActiveModel {
                        name: Set(name.to_string()),
                        description: Set(Some(format!(
                            "All {} items",
                            item_type.to_lowercase()
                        ))),
                        kind: Set(IndexType::Prebuilt.as_str().to_string()),
                        category: Set(Some(category.to_string())),
                        selected_markets: Set(serde_json::to_string(&vec![
                            Market::SteamCommunity,
                        ])?),
                        currency: Set(Currency::Usd.as_str().to_string()),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&self.db)
                    .await?
                }
            };
            self.replace_index_items(index.id, &item_ids).await?;
            info!(
                "prebuilt index {category} now tracks {} items",
                item_ids.len()
            );
            generated.push(index);
        }
        Ok(generated)
    }

    pub async fn get_prebuilt_by_category(
        &self,
        category: &str,
    ) -> Result<Option<(price_index::Model, Vec<item::Model>)>, IndexError> {
        Ok(price_index::Entity::find()
            .filter(price_index::Column::Kind.eq(IndexType::Prebuilt.as_str()))
            .filter(price_index::Column::Category.eq(category.to_ascii_uppercase()))
            .find_with_related(item::Entity)
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .next())
    }

    async fn ensure_items_exist(&self, item_ids: &[i32]) -> Result<(), IndexError> {
        if item_ids.is_empty() {
            return Ok(());
        }
        let found = item::Entity::find()
            .filter(item::Column::Id.is_in(item_ids.iter().copied()))
            .count(&self.db)
            .await?;
        if found != item_ids.len() as u64 {
            return Err(IndexError::Validation(format!(
                "{} of {} item ids do not exist",
                item_ids.len() as u64 - found,
                item_ids.len()
            )));
        }
        Ok(())
    }

    async fn replace_index_items(
        &self,
        index_id: i32,
        item_ids: &[i32],
    ) -> Result<(), IndexError> {
        index_item::Entity::delete_many()
            .filter(index_item::Column::IndexId.eq(index_id))
            .exec(&self.db)
            .await?;
        for chunk in item_ids.chunks(500) {
            let rows = chunk.iter().map(|item_id| index_item::ActiveModel {
                index_id: Set(index_id),
                item_id: Set(*item_id),
                ..Default::default()
            });
            index_item::Entity::insert_many(rows)
                .on_empty_do_nothing()
                .exec(&self.db)
                .await?;
        }
        Ok(())
    }
}

fn dedupe(item_ids: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::new();
    item_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}
