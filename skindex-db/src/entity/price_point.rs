use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_point")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub index_id: i32,
    pub timestamp: DateTime,
    pub value_cents: i64,
    pub currency: String,
    pub item_count: i32,
    pub items_succeeded: i32,
    pub items_failed: i32,
    #[sea_orm(column_type = "Text")]
    pub markets_used: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::price_index::Entity",
        from = "Column::IndexId",
        to = "super::price_index::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    PriceIndex,
}

impl Related<super::price_index::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceIndex.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
