use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "index_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub index_id: i32,
    pub item_id: i32,
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
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Item,
}

impl Related<super::price_index::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceIndex.def()
    }
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
