use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_index")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub kind: String,
    pub category: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub selected_markets: String,
    pub currency: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::index_item::Entity")]
    IndexItem,
    #[sea_orm(has_many = "super::price_point::Entity")]
    PricePoint,
}

impl Related<super::index_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IndexItem.def()
    }
}

impl Related<super::price_point::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricePoint.def()
    }
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        super::index_item::Relation::Item.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::index_item::Relation::PriceIndex.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
