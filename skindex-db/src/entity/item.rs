use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub market_hash_name: String,
    pub hash_name: String,
    pub nameid: Option<i32>,
    pub classid: Option<String>,
    pub exterior: Option<String>,
    pub category: Option<String>,
    pub weapon: Option<String>,
    pub item_type: Option<String>,
    pub quality: Option<String>,
    pub collection: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub min_float: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub max_float: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub icon_url: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::index_item::Entity")]
    IndexItem,
}

impl Related<super::index_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IndexItem.def()
    }
}

impl Related<super::price_index::Entity> for Entity {
    fn to() -> RelationDef {
        super::index_item::Relation::PriceIndex.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::index_item::Relation::Item.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
