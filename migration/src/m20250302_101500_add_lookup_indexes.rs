use crate::m20250301_000001_create_table::{Item, PricePoint};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                IndexCreateStatement::new()
                    .table(PricePoint::Table)
                    .name("IndexTimestampIndex")
                    .col(PricePoint::IndexId)
                    .col(PricePoint::Timestamp)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                IndexCreateStatement::new()
                    .table(Item::Table)
                    .name("ItemTypeCategoryIndex")
                    .col(Item::ItemType)
                    .col(Item::Category)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                IndexDropStatement::new()
                    .table(PricePoint::Table)
                    .name("IndexTimestampIndex")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                IndexDropStatement::new()
                    .table(Item::Table)
                    .name("ItemTypeCategoryIndex")
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
