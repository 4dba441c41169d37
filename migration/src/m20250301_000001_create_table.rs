use sea_orm_migration::{prelude::*, sea_query::ColumnDef};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Item::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Item::Id)
                            .integer()
                            .auto_increment()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Item::MarketHashName)
                            .string()
                            .unique_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Item::HashName).string().not_null())
                    .col(ColumnDef::new(Item::Nameid).integer())
                    .col(ColumnDef::new(Item::Classid).string())
                    .col(ColumnDef::new(Item::Exterior).string())
                    .col(ColumnDef::new(Item::Category).string())
                    .col(ColumnDef::new(Item::Weapon).string())
                    .col(ColumnDef::new(Item::ItemType).string())
                    .col(ColumnDef::new(Item::Quality).string())
                    .col(ColumnDef::new(Item::Collection).string())
                    .col(ColumnDef::new(Item::MinFloat).double())
                    .col(ColumnDef::new(Item::MaxFloat).double())
                    .col(ColumnDef::new(Item::IconUrl).text())
                    .col(ColumnDef::new(Item::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Item::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(PriceIndex::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PriceIndex::Id)
                            .integer()
                            .auto_increment()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PriceIndex::Name).string().not_null())
                    .col(ColumnDef::new(PriceIndex::Description).text())
                    .col(ColumnDef::new(PriceIndex::Kind).string().not_null())
                    .col(ColumnDef::new(PriceIndex::Category).string())
                    .col(
                        ColumnDef::new(PriceIndex::SelectedMarkets)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PriceIndex::Currency).string().not_null())
                    .col(ColumnDef::new(PriceIndex::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(PriceIndex::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;
        // foreign keys are declared inline so the schema also applies on sqlite
        manager
            .create_table(
                Table::create()
                    .table(IndexItem::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IndexItem::Id)
                            .integer()
                            .auto_increment()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IndexItem::IndexId).integer().not_null())
                    .col(ColumnDef::new(IndexItem::ItemId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(IndexItem::Table, IndexItem::IndexId)
                            .to(PriceIndex::Table, PriceIndex::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(IndexItem::Table, IndexItem::ItemId)
                            .to(Item::Table, Item::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(PricePoint::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricePoint::Id)
                            .integer()
                            .auto_increment()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PricePoint::IndexId).integer().not_null())
                    .col(ColumnDef::new(PricePoint::Timestamp).timestamp().not_null())
                    .col(
                        ColumnDef::new(PricePoint::ValueCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PricePoint::Currency).string().not_null())
                    .col(ColumnDef::new(PricePoint::ItemCount).integer().not_null())
                    .col(
                        ColumnDef::new(PricePoint::ItemsSucceeded)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PricePoint::ItemsFailed).integer().not_null())
                    .col(ColumnDef::new(PricePoint::MarketsUsed).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(PricePoint::Table, PricePoint::IndexId)
                            .to(PriceIndex::Table, PriceIndex::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                IndexCreateStatement::new()
                    .table(IndexItem::Table)
                    .name("UniqueIndexItem")
                    .col(IndexItem::IndexId)
                    .col(IndexItem::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PricePoint::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IndexItem::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PriceIndex::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Item::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Item {
    Table,
    Id,
    MarketHashName,
    HashName,
    Nameid,
    Classid,
    Exterior,
    Category,
    Weapon,
    ItemType,
    Quality,
    Collection,
    MinFloat,
    MaxFloat,
    IconUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum PriceIndex {
    Table,
    Id,
    Name,
    Description,
    Kind,
    Category,
    SelectedMarkets,
    Currency,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum IndexItem {
    Table,
    Id,
    IndexId,
    ItemId,
}

#[derive(Iden)]
pub(crate) enum PricePoint {
    Table,
    Id,
    IndexId,
    Timestamp,
    ValueCents,
    Currency,
    ItemCount,
    ItemsSucceeded,
    ItemsFailed,
    MarketsUsed,
}
