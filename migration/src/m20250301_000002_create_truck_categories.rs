use sea_orm_migration::{prelude::*, schema::*};
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TruckCategory::Table)
                    .if_not_exists()
                    .col(uuid(TruckCategory::Id).primary_key())
                    .col(string_len(TruckCategory::Name, 50).not_null().unique_key())
                    .col(
                        string_len(TruckCategory::TruckType, 20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(double(TruckCategory::CapacityTons).not_null())
                    .col(double(TruckCategory::BasePricePerKm).not_null())
                    .col(boolean(TruckCategory::IsActive).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(TruckCategory::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed the four truck categories
        let insert = Query::insert()
            .into_table(TruckCategory::Table)
            .columns([
                TruckCategory::Id,
                TruckCategory::Name,
                TruckCategory::TruckType,
                TruckCategory::CapacityTons,
                TruckCategory::BasePricePerKm,
                TruckCategory::IsActive,
            ])
            .values_panic([
                Uuid::new_v4().into(),
                "Mini Truck".into(),
                "mini_truck".into(),
                (1.0).into(),
                (30.0).into(),
                true.into(),
            ])
            .values_panic([
                Uuid::new_v4().into(),
                "Pickup".into(),
                "pickup".into(),
                (3.0).into(),
                (40.0).into(),
                true.into(),
            ])
            .values_panic([
                Uuid::new_v4().into(),
                "Lorry".into(),
                "lorry".into(),
                (7.0).into(),
                (60.0).into(),
                true.into(),
            ])
            .values_panic([
                Uuid::new_v4().into(),
                "Truck".into(),
                "truck".into(),
                (16.0).into(),
                (80.0).into(),
                true.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TruckCategory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TruckCategory {
    Table,
    Id,
    Name,
    TruckType,
    CapacityTons,
    BasePricePerKm,
    IsActive,
    CreatedAt,
}
