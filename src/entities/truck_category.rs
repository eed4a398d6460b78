use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Truck type offered by the marketplace, keyed against the
/// admin-managed category table.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TruckType {
    #[sea_orm(string_value = "mini_truck")]
    MiniTruck,
    #[sea_orm(string_value = "pickup")]
    Pickup,
    #[sea_orm(string_value = "lorry")]
    Lorry,
    #[sea_orm(string_value = "truck")]
    Truck,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "truck_category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub truck_type: TruckType,
    pub capacity_tons: f64,
    pub base_price_per_km: f64,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
