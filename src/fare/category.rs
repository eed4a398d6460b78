use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::entities::truck_category::{self, TruckType};

/// The slice of an admin-managed truck category the fare engine needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecord {
    pub name: String,
    pub truck_type: TruckType,
    pub capacity_tons: f64,
    pub base_price_per_km: f64,
}

/// Keyed read against the category reference data. Injected into the fare
/// service so tests can substitute an in-memory store for the database.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Returns the active category for the given truck type, or `None` when
    /// the type is unknown or the category has been deactivated.
    async fn find_active(&self, truck_type: TruckType) -> Result<Option<CategoryRecord>, DbErr>;
}

/// Category store backed by the `truck_category` table.
#[derive(Clone)]
pub struct SeaOrmCategoryStore {
    db: DatabaseConnection,
}

impl SeaOrmCategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryStore for SeaOrmCategoryStore {
    async fn find_active(&self, truck_type: TruckType) -> Result<Option<CategoryRecord>, DbErr> {
        let category = truck_category::Entity::find()
            .filter(truck_category::Column::TruckType.eq(truck_type))
            .filter(truck_category::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        Ok(category.map(|c| CategoryRecord {
            name: c.name,
            truck_type: c.truck_type,
            capacity_tons: c.capacity_tons,
            base_price_per_km: c.base_price_per_km,
        }))
    }
}

/// In-memory category store for tests and offline use.
#[derive(Clone, Default)]
pub struct InMemoryCategoryStore {
    categories: Vec<(CategoryRecord, bool)>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, record: CategoryRecord, is_active: bool) -> Self {
        self.categories.push((record, is_active));
        self
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn find_active(&self, truck_type: TruckType) -> Result<Option<CategoryRecord>, DbErr> {
        Ok(self
            .categories
            .iter()
            .find(|(record, is_active)| *is_active && record.truck_type == truck_type)
            .map(|(record, _)| record.clone()))
    }
}
