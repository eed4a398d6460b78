use axum::{
    extract::{Path, State},
    Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::truck_category::{self, TruckType};
use crate::error::{AppError, AppResult};
use crate::AppState;

// ============ Truck Category Management ============

#[derive(Debug, Deserialize)]
pub struct CreateTruckCategoryRequest {
    pub name: String,
    pub truck_type: TruckType,
    pub capacity_tons: f64,
    pub base_price_per_km: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateTruckCategoryRequest {
    pub name: Option<String>,
    pub capacity_tons: Option<f64>,
    pub base_price_per_km: Option<f64>,
    pub is_active: Option<bool>,
}

fn validate_pricing(capacity_tons: f64, base_price_per_km: f64) -> AppResult<()> {
    if capacity_tons <= 0.0 || !capacity_tons.is_finite() {
        return Err(AppError::BadRequest(
            "Capacity must be a positive number of tons".to_string(),
        ));
    }
    if base_price_per_km <= 0.0 || !base_price_per_km.is_finite() {
        return Err(AppError::BadRequest(
            "Base price must be a positive amount per km".to_string(),
        ));
    }
    Ok(())
}

/// List all truck categories, including inactive ones (admin)
pub async fn list_truck_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<truck_category::Model>>> {
    let categories = truck_category::Entity::find().all(&state.db).await?;
    Ok(Json(categories))
}

/// Create a truck category (admin)
pub async fn create_truck_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateTruckCategoryRequest>,
) -> AppResult<Json<truck_category::Model>> {
    validate_pricing(payload.capacity_tons, payload.base_price_per_km)?;

    // One category per truck type
    let existing = truck_category::Entity::find()
        .filter(truck_category::Column::TruckType.eq(payload.truck_type))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "A category for {:?} already exists",
            payload.truck_type
        )));
    }

    let category = truck_category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        truck_type: Set(payload.truck_type),
        capacity_tons: Set(payload.capacity_tons),
        base_price_per_km: Set(payload.base_price_per_km),
        is_active: Set(payload.is_active),
        ..Default::default()
    };

    let result = category.insert(&state.db).await?;
    Ok(Json(result))
}

/// Update a truck category (admin)
pub async fn update_truck_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTruckCategoryRequest>,
) -> AppResult<Json<truck_category::Model>> {
    let category = truck_category::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Truck category not found".to_string()))?;

    let capacity = payload.capacity_tons.unwrap_or(category.capacity_tons);
    let base_price = payload
        .base_price_per_km
        .unwrap_or(category.base_price_per_km);
    validate_pricing(capacity, base_price)?;

    let mut active: truck_category::ActiveModel = category.into();

    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(capacity_tons) = payload.capacity_tons {
        active.capacity_tons = Set(capacity_tons);
    }
    if let Some(base_price_per_km) = payload.base_price_per_km {
        active.base_price_per_km = Set(base_price_per_km);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }

    let result = active.update(&state.db).await?;
    Ok(Json(result))
}

/// Delete a truck category (admin)
pub async fn delete_truck_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = truck_category::Entity::delete_by_id(id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Truck category not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Truck category deleted" })))
}
