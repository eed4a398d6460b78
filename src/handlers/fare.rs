use axum::{extract::State, Json};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::truck_category::{self, TruckType};
use crate::error::AppResult;
use crate::fare::{FareQuote, Urgency};
use crate::utils::geo::Coordinates;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationPayload {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

impl LocationPayload {
    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Deserialize)]
pub struct FareQuoteRequest {
    pub origin: LocationPayload,
    pub destination: LocationPayload,
    pub truck_type: TruckType,
    pub weight_tons: Option<f64>,
    #[serde(default)]
    pub urgency: Urgency,
}

#[derive(Debug, Serialize)]
pub struct TruckCategoryInfo {
    pub id: Uuid,
    pub name: String,
    pub truck_type: TruckType,
    pub capacity_tons: f64,
    pub base_price_per_km: f64,
}

/// Compute a fare quote for a trip
pub async fn quote_fare(
    State(state): State<AppState>,
    Json(payload): Json<FareQuoteRequest>,
) -> AppResult<Json<FareQuote>> {
    let quote = state
        .fare
        .quote(
            payload.origin.coordinates(),
            payload.destination.coordinates(),
            payload.truck_type,
            payload.weight_tons,
            payload.urgency,
        )
        .await?;

    Ok(Json(quote))
}

/// List active truck categories for client display
pub async fn list_truck_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TruckCategoryInfo>>> {
    let categories = truck_category::Entity::find()
        .filter(truck_category::Column::IsActive.eq(true))
        .all(&state.db)
        .await?;

    let responses: Vec<TruckCategoryInfo> = categories
        .into_iter()
        .map(|c| TruckCategoryInfo {
            id: c.id,
            name: c.name,
            truck_type: c.truck_type,
            capacity_tons: c.capacity_tons,
            base_price_per_km: c.base_price_per_km,
        })
        .collect();

    Ok(Json(responses))
}
