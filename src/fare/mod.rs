pub mod category;
pub mod provider;

use std::sync::Arc;

use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::truck_category::TruckType;
use crate::error::AppError;
use crate::utils::geo::{haversine_distance_km, Coordinates};

pub use category::{CategoryRecord, CategoryStore, InMemoryCategoryStore, SeaOrmCategoryStore};
pub use provider::{DistanceProvider, MapsClient, ProviderError, RouteEstimate};

/// Fallback speed assumption when no mapping provider supplies a duration.
const FALLBACK_SPEED_KMH: f64 = 30.0;

/// Requested delivery priority, scaling the fare.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
    Emergency,
}

impl Urgency {
    pub fn multiplier(self) -> f64 {
        match self {
            Urgency::Normal => 1.0,
            Urgency::Urgent => 1.3,
            Urgency::Emergency => 1.8,
        }
    }
}

/// Tiered weight multiplier. No weight given means the lowest tier.
pub fn weight_multiplier(weight_tons: Option<f64>) -> f64 {
    match weight_tons {
        None => 1.0,
        Some(w) if w <= 1.0 => 1.0,
        Some(w) if w <= 3.0 => 1.2,
        Some(w) if w <= 5.0 => 1.5,
        Some(w) if w <= 10.0 => 2.0,
        Some(_) => 2.5,
    }
}

/// Which path produced the distance in a quote.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    Provider,
    Haversine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareBreakdown {
    pub distance_cost: f64,
    pub weight_cost: f64,
    pub urgency_cost: f64,
}

/// A computed fare. Derived deterministically from its inputs; not
/// persisted by this service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareQuote {
    pub distance_km: f64,
    pub duration_min: f64,
    pub base_fare: f64,
    pub weight_multiplier: f64,
    pub urgency_multiplier: f64,
    pub total_fare: f64,
    pub breakdown: FareBreakdown,
    pub distance_source: DistanceSource,
}

#[derive(Debug, Error)]
pub enum FareError {
    #[error("No active truck category for type {0:?}")]
    CategoryNotFound(TruckType),
    #[error("Coordinate out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("Weight must be non-negative, got {0}")]
    InvalidWeight(f64),
    #[error("Category store error: {0}")]
    Store(#[from] DbErr),
}

impl From<FareError> for AppError {
    fn from(err: FareError) -> Self {
        match err {
            FareError::Store(db_err) => AppError::Internal(format!("Category store: {}", db_err)),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

/// Round to two decimals, half away from zero (`f64::round` semantics).
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// The pure fare formula: base rate times distance, scaled by weight and
/// urgency, with the scaling broken out against a multiplier-1 baseline.
pub fn compute_fare(
    base_price_per_km: f64,
    estimate: RouteEstimate,
    source: DistanceSource,
    weight_tons: Option<f64>,
    urgency: Urgency,
) -> FareQuote {
    let weight_mult = weight_multiplier(weight_tons);
    let urgency_mult = urgency.multiplier();

    let distance_cost = estimate.distance_km * base_price_per_km;
    let weight_cost = distance_cost * (weight_mult - 1.0);
    let urgency_cost = distance_cost * (urgency_mult - 1.0);
    let total_fare = round2(distance_cost + weight_cost + urgency_cost);

    FareQuote {
        distance_km: estimate.distance_km,
        duration_min: estimate.duration_min,
        base_fare: round2(distance_cost),
        weight_multiplier: weight_mult,
        urgency_multiplier: urgency_mult,
        total_fare,
        breakdown: FareBreakdown {
            distance_cost: round2(distance_cost),
            weight_cost: round2(weight_cost),
            urgency_cost: round2(urgency_cost),
        },
        distance_source: source,
    }
}

/// Orchestrates a quote: category lookup, distance resolution, then the
/// pure formula. Both collaborators are injected.
#[derive(Clone)]
pub struct FareService {
    categories: Arc<dyn CategoryStore>,
    provider: Option<Arc<dyn DistanceProvider>>,
}

impl FareService {
    pub fn new(
        categories: Arc<dyn CategoryStore>,
        provider: Option<Arc<dyn DistanceProvider>>,
    ) -> Self {
        Self {
            categories,
            provider,
        }
    }

    pub async fn quote(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        truck_type: TruckType,
        weight_tons: Option<f64>,
        urgency: Urgency,
    ) -> Result<FareQuote, FareError> {
        for point in [origin, destination] {
            if !point.in_range() {
                return Err(FareError::InvalidCoordinate {
                    latitude: point.latitude,
                    longitude: point.longitude,
                });
            }
        }

        if let Some(w) = weight_tons {
            if w < 0.0 || !w.is_finite() {
                return Err(FareError::InvalidWeight(w));
            }
        }

        let category = self
            .categories
            .find_active(truck_type)
            .await?
            .ok_or(FareError::CategoryNotFound(truck_type))?;

        let (estimate, source) = self.resolve_route(origin, destination).await;

        Ok(compute_fare(
            category.base_price_per_km,
            estimate,
            source,
            weight_tons,
            urgency,
        ))
    }

    /// Try the mapping provider when one is configured; any failure falls
    /// back to Haversine with a 30 km/h duration estimate. Provider errors
    /// are logged, never returned.
    async fn resolve_route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> (RouteEstimate, DistanceSource) {
        if let Some(provider) = &self.provider {
            match provider.estimate(origin, destination).await {
                Ok(estimate) => return (estimate, DistanceSource::Provider),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "Mapping provider failed, falling back to haversine distance"
                    );
                }
            }
        }

        let distance_km = haversine_distance_km(origin, destination);
        let duration_min = distance_km * 60.0 / FALLBACK_SPEED_KMH;

        (
            RouteEstimate {
                distance_km,
                duration_min,
            },
            DistanceSource::Haversine,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn gulshan() -> Coordinates {
        Coordinates::new(23.7803, 90.4168)
    }

    fn mirpur() -> Coordinates {
        Coordinates::new(23.8260, 90.3800)
    }

    fn store_with_pickup() -> Arc<dyn CategoryStore> {
        Arc::new(InMemoryCategoryStore::new().with_category(
            CategoryRecord {
                name: "Pickup".to_string(),
                truck_type: TruckType::Pickup,
                capacity_tons: 3.0,
                base_price_per_km: 40.0,
            },
            true,
        ))
    }

    /// Provider that always answers with a fixed estimate.
    struct FixedProvider(RouteEstimate);

    #[async_trait]
    impl DistanceProvider for FixedProvider {
        async fn estimate(
            &self,
            _origin: Coordinates,
            _destination: Coordinates,
        ) -> Result<RouteEstimate, ProviderError> {
            Ok(self.0)
        }
    }

    /// Provider that always fails, exercising the fallback path.
    struct FailingProvider;

    #[async_trait]
    impl DistanceProvider for FailingProvider {
        async fn estimate(
            &self,
            _origin: Coordinates,
            _destination: Coordinates,
        ) -> Result<RouteEstimate, ProviderError> {
            Err(ProviderError::Status(503))
        }
    }

    #[test]
    fn test_weight_multiplier_tiers() {
        assert_eq!(weight_multiplier(None), 1.0);
        assert_eq!(weight_multiplier(Some(0.5)), 1.0);
        assert_eq!(weight_multiplier(Some(1.0)), 1.0);
        assert_eq!(weight_multiplier(Some(2.0)), 1.2);
        assert_eq!(weight_multiplier(Some(3.0)), 1.2);
        assert_eq!(weight_multiplier(Some(4.5)), 1.5);
        assert_eq!(weight_multiplier(Some(5.0)), 1.5);
        assert_eq!(weight_multiplier(Some(8.0)), 2.0);
        assert_eq!(weight_multiplier(Some(10.0)), 2.0);
        assert_eq!(weight_multiplier(Some(10.1)), 2.5);
    }

    #[test]
    fn test_urgency_multipliers() {
        assert_eq!(Urgency::Normal.multiplier(), 1.0);
        assert_eq!(Urgency::Urgent.multiplier(), 1.3);
        assert_eq!(Urgency::Emergency.multiplier(), 1.8);
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        // 86.625 is exactly representable in binary, so this probes the
        // rounding mode rather than float noise
        assert_eq!(round2(86.625), 86.63);
        assert_eq!(round2(-86.625), -86.63);
        assert_eq!(round2(1.234), 1.23);
    }

    #[test]
    fn test_compute_fare_gulshan_mirpur_scenario() {
        // PICKUP at 40/km, provider-routed 10.5 km, 2 t cargo, normal urgency
        let quote = compute_fare(
            40.0,
            RouteEstimate {
                distance_km: 10.5,
                duration_min: 21.0,
            },
            DistanceSource::Provider,
            Some(2.0),
            Urgency::Normal,
        );

        assert_eq!(quote.breakdown.distance_cost, 420.0);
        assert_eq!(quote.breakdown.weight_cost, 84.0);
        assert_eq!(quote.breakdown.urgency_cost, 0.0);
        assert_eq!(quote.total_fare, 504.0);
        assert_eq!(quote.base_fare, 420.0);
        assert_eq!(quote.weight_multiplier, 1.2);
        assert_eq!(quote.urgency_multiplier, 1.0);
    }

    #[test]
    fn test_breakdown_reconstructs_total() {
        let quote = compute_fare(
            57.3,
            RouteEstimate {
                distance_km: 12.34,
                duration_min: 24.68,
            },
            DistanceSource::Haversine,
            Some(7.2),
            Urgency::Emergency,
        );

        let sum = quote.breakdown.distance_cost
            + quote.breakdown.weight_cost
            + quote.breakdown.urgency_cost;
        assert!((sum - quote.total_fare).abs() < 0.02, "sum {} vs total {}", sum, quote.total_fare);
    }

    #[test]
    fn test_fare_monotonic_in_distance() {
        let mut previous = 0.0;
        for distance_km in [1.0, 5.0, 12.5, 80.0, 400.0] {
            let quote = compute_fare(
                40.0,
                RouteEstimate {
                    distance_km,
                    duration_min: distance_km * 2.0,
                },
                DistanceSource::Haversine,
                None,
                Urgency::Normal,
            );
            assert!(quote.total_fare > previous);
            previous = quote.total_fare;
        }
    }

    #[test]
    fn test_urgency_ordering() {
        let estimate = RouteEstimate {
            distance_km: 10.0,
            duration_min: 20.0,
        };

        let normal = compute_fare(40.0, estimate, DistanceSource::Haversine, None, Urgency::Normal);
        let urgent = compute_fare(40.0, estimate, DistanceSource::Haversine, None, Urgency::Urgent);
        let emergency =
            compute_fare(40.0, estimate, DistanceSource::Haversine, None, Urgency::Emergency);

        assert!(urgent.total_fare > normal.total_fare);
        assert!(emergency.total_fare > urgent.total_fare);
    }

    #[test]
    fn test_weight_tiers_non_decreasing() {
        let estimate = RouteEstimate {
            distance_km: 10.0,
            duration_min: 20.0,
        };

        let mut previous = 0.0;
        for weight in [0.5, 2.0, 4.0, 8.0, 15.0] {
            let quote = compute_fare(
                40.0,
                estimate,
                DistanceSource::Haversine,
                Some(weight),
                Urgency::Normal,
            );
            assert!(quote.total_fare >= previous);
            previous = quote.total_fare;
        }
    }

    #[tokio::test]
    async fn test_quote_uses_provider_estimate() {
        let service = FareService::new(
            store_with_pickup(),
            Some(Arc::new(FixedProvider(RouteEstimate {
                distance_km: 10.5,
                duration_min: 21.0,
            }))),
        );

        let quote = service
            .quote(gulshan(), mirpur(), TruckType::Pickup, Some(2.0), Urgency::Normal)
            .await
            .unwrap();

        assert_eq!(quote.distance_source, DistanceSource::Provider);
        assert_eq!(quote.distance_km, 10.5);
        assert_eq!(quote.total_fare, 504.0);
    }

    #[tokio::test]
    async fn test_quote_falls_back_when_provider_fails() {
        let service = FareService::new(store_with_pickup(), Some(Arc::new(FailingProvider)));

        let quote = service
            .quote(gulshan(), mirpur(), TruckType::Pickup, None, Urgency::Normal)
            .await
            .unwrap();

        let expected = haversine_distance_km(gulshan(), mirpur());
        assert_eq!(quote.distance_source, DistanceSource::Haversine);
        assert_eq!(quote.distance_km, expected);
        assert!((quote.duration_min - expected * 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_quote_without_provider_uses_haversine() {
        let service = FareService::new(store_with_pickup(), None);

        let quote = service
            .quote(gulshan(), mirpur(), TruckType::Pickup, None, Urgency::Normal)
            .await
            .unwrap();

        assert_eq!(quote.distance_source, DistanceSource::Haversine);
        assert_eq!(quote.distance_km, haversine_distance_km(gulshan(), mirpur()));
    }

    #[tokio::test]
    async fn test_quote_category_not_found() {
        let service = FareService::new(store_with_pickup(), None);

        let err = service
            .quote(gulshan(), mirpur(), TruckType::Lorry, None, Urgency::Normal)
            .await
            .unwrap_err();

        assert!(matches!(err, FareError::CategoryNotFound(TruckType::Lorry)));
    }

    #[tokio::test]
    async fn test_quote_inactive_category_not_found() {
        let store = InMemoryCategoryStore::new().with_category(
            CategoryRecord {
                name: "Lorry".to_string(),
                truck_type: TruckType::Lorry,
                capacity_tons: 7.0,
                base_price_per_km: 60.0,
            },
            false,
        );
        let service = FareService::new(Arc::new(store), None);

        let err = service
            .quote(gulshan(), mirpur(), TruckType::Lorry, None, Urgency::Normal)
            .await
            .unwrap_err();

        assert!(matches!(err, FareError::CategoryNotFound(TruckType::Lorry)));
    }

    #[tokio::test]
    async fn test_quote_rejects_out_of_range_coordinates() {
        let service = FareService::new(store_with_pickup(), None);

        let err = service
            .quote(
                Coordinates::new(95.0, 90.4),
                mirpur(),
                TruckType::Pickup,
                None,
                Urgency::Normal,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, FareError::InvalidCoordinate { .. }));
    }

    #[tokio::test]
    async fn test_quote_rejects_negative_weight() {
        let service = FareService::new(store_with_pickup(), None);

        let err = service
            .quote(gulshan(), mirpur(), TruckType::Pickup, Some(-2.0), Urgency::Normal)
            .await
            .unwrap_err();

        assert!(matches!(err, FareError::InvalidWeight(_)));
    }
}
