//! Match requests and the allocations the service returns for them.

use serde::{Deserialize, Serialize};

use crate::wire::null_as_default;
use crate::{EntityId, GeoPoint, ValidationError};

/// Body of `POST match`. Built per request, never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub restaurant_id: EntityId,
    pub surplus_kg: f64,
    pub max_distance_km: f64,
}

impl MatchRequest {
    /// Build a request, rejecting non-positive or non-finite quantities.
    pub fn new(
        restaurant_id: EntityId,
        surplus_kg: f64,
        max_distance_km: f64,
    ) -> Result<Self, ValidationError> {
        if restaurant_id.is_blank() {
            return Err(ValidationError::NoRestaurantSelected);
        }
        positive("surplus_kg", surplus_kg)?;
        positive("max_distance_km", max_distance_km)?;
        Ok(Self {
            restaurant_id,
            surplus_kg,
            max_distance_km,
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(())
}

/// One NGO in a match, in the service's allocation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedNgo {
    pub ngo_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance_km: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub allocated_kg: f64,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl MatchedNgo {
    /// Drop-off coordinate, when the service included one.
    pub fn location(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_distance_km: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub estimated_time_minutes: f64,
}

/// Response of `POST match`.
///
/// `matched_ngos` keeps the exact order received. It is never re-sorted:
/// the position is the stop number.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub matched_ngos: Vec<MatchedNgo>,
    #[serde(default)]
    pub route_info: Option<RouteInfo>,
    #[serde(default)]
    pub total_allocated_kg: Option<f64>,
}

/// Headline numbers for a match; absent values read as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub total_distance_km: f64,
    pub estimated_time_minutes: f64,
    pub stops: usize,
    pub allocated_kg: f64,
}

impl MatchResult {
    pub fn has_matches(&self) -> bool {
        !self.matched_ngos.is_empty()
    }

    pub fn summary(&self) -> RouteSummary {
        let info = self.route_info.unwrap_or_default();
        RouteSummary {
            total_distance_km: info.total_distance_km,
            estimated_time_minutes: info.estimated_time_minutes,
            stops: self.matched_ngos.len(),
            allocated_kg: self.total_allocated_kg.unwrap_or(0.0),
        }
    }
}
