//! Restaurant and NGO lists, fetched once per view activation.

use surplus_api::SurplusApi;
use surplus_core::{EntityId, GeoPoint, Ngo, Restaurant};
use tracing::{info, warn};

/// Map centre used until a restaurant is loaded (Tamil Nadu).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(11.1271, 78.6569);

/// Read-only copies of the service's restaurants and NGOs, in service order.
///
/// A failed fetch leaves the corresponding list empty. Callers cannot tell
/// "not loaded yet" from "fetch failed", and should not need to.
#[derive(Debug, Default)]
pub struct EntityCache {
    restaurants: Vec<Restaurant>,
    ngos: Vec<Ngo>,
    loaded: bool,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch both lists on first activation; later activations are no-ops.
    pub async fn activate(&mut self, api: &dyn SurplusApi) {
        if !self.loaded {
            self.refresh(api).await;
        }
    }

    /// Re-fetch both lists unconditionally.
    pub async fn refresh(&mut self, api: &dyn SurplusApi) {
        let (restaurants, ngos) = futures::join!(api.restaurants(), api.ngos());

        self.restaurants = restaurants.unwrap_or_else(|err| {
            warn!(error = %err, "restaurant fetch failed");
            Vec::new()
        });
        self.ngos = ngos.unwrap_or_else(|err| {
            warn!(error = %err, "NGO fetch failed");
            Vec::new()
        });
        self.loaded = true;

        info!(
            restaurants = self.restaurants.len(),
            ngos = self.ngos.len(),
            "entity cache loaded"
        );
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn ngos(&self) -> &[Ngo] {
        &self.ngos
    }

    pub fn restaurant(&self, id: &EntityId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|r| &r.id == id)
    }

    /// First restaurant's location, else [`DEFAULT_CENTER`].
    pub fn map_center(&self) -> GeoPoint {
        self.restaurants
            .first()
            .map(Restaurant::location)
            .unwrap_or(DEFAULT_CENTER)
    }
}
