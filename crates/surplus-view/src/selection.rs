//! Restaurant selection and the illustrative match issued for it.
//!
//! Selecting a restaurant always issues a match request with the context's
//! fixed quantities; it is never derived from a prediction. Re-selecting the
//! same restaurant issues a fresh request.
//!
//! An empty match response does not clear a previously applied result: the
//! view keeps showing the last non-empty match and reports
//! [`MatchOutcome::NoMatches`] so the caller can show a "no matches" notice.
//! Each applied result stays paired with the restaurant and request that
//! produced it, so its routes are always drawn from the right origin.

use surplus_api::{ApiError, SurplusApi};
use surplus_core::{
    EntityId, MatchRequest, MatchResult, Ngo, Restaurant, RouteLayer, ValidationError,
    render_routes,
};
use tracing::{debug, error, info};

use crate::cache::EntityCache;
use crate::tracker::{RequestTracker, ResponsePolicy, Ticket};

pub const MAP_SURPLUS_KG: f64 = 25.0;
pub const MAP_RADIUS_KM: f64 = 15.0;

pub const ROUTE_SURPLUS_MIN_KG: f64 = 5.0;
pub const ROUTE_SURPLUS_MAX_KG: f64 = 100.0;
pub const ROUTE_SURPLUS_DEFAULT_KG: f64 = 20.0;
pub const ROUTE_RADIUS_KM: f64 = 15.0;

/// Which view issues the match; decides the request quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchContext {
    /// Map view: 25 kg within 15 km.
    Map,
    /// Route planner: operator-chosen surplus (5-100 kg) within 15 km.
    Route { surplus_kg: f64 },
}

impl MatchContext {
    /// Route context with `surplus_kg` clamped into the slider range.
    pub fn route(surplus_kg: f64) -> Self {
        let surplus_kg = if surplus_kg.is_nan() {
            ROUTE_SURPLUS_DEFAULT_KG
        } else {
            surplus_kg.clamp(ROUTE_SURPLUS_MIN_KG, ROUTE_SURPLUS_MAX_KG)
        };
        MatchContext::Route { surplus_kg }
    }

    pub fn surplus_kg(&self) -> f64 {
        match self {
            MatchContext::Map => MAP_SURPLUS_KG,
            MatchContext::Route { surplus_kg } => *surplus_kg,
        }
    }

    pub fn max_distance_km(&self) -> f64 {
        match self {
            MatchContext::Map => MAP_RADIUS_KM,
            MatchContext::Route { .. } => ROUTE_RADIUS_KM,
        }
    }

    pub fn request_for(&self, restaurant_id: EntityId) -> Result<MatchRequest, ValidationError> {
        MatchRequest::new(restaurant_id, self.surplus_kg(), self.max_distance_km())
    }
}

/// A match result together with what it was requested for.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMatch {
    pub restaurant: Restaurant,
    pub request: MatchRequest,
    pub result: MatchResult,
}

/// A request issued by [`MatchCoordinator::select`], awaiting its response.
#[derive(Debug, Clone)]
pub struct PendingMatch {
    pub ticket: Ticket<Restaurant>,
    pub request: MatchRequest,
}

/// What a match response did to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Replaced the shown result.
    Applied { matched: usize },
    /// Valid but empty; the previous result (if any) is still shown.
    NoMatches,
    /// Superseded by a later selection and dropped.
    Stale,
    /// Transport or decode failure; nothing changed.
    Failed,
}

/// Tracks the selected restaurant and the latest match shown for it.
#[derive(Debug)]
pub struct MatchCoordinator {
    context: MatchContext,
    tracker: RequestTracker,
    selected: Option<Restaurant>,
    last_match: Option<AppliedMatch>,
    last_outcome: Option<MatchOutcome>,
}

impl MatchCoordinator {
    pub fn new(context: MatchContext, policy: ResponsePolicy) -> Self {
        Self {
            context,
            tracker: RequestTracker::new(policy),
            selected: None,
            last_match: None,
            last_outcome: None,
        }
    }

    pub fn context(&self) -> MatchContext {
        self.context
    }

    /// Move the route-planner slider. Ignored in the map context.
    pub fn set_surplus_kg(&mut self, surplus_kg: f64) {
        if let MatchContext::Route { .. } = self.context {
            self.context = MatchContext::route(surplus_kg);
        }
    }

    pub fn selected(&self) -> Option<&Restaurant> {
        self.selected.as_ref()
    }

    pub fn last_match(&self) -> Option<&AppliedMatch> {
        self.last_match.as_ref()
    }

    pub fn last_outcome(&self) -> Option<MatchOutcome> {
        self.last_outcome
    }

    /// Select `restaurant` and build the match request to send for it.
    pub fn select(&mut self, restaurant: Restaurant) -> Result<PendingMatch, ValidationError> {
        let request = self.context.request_for(restaurant.id.clone())?;
        debug!(restaurant_id = %restaurant.id, "restaurant selected");
        self.selected = Some(restaurant.clone());
        Ok(PendingMatch {
            ticket: self.tracker.issue(restaurant),
            request,
        })
    }

    /// Apply the response to a previously issued request.
    pub fn apply(
        &mut self,
        pending: PendingMatch,
        response: Result<MatchResult, ApiError>,
    ) -> MatchOutcome {
        if !self.tracker.admits(&pending.ticket) {
            debug!(
                restaurant_id = %pending.request.restaurant_id,
                generation = pending.ticket.generation(),
                "dropping superseded match response"
            );
            return MatchOutcome::Stale;
        }

        let outcome = match response {
            Err(err) => {
                error!(
                    restaurant_id = %pending.request.restaurant_id,
                    error = %err,
                    "match request failed"
                );
                MatchOutcome::Failed
            }
            Ok(result) if !result.has_matches() => {
                info!(restaurant_id = %pending.request.restaurant_id, "no NGOs matched");
                MatchOutcome::NoMatches
            }
            Ok(result) => {
                let matched = result.matched_ngos.len();
                self.last_match = Some(AppliedMatch {
                    restaurant: pending.ticket.into_key(),
                    request: pending.request,
                    result,
                });
                MatchOutcome::Applied { matched }
            }
        };
        self.last_outcome = Some(outcome);
        outcome
    }

    /// Select `restaurant`, send its match request and apply the response.
    pub async fn select_and_match(
        &mut self,
        api: &dyn SurplusApi,
        restaurant: Restaurant,
    ) -> Result<MatchOutcome, ValidationError> {
        let pending = self.select(restaurant)?;
        let response = api.match_surplus(&pending.request).await;
        Ok(self.apply(pending, response))
    }

    /// Like [`select_and_match`](Self::select_and_match), looking the
    /// restaurant up in `cache` first.
    pub async fn select_by_id(
        &mut self,
        api: &dyn SurplusApi,
        cache: &EntityCache,
        id: &EntityId,
    ) -> Result<MatchOutcome, ValidationError> {
        if id.is_blank() {
            return Err(ValidationError::NoRestaurantSelected);
        }
        let restaurant = cache
            .restaurant(id)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownRestaurant(id.clone()))?;
        self.select_and_match(api, restaurant).await
    }

    /// Route layer for the shown match, re-derived on every call.
    pub fn routes(&self, ngos: &[Ngo]) -> Option<RouteLayer> {
        self.last_match
            .as_ref()
            .map(|m| render_routes(m.restaurant.location(), &m.result, ngos))
    }
}
