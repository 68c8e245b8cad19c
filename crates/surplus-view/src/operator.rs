use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use surplus_api::SurplusApi;
use surplus_core::{
    DashboardStats, EntityId, HistorySummary, PredictionRequest, RouteLayer, ValidationError,
};

use crate::cache::EntityCache;
use crate::dashboard::load_dashboard;
use crate::history::HistoryView;
use crate::prediction::{PredictionError, PredictionOutcome, PredictionPanel};
use crate::selection::{MatchContext, MatchCoordinator, MatchOutcome, ROUTE_SURPLUS_DEFAULT_KG};
use crate::tracker::ResponsePolicy;

/// All view state of one operator session, owned in one place and handed to
/// renderers by reference. Dropped on teardown; nothing is persisted.
pub struct OperatorView {
    api: Arc<dyn SurplusApi>,
    pub cache: EntityCache,
    /// Map view: fixed 25 kg / 15 km matches.
    pub map: MatchCoordinator,
    /// Route planner: slider-controlled surplus.
    pub planner: MatchCoordinator,
    pub prediction: PredictionPanel,
    pub history: HistoryView,
    dashboard: Option<DashboardStats>,
}

impl OperatorView {
    pub fn new(api: Arc<dyn SurplusApi>, policy: ResponsePolicy) -> Self {
        Self {
            api,
            cache: EntityCache::new(),
            map: MatchCoordinator::new(MatchContext::Map, policy),
            planner: MatchCoordinator::new(MatchContext::route(ROUTE_SURPLUS_DEFAULT_KG), policy),
            prediction: PredictionPanel::new(policy),
            history: HistoryView::new(policy),
            dashboard: None,
        }
    }

    /// Load restaurants and NGOs if this is the first activation.
    pub async fn activate(&mut self) {
        self.cache.activate(self.api.as_ref()).await;
    }

    pub async fn refresh(&mut self) {
        self.cache.refresh(self.api.as_ref()).await;
    }

    /// Map view: select a restaurant and fetch its illustrative routes.
    pub async fn show_routes(&mut self, id: &EntityId) -> Result<MatchOutcome, ValidationError> {
        self.map
            .select_by_id(self.api.as_ref(), &self.cache, id)
            .await
    }

    /// Map view: select several restaurants in quick succession.
    ///
    /// All match requests are in flight together and each response is
    /// applied as it arrives. Outcomes are returned in arrival order.
    /// A blank or unknown id rejects the whole batch with no request sent.
    pub async fn show_routes_rapidly(
        &mut self,
        ids: &[EntityId],
    ) -> Result<Vec<MatchOutcome>, ValidationError> {
        // Resolve every id before selecting any, so a bad id leaves the map untouched.
        let restaurants = ids
            .iter()
            .map(|id| {
                if id.is_blank() {
                    return Err(ValidationError::NoRestaurantSelected);
                }
                self.cache
                    .restaurant(id)
                    .cloned()
                    .ok_or_else(|| ValidationError::UnknownRestaurant(id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut pending = Vec::with_capacity(restaurants.len());
        for restaurant in restaurants {
            pending.push(self.map.select(restaurant)?);
        }

        let api = Arc::clone(&self.api);
        let mut in_flight: FuturesUnordered<_> = pending
            .into_iter()
            .map(|p| {
                let api = api.as_ref();
                async move {
                    let response = api.match_surplus(&p.request).await;
                    (p, response)
                }
            })
            .collect();

        let mut outcomes = Vec::with_capacity(ids.len());
        while let Some((p, response)) = in_flight.next().await {
            outcomes.push(self.map.apply(p, response));
        }
        Ok(outcomes)
    }

    pub fn map_routes(&self) -> Option<RouteLayer> {
        self.map.routes(self.cache.ngos())
    }

    /// Route planner: match `surplus_kg` (clamped to the slider range).
    pub async fn plan_route(
        &mut self,
        id: &EntityId,
        surplus_kg: f64,
    ) -> Result<MatchOutcome, ValidationError> {
        self.planner.set_surplus_kg(surplus_kg);
        self.planner
            .select_by_id(self.api.as_ref(), &self.cache, id)
            .await
    }

    pub fn planner_routes(&self) -> Option<RouteLayer> {
        self.planner.routes(self.cache.ngos())
    }

    pub async fn predict(
        &mut self,
        request: PredictionRequest,
    ) -> Result<PredictionOutcome, PredictionError> {
        self.prediction.submit(self.api.as_ref(), request).await
    }

    /// Select a restaurant in the database view and load its history.
    pub async fn open_history(&mut self, id: &EntityId) -> Result<HistorySummary, ValidationError> {
        if id.is_blank() {
            return Err(ValidationError::NoRestaurantSelected);
        }
        if self.cache.restaurant(id).is_none() {
            return Err(ValidationError::UnknownRestaurant(id.clone()));
        }
        Ok(self.history.load(self.api.as_ref(), id.clone()).await)
    }

    pub async fn refresh_dashboard(&mut self) -> Option<&DashboardStats> {
        self.dashboard = load_dashboard(self.api.as_ref()).await;
        self.dashboard.as_ref()
    }

    pub fn dashboard(&self) -> Option<&DashboardStats> {
        self.dashboard.as_ref()
    }
}
