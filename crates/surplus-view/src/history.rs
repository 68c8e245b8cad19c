//! Log history for the selected restaurant, fetched fresh per selection.

use surplus_api::{ApiError, SurplusApi};
use surplus_core::{EntityId, HistorySummary, LogEntry};
use tracing::{debug, warn};

use crate::tracker::{RequestTracker, ResponsePolicy, Ticket};

#[derive(Debug, Default)]
pub struct HistoryView {
    tracker: RequestTracker,
    selected: Option<EntityId>,
    logs: Vec<LogEntry>,
}

impl HistoryView {
    pub fn new(policy: ResponsePolicy) -> Self {
        Self {
            tracker: RequestTracker::new(policy),
            selected: None,
            logs: Vec::new(),
        }
    }

    pub fn selected(&self) -> Option<&EntityId> {
        self.selected.as_ref()
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary::from_logs(&self.logs)
    }

    /// Select a restaurant. The previous restaurant's logs are cleared.
    pub fn select(&mut self, restaurant_id: EntityId) -> Ticket<EntityId> {
        self.selected = Some(restaurant_id.clone());
        self.logs.clear();
        self.tracker.issue(restaurant_id)
    }

    /// Apply a logs response. A failed fetch leaves an empty history.
    pub fn apply(
        &mut self,
        ticket: Ticket<EntityId>,
        response: Result<Vec<LogEntry>, ApiError>,
    ) -> bool {
        if !self.tracker.admits(&ticket) {
            debug!(restaurant_id = %ticket.key(), "dropping superseded log history");
            return false;
        }
        self.logs = response.unwrap_or_else(|err| {
            warn!(restaurant_id = %ticket.key(), error = %err, "log fetch failed");
            Vec::new()
        });
        true
    }

    /// Select `restaurant_id` and load its logs.
    pub async fn load(&mut self, api: &dyn SurplusApi, restaurant_id: EntityId) -> HistorySummary {
        let ticket = self.select(restaurant_id);
        let response = api.logs(ticket.key()).await;
        self.apply(ticket, response);
        self.summary()
    }
}
