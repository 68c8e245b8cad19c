//! View-state coordination for the operator console.
//!
//! Every container here is owned by one controller and mutated through
//! `&mut self` from response handlers, one at a time. Requests are never
//! cancelled; see [`tracker`] for how late responses are handled.

pub mod cache;
pub mod dashboard;
pub mod history;
mod operator;
pub mod prediction;
pub mod selection;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{DEFAULT_CENTER, EntityCache};
pub use dashboard::load_dashboard;
pub use history::HistoryView;
pub use operator::OperatorView;
pub use prediction::{
    ChainedMatch, MATCH_THRESHOLD_KG, PREDICTION_RADIUS_KM, PredictionError, PredictionOutcome,
    PredictionPanel, run_prediction,
};
pub use selection::{AppliedMatch, MatchContext, MatchCoordinator, MatchOutcome, PendingMatch};
pub use tracker::{RequestTracker, ResponsePolicy, Ticket};
