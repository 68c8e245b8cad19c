//! The service seam. Views talk to `dyn SurplusApi` so tests can script it.

use async_trait::async_trait;
use surplus_core::{
    DashboardStats, EntityId, LogEntry, MatchRequest, MatchResult, Ngo, PredictionRequest,
    PredictionResult, Restaurant,
};

use crate::ApiError;

/// Endpoints consumed from the prediction/matching service.
#[async_trait]
pub trait SurplusApi: Send + Sync {
    /// `GET restaurants`, in service order.
    async fn restaurants(&self) -> Result<Vec<Restaurant>, ApiError>;

    /// `GET ngos`, in service order.
    async fn ngos(&self) -> Result<Vec<Ngo>, ApiError>;

    /// `POST predict`.
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError>;

    /// `POST match`. An empty `matched_ngos` is a valid answer, not an error.
    async fn match_surplus(&self, request: &MatchRequest) -> Result<MatchResult, ApiError>;

    /// `GET logs?restaurant_id=`.
    async fn logs(&self, restaurant_id: &EntityId) -> Result<Vec<LogEntry>, ApiError>;

    /// `GET dashboard`.
    async fn dashboard(&self) -> Result<DashboardStats, ApiError>;
}
