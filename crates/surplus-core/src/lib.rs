//! Core types for Surplus Match: the service's wire schema, route geometry,
//! and history analytics. No I/O.

pub mod analytics;
pub mod dashboard;
pub mod entity;
mod error;
pub mod history;
pub mod matching;
pub mod prediction;
pub mod route;
mod wire;

pub use analytics::{HistorySummary, distribution_rate_pct};
pub use dashboard::DashboardStats;
pub use entity::{EntityId, GeoPoint, Ngo, Restaurant};
pub use error::ValidationError;
pub use history::{LogEntry, LogStatus};
pub use matching::{MatchRequest, MatchResult, MatchedNgo, RouteInfo, RouteSummary};
pub use prediction::{Confidence, MealType, PredictionRequest, PredictionResult, Weather};
pub use route::{DROP_OFF_RADIUS_M, DropOff, RouteLayer, RouteStop, Segment, render_routes};
