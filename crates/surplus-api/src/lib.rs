//! Client side of the surplus prediction and NGO matching service.

mod api;
mod config;
mod error;
pub mod http;

pub use api::SurplusApi;
pub use config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
pub use http::HttpClient;
