use thiserror::Error;

use crate::EntityId;

/// Client-side guard failures. These block a request before it is sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please select a restaurant")]
    NoRestaurantSelected,

    #[error("unknown restaurant: {0}")]
    UnknownRestaurant(EntityId),

    #[error("day_of_week must be 0-6, got {0}")]
    DayOfWeek(u8),

    #[error("{field} must be a positive number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}
