//! Surplus prediction request/response schema.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::{EntityId, ValidationError};
use crate::wire::null_as_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    #[default]
    Lunch,
    Dinner,
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        })
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            other => Err(format!("unknown meal type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Sunny,
    Rainy,
    Cloudy,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Weather::Sunny => "sunny",
            Weather::Rainy => "rainy",
            Weather::Cloudy => "cloudy",
        })
    }
}

impl FromStr for Weather {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunny" => Ok(Weather::Sunny),
            "rainy" => Ok(Weather::Rainy),
            "cloudy" => Ok(Weather::Cloudy),
            other => Err(format!("unknown weather: {other}")),
        }
    }
}

/// Body of `POST predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub restaurant_id: EntityId,
    /// 0 = Sunday.
    pub day_of_week: u8,
    pub meal_type: MealType,
    pub previous_waste_kg: f64,
    pub weather: Weather,
    /// Sent as `0`/`1`.
    #[serde(with = "flag")]
    pub special_event: bool,
    pub customer_count: u32,
    /// Degrees Celsius.
    pub temperature: f64,
}

impl PredictionRequest {
    pub const DEFAULT_CUSTOMER_COUNT: u32 = 150;
    pub const DEFAULT_TEMPERATURE: f64 = 22.0;

    /// A request with the form defaults: today's weekday, lunch, sunny,
    /// no special event, 150 customers, 22 °C.
    pub fn with_defaults(restaurant_id: EntityId, previous_waste_kg: f64) -> Self {
        Self {
            restaurant_id,
            day_of_week: today(),
            meal_type: MealType::default(),
            previous_waste_kg,
            weather: Weather::default(),
            special_event: false,
            customer_count: Self::DEFAULT_CUSTOMER_COUNT,
            temperature: Self::DEFAULT_TEMPERATURE,
        }
    }

    /// Check the fields the service requires before a request is issued.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.restaurant_id.is_blank() {
            return Err(ValidationError::NoRestaurantSelected);
        }
        if self.day_of_week > 6 {
            return Err(ValidationError::DayOfWeek(self.day_of_week));
        }
        if !self.previous_waste_kg.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "previous_waste_kg",
            });
        }
        if !self.temperature.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "temperature",
            });
        }
        Ok(())
    }
}

/// Local weekday, 0 = Sunday.
pub fn today() -> u8 {
    Local::now().weekday().num_days_from_sunday() as u8
}

/// Model confidence; the service reports either a score or a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    Score(f64),
    Label(String),
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Score(s) => write!(f, "{s}"),
            Confidence::Label(l) => f.write_str(l),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_surplus_kg: f64,
    #[serde(default)]
    pub confidence: Option<Confidence>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendation: String,
}

mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(u8::from(*v))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(d)? != 0)
    }
}
