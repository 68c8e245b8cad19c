//! Restaurants and NGOs as published by the matching service.
//!
//! Both are registered and owned by the service; this side only caches them
//! read-only, so every field mirrors the wire schema.

use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::wire::null_as_default;

/// Opaque identity issued by the service.
///
/// The service may send ids as JSON numbers or strings. The issued form is
/// kept so requests echo the id back exactly as it was issued, while
/// equality compares the textual form (`3` and `"3"` name the same entity).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    fn key(&self) -> std::borrow::Cow<'_, str> {
        match self {
            EntityId::Number(n) => n.to_string().into(),
            EntityId::Text(s) => s.trim().into(),
        }
    }

    /// True for an empty text id, i.e. "nothing selected" coming from a form.
    pub fn is_blank(&self) -> bool {
        matches!(self, EntityId::Text(s) if s.trim().is_empty())
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for EntityId {}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for EntityId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(n) => EntityId::Number(n),
            Err(_) => EntityId::Text(s.to_string()),
        })
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// GeoJSON position order: `[lon, lat]`.
    pub fn to_position(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: EntityId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Registration timestamp as sent by the service.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Restaurant {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Calendar date of registration, if `created_at` parses.
    pub fn registered_on(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(parse_service_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ngo {
    pub id: EntityId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Daily intake capacity in kg.
    #[serde(default, deserialize_with = "null_as_default")]
    pub capacity_kg: f64,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Free text, e.g. "9am - 6pm".
    #[serde(default)]
    pub operating_hours: Option<String>,
}

impl Ngo {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Parse the date part of a service timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.frac]`, `YYYY-MM-DDTHH:MM:SS[.frac]`
/// and bare `YYYY-MM-DD`.
pub fn parse_service_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
