//! Per-restaurant prediction/waste log, as returned by `GET logs`.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::parse_service_date;
use crate::wire::null_as_default;

/// Log outcome. Anything other than `completed` is shown as pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogStatus {
    Completed,
    Pending(String),
}

impl LogStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, LogStatus::Completed)
    }
}

impl Default for LogStatus {
    fn default() -> Self {
        LogStatus::Pending("pending".into())
    }
}

impl From<String> for LogStatus {
    fn from(s: String) -> Self {
        if s == "completed" {
            LogStatus::Completed
        } else {
            LogStatus::Pending(s)
        }
    }
}

impl From<LogStatus> for String {
    fn from(s: LogStatus) -> Self {
        match s {
            LogStatus::Completed => "completed".into(),
            LogStatus::Pending(s) => s,
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogStatus::Completed => f.write_str("completed"),
            LogStatus::Pending(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meal_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous_waste_kg: f64,
    #[serde(default)]
    pub predicted_surplus_kg: Option<f64>,
    #[serde(default)]
    pub actual_surplus_kg: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: LogStatus,
}

impl LogEntry {
    pub fn day(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_service_date)
    }

    /// Predicted value if recorded. Zero counts as not recorded.
    pub fn predicted(&self) -> Option<f64> {
        recorded(self.predicted_surplus_kg)
    }

    /// Actual value if recorded. Zero counts as not recorded.
    pub fn actual(&self) -> Option<f64> {
        recorded(self.actual_surplus_kg)
    }

    /// Both sides recorded, so the entry can back an accuracy figure.
    pub fn is_comparable(&self) -> bool {
        self.predicted().is_some() && self.actual().is_some()
    }
}

fn recorded(v: Option<f64>) -> Option<f64> {
    v.filter(|x| *x != 0.0 && !x.is_nan())
}
