use serde::{Deserialize, Serialize};

use crate::analytics::distribution_rate_pct;
use crate::wire::null_as_default;

/// Service-wide totals from `GET dashboard`. Absent or `null` counters read
/// as zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total_restaurants: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_ngos: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_distributed_kg: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub meals_served: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub co2_saved_kg: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_predictions: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_predicted_kg: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_actual_kg: f64,
}

impl DashboardStats {
    pub fn distribution_rate_pct(&self) -> i64 {
        distribution_rate_pct(self.total_distributed_kg, self.total_actual_kg)
    }

    /// Nothing can be matched until at least one of each side is registered.
    pub fn needs_onboarding(&self) -> bool {
        self.total_restaurants == 0 || self.total_ngos == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_payload() {
        let stats: DashboardStats =
            serde_json::from_str(r#"{"total_restaurants": 3, "total_distributed_kg": 40.5}"#)
                .unwrap();
        assert_eq!(stats.total_restaurants, 3);
        assert_eq!(stats.total_ngos, 0);
        assert!(stats.needs_onboarding());
        assert_eq!(stats.distribution_rate_pct(), 0);
    }

    #[test]
    fn null_sums_read_as_zero() {
        let json = r#"{"total_restaurants": 0, "total_ngos": 0,
            "total_distributed_kg": null, "total_actual_kg": null, "meals_served": null}"#;
        let stats: DashboardStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_actual_kg, 0.0);
        assert_eq!(stats.meals_served, 0);
        assert_eq!(stats.distribution_rate_pct(), 0);
        assert!(stats.needs_onboarding());
    }

    #[test]
    fn distribution_rate() {
        let stats = DashboardStats {
            total_restaurants: 2,
            total_ngos: 5,
            total_distributed_kg: 80.0,
            total_actual_kg: 120.0,
            ..Default::default()
        };
        assert!(!stats.needs_onboarding());
        assert_eq!(stats.distribution_rate_pct(), 67);
    }
}
