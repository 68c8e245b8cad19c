//! Aggregate figures over a restaurant's log history and the dashboard totals.
//!
//! Two different zero guards live here and must stay separate:
//!
//! - the accuracy denominator sums `actual` per entry, substituting **1** for
//!   every entry without a recorded actual value (the numerator is untouched);
//! - the distribution rate divides by `total_actual` and yields **0** when
//!   that total is zero, with no substitution.

use crate::LogEntry;

/// Totals and accuracy for one restaurant's history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySummary {
    pub entries: usize,
    /// Entries with both predicted and actual values.
    pub comparable: usize,
    pub total_predicted: f64,
    pub total_actual: f64,
    /// Percentage; 0 when no entry is comparable. May be negative.
    pub accuracy_pct: i64,
}

impl HistorySummary {
    pub fn from_logs(logs: &[LogEntry]) -> Self {
        let total_predicted = total_predicted(logs);
        let total_actual = total_actual(logs);
        let comparable = logs.iter().filter(|l| l.is_comparable()).count();
        let accuracy_pct = if comparable > 0 {
            let error = (total_predicted - total_actual).abs();
            round_half_up(100.0 * (1.0 - error / accuracy_denominator(logs)))
        } else {
            0
        };
        Self {
            entries: logs.len(),
            comparable,
            total_predicted,
            total_actual,
            accuracy_pct,
        }
    }
}

/// Σ predicted, missing as 0.
pub fn total_predicted(logs: &[LogEntry]) -> f64 {
    logs.iter().map(|l| l.predicted().unwrap_or(0.0)).sum()
}

/// Σ actual, missing as 0.
pub fn total_actual(logs: &[LogEntry]) -> f64 {
    logs.iter().map(|l| l.actual().unwrap_or(0.0)).sum()
}

/// Σ (actual or 1). Never zero for a non-empty history.
pub fn accuracy_denominator(logs: &[LogEntry]) -> f64 {
    logs.iter().map(|l| l.actual().unwrap_or(1.0)).sum()
}

/// Share of actual surplus that was distributed, as a rounded percentage.
pub fn distribution_rate_pct(total_distributed_kg: f64, total_actual_kg: f64) -> i64 {
    if total_actual_kg > 0.0 {
        round_half_up(total_distributed_kg / total_actual_kg * 100.0)
    } else {
        0
    }
}

/// Round to the nearest integer, ties toward +∞ (`-2.5` → `-2`).
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}
