//! Vertical cards for the operator console.
//!
//! Each card is a `Display` wrapper over borrowed view state, so `main`
//! prints it and tests render it to a string.

use std::fmt;

use surplus_core::{
    DashboardStats, HistorySummary, LogEntry, Ngo, Restaurant, RouteLayer, RouteStop,
};
use surplus_view::{AppliedMatch, MatchOutcome, PredictionOutcome};

const MAX_LIST_ITEMS: usize = 25;

const NO_MATCHES: &str = "No NGOs found within the specified distance range. \
                          Try increasing the search radius or registering more NGOs.";

const GETTING_STARTED: &str = "To start using the system, please register at least one \
                               restaurant and one NGO.";

// ── Entity lists ──

pub struct RestaurantList<'a>(pub &'a [Restaurant]);

impl fmt::Display for RestaurantList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Restaurants ({}) ===", self.0.len())?;
        if self.0.is_empty() {
            return writeln!(f, "  (none registered)");
        }
        for r in self.0 {
            writeln!(f, "  {:<6} {:<30} {}", r.id.to_string(), r.name, r.address)?;
            field(f, "location", r.location())?;
            opt_field(f, "contact", r.contact_person.as_deref())?;
            opt_field(f, "phone", r.phone.as_deref())?;
            opt_field(f, "email", r.email.as_deref())?;
            match (r.registered_on(), r.created_at.as_deref()) {
                (Some(day), _) => field(f, "registered", day)?,
                (None, Some(raw)) => field(f, "registered", raw)?,
                (None, None) => {}
            }
        }
        Ok(())
    }
}

pub struct NgoList<'a>(pub &'a [Ngo]);

impl fmt::Display for NgoList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== NGOs ({}) ===", self.0.len())?;
        if self.0.is_empty() {
            return writeln!(f, "  (none registered)");
        }
        for n in self.0 {
            writeln!(f, "  {:<6} {:<30} {}", n.id.to_string(), n.name, n.address)?;
            field(f, "location", n.location())?;
            field(f, "capacity", format_args!("{} kg", n.capacity_kg))?;
            opt_field(f, "contact", n.contact_person.as_deref())?;
            opt_field(f, "phone", n.phone.as_deref())?;
            opt_field(f, "operating hours", n.operating_hours.as_deref())?;
        }
        Ok(())
    }
}

// ── Routes ──

/// The shown match and its route layer.
pub struct RouteCard<'a> {
    pub shown: &'a AppliedMatch,
    pub layer: &'a RouteLayer,
}

impl fmt::Display for RouteCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = &self.shown.request;
        let summary = &self.layer.summary;

        writeln!(f, "=== Routes from {} ===", self.shown.restaurant.name)?;
        field(
            f,
            "request",
            format_args!(
                "{} kg within {} km",
                request.surplus_kg, request.max_distance_km
            ),
        )?;
        field(f, "origin", self.layer.origin)?;
        field(
            f,
            "total distance",
            format_args!("{:.1} km", summary.total_distance_km),
        )?;
        field(
            f,
            "estimated time",
            format_args!("{:.0} min", summary.estimated_time_minutes),
        )?;
        field(f, "stops", summary.stops)?;
        field(f, "allocated", format_args!("{:.1} kg", summary.allocated_kg))?;
        writeln!(f)?;
        writeln!(f, "Stops")?;
        for stop in &self.layer.stops {
            write_stop(f, stop)?;
        }
        Ok(())
    }
}

fn write_stop(f: &mut fmt::Formatter<'_>, stop: &RouteStop) -> fmt::Result {
    let ngo = &stop.ngo;
    write!(
        f,
        "  {:>2}. {:<30} {:>6.1} km  {:>6.1} kg",
        stop.number, ngo.ngo_name, ngo.distance_km, ngo.allocated_kg
    )?;
    match stop.drop_off {
        Some(d) => writeln!(f, "  ({:.0} m around {})", d.radius_m, d.center)?,
        None => writeln!(f, "  (not on map)")?,
    }
    if !ngo.address.is_empty() {
        writeln!(f, "      {}", ngo.address)?;
    }
    if let Some(contact) = &ngo.contact_person {
        write!(f, "      {contact}")?;
        if let Some(phone) = &ngo.phone {
            write!(f, "  {phone}")?;
        }
        writeln!(f)?;
    }
    Ok(())
}

/// One line per response applied during a rapid re-selection.
pub struct OutcomeLog<'a>(pub &'a [MatchOutcome]);

impl fmt::Display for OutcomeLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Responses (arrival order)")?;
        for (i, outcome) in self.0.iter().enumerate() {
            let text = match outcome {
                MatchOutcome::Applied { matched } => format!("applied, {matched} NGOs"),
                MatchOutcome::NoMatches => "no matches, previous result kept".to_string(),
                MatchOutcome::Stale => "superseded, dropped".to_string(),
                MatchOutcome::Failed => "failed".to_string(),
            };
            writeln!(f, "  {:>2}. {}", i + 1, text)?;
        }
        Ok(())
    }
}

pub fn no_matches_notice() -> &'static str {
    NO_MATCHES
}

// ── Prediction ──

pub struct PredictionCard<'a>(pub &'a PredictionOutcome);

impl fmt::Display for PredictionCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let PredictionOutcome {
            request,
            prediction,
            matching,
        } = self.0;

        writeln!(f, "=== Prediction for restaurant {} ===", request.restaurant_id)?;
        field(
            f,
            "input",
            format_args!(
                "day {} {} {}, {} customers, {} °C{}",
                request.day_of_week,
                request.meal_type,
                request.weather,
                request.customer_count,
                request.temperature,
                if request.special_event {
                    ", special event"
                } else {
                    ""
                }
            ),
        )?;
        field(
            f,
            "predicted surplus",
            format_args!("{} kg", prediction.predicted_surplus_kg),
        )?;
        if let Some(confidence) = &prediction.confidence {
            field(f, "confidence", confidence)?;
        }
        if !prediction.recommendation.is_empty() {
            field(f, "recommendation", &prediction.recommendation)?;
        }

        if matching.is_empty_match() {
            writeln!(f)?;
            writeln!(f, "{NO_MATCHES}")?;
        }
        if let Some(result) = matching.shown() {
            let summary = result.summary();
            writeln!(f)?;
            writeln!(f, "Route")?;
            field(
                f,
                "total distance",
                format_args!("{:.1} km", summary.total_distance_km),
            )?;
            field(
                f,
                "estimated time",
                format_args!("{:.0} min", summary.estimated_time_minutes),
            )?;
            field(f, "allocated", format_args!("{:.1} kg", summary.allocated_kg))?;
            writeln!(f)?;
            writeln!(f, "Matched NGOs ({})", result.matched_ngos.len())?;
            for (i, ngo) in result.matched_ngos.iter().enumerate() {
                writeln!(
                    f,
                    "  {:>2}. {:<30} {:>6.1} km  {:>6.1} kg",
                    i + 1,
                    ngo.ngo_name,
                    ngo.distance_km,
                    ngo.allocated_kg
                )?;
            }
        }
        Ok(())
    }
}

// ── History ──

pub struct HistoryCard<'a> {
    pub restaurant: &'a Restaurant,
    pub logs: &'a [LogEntry],
    pub summary: &'a HistorySummary,
}

impl fmt::Display for HistoryCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== History: {} ===", self.restaurant.name)?;
        if self.logs.is_empty() {
            return writeln!(f, "  No prediction history for this restaurant");
        }

        writeln!(
            f,
            "  {:<12} {:<10} {:>9} {:>10} {:>8}  {}",
            "date", "meal", "previous", "predicted", "actual", "status"
        )?;
        for log in self.logs.iter().take(MAX_LIST_ITEMS) {
            let date = match (log.day(), log.date.as_deref()) {
                (Some(day), _) => day.to_string(),
                (None, Some(raw)) => raw.to_string(),
                (None, None) => "-".to_string(),
            };
            writeln!(
                f,
                "  {:<12} {:<10} {:>9} {:>10} {:>8}  {}",
                date,
                log.meal_type,
                log.previous_waste_kg,
                kg_or_dash(log.predicted()),
                kg_or_dash(log.actual()),
                if log.status.is_completed() {
                    "completed"
                } else {
                    "pending"
                }
            )?;
        }
        if self.logs.len() > MAX_LIST_ITEMS {
            writeln!(f, "  ... and {} more", self.logs.len() - MAX_LIST_ITEMS)?;
        }

        writeln!(f)?;
        writeln!(f, "Totals")?;
        field(
            f,
            "total predicted",
            format_args!("{:.2} kg", self.summary.total_predicted),
        )?;
        field(
            f,
            "total actual",
            format_args!("{:.2} kg", self.summary.total_actual),
        )?;
        field(f, "accuracy", format_args!("{}%", self.summary.accuracy_pct))
    }
}

fn kg_or_dash(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |kg| kg.to_string())
}

// ── Dashboard ──

pub struct DashboardCard<'a>(pub &'a DashboardStats);

impl fmt::Display for DashboardCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        writeln!(f, "=== Dashboard ===")?;
        field(f, "restaurants", s.total_restaurants)?;
        field(f, "NGOs", s.total_ngos)?;
        field(f, "food distributed", format_args!("{} kg", s.total_distributed_kg))?;
        field(f, "meals served", s.meals_served)?;
        field(f, "CO2 saved", format_args!("{} kg", s.co2_saved_kg))?;
        writeln!(f)?;
        writeln!(f, "Predictions")?;
        field(f, "predictions made", s.total_predictions)?;
        field(f, "total food predicted", format_args!("{} kg", s.total_predicted_kg))?;
        field(f, "actual surplus", format_args!("{} kg", s.total_actual_kg))?;
        field(f, "distribution rate", format_args!("{}%", s.distribution_rate_pct()))?;
        if s.needs_onboarding() {
            writeln!(f)?;
            writeln!(f, "Getting Started")?;
            writeln!(f, "  {GETTING_STARTED}")?;
        }
        Ok(())
    }
}

// ── Helpers ──

fn field(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "  {:<26} {}", label, value)
}

fn opt_field(f: &mut fmt::Formatter<'_>, label: &str, value: Option<&str>) -> fmt::Result {
    match value {
        Some(v) if !v.is_empty() => field(f, label, v),
        _ => Ok(()),
    }
}
