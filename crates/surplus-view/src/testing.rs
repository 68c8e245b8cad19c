//! Scripted [`SurplusApi`] for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use surplus_api::{ApiError, SurplusApi};
use surplus_core::{
    DashboardStats, EntityId, LogEntry, LogStatus, MatchRequest, MatchResult, MatchedNgo, Ngo,
    PredictionRequest, PredictionResult, Restaurant,
};

/// A request the mock received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Restaurants,
    Ngos,
    Predict(PredictionRequest),
    Match(MatchRequest),
    Logs(EntityId),
    Dashboard,
}

type Scripted<T> = VecDeque<Result<T, String>>;

#[derive(Default)]
struct MockState {
    restaurants: Scripted<Vec<Restaurant>>,
    ngos: Scripted<Vec<Ngo>>,
    predictions: Scripted<PredictionResult>,
    matches: Scripted<MatchResult>,
    logs: Scripted<Vec<LogEntry>>,
    dashboard: Scripted<DashboardStats>,
    calls: Vec<Call>,
}

/// Each endpoint pops its next scripted response; an `Err(body)` becomes a
/// 500, and an empty queue becomes a 404.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<MockState>,
}

fn next<T>(queue: &mut Scripted<T>) -> Result<T, ApiError> {
    match queue.pop_front() {
        Some(Ok(v)) => Ok(v),
        Some(Err(body)) => Err(ApiError::Server { status: 500, body }),
        None => Err(ApiError::Server {
            status: 404,
            body: "no scripted response".into(),
        }),
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn push_restaurants(&self, r: Result<Vec<Restaurant>, &str>) {
        self.with(|s| s.restaurants.push_back(r.map_err(String::from)));
    }

    pub fn push_ngos(&self, r: Result<Vec<Ngo>, &str>) {
        self.with(|s| s.ngos.push_back(r.map_err(String::from)));
    }

    pub fn push_prediction(&self, r: Result<PredictionResult, &str>) {
        self.with(|s| s.predictions.push_back(r.map_err(String::from)));
    }

    pub fn push_match(&self, r: Result<MatchResult, &str>) {
        self.with(|s| s.matches.push_back(r.map_err(String::from)));
    }

    pub fn push_logs(&self, r: Result<Vec<LogEntry>, &str>) {
        self.with(|s| s.logs.push_back(r.map_err(String::from)));
    }

    pub fn push_dashboard(&self, r: Result<DashboardStats, &str>) {
        self.with(|s| s.dashboard.push_back(r.map_err(String::from)));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.with(|s| s.calls.clone())
    }

    pub fn match_calls(&self) -> Vec<MatchRequest> {
        self.with(|s| {
            s.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Match(r) => Some(r.clone()),
                    _ => None,
                })
                .collect()
        })
    }
}

#[async_trait]
impl SurplusApi for MockApi {
    async fn restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Restaurants);
            next(&mut s.restaurants)
        })
    }

    async fn ngos(&self) -> Result<Vec<Ngo>, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Ngos);
            next(&mut s.ngos)
        })
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Predict(request.clone()));
            next(&mut s.predictions)
        })
    }

    async fn match_surplus(&self, request: &MatchRequest) -> Result<MatchResult, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Match(request.clone()));
            next(&mut s.matches)
        })
    }

    async fn logs(&self, restaurant_id: &EntityId) -> Result<Vec<LogEntry>, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Logs(restaurant_id.clone()));
            next(&mut s.logs)
        })
    }

    async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Dashboard);
            next(&mut s.dashboard)
        })
    }
}

// ── Fixtures ──

pub fn restaurant(id: i64, name: &str, lat: f64, lon: f64) -> Restaurant {
    Restaurant {
        id: EntityId::Number(id),
        name: name.into(),
        address: format!("{name} Street, Chennai"),
        latitude: lat,
        longitude: lon,
        contact_person: None,
        phone: None,
        email: None,
        created_at: Some("2025-01-10 08:00:00".into()),
    }
}

pub fn ngo(id: i64, name: &str, lat: f64, lon: f64) -> Ngo {
    Ngo {
        id: EntityId::Number(id),
        name: name.into(),
        address: format!("{name} Road, Chennai"),
        latitude: lat,
        longitude: lon,
        capacity_kg: 50.0,
        contact_person: None,
        phone: None,
        email: None,
        operating_hours: None,
    }
}

pub fn matched(name: &str, lat: f64, lon: f64, allocated_kg: f64) -> MatchedNgo {
    MatchedNgo {
        ngo_name: name.into(),
        address: String::new(),
        distance_km: 2.5,
        allocated_kg,
        contact_person: None,
        phone: None,
        latitude: Some(lat),
        longitude: Some(lon),
    }
}

pub fn match_result(ngos: Vec<MatchedNgo>) -> MatchResult {
    let total = ngos.iter().map(|n| n.allocated_kg).sum();
    MatchResult {
        matched_ngos: ngos,
        route_info: None,
        total_allocated_kg: Some(total),
    }
}

pub fn prediction(kg: f64) -> PredictionResult {
    PredictionResult {
        predicted_surplus_kg: kg,
        confidence: None,
        recommendation: "Arrange pickup".into(),
    }
}

pub fn log(predicted: Option<f64>, actual: Option<f64>) -> LogEntry {
    LogEntry {
        date: Some("2025-02-01".into()),
        meal_type: "lunch".into(),
        previous_waste_kg: 10.0,
        predicted_surplus_kg: predicted,
        actual_surplus_kg: actual,
        status: LogStatus::Completed,
    }
}
