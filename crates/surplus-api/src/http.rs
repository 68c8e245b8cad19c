//! HTTP client for the prediction/matching service's JSON endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use surplus_core::{
    DashboardStats, EntityId, LogEntry, MatchRequest, MatchResult, Ngo, PredictionRequest,
    PredictionResult, Restaurant,
};
use tracing::{debug, info};

use crate::{ApiConfig, ApiError, SurplusApi};

/// Client for the service under a fixed base origin.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: ApiConfig,
}

#[derive(Deserialize)]
struct RestaurantsEnvelope {
    #[serde(default)]
    restaurants: Vec<Restaurant>,
}

#[derive(Deserialize)]
struct NgosEnvelope {
    #[serde(default)]
    ngos: Vec<Ngo>,
}

#[derive(Deserialize)]
struct PredictionEnvelope {
    prediction: PredictionResult,
}

#[derive(Deserialize)]
struct LogsEnvelope {
    #[serde(default)]
    logs: Vec<LogEntry>,
}

impl HttpClient {
    /// Build a client for `config`, failing on an invalid base URL or timeout.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn get_json<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<R, ApiError> {
        let url = self.config.endpoint_url(endpoint);
        debug!(url = %url, "GET");
        let resp = self.client.get(&url).query(query).send().await?;
        decode(resp).await
    }

    async fn post_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let url = self.config.endpoint_url(endpoint);
        debug!(url = %url, "POST");
        let resp = self.client.post(&url).json(body).send().await?;
        decode(resp).await
    }
}

async fn decode<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status: status.as_u16(),
            body,
        });
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl SurplusApi for HttpClient {
    async fn restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        let env: RestaurantsEnvelope = self.get_json("restaurants", &[]).await?;
        info!(count = env.restaurants.len(), "fetched restaurants");
        Ok(env.restaurants)
    }

    async fn ngos(&self) -> Result<Vec<Ngo>, ApiError> {
        let env: NgosEnvelope = self.get_json("ngos", &[]).await?;
        info!(count = env.ngos.len(), "fetched NGOs");
        Ok(env.ngos)
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError> {
        info!(restaurant_id = %request.restaurant_id, meal = %request.meal_type, "requesting prediction");
        let env: PredictionEnvelope = self.post_json("predict", request).await?;
        info!(
            predicted_surplus_kg = env.prediction.predicted_surplus_kg,
            "prediction received"
        );
        Ok(env.prediction)
    }

    async fn match_surplus(&self, request: &MatchRequest) -> Result<MatchResult, ApiError> {
        info!(
            restaurant_id = %request.restaurant_id,
            surplus_kg = request.surplus_kg,
            max_distance_km = request.max_distance_km,
            "requesting match"
        );
        let result: MatchResult = self.post_json("match", request).await?;
        info!(matched = result.matched_ngos.len(), "match received");
        Ok(result)
    }

    async fn logs(&self, restaurant_id: &EntityId) -> Result<Vec<LogEntry>, ApiError> {
        let env: LogsEnvelope = self
            .get_json("logs", &[("restaurant_id", restaurant_id.to_string())])
            .await?;
        info!(restaurant_id = %restaurant_id, count = env.logs.len(), "fetched logs");
        Ok(env.logs)
    }

    async fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        self.get_json("dashboard", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = HttpClient::new(ApiConfig::new("http://localhost:5000/api/", 5)).unwrap();
        assert_eq!(client.config().base_url, "http://localhost:5000/api");
    }

    #[test]
    fn client_rejects_bad_config() {
        assert!(HttpClient::new(ApiConfig::new("ftp://example.org", 5)).is_err());
    }

    #[test]
    fn missing_list_reads_as_empty() {
        let env: RestaurantsEnvelope = serde_json::from_str(r#"{"error": "db down"}"#).unwrap();
        assert!(env.restaurants.is_empty());
        let env: NgosEnvelope = serde_json::from_str("{}").unwrap();
        assert!(env.ngos.is_empty());
    }

    #[test]
    fn lists_keep_service_order() {
        let json = r#"{"ngos": [
            {"id": 9, "name": "Zeta Shelter", "latitude": 13.0, "longitude": 80.0, "capacity_kg": 40},
            {"id": 2, "name": "Alpha Kitchen", "latitude": 13.1, "longitude": 80.1, "capacity_kg": 75,
             "operating_hours": "8am - 8pm"}
        ]}"#;
        let env: NgosEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(env.ngos[0].name, "Zeta Shelter");
        assert_eq!(env.ngos[1].operating_hours.as_deref(), Some("8am - 8pm"));
    }

    #[test]
    fn prediction_envelope() {
        let json = r#"{"prediction": {"predicted_surplus_kg": 18.4, "confidence": 0.82,
            "recommendation": "Schedule a pickup before 3pm"}}"#;
        let env: PredictionEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(env.prediction.predicted_surplus_kg, 18.4);
        assert!(serde_json::from_str::<PredictionEnvelope>("{}").is_err());
    }

    #[test]
    fn logs_envelope() {
        let json = r#"{"logs": [
            {"date": "2025-02-01", "meal_type": "lunch", "previous_waste_kg": 12,
             "predicted_surplus_kg": 10, "actual_surplus_kg": 8, "status": "completed"},
            {"date": "2025-02-02", "meal_type": "dinner", "previous_waste_kg": 9,
             "predicted_surplus_kg": 5, "status": "pending"}
        ]}"#;
        let env: LogsEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(env.logs.len(), 2);
        assert!(env.logs[0].status.is_completed());
        assert_eq!(env.logs[1].actual_surplus_kg, None);
    }

    #[tokio::test]
    async fn unreachable_service_is_an_http_error() {
        // Port 9 (discard) on loopback is not expected to run an HTTP server.
        let client = HttpClient::new(ApiConfig::new("http://127.0.0.1:9/api", 2)).unwrap();
        let err = client.restaurants().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
