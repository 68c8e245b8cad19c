//! Predict-then-maybe-match.
//!
//! A prediction is requested first. Only when the predicted surplus is
//! strictly greater than [`MATCH_THRESHOLD_KG`] is a second, dependent match
//! request sent for exactly the predicted quantity within
//! [`PREDICTION_RADIUS_KM`].
//!
//! Failures are asymmetric: a failed prediction aborts the whole flow with one
//! generic notice, while a failed match after a successful prediction is only
//! logged and the panel shows the prediction alone.

use surplus_api::{ApiError, SurplusApi};
use surplus_core::{
    EntityId, MatchRequest, MatchResult, PredictionRequest, PredictionResult, ValidationError,
};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::tracker::{RequestTracker, ResponsePolicy, Ticket};

/// Predictions at or below this many kg do not trigger a match.
pub const MATCH_THRESHOLD_KG: f64 = 5.0;
pub const PREDICTION_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Error making prediction. Please try again.")]
    Request(#[source] ApiError),
}

/// Result of the dependent match step.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainedMatch {
    /// Predicted surplus did not exceed the threshold; no request was sent.
    BelowThreshold,
    Matched(MatchResult),
    /// The match could not be requested or the request failed; already logged.
    Failed,
}

impl ChainedMatch {
    /// Result to display, only when it has at least one NGO.
    pub fn shown(&self) -> Option<&MatchResult> {
        match self {
            ChainedMatch::Matched(r) if r.has_matches() => Some(r),
            _ => None,
        }
    }

    /// A match was requested and came back with no NGOs.
    pub fn is_empty_match(&self) -> bool {
        matches!(self, ChainedMatch::Matched(r) if !r.has_matches())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub request: PredictionRequest,
    pub prediction: PredictionResult,
    pub matching: ChainedMatch,
}

/// The match to chain after `prediction`, if it clears the threshold.
///
/// A non-finite prediction is an error rather than a skipped match.
pub fn chained_request(
    restaurant_id: &EntityId,
    prediction: &PredictionResult,
) -> Result<Option<MatchRequest>, ValidationError> {
    let predicted = prediction.predicted_surplus_kg;
    if predicted.is_finite() && predicted <= MATCH_THRESHOLD_KG {
        return Ok(None);
    }
    MatchRequest::new(restaurant_id.clone(), predicted, PREDICTION_RADIUS_KM).map(Some)
}

/// Run the two-step flow. Invalid input is rejected before anything is sent.
pub async fn run_prediction(
    api: &dyn SurplusApi,
    request: PredictionRequest,
) -> Result<PredictionOutcome, PredictionError> {
    request.validate()?;
    let prediction = api.predict(&request).await.map_err(|err| {
        error!(restaurant_id = %request.restaurant_id, error = %err, "prediction failed");
        PredictionError::Request(err)
    })?;

    let matching = match chained_request(&request.restaurant_id, &prediction) {
        Ok(None) => {
            info!(
                predicted_surplus_kg = prediction.predicted_surplus_kg,
                "below match threshold, prediction only"
            );
            ChainedMatch::BelowThreshold
        }
        Ok(Some(match_request)) => match api.match_surplus(&match_request).await {
            Ok(result) => ChainedMatch::Matched(result),
            Err(err) => {
                error!(restaurant_id = %request.restaurant_id, error = %err, "chained match failed");
                ChainedMatch::Failed
            }
        },
        Err(err) => {
            error!(
                restaurant_id = %request.restaurant_id,
                predicted_surplus_kg = prediction.predicted_surplus_kg,
                error = %err,
                "prediction cannot be matched"
            );
            ChainedMatch::Failed
        }
    };

    Ok(PredictionOutcome {
        request,
        prediction,
        matching,
    })
}

/// Prediction panel state. A newer submission supersedes older ones, whose
/// results are dropped when they arrive.
#[derive(Debug, Default)]
pub struct PredictionPanel {
    tracker: RequestTracker,
    shown: Option<PredictionOutcome>,
    notice: Option<String>,
}

impl PredictionPanel {
    pub fn new(policy: ResponsePolicy) -> Self {
        Self {
            tracker: RequestTracker::new(policy),
            shown: None,
            notice: None,
        }
    }

    pub fn shown(&self) -> Option<&PredictionOutcome> {
        self.shown.as_ref()
    }

    /// User-facing notice from the last failed submission.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Validate and start a submission, clearing the previous result.
    ///
    /// Invalid input is rejected here and nothing is sent.
    pub fn begin(&mut self, request: &PredictionRequest) -> Result<Ticket<EntityId>, ValidationError> {
        request.validate().inspect_err(|err| {
            self.notice = Some(err.to_string());
        })?;
        self.shown = None;
        self.notice = None;
        Ok(self.tracker.issue(request.restaurant_id.clone()))
    }

    /// Apply a finished submission. Returns whether it changed the panel.
    pub fn finish(
        &mut self,
        ticket: Ticket<EntityId>,
        result: &Result<PredictionOutcome, PredictionError>,
    ) -> bool {
        if !self.tracker.admits(&ticket) {
            debug!(restaurant_id = %ticket.key(), "dropping superseded prediction");
            return false;
        }
        match result {
            Ok(outcome) => {
                self.shown = Some(outcome.clone());
                self.notice = None;
            }
            Err(err) => {
                self.shown = None;
                self.notice = Some(err.to_string());
            }
        }
        true
    }

    /// Validate, run the flow, and apply its result.
    pub async fn submit(
        &mut self,
        api: &dyn SurplusApi,
        request: PredictionRequest,
    ) -> Result<PredictionOutcome, PredictionError> {
        let ticket = self.begin(&request)?;
        let result = run_prediction(api, request).await;
        self.finish(ticket, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, MockApi, match_result, matched, prediction};
    use surplus_core::{MealType, Weather};

    fn form(previous_waste_kg: f64) -> PredictionRequest {
        PredictionRequest {
            restaurant_id: EntityId::Number(3),
            day_of_week: 2,
            meal_type: MealType::Lunch,
            previous_waste_kg,
            weather: Weather::Sunny,
            special_event: false,
            customer_count: 150,
            temperature: 22.0,
        }
    }

    #[tokio::test]
    async fn low_prediction_sends_no_match() {
        let api = MockApi::new();
        api.push_prediction(Ok(prediction(3.2)));

        let mut panel = PredictionPanel::default();
        let outcome = panel.submit(&api, form(15.5)).await.unwrap();

        assert_eq!(outcome.matching, ChainedMatch::BelowThreshold);
        assert!(api.match_calls().is_empty());
        assert_eq!(api.calls(), [Call::Predict(form(15.5))]);
        assert_eq!(panel.shown().unwrap().prediction.predicted_surplus_kg, 3.2);
    }

    #[tokio::test]
    async fn threshold_is_strict() {
        let api = MockApi::new();
        api.push_prediction(Ok(prediction(5.0)));
        let outcome = run_prediction(&api, form(10.0)).await.unwrap();
        assert_eq!(outcome.matching, ChainedMatch::BelowThreshold);
        assert!(api.match_calls().is_empty());
    }

    #[tokio::test]
    async fn high_prediction_chains_one_match() {
        let api = MockApi::new();
        api.push_prediction(Ok(prediction(18.4)));
        api.push_match(Ok(match_result(vec![matched("Annam Trust", 13.1, 80.2, 18.4)])));

        let outcome = run_prediction(&api, form(22.0)).await.unwrap();

        let sent = api.match_calls();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].restaurant_id, EntityId::Number(3));
        assert_eq!(sent[0].surplus_kg, 18.4);
        assert_eq!(sent[0].max_distance_km, 10.0);
        assert_eq!(outcome.matching.shown().unwrap().matched_ngos.len(), 1);
    }

    #[tokio::test]
    async fn failed_prediction_aborts_with_generic_notice() {
        let api = MockApi::new();
        api.push_prediction(Err("model unavailable"));

        let mut panel = PredictionPanel::default();
        let err = panel.submit(&api, form(12.0)).await.unwrap_err();

        assert!(matches!(err, PredictionError::Request(_)));
        assert_eq!(
            panel.notice(),
            Some("Error making prediction. Please try again.")
        );
        assert!(panel.shown().is_none());
        assert!(api.match_calls().is_empty());
    }

    #[tokio::test]
    async fn failed_match_is_silent() {
        let api = MockApi::new();
        api.push_prediction(Ok(prediction(9.0)));
        api.push_match(Err("gateway timeout"));

        let mut panel = PredictionPanel::default();
        let outcome = panel.submit(&api, form(12.0)).await.unwrap();

        assert_eq!(outcome.matching, ChainedMatch::Failed);
        assert!(outcome.matching.shown().is_none());
        assert!(panel.notice().is_none());
        assert_eq!(panel.shown().unwrap().prediction.predicted_surplus_kg, 9.0);
    }

    #[tokio::test]
    async fn missing_selection_is_blocked_client_side() {
        let api = MockApi::new();
        let mut request = form(12.0);
        request.restaurant_id = EntityId::from("");

        let mut panel = PredictionPanel::default();
        let err = panel.submit(&api, request).await.unwrap_err();

        assert!(matches!(
            err,
            PredictionError::Validation(ValidationError::NoRestaurantSelected)
        ));
        assert_eq!(panel.notice(), Some("Please select a restaurant"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn direct_run_validates_first() {
        let api = MockApi::new();
        let mut request = form(12.0);
        request.restaurant_id = EntityId::from("");
        let err = run_prediction(&api, request).await.unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Validation(ValidationError::NoRestaurantSelected)
        ));

        let err = run_prediction(&api, form(f64::NAN)).await.unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Validation(ValidationError::NotFinite { .. })
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn non_finite_prediction_is_a_failed_match() {
        for kg in [f64::INFINITY, f64::NAN] {
            let api = MockApi::new();
            api.push_prediction(Ok(prediction(kg)));

            let outcome = run_prediction(&api, form(12.0)).await.unwrap();
            assert_eq!(outcome.matching, ChainedMatch::Failed);
            assert!(api.match_calls().is_empty());
        }
    }

    #[test]
    fn chained_request_reports_invalid_quantity() {
        let id = EntityId::Number(3);
        assert_eq!(chained_request(&id, &prediction(4.0)), Ok(None));
        assert_eq!(
            chained_request(&id, &prediction(f64::INFINITY)),
            Err(ValidationError::NotFinite { field: "surplus_kg" })
        );
        let sent = chained_request(&id, &prediction(6.5)).unwrap().unwrap();
        assert_eq!(sent.surplus_kg, 6.5);
        assert_eq!(sent.max_distance_km, PREDICTION_RADIUS_KM);
    }

    #[test]
    fn superseded_submission_is_dropped() {
        let mut panel = PredictionPanel::new(ResponsePolicy::LatestSelection);
        let first = panel.begin(&form(10.0)).unwrap();
        let second = panel.begin(&form(11.0)).unwrap();

        let later = PredictionOutcome {
            request: form(11.0),
            prediction: prediction(2.0),
            matching: ChainedMatch::BelowThreshold,
        };
        let earlier = PredictionOutcome {
            request: form(10.0),
            prediction: prediction(7.0),
            matching: ChainedMatch::Failed,
        };

        assert!(panel.finish(second, &Ok(later)));
        assert!(!panel.finish(first, &Ok(earlier)));
        assert_eq!(panel.shown().unwrap().prediction.predicted_surplus_kg, 2.0);
    }

    #[test]
    fn empty_match_is_not_shown() {
        let chained = ChainedMatch::Matched(MatchResult::default());
        assert!(chained.shown().is_none());
        assert!(chained.is_empty_match());
        assert!(!ChainedMatch::BelowThreshold.is_empty_match());
        assert!(!ChainedMatch::Failed.is_empty_match());
    }
}
