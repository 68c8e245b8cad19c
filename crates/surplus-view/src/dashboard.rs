use surplus_api::SurplusApi;
use surplus_core::DashboardStats;
use tracing::warn;

/// Fetch the service-wide totals; `None` when the service could not be read.
pub async fn load_dashboard(api: &dyn SurplusApi) -> Option<DashboardStats> {
    api.dashboard()
        .await
        .inspect_err(|err| warn!(error = %err, "dashboard fetch failed"))
        .ok()
}
