use biapp_core::api_paths;
use biapp_core::models::dashboard::DashboardFilters;
use jiff::civil::Date;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Aggregates across all patients. The response is free-form JSON.
pub fn fetch(
    client: &ApiClient,
    filters: &DashboardFilters,
    today: Date,
) -> Result<serde_json::Value, ApiError> {
    let query = filters.query_pairs(today);
    debug!(params = query.len(), "fetching dashboard");
    client.get(api_paths::DASHBOARD, &query)
}
