use biapp_core::api_paths;
use biapp_core::models::envelope::ListEnvelope;
use biapp_core::models::trend::KpiTrendEntry;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Per-evaluation KPI values for a patient, oldest first as served.
pub fn fetch(client: &ApiClient, patient_id: u64) -> Result<Vec<KpiTrendEntry>, ApiError> {
    let envelope: ListEnvelope<KpiTrendEntry> =
        client.get(&api_paths::kpi_trends(patient_id), &[])?;
    Ok(envelope.into_items())
}
