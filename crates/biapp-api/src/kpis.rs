use biapp_core::MIGRAINE_DISEASE_ID;
use biapp_core::api_paths;
use biapp_core::models::envelope::ListEnvelope;
use biapp_core::models::kpi::KpiDefinition;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;

/// KPI definitions applicable to a disease, in catalog order.
pub fn fetch_for_disease(
    client: &ApiClient,
    disease_id: u64,
) -> Result<Vec<KpiDefinition>, ApiError> {
    let envelope: ListEnvelope<KpiDefinition> =
        client.get(api_paths::KPIS, &[("disease_id", disease_id.to_string())])?;
    let kpis = envelope.into_items();
    info!(disease_id, count = kpis.len(), "loaded KPI catalog");
    Ok(kpis)
}

pub fn fetch_for_migraine(client: &ApiClient) -> Result<Vec<KpiDefinition>, ApiError> {
    fetch_for_disease(client, MIGRAINE_DISEASE_ID)
}
