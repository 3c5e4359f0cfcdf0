use biapp_core::api_paths;
use biapp_core::models::envelope::{ItemEnvelope, ListEnvelope};
use biapp_core::models::evaluation::{Evaluation, SubmissionPayload};
use jiff::civil::Date;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;

pub fn list_for_patient(client: &ApiClient, patient_id: u64) -> Result<Vec<Evaluation>, ApiError> {
    let envelope: ListEnvelope<Evaluation> =
        client.get(&api_paths::patient_evaluations(patient_id), &[])?;
    Ok(envelope.into_items())
}

pub fn create(client: &ApiClient, payload: &SubmissionPayload) -> Result<Evaluation, ApiError> {
    let created: ItemEnvelope<Evaluation> = client.post(api_paths::EVALUATIONS, payload)?;
    let evaluation = created.into_inner();
    info!(
        evaluation_id = evaluation.id,
        patient_id = payload.patient_id,
        kpis = payload.kpis.len(),
        "evaluation created"
    );
    Ok(evaluation)
}

pub fn update(
    client: &ApiClient,
    id: u64,
    payload: &SubmissionPayload,
) -> Result<Evaluation, ApiError> {
    let updated: ItemEnvelope<Evaluation> = client.put(&api_paths::evaluation(id), payload)?;
    info!(
        evaluation_id = id,
        kpis = payload.kpis.len(),
        "evaluation updated"
    );
    Ok(updated.into_inner())
}

pub fn delete(client: &ApiClient, id: u64) -> Result<(), ApiError> {
    client.delete(&api_paths::evaluation(id))?;
    info!(evaluation_id = id, "evaluation deleted");
    Ok(())
}

/// Suggested pattern-history months for a patient, optionally as of a
/// given evaluation date. The response shape is owned by the backend.
pub fn history_suggestion(
    client: &ApiClient,
    patient_id: u64,
    evaluation_date: Option<Date>,
) -> Result<serde_json::Value, ApiError> {
    let query: Vec<(&str, String)> = evaluation_date
        .map(|d| vec![("evaluation_date", d.to_string())])
        .unwrap_or_default();
    client.get(&api_paths::history_suggestion(patient_id), &query)
}
