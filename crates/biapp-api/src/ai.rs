//! AI diagnoses attached to an evaluation.

use biapp_core::api_paths;
use biapp_core::models::ai_diagnosis::{AiDiagnosis, AiDiagnosisPayload};
use biapp_core::models::envelope::{ItemEnvelope, ListEnvelope};
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;

pub const AZURE_TOOL: &str = "azure";
pub const PERPLEXITY_TOOL: &str = "perplexity";

pub fn list(client: &ApiClient, evaluation_id: u64) -> Result<Vec<AiDiagnosis>, ApiError> {
    let envelope: ListEnvelope<AiDiagnosis> =
        client.get(&api_paths::evaluation_ai_diagnoses(evaluation_id), &[])?;
    Ok(envelope.into_items())
}

/// Ask the backend to run every configured AI tool for an evaluation and
/// store the results. Uses the client's AI timeout.
pub fn run(client: &ApiClient, evaluation_id: u64) -> Result<serde_json::Value, ApiError> {
    info!(evaluation_id, "running AI diagnoses");
    let timeout = client.config().ai_timeout;
    client.post_empty(&api_paths::run_ai(evaluation_id), Some(timeout))
}

/// Mark one diagnosis as the doctor's choice.
pub fn select(client: &ApiClient, diagnosis_id: u64) -> Result<(), ApiError> {
    let _: serde_json::Value = client.post_empty(&api_paths::select_ai_diagnosis(diagnosis_id), None)?;
    info!(diagnosis_id, "AI diagnosis selected");
    Ok(())
}

/// Store a manually entered diagnosis, updating `existing` when given.
pub fn save(
    client: &ApiClient,
    evaluation_id: u64,
    payload: &AiDiagnosisPayload,
    existing: Option<u64>,
) -> Result<AiDiagnosis, ApiError> {
    let saved: ItemEnvelope<AiDiagnosis> = match existing {
        Some(id) => client.put(&api_paths::ai_diagnosis(id), payload)?,
        None => client.post(&api_paths::evaluation_ai_diagnoses(evaluation_id), payload)?,
    };
    Ok(saved.into_inner())
}

/// The diagnoses shown side by side.
#[derive(Debug, Default)]
pub struct DiagnosisPicks<'a> {
    pub azure: Option<&'a AiDiagnosis>,
    pub perplexity: Option<&'a AiDiagnosis>,
    pub selected: Option<&'a AiDiagnosis>,
}

pub fn picks(diagnoses: &[AiDiagnosis]) -> DiagnosisPicks<'_> {
    DiagnosisPicks {
        azure: diagnoses.iter().find(|d| d.is_from_tool(AZURE_TOOL)),
        perplexity: diagnoses.iter().find(|d| d.is_from_tool(PERPLEXITY_TOOL)),
        selected: diagnoses.iter().find(|d| d.selected_by_doctor),
    }
}
