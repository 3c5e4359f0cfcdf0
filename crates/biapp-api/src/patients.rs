use biapp_core::api_paths;
use biapp_core::models::envelope::{ItemEnvelope, Page, PageResponse};
use biapp_core::models::patient::{Patient, PatientPayload};
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Upper bound on pages walked by [`list_all`].
const MAX_PAGES: u64 = 100;

/// One page of patients. Pages start at 1.
pub fn list(client: &ApiClient, page: u64) -> Result<Page<Patient>, ApiError> {
    let response: PageResponse<Patient> =
        client.get(api_paths::PATIENTS, &[("page", page.to_string())])?;
    Ok(response.into_page())
}

/// Every patient, following pagination.
pub fn list_all(client: &ApiClient) -> Result<Vec<Patient>, ApiError> {
    let mut patients = Vec::new();
    for page_number in 1..=MAX_PAGES {
        let page = list(client, page_number)?;
        let more = page.has_more();
        patients.extend(page.data);
        if !more {
            break;
        }
    }
    Ok(patients)
}

pub fn create(client: &ApiClient, payload: &PatientPayload) -> Result<Patient, ApiError> {
    let created: ItemEnvelope<Patient> = client.post(api_paths::PATIENTS, payload)?;
    let patient = created.into_inner();
    info!(patient_id = patient.id, "patient created");
    Ok(patient)
}

pub fn update(
    client: &ApiClient,
    id: u64,
    payload: &PatientPayload,
) -> Result<Patient, ApiError> {
    let updated: ItemEnvelope<Patient> = client.put(&api_paths::patient(id), payload)?;
    info!(patient_id = id, "patient updated");
    Ok(updated.into_inner())
}

pub fn delete(client: &ApiClient, id: u64) -> Result<(), ApiError> {
    client.delete(&api_paths::patient(id))?;
    info!(patient_id = id, "patient deleted");
    Ok(())
}
