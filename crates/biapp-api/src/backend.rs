use biapp_core::models::evaluation::{Evaluation, SubmissionPayload};
use biapp_core::models::kpi::KpiDefinition;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::{evaluations, kpis};

/// The backend calls the evaluation form depends on.
pub trait EvaluationBackend: Send + Sync + 'static {
    fn fetch_kpis_for_migraine(&self) -> Result<Vec<KpiDefinition>, ApiError>;

    fn create_evaluation(&self, payload: &SubmissionPayload) -> Result<Evaluation, ApiError>;

    fn update_evaluation(
        &self,
        id: u64,
        payload: &SubmissionPayload,
    ) -> Result<Evaluation, ApiError>;
}

impl EvaluationBackend for ApiClient {
    fn fetch_kpis_for_migraine(&self) -> Result<Vec<KpiDefinition>, ApiError> {
        kpis::fetch_for_migraine(self)
    }

    fn create_evaluation(&self, payload: &SubmissionPayload) -> Result<Evaluation, ApiError> {
        evaluations::create(self, payload)
    }

    fn update_evaluation(
        &self,
        id: u64,
        payload: &SubmissionPayload,
    ) -> Result<Evaluation, ApiError> {
        evaluations::update(self, id, payload)
    }
}
