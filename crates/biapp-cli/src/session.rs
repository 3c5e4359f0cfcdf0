//! The evaluation form's lifecycle: catalog load, edits, and a single-flight
//! submit against the backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use biapp_api::{ApiError, EvaluationBackend};
use biapp_clinical::draft::DraftEdits;
use biapp_clinical::error::ClinicalError;
use biapp_clinical::value::RawValue;
use biapp_clinical::{EvaluationDraft, ValidationErrors, build_submission};
use biapp_core::models::evaluation::{Evaluation, SubmissionPayload};
use biapp_core::models::kpi::KpiDefinition;
use jiff::civil::Date;
use tracing::{debug, error, info};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to load the KPI catalog")]
    CatalogLoad(#[source] ApiError),

    #[error("KPI catalog is not available: {0}")]
    CatalogUnavailable(String),

    #[error("the evaluation has errors:\n{0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Edit(#[from] ClinicalError),

    #[error("saving the evaluation failed")]
    Submission(#[source] ApiError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    #[default]
    NotLoaded,
    Loaded(Vec<KpiDefinition>),
    /// Message of the load failure.
    Failed(String),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Created(Evaluation),
    Updated(Evaluation),
    /// Another submit was still in flight; nothing was sent.
    AlreadySaving,
}

/// Clears the saving flag when dropped. It travels with the backend call, so
/// the flag stays set until the request returns even if the caller stops
/// waiting for it.
struct SavingGuard(Arc<AtomicBool>);

impl SavingGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SavingGuard(Arc::clone(flag)))
    }
}

impl Drop for SavingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct EvaluationFormSession<B: EvaluationBackend> {
    backend: Arc<B>,
    patient_id: u64,
    /// Set in edit mode; submit then updates this evaluation.
    existing: Option<Arc<Evaluation>>,
    catalog: CatalogState,
    draft: EvaluationDraft,
    saving: Arc<AtomicBool>,
}

impl<B: EvaluationBackend> EvaluationFormSession<B> {
    /// A blank form for a new evaluation.
    pub fn new(backend: Arc<B>, patient_id: u64, today: Date) -> Self {
        EvaluationFormSession {
            backend,
            patient_id,
            existing: None,
            catalog: CatalogState::NotLoaded,
            draft: EvaluationDraft::new(today),
            saving: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A form editing `evaluation`. Its KPI values are applied once the
    /// catalog has loaded.
    pub fn edit(backend: Arc<B>, patient_id: u64, evaluation: Evaluation, today: Date) -> Self {
        EvaluationFormSession {
            backend,
            patient_id,
            draft: EvaluationDraft::from_evaluation(&evaluation, today),
            existing: Some(Arc::new(evaluation)),
            catalog: CatalogState::NotLoaded,
            saving: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn existing(&self) -> Option<&Evaluation> {
        self.existing.as_deref()
    }

    pub fn draft(&self) -> &EvaluationDraft {
        &self.draft
    }

    pub fn catalog_state(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// Fetch the migraine KPI catalog. In edit mode the stored KPI values
    /// are applied to the draft afterwards. Returns the catalog size.
    pub async fn load_catalog(&mut self) -> Result<usize, SessionError> {
        let backend = Arc::clone(&self.backend);
        let result = tokio::task::spawn_blocking(move || backend.fetch_kpis_for_migraine()).await?;

        match result {
            Ok(catalog) => {
                let count = catalog.len();
                if let Some(existing) = &self.existing {
                    let applied = self.draft.prefill_kpis(existing);
                    debug!(evaluation_id = existing.id, applied, "prefilled stored KPI values");
                }
                self.catalog = CatalogState::Loaded(catalog);
                info!(kpis = count, "KPI catalog loaded");
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "failed to load KPI catalog");
                self.catalog = CatalogState::Failed(e.to_string());
                Err(SessionError::CatalogLoad(e))
            }
        }
    }

    /// Record one edit addressed by KPI code.
    pub fn set_value(&mut self, kpi_code: &str, raw: RawValue) -> Result<(), SessionError> {
        let catalog = loaded(&self.catalog)?;
        self.draft.set_by_code(catalog, kpi_code, raw)?;
        Ok(())
    }

    /// Apply a batch of edits. Nothing is applied when one names an
    /// unknown KPI code.
    pub fn apply_edits(&mut self, edits: DraftEdits) -> Result<(), SessionError> {
        let catalog = loaded(&self.catalog)?;
        edits.apply(&mut self.draft, catalog)?;
        Ok(())
    }

    /// Validate the draft into the payload `submit` would send.
    pub fn preview(&self, today: Date) -> Result<SubmissionPayload, SessionError> {
        let catalog = loaded(&self.catalog)?;
        let payload = build_submission(self.patient_id, catalog, &self.draft, today)
            .inspect_err(|errors| debug!(count = errors.len(), "evaluation did not validate"))?;
        Ok(payload)
    }

    /// Validate the draft and send it, creating or updating the evaluation.
    ///
    /// A call made while another is in flight returns
    /// [`SubmitOutcome::AlreadySaving`]. A request that has started runs to
    /// completion even when this future is dropped, and the form stays busy
    /// until it does. On any failure the draft is left as it was, ready for
    /// another attempt.
    pub async fn submit(&self, today: Date) -> Result<SubmitOutcome, SessionError> {
        let payload = self.preview(today)?;

        let Some(guard) = SavingGuard::acquire(&self.saving) else {
            debug!(patient_id = self.patient_id, "submit ignored, already saving");
            return Ok(SubmitOutcome::AlreadySaving);
        };

        let backend = Arc::clone(&self.backend);
        let existing_id = self.existing.as_ref().map(|e| e.id);
        let kpis = payload.kpis.len();
        let result = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            match existing_id {
                Some(id) => backend
                    .update_evaluation(id, &payload)
                    .map(SubmitOutcome::Updated),
                None => backend
                    .create_evaluation(&payload)
                    .map(SubmitOutcome::Created),
            }
        })
        .await?;

        match result {
            Ok(outcome) => {
                info!(patient_id = self.patient_id, kpis, "evaluation saved");
                Ok(outcome)
            }
            Err(e) => {
                error!(patient_id = self.patient_id, error = %e, "failed to save evaluation");
                Err(SessionError::Submission(e))
            }
        }
    }
}

fn loaded(state: &CatalogState) -> Result<&[KpiDefinition], SessionError> {
    match state {
        CatalogState::Loaded(catalog) => Ok(catalog),
        CatalogState::NotLoaded => Err(SessionError::CatalogUnavailable(
            "the catalog has not been loaded".to_string(),
        )),
        CatalogState::Failed(reason) => Err(SessionError::CatalogUnavailable(reason.clone())),
    }
}
