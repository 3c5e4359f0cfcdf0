use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClinicalError {
    #[error("unknown KPI code: {0}")]
    UnknownKpiCode(String),
}
