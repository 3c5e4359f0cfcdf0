use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },
}
