//! biapp-clinical
//!
//! Chronic migraine evaluation rules. Pure data and pure functions with
//! no network dependency. Defines the KPI code registry and groups, the
//! per-code override table, typed value parsing, the evaluation draft and
//! its validation into a submission payload, plus patient form validation
//! and the presentation helpers used to read evaluations back.

pub mod catalog;
pub mod dashboard;
pub mod draft;
pub mod error;
pub mod patient;
pub mod rules;
pub mod summary;
pub mod trend;
pub mod validation;
pub mod value;

pub use draft::EvaluationDraft;
pub use validation::{ValidationErrors, build_submission};
