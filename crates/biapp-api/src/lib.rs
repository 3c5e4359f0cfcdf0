//! biapp-api
//!
//! Blocking HTTP client for the biapp backend. Thin wrapper around a ureq
//! agent: one module per resource, each a set of free functions taking the
//! shared [`ApiClient`].

pub mod ai;
pub mod backend;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod evaluations;
pub mod kpis;
pub mod patients;
pub mod trends;

pub use backend::EvaluationBackend;
pub use client::{ApiClient, ClientConfig};
pub use error::ApiError;
