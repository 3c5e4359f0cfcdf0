pub mod ai_diagnosis;
pub mod dashboard;
pub mod envelope;
pub mod evaluation;
pub mod kpi;
pub mod patient;
pub mod trend;
