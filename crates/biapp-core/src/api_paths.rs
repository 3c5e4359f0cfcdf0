//! REST path conventions.
//!
//! Pure string functions with no HTTP dependency. These define the canonical
//! layout of the backend routes, relative to the API base URL.

pub const PATIENTS: &str = "/patients";

pub const EVALUATIONS: &str = "/evaluations";

pub const KPIS: &str = "/kpis";

pub const DASHBOARD: &str = "/dashboard";

pub fn patient(id: u64) -> String {
    format!("/patients/{id}")
}

pub fn patient_evaluations(patient_id: u64) -> String {
    format!("/patients/{patient_id}/evaluations")
}

pub fn history_suggestion(patient_id: u64) -> String {
    format!("/patients/{patient_id}/evaluations/history-suggestion")
}

pub fn kpi_trends(patient_id: u64) -> String {
    format!("/patients/{patient_id}/kpi-trends")
}

pub fn evaluation(id: u64) -> String {
    format!("/evaluations/{id}")
}

pub fn evaluation_ai_diagnoses(evaluation_id: u64) -> String {
    format!("/evaluations/{evaluation_id}/ai-diagnoses")
}

pub fn run_ai(evaluation_id: u64) -> String {
    format!("/evaluations/{evaluation_id}/run-ai")
}

pub fn ai_diagnosis(id: u64) -> String {
    format!("/ai-diagnoses/{id}")
}

pub fn select_ai_diagnosis(id: u64) -> String {
    format!("/ai-diagnoses/{id}/select")
}

/// Join a base URL and a route path without doubling or dropping the slash.
pub fn join(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
