use biapp_clinical::catalog::code;
use biapp_clinical::draft::DraftEdits;
use biapp_clinical::error::ClinicalError;
use biapp_clinical::value::RawValue;
use biapp_clinical::EvaluationDraft;
use biapp_core::models::evaluation::Evaluation;
use biapp_core::models::kpi::{KpiDefinition, KpiType};
use jiff::civil::date;
use serde_json::json;

fn catalog() -> Vec<KpiDefinition> {
    [
        (1, code::HEADACHE_DAYS_MONTH, KpiType::Integer),
        (2, code::MEETS_CM_CRITERIA, KpiType::String),
        (3, "AURA_PRESENCE", KpiType::Boolean),
    ]
    .into_iter()
    .map(|(id, kpi_code, kpi_type)| KpiDefinition {
        id,
        code: kpi_code.to_string(),
        name: kpi_code.to_string(),
        description: None,
        kpi_type,
        min_value: None,
        max_value: None,
        unit: None,
    })
    .collect()
}

fn stored_evaluation() -> Evaluation {
    serde_json::from_value(json!({
        "id": 77,
        "patient_id": 5,
        "evaluation_date": "2025-03-09T00:00:00.000000Z",
        "has_disease": 1,
        "progress_percent": "35.00",
        "doctor_notes": null,
        "kpi_values": [
            { "kpi_id": 1, "value_numeric": "18.00", "value_string": null, "value_boolean": null },
            { "kpi_id": 2, "kpi": { "code": "MEETS_CM_CRITERIA" }, "value_string": "NO" },
            { "kpi_id": 3, "value_boolean": false },
            { "code": "ORPHAN", "value_numeric": 3 },
            { "kpi_id": 9 }
        ]
    }))
    .unwrap()
}

#[test]
fn new_draft_is_dated_today_and_empty() {
    let draft = EvaluationDraft::new(date(2025, 6, 15));
    assert_eq!(draft.evaluation_date, "2025-06-15");
    assert!(!draft.has_disease);
    assert!(draft.progress_percent.is_empty());
    assert!(draft.kpi_values.is_empty());
}

#[test]
fn edit_mode_prefills_scalars_and_values() {
    let evaluation = stored_evaluation();
    let mut draft = EvaluationDraft::from_evaluation(&evaluation, date(2025, 6, 15));
    assert_eq!(draft.evaluation_date, "2025-03-09");
    assert!(draft.has_disease);
    assert_eq!(draft.progress_percent, "35");
    assert_eq!(draft.doctor_notes, "");
    assert!(draft.kpi_values.is_empty());

    let applied = draft.prefill_kpis(&evaluation);
    assert_eq!(applied, 3);
    assert_eq!(draft.value(1), Some(&RawValue::Number(18.0)));
    assert_eq!(draft.value(2), Some(&RawValue::Text("NO".to_string())));
    assert_eq!(draft.value(3), Some(&RawValue::Bool(false)));
    assert_eq!(draft.value(9), None);
}

#[test]
fn unparseable_stored_date_falls_back_to_today() {
    let mut evaluation = stored_evaluation();
    evaluation.evaluation_date = Some("soon".to_string());
    let draft = EvaluationDraft::from_evaluation(&evaluation, date(2025, 6, 15));
    assert_eq!(draft.evaluation_date, "2025-06-15");
}

#[test]
fn boolean_edits_are_coerced() {
    let catalog = catalog();
    let mut draft = EvaluationDraft::new(date(2025, 6, 15));

    draft.set_by_code(&catalog, "AURA_PRESENCE", "0".into()).unwrap();
    assert_eq!(draft.value(3), Some(&RawValue::Bool(false)));

    draft.set_by_code(&catalog, "AURA_PRESENCE", 1.0.into()).unwrap();
    assert_eq!(draft.value(3), Some(&RawValue::Bool(true)));

    // Numeric KPIs keep text as typed.
    draft.set_by_code(&catalog, code::HEADACHE_DAYS_MONTH, "0".into()).unwrap();
    assert_eq!(draft.value(1), Some(&RawValue::Text("0".to_string())));

    assert_eq!(draft.clear_value(1), Some(RawValue::Text("0".to_string())));
    assert_eq!(draft.value(1), None);
}

#[test]
fn unknown_code_is_an_error() {
    let catalog = catalog();
    let mut draft = EvaluationDraft::new(date(2025, 6, 15));
    let err = draft
        .set_by_code(&catalog, "NOT_A_KPI", "1".into())
        .unwrap_err();
    assert!(matches!(err, ClinicalError::UnknownKpiCode(c) if c == "NOT_A_KPI"));
}

#[test]
fn draft_edits_apply_by_code() {
    let catalog = catalog();
    let mut draft = EvaluationDraft::new(date(2025, 6, 15));
    draft.set_by_code(&catalog, code::MEETS_CM_CRITERIA, "YES".into()).unwrap();

    let edits: DraftEdits = serde_json::from_value(json!({
        "evaluation_date": "2025-06-01",
        "has_disease": true,
        "progress_percent": 55,
        "doctor_notes": "Stable",
        "kpis": {
            "HEADACHE_DAYS_MONTH": 14,
            "AURA_PRESENCE": true,
            "MEETS_CM_CRITERIA": null
        }
    }))
    .unwrap();
    edits.apply(&mut draft, &catalog).unwrap();

    assert_eq!(draft.evaluation_date, "2025-06-01");
    assert!(draft.has_disease);
    assert_eq!(draft.progress_percent, "55");
    assert_eq!(draft.doctor_notes, "Stable");
    assert_eq!(draft.value(1), Some(&RawValue::Number(14.0)));
    assert_eq!(draft.value(2), None);
    assert_eq!(draft.value(3), Some(&RawValue::Bool(true)));
}

#[test]
fn draft_edits_with_unknown_code_leave_draft_untouched() {
    let catalog = catalog();
    let mut draft = EvaluationDraft::new(date(2025, 6, 15));
    let before = draft.clone();

    let edits: DraftEdits = serde_json::from_value(json!({
        "doctor_notes": "changed",
        "kpis": { "MYSTERY": 1 }
    }))
    .unwrap();
    assert!(edits.apply(&mut draft, &catalog).is_err());
    assert_eq!(draft, before);
}
