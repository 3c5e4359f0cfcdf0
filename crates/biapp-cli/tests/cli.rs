use biapp_cli::cli::{Cli, Command, EvaluationCommand, PatientArgs, PatientCommand};
use biapp_clinical::patient::PatientDraft;
use biapp_clinical::trend::TrendMetric;
use biapp_core::models::dashboard::{DashboardFilters, DashboardRange};
use biapp_core::models::patient::Sex;
use clap::Parser;

#[test]
fn patient_update_only_touches_given_fields() {
    let cli = Cli::try_parse_from([
        "biapp", "patients", "update", "7", "--phone", "912345678", "--sex", "m",
    ])
    .unwrap();
    let Command::Patients(PatientCommand::Update { id, fields }) = cli.command else {
        panic!("unexpected command");
    };
    assert_eq!(id, 7);

    let mut draft = PatientDraft {
        first_name: "Rosa".to_string(),
        last_name: "Quispe".to_string(),
        phone: "900000000".to_string(),
        ..PatientDraft::default()
    };
    fields.apply(&mut draft);
    assert_eq!(draft.first_name, "Rosa");
    assert_eq!(draft.phone, "912345678");
    assert_eq!(draft.sex, Some(Sex::M));
}

#[test]
fn empty_patient_args_change_nothing() {
    let mut draft = PatientDraft {
        email: "a@b.pe".to_string(),
        sex: Some(Sex::F),
        ..PatientDraft::default()
    };
    let before = draft.clone();
    PatientArgs::default().apply(&mut draft);
    assert_eq!(draft, before);
}

#[test]
fn invalid_sex_is_a_parse_error() {
    assert!(Cli::try_parse_from(["biapp", "patients", "create", "--sex", "X"]).is_err());
}

#[test]
fn dashboard_filters_from_flags() {
    let cli = Cli::try_parse_from([
        "biapp", "dashboard", "--range", "90", "--has-disease", "true", "--age", "18-39",
    ])
    .unwrap();
    let Command::Dashboard(args) = cli.command else {
        panic!("unexpected command");
    };
    let filters: DashboardFilters = args.into();
    assert_eq!(filters.range, DashboardRange::Days(90));
    assert_eq!(filters.has_disease, Some(true));
    assert_eq!(filters.age.map(|a| (a.min, a.max)), Some((18, 39)));
    assert_eq!(filters.sex, None);

    assert!(Cli::try_parse_from(["biapp", "dashboard", "--age", "40-18"]).is_err());
}

#[test]
fn submit_and_trend_arguments() {
    let cli = Cli::try_parse_from([
        "biapp",
        "--api-url",
        "http://localhost:8000/api",
        "evaluations",
        "submit",
        "5",
        "--file",
        "draft.json",
        "--evaluation",
        "31",
    ])
    .unwrap();
    assert_eq!(cli.api_url.as_deref(), Some("http://localhost:8000/api"));
    let Command::Evaluations(EvaluationCommand::Submit {
        patient_id,
        evaluation,
        dry_run,
        ..
    }) = cli.command
    else {
        panic!("unexpected command");
    };
    assert_eq!((patient_id, evaluation, dry_run), (5, Some(31), false));

    let cli = Cli::try_parse_from(["biapp", "trends", "5", "--metric", "disability_score"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Trends { patient_id: 5, metric: Some(TrendMetric::DisabilityScore) }
    ));
}
