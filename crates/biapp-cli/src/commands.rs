//! Command handlers. Results go to stdout; logs go to stderr.

use std::sync::Arc;

use biapp_api::{ApiClient, ai, dashboard, evaluations, kpis, patients, trends};
use biapp_clinical::catalog::{self, GroupedCatalog};
use biapp_clinical::dashboard::DashboardView;
use biapp_clinical::draft::DraftEdits;
use biapp_clinical::patient::{PatientDraft, validate_patient};
use biapp_clinical::rules;
use biapp_clinical::summary::{newest_first, summarize};
use biapp_clinical::trend::{self, TrendMetric};
use biapp_core::dates;
use biapp_core::models::ai_diagnosis::{AiDiagnosis, AiDiagnosisPayload};
use biapp_core::models::evaluation::Evaluation;
use biapp_core::models::kpi::KpiDefinition;
use eyre::{Result, WrapErr, bail, eyre};
use jiff::civil::Date;
use tracing::warn;

use crate::cli::{AiCommand, Cli, Command, ConfigCommand, EvaluationCommand, PatientCommand};
use crate::config::{self, CliConfig};
use crate::session::{EvaluationFormSession, SessionError, SubmitOutcome};

pub fn run(cli: Cli) -> Result<()> {
    let today = jiff::Zoned::now().date();
    let api_url = cli.api_url.as_deref();
    let client = || -> Result<ApiClient> {
        let stored = config::load_or_default()?;
        Ok(ApiClient::new(stored.client_config(api_url)))
    };

    match cli.command {
        Command::Config(command) => run_config(command, api_url),
        Command::Patients(command) => run_patients(&client()?, command, today),
        Command::Kpis => show_kpis(&client()?),
        Command::Evaluations(command) => run_evaluations(&client()?, command, today),
        Command::Trends { patient_id, metric } => show_trends(&client()?, patient_id, metric),
        Command::Ai(command) => run_ai(&client()?, command),
        Command::Dashboard(args) => {
            let data = dashboard::fetch(&client()?, &args.into(), today)?;
            print_dashboard(&DashboardView::from_json(&data));
            Ok(())
        }
    }
}

fn run_config(command: ConfigCommand, api_url: Option<&str>) -> Result<()> {
    let dir = config::config_dir()?;
    match command {
        ConfigCommand::Init {
            timeout_secs,
            ai_timeout_secs,
            force,
        } => {
            if !force && config::load_from(&dir)?.is_some() {
                bail!("a config already exists in {}; pass --force to replace it", dir.display());
            }
            let mut new = match api_url {
                Some(url) => CliConfig::new(url),
                None => CliConfig::default(),
            };
            if let Some(secs) = timeout_secs {
                new.timeout_secs = secs;
            }
            if let Some(secs) = ai_timeout_secs {
                new.ai_timeout_secs = secs;
            }
            let path = config::save_to(&dir, &new)?;
            println!("Wrote {}", path.display());
        }
        ConfigCommand::Show => {
            let stored = config::load_from(&dir)?;
            let source = if stored.is_some() { "stored" } else { "defaults" };
            let effective = stored.unwrap_or_default();
            let client = effective.client_config(api_url);
            println!("Config dir:  {} ({source})", dir.display());
            println!("API URL:     {}", client.base_url);
            println!("Timeout:     {}s", client.timeout.as_secs());
            println!("AI timeout:  {}s", client.ai_timeout.as_secs());
            println!("Created:     {}", effective.created_at);
        }
        ConfigCommand::Reset => {
            config::delete_in(&dir)?;
            println!("Config removed");
        }
    }
    Ok(())
}

fn run_patients(client: &ApiClient, command: PatientCommand, today: Date) -> Result<()> {
    match command {
        PatientCommand::List { page } => {
            let list = match page {
                Some(page) => patients::list(client, page)?.data,
                None => patients::list_all(client)?,
            };
            if list.is_empty() {
                println!("No patients found.");
            }
            for patient in list {
                println!(
                    "{:>5}  {:<30} {:<9} {}",
                    patient.id,
                    patient.full_name(),
                    patient.document_number.as_deref().unwrap_or("-"),
                    patient
                        .birth_date
                        .as_deref()
                        .map(dates::display_date)
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
        }
        PatientCommand::Create(fields) => {
            let mut draft = PatientDraft::default();
            fields.apply(&mut draft);
            let payload = validate_patient(&draft, today).map_err(|e| eyre!("{e}"))?;
            let patient = patients::create(client, &payload)?;
            println!("Created patient {} ({})", patient.id, patient.full_name());
        }
        PatientCommand::Update { id, fields } => {
            let current = patients::list_all(client)?
                .into_iter()
                .find(|p| p.id == id)
                .ok_or_else(|| eyre!("patient {id} not found"))?;
            let mut draft = PatientDraft::from_patient(&current);
            fields.apply(&mut draft);
            let payload = validate_patient(&draft, today).map_err(|e| eyre!("{e}"))?;
            let patient = patients::update(client, id, &payload)?;
            println!("Updated patient {} ({})", patient.id, patient.full_name());
        }
        PatientCommand::Delete { id } => {
            patients::delete(client, id)?;
            println!("Deleted patient {id}");
        }
    }
    Ok(())
}

fn show_kpis(client: &ApiClient) -> Result<()> {
    let catalog = kpis::fetch_for_migraine(client)?;
    let GroupedCatalog { groups, ungrouped } = catalog::group_catalog(&catalog);

    for (group, members) in groups {
        println!("{}", group.title);
        for kpi in members {
            print_kpi(kpi);
        }
        println!();
    }
    if !ungrouped.is_empty() {
        println!("Other");
        for kpi in ungrouped {
            print_kpi(kpi);
        }
    }
    Ok(())
}

fn print_kpi(kpi: &KpiDefinition) {
    println!("  {:<30} {}", kpi.code, catalog::display_name(kpi));
    if let Some(description) = catalog::display_description(kpi) {
        println!("  {:<30} {description}", "");
    }
    if let Some(options) = rules::select_options(&kpi.code) {
        let values: Vec<&str> = options.iter().map(|o| o.value).collect();
        println!("  {:<30} one of: {}", "", values.join(", "));
    } else if let Some(hint) = rules::range_hint(kpi) {
        println!("  {:<30} {hint}", "");
    }
}

fn run_evaluations(client: &ApiClient, command: EvaluationCommand, today: Date) -> Result<()> {
    match command {
        EvaluationCommand::List { patient_id } => {
            let mut list = evaluations::list_for_patient(client, patient_id)?;
            newest_first(&mut list);
            if list.is_empty() {
                println!("No evaluations found.");
            }
            for ev in list {
                println!(
                    "{:>5}  {:<10}  migraine: {:<8} headache: {:<8} progress: {}",
                    ev.id,
                    ev.evaluation_date
                        .as_deref()
                        .map(dates::display_date)
                        .unwrap_or_default(),
                    number_text(ev.migraine_days_month),
                    number_text(ev.headache_days_month),
                    ev.progress_percent
                        .map(|p| format!("{p}%"))
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
        }
        EvaluationCommand::Show {
            patient_id,
            evaluation_id,
        } => {
            let evaluation = find_evaluation(client, patient_id, evaluation_id)?;
            println!(
                "Evaluation {} of {}",
                evaluation.id,
                evaluation
                    .evaluation_date
                    .as_deref()
                    .map(dates::display_date)
                    .unwrap_or_default()
            );
            for section in summarize(&evaluation) {
                println!();
                println!("{}", section.title);
                for item in section.items {
                    println!("  {}: {}", item.label, item.value);
                }
            }
            if let Some(notes) = evaluation.doctor_notes.filter(|n| !n.trim().is_empty()) {
                println!();
                println!("Notes: {notes}");
            }
        }
        EvaluationCommand::Submit {
            patient_id,
            file,
            evaluation,
            dry_run,
        } => {
            let contents = std::fs::read_to_string(&file)
                .wrap_err_with(|| format!("failed to read {}", file.display()))?;
            let edits: DraftEdits = serde_json::from_str(&contents)
                .wrap_err_with(|| format!("{} is not a valid draft", file.display()))?;
            let existing = evaluation
                .map(|id| find_evaluation(client, patient_id, id))
                .transpose()?;

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(submit_draft(
                client.clone(),
                patient_id,
                existing,
                edits,
                dry_run,
                today,
            ))?;
        }
        EvaluationCommand::Delete { id } => {
            evaluations::delete(client, id)?;
            println!("Deleted evaluation {id}");
        }
        EvaluationCommand::History { patient_id, date } => {
            let suggestion = evaluations::history_suggestion(client, patient_id, date)?;
            println!("{}", serde_json::to_string_pretty(&suggestion)?);
        }
    }
    Ok(())
}

async fn submit_draft(
    client: ApiClient,
    patient_id: u64,
    existing: Option<Evaluation>,
    edits: DraftEdits,
    dry_run: bool,
    today: Date,
) -> Result<()> {
    let backend = Arc::new(client);
    let mut session = match existing {
        Some(evaluation) => EvaluationFormSession::edit(backend, patient_id, evaluation, today),
        None => EvaluationFormSession::new(backend, patient_id, today),
    };
    session.load_catalog().await?;
    session.apply_edits(edits)?;

    if dry_run {
        let payload = session.preview(today).map_err(|e| eyre!("{e}"))?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    match session.submit(today).await {
        Ok(SubmitOutcome::Created(ev)) => println!("Created evaluation {}", ev.id),
        Ok(SubmitOutcome::Updated(ev)) => println!("Updated evaluation {}", ev.id),
        Ok(SubmitOutcome::AlreadySaving) => println!("A save is already in progress"),
        Err(SessionError::Validation(errors)) => {
            for message in &errors.messages {
                eprintln!("  - {message}");
            }
            bail!("evaluation not saved: {} problem(s)", errors.len());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn find_evaluation(client: &ApiClient, patient_id: u64, evaluation_id: u64) -> Result<Evaluation> {
    evaluations::list_for_patient(client, patient_id)?
        .into_iter()
        .find(|e| e.id == evaluation_id)
        .ok_or_else(|| eyre!("evaluation {evaluation_id} not found for patient {patient_id}"))
}

fn number_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn show_trends(client: &ApiClient, patient_id: u64, metric: Option<TrendMetric>) -> Result<()> {
    let entries = trends::fetch(client, patient_id)?;
    let entries = match evaluations::list_for_patient(client, patient_id) {
        Ok(list) => trend::merge_history(entries, &list),
        Err(e) => {
            warn!(patient_id, error = %e, "could not load evaluations, using reported history");
            entries
        }
    };

    let metrics: Vec<TrendMetric> = match metric {
        Some(metric) => vec![metric],
        None => TrendMetric::ALL.to_vec(),
    };
    for metric in metrics {
        let series = trend::series(&entries, metric);
        println!("{} ({})", metric.label(), metric.unit());
        if series.is_empty() {
            println!("  no data");
        }
        for point in &series.points {
            println!("  {:<6} {}", point.label, point.value);
        }
        if !series.is_empty() && !series.has_trend() {
            println!("  (at least {} evaluations are needed for a trend)", trend::MIN_TREND_POINTS);
        }
        println!();
    }

    println!("Pattern history (months)");
    for entry in &entries {
        let label = entry
            .evaluation_date
            .as_deref()
            .map(dates::display_date)
            .unwrap_or_default();
        println!("  {:<10} {}", label, number_text(trend::history_months(entry)));
    }
    Ok(())
}

fn run_ai(client: &ApiClient, command: AiCommand) -> Result<()> {
    match command {
        AiCommand::List { evaluation_id } => {
            let diagnoses = ai::list(client, evaluation_id)?;
            print_diagnoses(&diagnoses);
        }
        AiCommand::Run { evaluation_id } => {
            ai::run(client, evaluation_id)?;
            let diagnoses = ai::list(client, evaluation_id)?;
            print_diagnoses(&diagnoses);
        }
        AiCommand::Select { diagnosis_id } => {
            ai::select(client, diagnosis_id)?;
            println!("Selected diagnosis {diagnosis_id}");
        }
        AiCommand::Save {
            evaluation_id,
            text,
            tool_id,
            diagnosis,
        } => {
            if text.trim().is_empty() {
                bail!("diagnosis text is empty");
            }
            let payload = AiDiagnosisPayload {
                ai_tool_id: tool_id,
                response_text: text.trim().to_string(),
            };
            let saved = ai::save(client, evaluation_id, &payload, diagnosis)?;
            println!("Saved diagnosis {}", saved.id);
        }
    }
    Ok(())
}

fn print_diagnoses(diagnoses: &[AiDiagnosis]) {
    if diagnoses.is_empty() {
        println!("No AI diagnoses yet.");
        return;
    }
    let picks = ai::picks(diagnoses);
    for (title, pick) in [("Azure OpenAI", picks.azure), ("Perplexity", picks.perplexity)] {
        println!("{title}");
        match pick {
            Some(d) => {
                let marker = if d.selected_by_doctor { " (selected)" } else { "" };
                println!("  #{}{marker}", d.id);
                println!("  {}", d.response_text.as_deref().unwrap_or("-"));
            }
            None => println!("  no result"),
        }
    }
    if let Some(selected) = picks.selected {
        println!();
        println!(
            "Doctor's choice: #{} ({})",
            selected.id,
            selected.tool_name().unwrap_or("manual")
        );
    }
}

fn print_dashboard(view: &DashboardView) {
    if !view.summary.is_empty() {
        println!("Summary");
        for (label, value) in &view.summary {
            println!("  {label}: {value}");
        }
        println!();
    }
    if !view.trends.is_empty() {
        println!("Monthly trend");
        for row in &view.trends {
            println!(
                "  {}  migraine: {:<8} headache: {}",
                row.period,
                number_text(row.migraine_days),
                number_text(row.headache_days)
            );
        }
        println!();
    }
    for distribution in &view.distributions {
        println!("{}", distribution.title);
        for item in &distribution.items {
            println!("  {}: {}", item.label, item.count);
        }
        println!();
    }
    for group in &view.alerts {
        println!("{}", group.title);
        for row in &group.rows {
            println!(
                "  #{} {} {} migraine days: {} acute medication days: {}",
                row.evaluation_id,
                row.evaluation_date,
                row.patient_name,
                row.migraine_days,
                row.acute_medication_days
            );
        }
        println!();
    }
}
