use std::path::PathBuf;

use biapp_clinical::patient::PatientDraft;
use biapp_clinical::trend::TrendMetric;
use biapp_core::models::dashboard::{AgeBand, DashboardFilters, DashboardRange};
use biapp_core::models::patient::Sex;
use clap::{Args, Parser, Subcommand};

use crate::config::API_URL_ENV;

#[derive(Debug, Parser)]
#[command(name = "biapp")]
#[command(about = "Chronic migraine patient tracking client", version)]
pub struct Cli {
    /// Backend base URL, overriding the stored config
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the local configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Manage patients
    #[command(subcommand)]
    Patients(PatientCommand),
    /// Show the migraine KPI catalog
    Kpis,
    /// Manage evaluations
    #[command(subcommand)]
    Evaluations(EvaluationCommand),
    /// Show a patient's KPI trends
    Trends {
        patient_id: u64,
        /// Only this metric (migraine_days_month, headache_days_month, ...)
        #[arg(long)]
        metric: Option<TrendMetric>,
    },
    /// Work with AI diagnoses of an evaluation
    #[command(subcommand)]
    Ai(AiCommand),
    /// Show aggregate statistics across patients
    Dashboard(DashboardArgs),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a new config file
    Init {
        /// Timeout for ordinary requests, in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Timeout for AI runs, in seconds
        #[arg(long)]
        ai_timeout_secs: Option<u64>,
        /// Replace an existing config
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config
    Show,
    /// Delete the config file
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum PatientCommand {
    /// List patients
    List {
        /// Only this page instead of every page
        #[arg(long)]
        page: Option<u64>,
    },
    /// Register a patient
    Create(PatientArgs),
    /// Change a patient's details; omitted fields keep their value
    Update {
        id: u64,
        #[command(flatten)]
        fields: PatientArgs,
    },
    /// Delete a patient
    Delete { id: u64 },
}

#[derive(Debug, Clone, Default, Args)]
pub struct PatientArgs {
    /// National ID document, 8 digits
    #[arg(long)]
    pub document_number: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub birth_date: Option<String>,
    /// F, M or O
    #[arg(long, value_parser = parse_sex)]
    pub sex: Option<Sex>,
    #[arg(long)]
    pub weight_kg: Option<String>,
    #[arg(long)]
    pub height_cm: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// 9 digits
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl PatientArgs {
    /// Overlay the given fields onto a form.
    pub fn apply(self, draft: &mut PatientDraft) {
        let fields = [
            (self.document_number, &mut draft.document_number),
            (self.first_name, &mut draft.first_name),
            (self.last_name, &mut draft.last_name),
            (self.birth_date, &mut draft.birth_date),
            (self.weight_kg, &mut draft.weight_kg),
            (self.height_cm, &mut draft.height_cm),
            (self.email, &mut draft.email),
            (self.phone, &mut draft.phone),
            (self.notes, &mut draft.notes),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if self.sex.is_some() {
            draft.sex = self.sex;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum EvaluationCommand {
    /// List a patient's evaluations, newest first
    List { patient_id: u64 },
    /// Summarize one evaluation
    Show { patient_id: u64, evaluation_id: u64 },
    /// Validate a draft file and save it as an evaluation
    Submit {
        patient_id: u64,
        /// JSON draft; KPI values keyed by KPI code
        #[arg(long)]
        file: PathBuf,
        /// Update this evaluation instead of creating one
        #[arg(long)]
        evaluation: Option<u64>,
        /// Validate only, print the payload without sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete an evaluation
    Delete { id: u64 },
    /// Suggested pattern-history months for a patient
    History {
        patient_id: u64,
        /// As of this evaluation date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<jiff::civil::Date>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AiCommand {
    /// Show the diagnoses stored for an evaluation
    List { evaluation_id: u64 },
    /// Run every configured AI tool on an evaluation
    Run { evaluation_id: u64 },
    /// Mark a diagnosis as the doctor's choice
    Select { diagnosis_id: u64 },
    /// Store a diagnosis written by hand
    Save {
        evaluation_id: u64,
        #[arg(long)]
        text: String,
        #[arg(long)]
        tool_id: Option<u64>,
        /// Replace this diagnosis instead of adding one
        #[arg(long)]
        diagnosis: Option<u64>,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct DashboardArgs {
    /// Look-back window in days, or "all"
    #[arg(long, default_value = "all")]
    pub range: DashboardRange,
    #[arg(long, value_parser = parse_sex)]
    pub sex: Option<Sex>,
    #[arg(long)]
    pub has_disease: Option<bool>,
    /// Age band as MIN-MAX, e.g. 18-39
    #[arg(long)]
    pub age: Option<AgeBand>,
}

impl From<DashboardArgs> for DashboardFilters {
    fn from(args: DashboardArgs) -> Self {
        DashboardFilters {
            range: args.range,
            sex: args.sex,
            has_disease: args.has_disease,
            age: args.age,
        }
    }
}

fn parse_sex(raw: &str) -> Result<Sex, String> {
    Sex::from_code(raw).ok_or_else(|| format!("invalid sex '{raw}': expected F, M or O"))
}
