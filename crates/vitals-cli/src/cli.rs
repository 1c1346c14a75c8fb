//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use vitals_model::{PatientSnapshot, VitalSigns};

#[derive(Parser)]
#[command(
    name = "vitals",
    version,
    about = "Vital-sign export processing, live feed monitoring and risk assessment",
    long_about = "Process patient-monitor exports into annotated CSV tables, follow a live\n\
                  tab-separated vitals feed, keep a JSON patient record store and run a\n\
                  risk classifier on a patient snapshot."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "compact",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Settings file (default: the platform configuration folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Turn a monitor export into `<name>_processed.csv`.
    Process(ProcessArgs),

    /// Manage the patient record store.
    #[command(subcommand)]
    Record(RecordCommand),

    /// Follow the live vitals feed.
    Feed(FeedArgs),

    /// Show the classifier input built from a patient snapshot.
    Features(SnapshotArgs),

    /// Run the risk classifier on a patient snapshot.
    Assess(AssessArgs),
}

#[derive(Args)]
pub struct ProcessArgs {
    /// Rich-text (or plain-text) monitor export.
    #[arg(value_name = "EXPORT")]
    pub export: PathBuf,

    /// Patient weight in kilograms.
    #[arg(long)]
    pub weight: String,

    /// Patient height in metres.
    #[arg(long)]
    pub height: String,

    /// Body temperature in degrees Celsius.
    #[arg(long)]
    pub temperature: String,

    /// Also store the visit under this case ID.
    #[arg(long = "case-id", value_name = "ID")]
    pub case_id: Option<String>,

    #[arg(long, default_value = "")]
    pub gender: String,

    #[arg(long, default_value = "")]
    pub age: String,

    /// Record store (overrides the settings file).
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Number of annotated rows to show.
    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

#[derive(Subcommand)]
pub enum RecordCommand {
    /// Validate a patient and append it to the store.
    Add(RecordAddArgs),

    /// List stored patients.
    List(RecordListArgs),

    /// Delete every record with the given case ID.
    Delete(RecordDeleteArgs),
}

#[derive(Args)]
pub struct RecordAddArgs {
    #[command(flatten)]
    pub patient: PatientArgs,

    /// Assess the patient with this model and store the result too.
    #[arg(long, value_name = "MODEL")]
    pub model: Option<PathBuf>,

    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,
}

#[derive(Args)]
pub struct RecordListArgs {
    /// Only records with this case ID.
    #[arg(long = "case-id", value_name = "ID")]
    pub case_id: Option<String>,

    /// Print the records as JSON.
    #[arg(long)]
    pub json: bool,

    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,
}

#[derive(Args)]
pub struct RecordDeleteArgs {
    #[arg(value_name = "CASE_ID")]
    pub case_id: String,

    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,
}

/// Patient fields as entered on the command line.
#[derive(Args)]
pub struct PatientArgs {
    #[arg(long = "case-id", value_name = "ID")]
    pub case_id: String,
    #[arg(long, default_value = "")]
    pub gender: String,
    #[arg(long, default_value = "")]
    pub age: String,
    /// Height in centimetres.
    #[arg(long, default_value = "")]
    pub height: String,
    /// Weight in kilograms.
    #[arg(long, default_value = "")]
    pub weight: String,
    #[arg(long, default_value = "")]
    pub temperature: String,
    #[arg(long = "heart-rate", default_value = "")]
    pub heart_rate: String,
    #[arg(long, default_value = "")]
    pub systolic: String,
    #[arg(long, default_value = "")]
    pub diastolic: String,
    #[arg(long, default_value = "")]
    pub spo2: String,
    #[arg(long = "respiratory-rate", default_value = "")]
    pub respiratory_rate: String,
}

impl PatientArgs {
    pub fn to_snapshot(&self) -> PatientSnapshot {
        PatientSnapshot {
            case_id: self.case_id.clone(),
            gender: self.gender.clone(),
            age: self.age.clone(),
            height: self.height.clone(),
            weight: self.weight.clone(),
            temperature: self.temperature.clone(),
            vital_signs: VitalSigns {
                timestamp: None,
                heart_rate: self.heart_rate.clone(),
                systolic_bp: self.systolic.clone(),
                diastolic_bp: self.diastolic.clone(),
                spo2: self.spo2.clone(),
                respiratory_rate: self.respiratory_rate.clone(),
                temperature: self.temperature.clone(),
            },
        }
    }
}

#[derive(Args)]
pub struct FeedArgs {
    /// Feed file to try; repeat to try several in order (overrides the settings file).
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    #[arg(long, value_enum)]
    pub mode: Option<FeedModeArg>,

    /// Stop after this many readings.
    #[arg(long, value_name = "N")]
    pub count: Option<usize>,

    /// Delay used when the feed's time column cannot pace playback.
    #[arg(long = "delay-ms", value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Temperature attached to each reading.
    #[arg(long)]
    pub temperature: Option<String>,
}

#[derive(Args)]
pub struct SnapshotArgs {
    /// Patient snapshot as JSON.
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,
}

#[derive(Args)]
pub struct AssessArgs {
    /// Patient snapshot as JSON.
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Logistic model description (JSON).
    #[arg(long, value_name = "MODEL")]
    pub model: PathBuf,

    /// Append the patient and the assessment to the record store.
    #[arg(long)]
    pub save: bool,

    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Print the assessment as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FeedModeArg {
    /// Replay the file once, paced by its time column.
    Playback,
    /// Follow the file's last line.
    Tail,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
