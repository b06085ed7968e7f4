//! PathMapper CLI - Command-line interface for PathMapper
//!
//! Commands:
//! - normalize: Turn export files into the canonical `{ routes, placeVisits }` JSON
//! - activities: List the activity types present in the input
//! - doctor: Diagnose an export directory
//! - schema: Print the output schema

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pathmapper::filter::{activity_label, ActivitySelection, RouteFilter};
use pathmapper::source::{discover_files, load_documents, SourceConfig, DEFAULT_DATA_DIR};
use pathmapper::{
    directory_to_batch, BatchStats, NormalizedBatch, Normalizer, PathMapperError, SourceError,
    PATHMAPPER_VERSION, PRODUCER_NAME,
};

/// PathMapper - Location-history normalization for map rendering
#[derive(Parser)]
#[command(name = "pathmapper")]
#[command(version = PATHMAPPER_VERSION)]
#[command(about = "Normalize location-history exports into routes and place visits", long_about = None)]
struct Cli {
    /// Enable debug diagnostics (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize export files into canonical JSON
    Normalize {
        /// Export directory, single JSON file, or - for stdin
        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Keep only routes of this activity type ("all" keeps everything)
        #[arg(long)]
        activity: Option<String>,

        /// Drop routes of this activity type, in addition to the defaults (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Keep types hidden from the map by default (e.g. IN_SUBWAY)
        #[arg(long)]
        all: bool,

        /// Omit place visits from the output
        #[arg(long)]
        hide_place_visits: bool,
    },

    /// List activity types present in the input
    Activities {
        /// Export directory, single JSON file, or - for stdin
        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        input: PathBuf,

        /// Include types hidden from the map by default (e.g. IN_SUBWAY)
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose an export directory
    Doctor {
        /// Export directory to check
        #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the output schema
    Schema {
        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(cli: Cli) -> Result<(), PathMapperCliError> {
    match cli.command {
        Commands::Normalize {
            input,
            output,
            format,
            activity,
            exclude,
            all,
            hide_place_visits,
        } => {
            let base = if all {
                RouteFilter::new().with_excluded(Vec::new())
            } else {
                RouteFilter::new()
            };
            let filter = base
                .with_activity(
                    activity
                        .as_deref()
                        .map(ActivitySelection::parse)
                        .unwrap_or_default(),
                )
                .also_excluding(exclude)
                .with_place_visits(!hide_place_visits);
            cmd_normalize(&input, &output, &format, &filter)
        }

        Commands::Activities { input, all, json } => cmd_activities(&input, all, json),

        Commands::Doctor { input, json } => cmd_doctor(&input, json),

        Commands::Schema { json_schema } => cmd_schema(json_schema),
    }
}

fn cmd_normalize(
    input: &Path,
    output: &Path,
    format: &OutputFormat,
    filter: &RouteFilter,
) -> Result<(), PathMapperCliError> {
    let batch = load_batch(input)?;
    if batch.is_empty() {
        return Err(PathMapperCliError::NoRecords);
    }

    let batch = filter.apply(&batch);
    let output_data = match format {
        OutputFormat::Json => serde_json::to_string(&batch)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&batch)?,
    };

    if output.to_string_lossy() == "-" {
        println!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_activities(input: &Path, all: bool, json: bool) -> Result<(), PathMapperCliError> {
    let batch = load_batch(input)?;
    let filter = if all {
        RouteFilter::new().with_excluded(Vec::new())
    } else {
        RouteFilter::default()
    };
    let visible = filter.visible_activity_types(&batch);

    let stats = BatchStats::from_batch(&batch);
    let entries: Vec<ActivityEntry> = stats
        .activities
        .into_iter()
        .filter(|a| visible.contains(&a.activity_type))
        .map(|a| ActivityEntry {
            label: activity_label(Some(a.activity_type.as_str())),
            activity_type: a.activity_type,
            routes: a.routes,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No activity types found");
    } else {
        for entry in &entries {
            println!(
                "{:<24} {:<24} {} routes",
                entry.activity_type, entry.label, entry.routes
            );
        }
    }

    Ok(())
}

fn cmd_doctor(input: &Path, json: bool) -> Result<(), PathMapperCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();
    let mut summary: Option<BatchStats> = None;

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("PathMapper version {}", PATHMAPPER_VERSION),
    });

    let config = SourceConfig::new(input);
    match discover_files(&config) {
        Err(e) => {
            let name = match e {
                SourceError::NoFiles(_) => "files",
                _ => "directory",
            };
            checks.push(DoctorCheck {
                name: name.to_string(),
                status: CheckStatus::Error,
                message: e.to_string(),
            });
        }
        Ok(files) => {
            checks.push(DoctorCheck {
                name: "directory".to_string(),
                status: CheckStatus::Ok,
                message: format!("{} exists", input.display()),
            });
            checks.push(DoctorCheck {
                name: "files".to_string(),
                status: CheckStatus::Ok,
                message: format!("{} JSON files found", files.len()),
            });

            let loaded = load_documents(&config)?;
            checks.push(if loaded.failures.is_empty() {
                DoctorCheck {
                    name: "parse".to_string(),
                    status: CheckStatus::Ok,
                    message: "All files parsed".to_string(),
                }
            } else {
                DoctorCheck {
                    name: "parse".to_string(),
                    status: CheckStatus::Warning,
                    message: format!(
                        "{} of {} files could not be parsed (first: {})",
                        loaded.failures.len(),
                        loaded.files_found(),
                        loaded.failures[0].path.display()
                    ),
                }
            });

            let batch = Normalizer::normalize_all(loaded.values());
            let stats = BatchStats::from_batch(&batch);
            checks.push(if batch.is_empty() {
                DoctorCheck {
                    name: "records".to_string(),
                    status: CheckStatus::Error,
                    message: "Files were found but produced zero routes or place visits"
                        .to_string(),
                }
            } else {
                DoctorCheck {
                    name: "records".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "{} routes ({} points), {} place visits, {} activity types",
                        stats.routes,
                        stats.route_points,
                        stats.place_visits,
                        stats.activities.len()
                    ),
                }
            });

            if let (Some(start), Some(end)) = (stats.earliest_start, stats.latest_end) {
                checks.push(DoctorCheck {
                    name: "time_span".to_string(),
                    status: CheckStatus::Ok,
                    message: format!("{} to {}", start.to_rfc3339(), end.to_rfc3339()),
                });
            }
            if stats.unparsed_timestamps > 0 {
                checks.push(DoctorCheck {
                    name: "timestamps".to_string(),
                    status: CheckStatus::Warning,
                    message: format!(
                        "{} timestamps are not RFC 3339 and were passed through as-is",
                        stats.unparsed_timestamps
                    ),
                });
            }
            summary = Some(stats);
        }
    }

    // Check stdin is available (for `--input -`)
    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (--input - ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: PATHMAPPER_VERSION.to_string(),
        checks,
        stats: summary,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("PathMapper Doctor Report");
        println!("========================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(PathMapperCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(json_schema: bool) -> Result<(), PathMapperCliError> {
    if json_schema {
        println!("{}", get_output_json_schema());
    } else {
        println!("Output Schema: pathmapper batch");
        println!();
        println!("- routes: Array of movement segments");
        println!("  - coordinates: [[longitude, latitude], ...] (longitude first)");
        println!("  - activityType: e.g. WALKING, IN_PASSENGER_VEHICLE (optional)");
        println!("  - startTime, endTime: timestamps as exported (optional)");
        println!("- placeVisits: Array of stays");
        println!("  - coordinates: [longitude, latitude]");
        println!("  - name (falls back to address), semanticType, address, placeId");
        println!("  - startTime, endTime, confidence");
    }

    Ok(())
}

// Helper functions

/// Load a batch from a directory, a single file, or stdin
fn load_batch(input: &Path) -> Result<NormalizedBatch, PathMapperCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(Normalizer::normalize_json(&buffer)?);
    }

    if input.is_file() {
        let content = fs::read_to_string(input)?;
        return Ok(Normalizer::normalize_json(&content)?);
    }

    let report = directory_to_batch(&SourceConfig::new(input))?;
    for failure in &report.files_failed {
        log::warn!("Skipped {}: {}", failure.path.display(), failure.message);
    }
    Ok(report.batch)
}

fn get_output_json_schema() -> String {
    let position = serde_json::json!({
        "type": "array",
        "description": "[longitude, latitude] in decimal degrees",
        "prefixItems": [{ "type": "number" }, { "type": "number" }]
    });

    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "pathmapper.batch",
        "description": "Normalized location history",
        "type": "object",
        "required": ["routes", "placeVisits"],
        "properties": {
            "routes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["coordinates"],
                    "properties": {
                        "coordinates": { "type": "array", "items": position },
                        "activityType": { "type": "string" },
                        "startTime": { "type": "string" },
                        "endTime": { "type": "string" }
                    }
                }
            },
            "placeVisits": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["coordinates"],
                    "properties": {
                        "coordinates": position,
                        "name": { "type": "string" },
                        "semanticType": { "type": "string" },
                        "startTime": { "type": "string" },
                        "endTime": { "type": "string" },
                        "confidence": { "type": "number" },
                        "address": { "type": "string" },
                        "placeId": { "type": "string" }
                    }
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum PathMapperCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Source(SourceError),
    Encoding(String),
    NoRecords,
    DoctorFailed,
}

impl From<io::Error> for PathMapperCliError {
    fn from(e: io::Error) -> Self {
        PathMapperCliError::Io(e)
    }
}

impl From<serde_json::Error> for PathMapperCliError {
    fn from(e: serde_json::Error) -> Self {
        PathMapperCliError::Json(e)
    }
}

impl From<SourceError> for PathMapperCliError {
    fn from(e: SourceError) -> Self {
        PathMapperCliError::Source(e)
    }
}

impl From<PathMapperError> for PathMapperCliError {
    fn from(e: PathMapperError) -> Self {
        match e {
            PathMapperError::Json(e) => PathMapperCliError::Json(e),
            PathMapperError::Io(e) => PathMapperCliError::Io(e),
            PathMapperError::Source(e) => PathMapperCliError::Source(e),
            PathMapperError::Encoding(msg) => PathMapperCliError::Encoding(msg),
        }
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<PathMapperCliError> for CliError {
    fn from(e: PathMapperCliError) -> Self {
        match e {
            PathMapperCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            PathMapperCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            PathMapperCliError::Source(e @ SourceError::NoFiles(_)) => CliError {
                code: "NO_FILES".to_string(),
                message: e.to_string(),
                hint: Some("Copy your timeline export JSON files into the directory".to_string()),
            },
            PathMapperCliError::Source(e) => CliError {
                code: "NO_DIRECTORY".to_string(),
                message: e.to_string(),
                hint: Some("Pass --input with the export directory".to_string()),
            },
            PathMapperCliError::Encoding(msg) => CliError {
                code: "ENCODING_ERROR".to_string(),
                message: msg,
                hint: None,
            },
            PathMapperCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "Input was read but produced no routes or place visits".to_string(),
                hint: Some("Check that files contain timelineObjects entries".to_string()),
            },
            PathMapperCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ActivityEntry {
    activity_type: String,
    label: String,
    routes: usize,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<BatchStats>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
