mod config;
mod registry;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use config::{FileConfig, Overrides, load_config, resolve_export, resolve_options, resolve_store};
use feastgen_eval::{EvalError, IntegrityVerifier, VerifyOptions, render_report};
use feastgen_generate::{GenerationEngine, GenerationError};
use feastgen_sink::{
    Destination, SinkError, deliver, export_json_schema, redact_database_url, write_bytes_atomic,
};
use registry::{LogFormat, RunRecord, init_logging, write_run_record};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
    #[error("verification error: {0}")]
    Eval(#[from] EvalError),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "feastgen",
    version,
    about = "Synthetic food-delivery data generator",
    long_about = "Generates users, vendors, menus and orders. Without a subcommand the \
                  dataset is exported to mock_data.json."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// TOML config file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Run seed; the same seed and anchor reproduce a dataset.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Reference time for generated timestamps (RFC 3339).
    #[arg(long, global = true, value_name = "RFC3339")]
    anchor: Option<DateTime<Utc>>,
    /// Faker locale (en_US, pt_BR).
    #[arg(long, global = true)]
    locale: Option<String>,
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
    /// Also append JSON logs to this file.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Write a run record under `<DIR>/<run_id>/run.json`.
    #[arg(long, global = true, value_name = "DIR")]
    run_dir: Option<PathBuf>,
}

impl GlobalArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed,
            anchor: self.anchor,
            locale: self.locale.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and write the nested JSON fixture.
    Export(ExportArgs),
    /// Generate and insert into a migrated Postgres database.
    Seed(SeedArgs),
    /// Check an exported document for integrity violations.
    Verify(VerifyArgs),
    /// Print the JSON Schema of the export document.
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output path (defaults to mock_data.json).
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SeedArgs {
    #[arg(long, value_name = "URL")]
    database_url: Option<String>,
    /// Database schema holding the five tables.
    #[arg(long, value_name = "SCHEMA")]
    db_schema: Option<String>,
    /// Keep existing rows instead of clearing the tables first.
    #[arg(long, default_value_t = false)]
    no_clear: bool,
    /// Disable FK triggers while clearing (needs superuser).
    #[arg(long, default_value_t = false)]
    suspend_constraints: bool,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Exported JSON document.
    path: PathBuf,
    /// Print violations without failing.
    #[arg(long, default_value_t = false)]
    lenient: bool,
    #[arg(long, default_value_t = 20)]
    max_examples: usize,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.global.log_format, cli.global.log_file.as_deref())?;
    let config = load_config(cli.global.config.as_deref())?;

    match cli.command {
        None => {
            let destination = Destination::Export(config.export.clone());
            run_pipeline("export", &cli.global, &config, destination).await
        }
        Some(Command::Export(args)) => {
            let destination = Destination::Export(resolve_export(config.export.clone(), args.out));
            run_pipeline("export", &cli.global, &config, destination).await
        }
        Some(Command::Seed(args)) => {
            let store = resolve_store(
                config.store.clone(),
                args.database_url,
                args.db_schema,
                args.no_clear,
                args.suspend_constraints,
            )?;
            run_pipeline("seed", &cli.global, &config, Destination::Store(store)).await
        }
        Some(Command::Verify(args)) => run_verify(&config, args),
        Some(Command::Schema(args)) => run_schema(args),
    }
}

/// Generate, verify strictly, then hand the dataset to its destination.
async fn run_pipeline(
    command: &str,
    global: &GlobalArgs,
    config: &FileConfig,
    destination: Destination,
) -> Result<(), CliError> {
    let started_at = Utc::now();
    let options = resolve_options(config.generate.clone(), &global.overrides())?;

    match &destination {
        Destination::Export(export) => {
            info!(event = "run_started", command, path = %export.path.display());
        }
        Destination::Store(store) => info!(
            event = "run_started",
            command,
            database = %redact_database_url(&store.database_url),
            schema = %store.schema,
            clear = store.clear
        ),
    }

    let result = GenerationEngine::new(options.clone()).run()?;
    let generation = &result.report;

    let integrity = IntegrityVerifier::new(VerifyOptions::from_generate(&options))
        .verify_dataset(&result.dataset)?;
    info!(
        event = "integrity_verified",
        checks = integrity.checks.len(),
        violations = integrity.violation_count()
    );

    let sink = deliver(&result.dataset, &destination).await?;
    let rows: u64 = sink.tables.iter().map(|table| table.rows).sum();
    info!(
        event = "run_finished",
        run_id = %generation.run_id,
        seed = generation.seed,
        sink = %sink.sink,
        rows
    );

    if let Some(run_dir) = &global.run_dir {
        let record = RunRecord {
            run_id: &generation.run_id,
            command,
            started_at,
            finished_at: Utc::now(),
            options: &options,
            generation,
            integrity: &integrity,
            sink: &sink,
        };
        let path = write_run_record(run_dir, &record)?;
        info!(event = "run_recorded", path = %path.display());
    }

    match &sink.path {
        Some(path) => println!(
            "Exported {rows} records to {} (seed {})",
            path.display(),
            generation.seed
        ),
        None => println!("Seeded {rows} rows (seed {})", generation.seed),
    }
    Ok(())
}

fn run_verify(config: &FileConfig, args: VerifyArgs) -> Result<(), CliError> {
    let options = VerifyOptions {
        max_examples: args.max_examples,
        ..VerifyOptions::from_generate(&config.generate)
    };
    let report = IntegrityVerifier::new(options.clone().lenient()).verify_export_file(&args.path)?;
    println!("{}", render_report(&report, options.max_examples));

    if !args.lenient && !report.is_clean() {
        return Err(EvalError::Violations(report.violation_count()).into());
    }
    Ok(())
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let schema = serde_json::to_string_pretty(&export_json_schema())?;
    match args.out {
        Some(path) => {
            write_bytes_atomic(&path, schema.as_bytes())?;
            info!(event = "schema_written", path = %path.display());
        }
        None => println!("{schema}"),
    }
    Ok(())
}
