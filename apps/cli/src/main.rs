mod acquirer;
mod render;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tabula_import::{ImportConfig, ImportOutcome, Importer, ProjectionMode};

use crate::acquirer::{PathAcquirer, PromptAcquirer};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Rows,
    Assets,
}

impl From<ModeArg> for ProjectionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Rows => ProjectionMode::Rows,
            ModeArg::Assets => ProjectionMode::Assets,
        }
    }
}

#[derive(Parser)]
#[command(about = "Import a spreadsheet (XLSX/XLSB/XLS/ODS) or CSV file and print its rows.")]
struct Args {
    /// File to import. Prompts on stdin when omitted.
    path: Option<PathBuf>,

    /// Print filtered rows, or asset records projected from the first two columns.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// JSON file with import settings (`mode`, `max_payload_bytes`, `acquire_timeout_secs`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Give up if no file has been read after this many seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Refuse files larger than this many bytes.
    #[arg(long, value_name = "N")]
    max_bytes: Option<u64>,
}

fn main() -> ExitCode {
    configure_logging();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn configure_logging() {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Settings are layered: defaults, then `--config`, then `TABULA_*` variables, then flags.
fn resolve_config(args: &Args) -> Result<ImportConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            ImportConfig::from_json(&json)
                .with_context(|| format!("parse config {}", path.display()))?
                .with_process_env()
        }
        None => ImportConfig::from_env(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if let Some(secs) = args.timeout {
        config.acquire_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(limit) = args.max_bytes {
        anyhow::ensure!(limit > 0, "--max-bytes must be greater than zero");
        config.max_payload_bytes = limit;
    }
    Ok(config)
}

fn run(args: Args) -> Result<ExitCode> {
    let config = resolve_config(&args)?;
    log::debug!("import config: {config:?}");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;

    let Args { path, format, .. } = args;
    let max_bytes = config.max_payload_bytes;
    let mut importer = Importer::new(config);
    let outcome = runtime.block_on(async {
        match path {
            Some(path) => {
                importer
                    .run_import(&mut PathAcquirer::new(path, max_bytes))
                    .await
            }
            None => importer.run_import(&mut PromptAcquirer::new(max_bytes)).await,
        }
    });
    // A stdin read abandoned by the timeout cannot be interrupted; don't wait for it.
    runtime.shutdown_background();

    match outcome {
        ImportOutcome::Completed(report) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let written = match format {
                OutputFormat::Text => render::write_text(&mut handle, &report),
                OutputFormat::Json => render::write_json(&mut handle, &report),
            }
            .and_then(|()| handle.flush());
            match written {
                // A closed pipe (`tabula ... | head`) is not a failure.
                Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {}
                other => other.context("write output")?,
            }
            Ok(ExitCode::SUCCESS)
        }
        ImportOutcome::Cancelled => Ok(ExitCode::SUCCESS),
        ImportOutcome::Failed(message) => {
            eprintln!("error: {message}");
            Ok(ExitCode::FAILURE)
        }
        ImportOutcome::Rejected => anyhow::bail!("an import is already in progress"),
    }
}
