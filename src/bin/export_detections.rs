//! Export locally stored detections to CSV or XLS.
//!
//! Reads the same local store as the TUI (`SAFECELL_DB_PATH`) and writes a
//! timestamped file into the export directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin export_detections -- [--format csv|xls] [--out-dir <path>] \
//!     [--range today|week|month|year|all] [--outcome positive|negative] \
//!     [--province <id>] [--district <id>] [--patient <digits>]
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use safecell::adapters::sqlite::SqliteLocalStore;
use safecell::application::{
    export_to_dir, DetectionFilter, ExportFormat, RecordBrowser, RecordStore, TimeRange,
};
use safecell::{AppConfig, DetectionOutcome};

const USAGE: &str = "Usage: export_detections [--format csv|xls] [--out-dir <path>] \
[--range today|week|month|year|all] [--outcome positive|negative] \
[--province <id>] [--district <id>] [--patient <digits>]";

struct Options {
    format: ExportFormat,
    out_dir: Option<PathBuf>,
    filter: DetectionFilter,
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("{flag} needs a value\n{USAGE}"))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Options>> {
    let mut options = Options {
        format: ExportFormat::Csv,
        out_dir: None,
        filter: DetectionFilter::default(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format" => {
                let v = value(&mut args, "--format")?;
                options.format =
                    ExportFormat::parse(&v).ok_or_else(|| anyhow!("Unknown format {v:?}"))?;
            }
            "--out-dir" => options.out_dir = Some(PathBuf::from(value(&mut args, "--out-dir")?)),
            "--range" => {
                let v = value(&mut args, "--range")?;
                options.filter.range =
                    TimeRange::parse(&v).ok_or_else(|| anyhow!("Unknown range {v:?}"))?;
            }
            "--outcome" => {
                let v = value(&mut args, "--outcome")?;
                options.filter.outcome = Some(match v.to_ascii_lowercase().as_str() {
                    "positive" => DetectionOutcome::Positive,
                    "negative" => DetectionOutcome::Negative,
                    _ => return Err(anyhow!("Unknown outcome {v:?}")),
                });
            }
            "--province" => options.filter.province = Some(value(&mut args, "--province")?),
            "--district" => options.filter.district = Some(value(&mut args, "--district")?),
            "--patient" => options.filter.patient_query = value(&mut args, "--patient")?,
            "-h" | "--help" => {
                println!("{USAGE}\n\nWrites matching detections, newest first, to a timestamped file.");
                return Ok(None);
            }
            _ => return Err(anyhow!("Unknown arg: {arg}\n{USAGE}")),
        }
    }

    Ok(Some(options))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(options) = parse_args(std::env::args().skip(1))? else {
        return Ok(());
    };

    let config = AppConfig::from_env_or_default();
    let store = SqliteLocalStore::new(&config.db_path)
        .with_context(|| format!("Failed to open local store at {:?}", config.db_path))?;
    let browser = RecordBrowser::new(RecordStore::new(Arc::new(store), config.store_limits()));

    let records = browser.list(&options.filter);
    let out_dir = options.out_dir.unwrap_or(config.export_dir);
    let path = export_to_dir(&records, options.format, &out_dir)?;

    println!("Exported {} of {} detections to {}", records.len(), browser.count(), path.display());
    Ok(())
}
