//! Batch processing command for multiple invoice text files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use invex_core::models::invoice::InvoiceExtract;
use invex_core::{process_invoice, InvoiceParser, PlainTextEngine};

use super::parse::{format_extract, load_config, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct BatchResult {
    path: PathBuf,
    extract: Option<InvoiceExtract>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let engine = PlainTextEngine::new();
    let parser = InvoiceParser::from_config(&config);

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let result = process_file(&path, &engine, &parser, &args);

        if let Some(ref message) = result.error {
            error!("{}: {}", path.display(), message);
            if !args.continue_on_error {
                pb.abandon();
                anyhow::bail!("{}: {}", path.display(), message);
            }
        }

        results.push(result);
        pb.inc(1);
    }

    pb.finish_and_clear();

    let parsed = results.iter().filter(|r| r.extract.is_some()).count();
    let failed = results.len() - parsed;

    println!(
        "{} Parsed {} of {} files ({} failed) in {:.1}s",
        style("✓").green(),
        parsed,
        results.len(),
        failed,
        start.elapsed().as_secs_f64()
    );

    if args.summary {
        let summary_path = args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("summary.csv");
        write_summary(&results, &summary_path)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    Ok(())
}

fn process_file(
    path: &PathBuf,
    engine: &PlainTextEngine,
    parser: &InvoiceParser,
    args: &BatchArgs,
) -> BatchResult {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            return BatchResult {
                path: path.clone(),
                extract: None,
                error: Some(e.to_string()),
            };
        }
    };

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    match process_invoice(engine, parser, &data, filename) {
        Ok(extract) => {
            let error = write_output(path, &extract, args).err().map(|e| e.to_string());
            BatchResult {
                path: path.clone(),
                extract: Some(extract),
                error,
            }
        }
        Err(e) => BatchResult {
            path: path.clone(),
            extract: None,
            error: Some(e.to_string()),
        },
    }
}

fn write_output(path: &PathBuf, extract: &InvoiceExtract, args: &BatchArgs) -> anyhow::Result<()> {
    let Some(ref output_dir) = args.output_dir else {
        return Ok(());
    };

    let extension = match args.format {
        OutputFormat::Json => "json",
        OutputFormat::Csv => "csv",
        OutputFormat::Text => "txt",
    };
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice");
    let output_path = output_dir.join(format!("{stem}.{extension}"));

    let output = format_extract(extract, args.format)?;
    fs::write(&output_path, output)?;
    debug!("Wrote {}", output_path.display());

    Ok(())
}

fn write_summary(results: &[BatchResult], path: &PathBuf) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "file",
        "status",
        "invoice_number",
        "vendor",
        "total",
        "currency",
        "score",
        "error",
    ])?;

    for result in results {
        match &result.extract {
            Some(extract) => writer.write_record([
                result.path.display().to_string(),
                "ok".to_string(),
                extract.invoice_number.clone().unwrap_or_default(),
                extract.vendor.clone().unwrap_or_default(),
                extract.total.map(|t| t.to_string()).unwrap_or_default(),
                extract.currency.clone().unwrap_or_default(),
                format!("{:.2}", extract.score),
                String::new(),
            ])?,
            None => writer.write_record([
                result.path.display().to_string(),
                "failed".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                result.error.clone().unwrap_or_default(),
            ])?,
        }
    }

    writer.flush()?;
    Ok(())
}
