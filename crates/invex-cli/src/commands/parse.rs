//! Parse command - extract data from a single invoice text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use invex_core::models::config::ParserConfig;
use invex_core::models::invoice::InvoiceExtract;
use invex_core::{process_invoice, InvexError, InvoiceParser, PlainTextEngine};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (plain text from an OCR run)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence score
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (one row of scalar fields)
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let data = fs::read(&args.input)?;
    let filename = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let engine = PlainTextEngine::new();
    let parser = InvoiceParser::from_config(&config);

    let extract = match process_invoice(&engine, &parser, &data, filename) {
        Ok(extract) => extract,
        Err(InvexError::Engine(e)) => {
            anyhow::bail!("Cannot read input: {e}");
        }
        Err(InvexError::Parse(e)) => {
            anyhow::bail!("Text is not invoice-like: {e}");
        }
        Err(e) => return Err(e.into()),
    };

    let output = format_extract(&extract, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{output}");
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            extract.score * 100.0
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ParserConfig> {
    Ok(if let Some(path) = config_path {
        ParserConfig::from_file(std::path::Path::new(path))?
    } else {
        ParserConfig::default()
    })
}

/// Render an extract in the requested output format.
pub fn format_extract(extract: &InvoiceExtract, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(extract)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record([
                "invoice_number",
                "invoice_date",
                "due_date",
                "vendor",
                "subtotal",
                "discount",
                "tax",
                "total",
                "currency",
                "items",
                "score",
            ])?;
            writer.write_record([
                extract.invoice_number.clone().unwrap_or_default(),
                extract
                    .invoice_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                extract.due_date.map(|d| d.to_string()).unwrap_or_default(),
                extract.vendor.clone().unwrap_or_default(),
                extract
                    .subtotal
                    .map(|a| a.to_string())
                    .unwrap_or_default(),
                extract
                    .discount
                    .map(|a| a.to_string())
                    .unwrap_or_default(),
                extract.tax.map(|a| a.to_string()).unwrap_or_default(),
                extract.total.map(|a| a.to_string()).unwrap_or_default(),
                extract.currency.clone().unwrap_or_default(),
                extract.items.len().to_string(),
                format!("{:.2}", extract.score),
            ])?;
            Ok(String::from_utf8(writer.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            let field = |name: &str, value: &str| format!("{:<16} {}\n", name, value);

            out.push_str(&field(
                "Invoice number:",
                extract.invoice_number.as_deref().unwrap_or("-"),
            ));
            out.push_str(&field(
                "Invoice date:",
                &extract
                    .invoice_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ));
            out.push_str(&field(
                "Due date:",
                &extract
                    .due_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ));
            out.push_str(&field(
                "Vendor:",
                extract.vendor.as_deref().unwrap_or("-"),
            ));
            out.push_str(&field(
                "Currency:",
                extract.currency.as_deref().unwrap_or("-"),
            ));
            let amount = |a: Option<rust_decimal::Decimal>| -> String {
                a.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
            };
            out.push_str(&field("Subtotal:", &amount(extract.subtotal)));
            out.push_str(&field("Discount:", &amount(extract.discount)));
            out.push_str(&field("Tax:", &amount(extract.tax)));
            out.push_str(&field("Total:", &amount(extract.total)));

            if !extract.items.is_empty() {
                out.push('\n');
                out.push_str("Items:\n");
                for item in &extract.items {
                    out.push_str(&format!(
                        "  {} x{} @ {} = {}\n",
                        item.description, item.quantity, item.rate, item.amount
                    ));
                }
            }

            Ok(out)
        }
    }
}
