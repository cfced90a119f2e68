//! Process command - extract shipments from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use waybill_core::shipment::{BlockFormat, ShipmentExtractor, ShipmentParser};
use waybill_core::read_document_text;

use super::config::load_config;
use super::output::{OutputFormat, format_records};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or a .txt text dump of one)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config, else json)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print extraction statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Report records with suspicious values
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Reading document...");

    let text = read_document_text(&args.input, &config.pdf)?;

    pb.set_message("Extracting shipments...");
    let parser = ShipmentParser::from_config(&config.extraction);
    let result = parser.parse(&text);

    pb.finish_and_clear();

    if args.validate {
        let issues: Vec<String> = result.records.iter().flat_map(|r| r.validate()).collect();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let format = match args.format {
        Some(format) => format,
        None => OutputFormat::from_name(&config.output.format)?,
    };
    let output = format_records(&result.records, format, args.pretty || config.output.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} {} shipments written to {}",
            style("✓").green(),
            result.records.len(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    if args.stats {
        eprintln!();
        eprintln!(
            "{} {} anchors, {} shipments ({} standard, {} tendered date, {} customs entry date)",
            style("ℹ").blue(),
            result.anchors,
            result.records.len(),
            result.count_format(BlockFormat::Standard),
            result.count_format(BlockFormat::TenderedDate),
            result.count_format(BlockFormat::CustomsEntryDate),
        );
        for warning in &result.warnings {
            eprintln!("  {} {}", style("skipped").yellow(), warning);
        }
        eprintln!(
            "{} Extraction time: {} ms (total {:?})",
            style("ℹ").blue(),
            result.processing_time_ms,
            start.elapsed()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
