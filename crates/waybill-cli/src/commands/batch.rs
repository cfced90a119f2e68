//! Batch processing command for multiple invoice files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::StreamExt;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use waybill_core::models::shipment::sum_totals;
use waybill_core::shipment::{ExtractionResult, ShipmentExtractor, ShipmentParser};
use waybill_core::{ShipmentRecord, WaybillConfig, read_document_text};

use super::config::load_config;
use super::output::{OutputFormat, format_records};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern (e.g. "invoices/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Directory for one output file per input
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format (default: from config, else json)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write all records, in input order, to a single file
    #[arg(long)]
    merge: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    extraction: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let format = match args.format {
        Some(format) => format,
        None => OutputFormat::from_name(&config.output.format)?,
    };
    let pretty = config.output.pretty;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(ShipmentParser::from_config(&config.extraction));
    let config = Arc::new(config);

    // Extraction is CPU bound; run it on the blocking pool, results in input order
    let mut outcomes = futures_util::stream::iter(files.into_iter().map(|path| {
        let parser = Arc::clone(&parser);
        let config = Arc::clone(&config);
        async move {
            let file_start = Instant::now();
            let task_path = path.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                process_single_file(&task_path, &parser, &config)
            })
            .await
            .unwrap_or_else(|e| Err(anyhow::anyhow!("worker failed: {}", e)));
            (path, outcome, file_start.elapsed().as_millis() as u64)
        }
    }))
    .buffered(args.jobs.max(1));

    let mut results = Vec::new();

    while let Some((path, outcome, processing_time_ms)) = outcomes.next().await {
        match outcome {
            Ok(extraction) => {
                results.push(ProcessResult {
                    path,
                    extraction: Some(extraction),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        extraction: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.extraction.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(ref output_dir) = args.output_dir {
        let paths: Vec<PathBuf> = results.iter().map(|r| r.path.clone()).collect();
        let names = output_names(&paths, format.extension());

        for (result, output_name) in results.iter().zip(&names) {
            if let Some(extraction) = &result.extraction {
                let output_path = output_dir.join(output_name);

                fs::write(&output_path, format_records(&extraction.records, format, pretty)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    let merged: Vec<ShipmentRecord> = successful
        .iter()
        .filter_map(|r| r.extraction.as_ref())
        .flat_map(|e| e.records.iter().cloned())
        .collect();

    if let Some(ref merge_path) = args.merge {
        fs::write(merge_path, format_records(&merged, format, pretty)?)?;
        eprintln!(
            "{} {} shipments merged into {}",
            style("✓").green(),
            merged.len(),
            merge_path.display()
        );
    } else if args.output_dir.is_none() {
        println!("{}", format_records(&merged, format, pretty)?.trim_end());
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed, {} shipments",
        style(successful.len()).green(),
        style(failed.len()).red(),
        merged.len()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// One output file name per input, in order. Inputs sharing a stem get
/// `-2`, `-3`, ... suffixes so no output overwrites another.
fn output_names(paths: &[PathBuf], extension: &str) -> Vec<String> {
    let mut used = HashSet::new();

    paths
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("invoice");
            let mut name = format!("{}.{}", stem, extension);
            let mut n = 2;
            while !used.insert(name.clone()) {
                name = format!("{}-{}.{}", stem, n, extension);
                n += 1;
            }
            if n > 2 {
                warn!("{} shares its name with another input, writing {}", path.display(), name);
            }
            name
        })
        .collect()
}

fn process_single_file(
    path: &Path,
    parser: &ShipmentParser,
    config: &WaybillConfig,
) -> anyhow::Result<ExtractionResult> {
    let text = read_document_text(path, &config.pdf)?;
    let result = parser.parse(&text);

    for warning in &result.warnings {
        debug!("{}: {}", path.display(), warning);
    }

    Ok(result)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "anchors",
        "shipments",
        "total_amount",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(extraction) = &result.extraction {
            wtr.write_record([
                filename,
                "success",
                &extraction.anchors.to_string(),
                &extraction.records.len().to_string(),
                &sum_totals(&extraction.records).to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
