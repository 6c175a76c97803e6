use clap::Parser;
use cxrtriage_core::cli::{logger_builder, Cli, Command, OutputFormat};
use cxrtriage_core::metadata::record_metadata;
use cxrtriage_core::{metadata_path_for, MetadataTable, Pipeline, Result, TextReport};
use log::{error, info};
use std::path::Path;
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let outcome = match cli.command {
        Command::Run(args) => args
            .into_config()
            .and_then(|config| run_pipeline(Pipeline::new(config), &cli.format)),
        Command::Record { output } => record(&output, &cli.format),
        Command::Verify { output } => verify(&output, &cli.format),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn setup_logging(verbose: bool) {
    logger_builder(verbose).init();
}

fn run_pipeline(pipeline: Pipeline, format: &OutputFormat) -> Result<bool> {
    info!("Using configuration: {:?}", pipeline.config());
    let summary = pipeline.run()?;
    match format {
        OutputFormat::Text => println!("{}", TextReport::new(&summary)),
        OutputFormat::Json => print_json(&summary),
    }
    Ok(true)
}

fn record(output: &Path, format: &OutputFormat) -> Result<bool> {
    let table = record_metadata(output)?;
    match format {
        OutputFormat::Text => println!(
            "Metadata saved with {} entries to {}",
            table.len(),
            metadata_path_for(output).display()
        ),
        OutputFormat::Json => print_json(&table),
    }
    Ok(true)
}

fn verify(output: &Path, format: &OutputFormat) -> Result<bool> {
    let table = MetadataTable::read_csv(&metadata_path_for(output))?;
    let report = table.reconcile(output)?;
    match format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => print_json(&report),
    }
    Ok(report.is_ok())
}

#[cfg(feature = "json")]
fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize to JSON: {}", e);
            eprintln!("Error: Failed to serialize to JSON: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(not(feature = "json"))]
fn print_json<T>(_value: &T) {
    eprintln!("Error: JSON output requires the 'json' feature");
    eprintln!("Rebuild with: cargo build --features json");
    process::exit(1);
}
