use chrono::Local;
use clap::{Parser, ValueEnum};
use cxrtriage_core::cli::logger_builder;
use cxrtriage_core::report::{DiagnosticReport, ReportRequest};
use cxrtriage_core::Result;
use log::{error, info};
use std::fs;
use std::path::PathBuf;
use std::process;

/// CLI tool for rendering a patient report from prediction records
#[derive(Parser, Debug)]
#[command(name = "cxrreport")]
#[command(about = "Render a chest X-ray triage report from a JSON prediction file")]
#[command(version)]
struct Cli {
    /// JSON file with patient details and prediction records
    #[arg(value_name = "FILE")]
    request: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    Text,
    /// Validated request, re-serialized
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn setup_logging(verbose: bool) {
    logger_builder(verbose).init();
}

fn run(cli: &Cli) -> Result<()> {
    let request = ReportRequest::from_json_file(&cli.request)?;
    info!(
        "Loaded {} prediction records from {}",
        request.predictions.len(),
        cli.request.display()
    );

    let rendered = match cli.format {
        OutputFormat::Text => {
            DiagnosticReport::new(&request, Local::now().naive_local()).to_string()
        }
        OutputFormat::Json => request.to_json()?,
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
