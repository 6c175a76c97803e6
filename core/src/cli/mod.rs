pub mod report;

use crate::error::Result;
use crate::types::PipelineConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::LevelFilter;
use std::path::PathBuf;

/// Command-line arguments for cxrtriage
#[derive(Parser, Debug)]
#[command(name = "cxrtriage")]
#[command(about = "Assemble a labeled chest X-ray corpus from public datasets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(short, long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Pipeline subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan, sample, split and copy both datasets, then write metadata
    Run(RunArgs),

    /// Rebuild metadata.csv from the canonical layout only
    Record {
        /// Root of the canonical layout
        #[arg(short, long, default_value = "data/processed")]
        output: PathBuf,
    },

    /// Check metadata.csv against the canonical layout
    Verify {
        /// Root of the canonical layout
        #[arg(short, long, default_value = "data/processed")]
        output: PathBuf,
    },
}

/// Arguments of the `run` subcommand
///
/// Unset flags keep the value from `--config`, or the built-in default.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root of the pneumonia dataset
    #[arg(long, value_name = "DIR")]
    pub pneumonia_root: Option<PathBuf>,

    /// Root of the tuberculosis dataset
    #[arg(long, value_name = "DIR")]
    pub tuberculosis_root: Option<PathBuf>,

    /// Root of the canonical output layout
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Seed for sampling and splitting
    #[arg(long)]
    pub seed: Option<u64>,

    /// Remove previous canonical output before writing
    #[arg(long)]
    pub clean: bool,
}

impl RunArgs {
    /// Resolves the pipeline configuration: defaults, then file, then flags
    pub fn into_config(self) -> Result<PipelineConfig> {
        let mut config = match self.config {
            Some(path) => load_config_file(&path)?,
            None => PipelineConfig::default(),
        };

        if let Some(root) = self.pneumonia_root {
            config = config.with_pneumonia_root(root);
        }
        if let Some(root) = self.tuberculosis_root {
            config = config.with_tuberculosis_root(root);
        }
        if let Some(output) = self.output {
            config = config.with_output_root(output);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.clean {
            config = config.clean_before_write(true);
        }

        Ok(config)
    }
}

#[cfg(feature = "json")]
fn load_config_file(path: &std::path::Path) -> Result<PipelineConfig> {
    PipelineConfig::from_json_file(path)
}

#[cfg(not(feature = "json"))]
fn load_config_file(path: &std::path::Path) -> Result<PipelineConfig> {
    Err(crate::error::CorpusError::Config(format!(
        "reading {} requires the 'json' feature",
        path.display()
    )))
}

/// Logger setup shared by the binaries
///
/// `RUST_LOG` is honoured and defaults to `info`. `--verbose` forces the
/// global level to `debug`.
pub fn logger_builder(verbose: bool) -> env_logger::Builder {
    builder_from_env(Env::default(), verbose)
}

fn builder_from_env(env: Env<'_>, verbose: bool) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env.default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::parse_from([
            "cxrtriage",
            "run",
            "--output",
            "out",
            "--seed",
            "7",
            "--clean",
            "-v",
        ]);
        assert!(cli.verbose);
        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };

        let config = args.into_config().unwrap();
        assert_eq!(config.output_root, PathBuf::from("out"));
        assert_eq!(config.seed, 7);
        assert!(config.clean);
        assert_eq!(config.pneumonia_root, PipelineConfig::default().pneumonia_root);
    }

    #[test]
    fn test_parse_verify_defaults() {
        let cli = Cli::parse_from(["cxrtriage", "verify", "--format", "json"]);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(matches!(
            cli.command,
            Command::Verify { ref output } if output == &PathBuf::from("data/processed")
        ));
    }

    #[test]
    fn test_logger_defaults_to_info() {
        let env = Env::new().filter("CXRTRIAGE_TEST_LOG_UNSET");
        assert_eq!(builder_from_env(env, false).build().filter(), LevelFilter::Info);
    }

    #[test]
    fn test_logger_respects_env_level() {
        std::env::set_var("CXRTRIAGE_TEST_LOG_WARN", "warn");
        let env = Env::new().filter("CXRTRIAGE_TEST_LOG_WARN");
        assert_eq!(builder_from_env(env, false).build().filter(), LevelFilter::Warn);
    }

    #[test]
    fn test_logger_verbose_forces_debug() {
        std::env::set_var("CXRTRIAGE_TEST_LOG_VERBOSE", "warn");
        let env = Env::new().filter("CXRTRIAGE_TEST_LOG_VERBOSE");
        assert_eq!(builder_from_env(env, true).build().filter(), LevelFilter::Debug);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"seed": 5, "output_root": "from_file"}"#).unwrap();

        let args = RunArgs {
            config: Some(path),
            output: Some(PathBuf::from("from_flag")),
            ..RunArgs::default()
        };
        let config = args.into_config().unwrap();

        assert_eq!(config.seed, 5);
        assert_eq!(config.output_root, PathBuf::from("from_flag"));
    }
}
